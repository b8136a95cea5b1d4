use glam::Vec3;

/// Parallel position and color arrays for a generated point set.
///
/// Both arrays hold `3 × len()` floats; point `i` occupies `[3i, 3i + 3)`
/// in each. The buffer cannot be modified once built.
#[derive(Debug, Clone, PartialEq)]
pub struct PointBuffer {
    positions: Vec<f32>,
    colors: Vec<f32>,
}

impl PointBuffer {
    /// Wraps already-interleaved arrays.
    ///
    /// ### Panics
    /// If the arrays differ in length or are not a multiple of three.
    pub fn from_parts(positions: Vec<f32>, colors: Vec<f32>) -> Self {
        assert_eq!(positions.len(), colors.len(), "position/color length mismatch");
        assert_eq!(positions.len() % 3, 0, "buffer length must be a multiple of 3");
        Self { positions, colors }
    }

    /// Number of points.
    pub fn len(&self) -> usize {
        self.positions.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn positions(&self) -> &[f32] {
        &self.positions
    }

    pub fn colors(&self) -> &[f32] {
        &self.colors
    }

    pub fn position(&self, i: usize) -> Vec3 {
        Vec3::from_slice(&self.positions[3 * i..3 * i + 3])
    }

    pub fn color(&self, i: usize) -> [f32; 3] {
        [self.colors[3 * i], self.colors[3 * i + 1], self.colors[3 * i + 2]]
    }

    /// Iterates `(position, color)` pairs in point order.
    pub fn iter(&self) -> impl Iterator<Item = (Vec3, [f32; 3])> + '_ {
        self.positions
            .chunks_exact(3)
            .zip(self.colors.chunks_exact(3))
            .map(|(p, c)| (Vec3::from_slice(p), [c[0], c[1], c[2]]))
    }
}

/// Rendering style of a point cloud.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointMaterial {
    pub size: f32,
    /// Points shrink with distance from the camera.
    pub size_attenuation: bool,
    pub additive_blending: bool,
    pub depth_write: bool,
    pub vertex_colors: bool,
}

impl PointMaterial {
    pub fn galaxy(size: f32) -> Self {
        Self {
            size,
            size_attenuation: true,
            additive_blending: true,
            depth_write: false,
            vertex_colors: true,
        }
    }
}

/// A displayable point set: one buffer plus its material.
#[derive(Debug, Clone, PartialEq)]
pub struct PointCloud {
    pub buffer: PointBuffer,
    pub material: PointMaterial,
}

impl PointCloud {
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }
}
