//! Perspective camera with damped orbit controls.
//!
//! The camera orbits a target point on a sphere described by a distance,
//! an azimuth `theta` (around +Y, measured from +Z) and a polar angle `phi`
//! (from +Y). Pointer input accumulates into pending deltas; each call to
//! [`OrbitCamera::update`] applies a fraction of them, so the view keeps
//! gliding for a few frames after the pointer stops.

use std::f32::consts::{PI, TAU};

use glam::{Mat4, Vec2, Vec3, Vec4Swizzles};

/// Polar angles closer than this to a pole are clamped away.
const POLE_EPSILON: f32 = 1e-3;
/// Pending motion below this is treated as settled.
const SETTLE_EPSILON: f32 = 1e-5;

/// A point projected onto the output surface.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Projected {
    /// Position in logical pixels, origin top-left.
    pub screen: Vec2,
    /// Distance in front of the camera along the view axis.
    pub depth: f32,
}

#[derive(Debug, Clone)]
pub struct OrbitCamera {
    /// Vertical field of view in radians.
    pub fov_y: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,

    pub target: Vec3,
    pub distance: f32,
    pub theta: f32,
    pub phi: f32,

    pub enable_damping: bool,
    pub damping_factor: f32,
    pub min_distance: f32,
    pub max_distance: f32,

    pending_theta: f32,
    pending_phi: f32,
    pending_pan: Vec3,
    pending_scale: f32,
}

impl OrbitCamera {
    /// Camera at `position` looking at the origin.
    pub fn looking_at_origin(position: Vec3, fov_y_degrees: f32, aspect: f32) -> Self {
        let distance = position.length();
        let theta = position.x.atan2(position.z);
        let phi = (position.y / distance).clamp(-1.0, 1.0).acos();

        Self {
            fov_y: fov_y_degrees.to_radians(),
            aspect,
            near: 0.1,
            far: 100.0,
            target: Vec3::ZERO,
            distance,
            theta,
            phi,
            enable_damping: true,
            damping_factor: 0.05,
            min_distance: 0.5,
            max_distance: 60.0,
            pending_theta: 0.0,
            pending_phi: 0.0,
            pending_pan: Vec3::ZERO,
            pending_scale: 1.0,
        }
    }

    /// The default galaxy view: 75° field of view from `(3, 3, 3)`.
    pub fn galaxy_default(aspect: f32) -> Self {
        Self::looking_at_origin(Vec3::splat(3.0), 75.0, aspect)
    }

    pub fn set_aspect(&mut self, aspect: f32) {
        self.aspect = aspect;
    }

    pub fn position(&self) -> Vec3 {
        let sin_phi = self.phi.sin();
        self.target
            + self.distance
                * Vec3::new(
                    sin_phi * self.theta.sin(),
                    self.phi.cos(),
                    sin_phi * self.theta.cos(),
                )
    }

    /// Queues a rotation; positive `d_theta` orbits towards +X.
    pub fn rotate(&mut self, d_theta: f32, d_phi: f32) {
        self.pending_theta += d_theta;
        self.pending_phi += d_phi;
    }

    /// Queues a rotation from a pointer drag of `delta` logical pixels.
    ///
    /// A drag across the full surface height turns the camera once around.
    pub fn rotate_by_pixels(&mut self, delta: Vec2, surface_height: f32) {
        if surface_height <= 0.0 {
            return;
        }
        self.rotate(
            -TAU * delta.x / surface_height,
            -TAU * delta.y / surface_height,
        );
    }

    /// Queues a pan from a pointer drag of `delta` logical pixels.
    ///
    /// The target moves so that the point under the cursor follows it at
    /// the target's depth.
    pub fn pan_by_pixels(&mut self, delta: Vec2, surface_height: f32) {
        if surface_height <= 0.0 {
            return;
        }
        let world_per_pixel = 2.0 * self.distance * (self.fov_y / 2.0).tan() / surface_height;
        let view = self.view_matrix();
        // Rows of the view rotation are the camera axes in world space.
        let right = view.row(0).xyz();
        let up = view.row(1).xyz();
        self.pending_pan += (-right * delta.x + up * delta.y) * world_per_pixel;
    }

    /// Multiplies the orbit distance by `factor` (> 1 moves away).
    pub fn zoom(&mut self, factor: f32) {
        if factor.is_finite() && factor > 0.0 {
            self.pending_scale *= factor;
        }
    }

    /// Advances the controls by one frame.
    ///
    /// Returns `true` while there is still queued motion to apply.
    pub fn update(&mut self) -> bool {
        let step = if self.enable_damping {
            self.damping_factor
        } else {
            1.0
        };

        self.theta = (self.theta + self.pending_theta * step).rem_euclid(TAU);
        self.phi = (self.phi + self.pending_phi * step).clamp(POLE_EPSILON, PI - POLE_EPSILON);
        self.target += self.pending_pan * step;
        self.distance =
            (self.distance * self.pending_scale).clamp(self.min_distance, self.max_distance);
        self.pending_scale = 1.0;

        if self.enable_damping {
            let keep = 1.0 - self.damping_factor;
            self.pending_theta *= keep;
            self.pending_phi *= keep;
            self.pending_pan *= keep;
        } else {
            self.pending_theta = 0.0;
            self.pending_phi = 0.0;
            self.pending_pan = Vec3::ZERO;
        }

        let moving = self.pending_theta.abs() > SETTLE_EPSILON
            || self.pending_phi.abs() > SETTLE_EPSILON
            || self.pending_pan.length_squared() > SETTLE_EPSILON * SETTLE_EPSILON;
        if !moving {
            self.pending_theta = 0.0;
            self.pending_phi = 0.0;
            self.pending_pan = Vec3::ZERO;
        }
        moving
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position(), self.target, Vec3::Y)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_y, self.aspect, self.near, self.far)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// Projects a world-space point onto a `width × height` surface.
    ///
    /// Returns `None` for points outside the near/far range.
    pub fn project(&self, point: Vec3, width: f32, height: f32) -> Option<Projected> {
        self.project_with(&self.view_projection(), point, width, height)
    }

    /// Like [`OrbitCamera::project`] with a precomputed view-projection
    /// matrix, for projecting many points per frame.
    pub fn project_with(
        &self,
        view_projection: &Mat4,
        point: Vec3,
        width: f32,
        height: f32,
    ) -> Option<Projected> {
        let clip = *view_projection * point.extend(1.0);
        if clip.w <= self.near {
            return None;
        }
        let ndc = clip.xyz() / clip.w;
        if !(0.0..=1.0).contains(&ndc.z) {
            return None;
        }
        Some(Projected {
            screen: Vec2::new((ndc.x + 1.0) * 0.5 * width, (1.0 - ndc.y) * 0.5 * height),
            depth: clip.w,
        })
    }
}
