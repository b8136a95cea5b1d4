//! [`Renderer`] backend that turns the point cloud into an egui mesh.
//!
//! Uploaded clouds are converted once into world-space positions and
//! packed vertex colors. Every frame the positions are projected through
//! the camera and emitted as small screen-space quads, which egui's painter
//! hands to the GPU in a single draw.

use std::collections::HashMap;

use egui::{Color32, Mesh, Pos2, Rect};
use galaxy_core::{
    buffer::{PointCloud, PointMaterial},
    camera::OrbitCamera,
    error::RenderError,
    render::Renderer,
    scene::{CloudId, Scene},
};
use glam::Vec3;

/// Largest cloud the backend accepts.
pub const DEFAULT_POINT_BUDGET: usize = 2_000_000;

struct UploadedPoints {
    positions: Vec<Vec3>,
    colors: Vec<Color32>,
    material: PointMaterial,
}

pub struct EguiPointRenderer {
    uploaded: HashMap<CloudId, UploadedPoints>,
    budget: usize,
    origin: Pos2,
    width: f32,
    height: f32,
    pixel_ratio: f32,
    background: Color32,
    mesh: Mesh,
    drawn: usize,
}

impl Default for EguiPointRenderer {
    fn default() -> Self {
        Self::with_budget(DEFAULT_POINT_BUDGET)
    }
}

impl EguiPointRenderer {
    pub fn with_budget(budget: usize) -> Self {
        Self {
            uploaded: HashMap::new(),
            budget,
            origin: Pos2::ZERO,
            width: 0.0,
            height: 0.0,
            pixel_ratio: 1.0,
            background: Color32::BLACK,
            mesh: Mesh::default(),
            drawn: 0,
        }
    }

    /// Screen position of the surface's top-left corner.
    pub fn set_origin(&mut self, origin: Pos2) {
        self.origin = origin;
    }

    /// Mesh produced by the last [`Renderer::render`] call.
    pub fn take_mesh(&mut self) -> Mesh {
        std::mem::take(&mut self.mesh)
    }

    /// Clear color of the last rendered scene.
    pub fn background(&self) -> Color32 {
        self.background
    }

    /// Points that survived clipping in the last frame.
    pub fn drawn(&self) -> usize {
        self.drawn
    }

    #[cfg(test)]
    pub fn uploaded_count(&self) -> usize {
        self.uploaded.len()
    }

    fn pack_color(rgb: [f32; 3], material: &PointMaterial) -> Color32 {
        let q = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        let [r, g, b] = rgb.map(q);
        if material.additive_blending {
            // Zero alpha with premultiplied color adds onto what is below.
            Color32::from_rgba_premultiplied(r, g, b, 0)
        } else {
            Color32::from_rgb(r, g, b)
        }
    }

    /// On-screen edge length of a point at `depth`, in logical pixels.
    fn point_extent(&self, material: &PointMaterial, depth: f32) -> f32 {
        let px = if material.size_attenuation {
            material.size * (self.height * 0.5) / depth
        } else {
            material.size
        };
        // Never thinner than one physical pixel.
        px.max(1.0 / self.pixel_ratio)
    }
}

impl Renderer for EguiPointRenderer {
    fn upload(&mut self, id: CloudId, cloud: &PointCloud) -> Result<(), RenderError> {
        let requested = cloud.len();
        let oom = || RenderError::OutOfMemory {
            requested,
            budget: self.budget,
        };
        if requested > self.budget {
            return Err(oom());
        }

        let mut positions = Vec::new();
        let mut colors = Vec::new();
        positions.try_reserve_exact(requested).map_err(|_| oom())?;
        colors.try_reserve_exact(requested).map_err(|_| oom())?;

        for (p, c) in cloud.buffer.iter() {
            positions.push(p);
            let rgb = if cloud.material.vertex_colors {
                c
            } else {
                [1.0, 1.0, 1.0]
            };
            colors.push(Self::pack_color(rgb, &cloud.material));
        }

        self.uploaded.insert(
            id,
            UploadedPoints {
                positions,
                colors,
                material: cloud.material,
            },
        );
        tracing::debug!(?id, points = requested, "uploaded point cloud");
        Ok(())
    }

    fn release(&mut self, id: CloudId) {
        if self.uploaded.remove(&id).is_some() {
            tracing::debug!(?id, "freed point cloud");
        }
    }

    fn set_size(&mut self, width: f32, height: f32) {
        self.width = width;
        self.height = height;
    }

    fn set_pixel_ratio(&mut self, ratio: f32) {
        self.pixel_ratio = ratio;
    }

    fn render(&mut self, scene: &Scene, camera: &OrbitCamera) {
        let [r, g, b] = scene.background.to_bytes();
        self.background = Color32::from_rgb(r, g, b);
        self.mesh.clear();
        self.drawn = 0;

        let Some(points) = scene.cloud_id().and_then(|id| self.uploaded.get(&id)) else {
            return;
        };
        if self.width <= 0.0 || self.height <= 0.0 {
            return;
        }

        let view_projection = camera.view_projection();
        let offset = self.origin.to_vec2();
        let surface = Rect::from_min_size(Pos2::ZERO, egui::vec2(self.width, self.height));
        let mut mesh = Mesh::default();

        for (&p, &color) in points.positions.iter().zip(&points.colors) {
            let Some(projected) = camera.project_with(&view_projection, p, self.width, self.height)
            else {
                continue;
            };
            let extent = self.point_extent(&points.material, projected.depth);
            let screen = Pos2::new(projected.screen.x, projected.screen.y);
            if !surface.expand(extent * 0.5).contains(screen) {
                continue;
            }
            let center = screen + offset;
            mesh.add_colored_rect(
                Rect::from_center_size(center, egui::vec2(extent, extent)),
                color,
            );
            self.drawn += 1;
        }

        self.mesh = mesh;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use galaxy_core::buffer::PointBuffer;

    fn cloud(positions: Vec<f32>) -> PointCloud {
        let colors = vec![1.0; positions.len()];
        PointCloud {
            buffer: PointBuffer::from_parts(positions, colors),
            material: PointMaterial::galaxy(0.02),
        }
    }

    fn sized_renderer() -> EguiPointRenderer {
        let mut r = EguiPointRenderer::default();
        r.set_size(800.0, 600.0);
        r.set_pixel_ratio(1.0);
        r
    }

    #[test]
    fn target_point_lands_in_surface_center() {
        let mut renderer = sized_renderer();
        renderer.set_origin(Pos2::new(10.0, 20.0));
        let camera = OrbitCamera::galaxy_default(800.0 / 600.0);
        let mut scene = Scene::new();
        scene
            .replace_points(cloud(vec![0.0, 0.0, 0.0]), &mut renderer)
            .unwrap();

        renderer.render(&scene, &camera);
        let mesh = renderer.take_mesh();

        assert_eq!(renderer.drawn(), 1);
        assert_eq!(mesh.vertices.len(), 4);
        let center = mesh
            .vertices
            .iter()
            .fold(egui::Vec2::ZERO, |acc, v| acc + v.pos.to_vec2())
            / 4.0;
        assert!((center - egui::vec2(410.0, 320.0)).length() < 1e-2);
    }

    #[test]
    fn additive_points_carry_zero_alpha() {
        let mut renderer = sized_renderer();
        let camera = OrbitCamera::galaxy_default(1.0);
        let mut scene = Scene::new();
        scene
            .replace_points(cloud(vec![0.0, 0.0, 0.0]), &mut renderer)
            .unwrap();

        renderer.render(&scene, &camera);
        let mesh = renderer.take_mesh();
        assert!(mesh.vertices.iter().all(|v| v.color.a() == 0));
    }

    #[test]
    fn points_behind_the_camera_are_skipped() {
        let mut renderer = sized_renderer();
        let camera = OrbitCamera::galaxy_default(1.0);
        let mut scene = Scene::new();
        scene
            .replace_points(cloud(vec![0.0, 0.0, 0.0, 9.0, 9.0, 9.0]), &mut renderer)
            .unwrap();

        renderer.render(&scene, &camera);
        assert_eq!(renderer.drawn(), 1);
    }

    #[test]
    fn points_outside_the_surface_are_culled() {
        let mut renderer = sized_renderer();
        let camera = OrbitCamera::galaxy_default(800.0 / 600.0);
        let mut scene = Scene::new();
        // The second point is in front of the camera but far off to the side.
        scene
            .replace_points(cloud(vec![0.0, 0.0, 0.0, -20.0, 0.0, 20.0]), &mut renderer)
            .unwrap();

        renderer.render(&scene, &camera);
        let mesh = renderer.take_mesh();

        assert_eq!(renderer.drawn(), 1);
        assert_eq!(mesh.vertices.len(), 4);
        assert!(
            mesh.vertices
                .iter()
                .all(|v| (0.0..=800.0).contains(&v.pos.x) && (0.0..=600.0).contains(&v.pos.y))
        );
    }

    #[test]
    fn releasing_an_unknown_cloud_is_a_no_op() {
        let mut renderer = sized_renderer();
        let mut scene = Scene::new();
        let id = scene.replace_points(cloud(vec![0.0; 3]), &mut renderer).unwrap();

        renderer.release(CloudId(id.0 + 100));
        assert_eq!(renderer.uploaded_count(), 1);

        renderer.release(id);
        renderer.release(id);
        assert_eq!(renderer.uploaded_count(), 0);
    }

    #[test]
    fn replacement_frees_previous_upload() {
        let mut renderer = sized_renderer();
        let mut scene = Scene::new();
        scene.replace_points(cloud(vec![0.0; 30]), &mut renderer).unwrap();
        scene.replace_points(cloud(vec![0.0; 60]), &mut renderer).unwrap();
        assert_eq!(renderer.uploaded_count(), 1);
    }

    #[test]
    fn over_budget_upload_fails() {
        let mut renderer = EguiPointRenderer::with_budget(2);
        let mut scene = Scene::new();
        let err = scene
            .replace_points(cloud(vec![0.0; 9]), &mut renderer)
            .unwrap_err();
        assert_eq!(
            err,
            RenderError::OutOfMemory {
                requested: 3,
                budget: 2
            }
        );
        assert_eq!(renderer.uploaded_count(), 0);
    }

    #[test]
    fn far_points_shrink_but_keep_a_physical_pixel() {
        let mut renderer = sized_renderer();
        renderer.set_pixel_ratio(2.0);
        let material = PointMaterial::galaxy(0.02);

        let near = renderer.point_extent(&material, 1.0);
        let far = renderer.point_extent(&material, 1_000.0);
        assert!((near - 6.0).abs() < 1e-4);
        assert_eq!(far, 0.5);
    }
}
