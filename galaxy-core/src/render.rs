//! Seam between the toolkit-free scene and whatever draws it.

use crate::{
    buffer::PointCloud,
    camera::OrbitCamera,
    error::RenderError,
    scene::{CloudId, Scene},
};

/// A drawing backend that owns uploaded point data.
///
/// Resources created by [`Renderer::upload`] live until the matching
/// [`Renderer::release`]; the [`Scene`] guarantees that at most one cloud
/// is uploaded at a time.
pub trait Renderer {
    /// Copies `cloud` into backend-owned storage under `id`.
    fn upload(&mut self, id: CloudId, cloud: &PointCloud) -> Result<(), RenderError>;

    /// Frees the storage of `id`. Unknown ids are ignored.
    fn release(&mut self, id: CloudId);

    /// Resizes the output surface, in logical pixels.
    fn set_size(&mut self, width: f32, height: f32);

    /// Sets the physical-to-logical pixel ratio used for rasterisation.
    fn set_pixel_ratio(&mut self, ratio: f32);

    /// Draws `scene` as seen from `camera`.
    fn render(&mut self, scene: &Scene, camera: &OrbitCamera);
}
