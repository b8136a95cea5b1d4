use crate::{camera::OrbitCamera, render::Renderer};

/// Upper bound on the rasterisation pixel ratio.
pub const MAX_PIXEL_RATIO: f32 = 2.0;

/// Size of the display surface in logical pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
    pub pixel_ratio: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32, device_pixel_ratio: f32) -> Self {
        Self {
            width,
            height,
            pixel_ratio: capped_pixel_ratio(device_pixel_ratio),
        }
    }

    pub fn aspect(&self) -> f32 {
        self.width / self.height
    }

    /// Applies a new surface size to the camera and renderer.
    ///
    /// Recomputes the camera aspect ratio, resizes the renderer output and
    /// re-caps its pixel ratio at [`MAX_PIXEL_RATIO`]. Degenerate sizes
    /// (a minimized window) leave everything untouched and return `false`.
    pub fn resize(
        &mut self,
        width: f32,
        height: f32,
        device_pixel_ratio: f32,
        camera: &mut OrbitCamera,
        renderer: &mut dyn Renderer,
    ) -> bool {
        if !(width > 0.0 && height > 0.0) {
            tracing::trace!(width, height, "ignoring degenerate resize");
            return false;
        }

        self.width = width;
        self.height = height;
        self.pixel_ratio = capped_pixel_ratio(device_pixel_ratio);

        camera.set_aspect(self.aspect());
        renderer.set_size(width, height);
        renderer.set_pixel_ratio(self.pixel_ratio);

        tracing::debug!(width, height, pixel_ratio = self.pixel_ratio, "viewport resized");
        true
    }
}

/// `min(device_pixel_ratio, MAX_PIXEL_RATIO)`; non-finite or non-positive
/// ratios fall back to 1.
pub fn capped_pixel_ratio(device_pixel_ratio: f32) -> f32 {
    if device_pixel_ratio.is_finite() && device_pixel_ratio > 0.0 {
        device_pixel_ratio.min(MAX_PIXEL_RATIO)
    } else {
        1.0
    }
}
