//! In-memory [`Renderer`] used by the unit tests.

use std::collections::BTreeMap;

use crate::{
    buffer::PointCloud,
    camera::OrbitCamera,
    error::RenderError,
    render::Renderer,
    scene::{CloudId, Scene},
};

/// Records every call instead of drawing.
#[derive(Debug, Default)]
pub struct RecordingRenderer {
    pub live: BTreeMap<CloudId, usize>,
    pub released: Vec<CloudId>,
    pub peak_live: usize,
    pub budget: Option<usize>,
    pub size: (f32, f32),
    pub pixel_ratio: f32,
    /// Cloud id seen by each `render` call, in order.
    pub frames: Vec<Option<CloudId>>,
}

impl RecordingRenderer {
    pub fn with_budget(points: usize) -> Self {
        Self {
            budget: Some(points),
            ..Self::default()
        }
    }

    pub fn live_ids(&self) -> Vec<CloudId> {
        self.live.keys().copied().collect()
    }
}

impl Renderer for RecordingRenderer {
    fn upload(&mut self, id: CloudId, cloud: &PointCloud) -> Result<(), RenderError> {
        if let Some(budget) = self.budget
            && cloud.len() > budget
        {
            return Err(RenderError::OutOfMemory {
                requested: cloud.len(),
                budget,
            });
        }
        self.live.insert(id, cloud.len());
        self.peak_live = self.peak_live.max(self.live.len());
        Ok(())
    }

    fn release(&mut self, id: CloudId) {
        if self.live.remove(&id).is_some() {
            self.released.push(id);
        }
    }

    fn set_size(&mut self, width: f32, height: f32) {
        self.size = (width, height);
    }

    fn set_pixel_ratio(&mut self, ratio: f32) {
        self.pixel_ratio = ratio;
    }

    fn render(&mut self, scene: &Scene, _camera: &OrbitCamera) {
        self.frames.push(scene.cloud_id());
    }
}
