//! The scene graph: background plus a single live point cloud slot.

use crate::{buffer::PointCloud, color::Rgb, error::RenderError, render::Renderer};

/// Identifier of a point cloud installed in a [`Scene`].
///
/// Ids increase monotonically, so a new generation never reuses the id of
/// a released one.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CloudId(pub u64);

#[derive(Debug)]
struct Installed {
    id: CloudId,
    cloud: PointCloud,
}

#[derive(Debug)]
pub struct Scene {
    points: Option<Installed>,
    next_id: u64,
    pub background: Rgb,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    pub fn new() -> Self {
        Self {
            points: None,
            next_id: 0,
            background: Rgb::BLACK,
        }
    }

    /// Swaps in `cloud` as the scene's point cloud.
    ///
    /// The previous cloud is released on `renderer` and detached first,
    /// then the new one is uploaded and attached. Both steps happen inside
    /// this call, so a frame never sees two clouds or a half-swapped slot.
    ///
    /// ### Errors
    /// If the upload fails the slot is left empty and the error is returned.
    pub fn replace_points(
        &mut self,
        cloud: PointCloud,
        renderer: &mut dyn Renderer,
    ) -> Result<CloudId, RenderError> {
        self.clear(renderer);

        let id = CloudId(self.next_id);
        self.next_id += 1;

        renderer.upload(id, &cloud)?;
        tracing::debug!(?id, points = cloud.len(), "attached point cloud");
        self.points = Some(Installed { id, cloud });
        Ok(id)
    }

    /// Detaches the live cloud, if any, and releases its renderer resources.
    pub fn clear(&mut self, renderer: &mut dyn Renderer) {
        if let Some(old) = self.points.take() {
            renderer.release(old.id);
            tracing::debug!(id = ?old.id, "released point cloud");
        }
    }

    pub fn points(&self) -> Option<&PointCloud> {
        self.points.as_ref().map(|p| &p.cloud)
    }

    pub fn cloud_id(&self) -> Option<CloudId> {
        self.points.as_ref().map(|p| p.id)
    }

    pub fn point_count(&self) -> usize {
        self.points().map_or(0, PointCloud::len)
    }
}
