//! Owns the parameter store, scene and random source of one galaxy view.

use std::time::Instant;

use rand::{SeedableRng, rngs::StdRng};

use crate::{
    config::GalaxyParams,
    controls::{Edit, ParamStore},
    error::GalaxyError,
    generator,
    render::Renderer,
    scene::{CloudId, Scene},
};

/// Everything the panel and the render loop share, passed around explicitly.
#[derive(Debug)]
pub struct GalaxySession {
    store: ParamStore,
    scene: Scene,
    rng: StdRng,
    generations: u64,
}

impl GalaxySession {
    /// Creates a session seeded from the operating system.
    pub fn new(params: GalaxyParams) -> Result<Self, GalaxyError> {
        Self::with_rng(params, StdRng::from_os_rng())
    }

    /// Creates a session whose generations are reproducible.
    pub fn with_seed(params: GalaxyParams, seed: u64) -> Result<Self, GalaxyError> {
        Self::with_rng(params, StdRng::seed_from_u64(seed))
    }

    fn with_rng(params: GalaxyParams, rng: StdRng) -> Result<Self, GalaxyError> {
        Ok(Self {
            store: ParamStore::new(params)?,
            scene: Scene::new(),
            rng,
            generations: 0,
        })
    }

    pub fn params(&self) -> &GalaxyParams {
        self.store.committed()
    }

    pub fn store(&self) -> &ParamStore {
        &self.store
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Number of clouds generated so far.
    pub fn generations(&self) -> u64 {
        self.generations
    }

    /// Stages a panel edit without regenerating.
    pub fn stage(&mut self, edit: Edit) -> Result<(), GalaxyError> {
        self.store.stage(edit)?;
        Ok(())
    }

    pub fn reset_to_defaults(&mut self) {
        self.store.reset_to_defaults();
    }

    /// Builds a new cloud from the committed parameters and swaps it into
    /// the scene, releasing the previous one.
    pub fn regenerate(&mut self, renderer: &mut dyn Renderer) -> Result<CloudId, GalaxyError> {
        let started = Instant::now();
        let cloud = generator::build_cloud(self.store.committed(), &mut self.rng);
        let id = self.scene.replace_points(cloud, renderer)?;
        self.generations += 1;

        tracing::info!(
            ?id,
            points = self.scene.point_count(),
            elapsed_ms = started.elapsed().as_secs_f64() * 1000.0,
            "galaxy regenerated"
        );
        Ok(id)
    }

    /// Finish-change handler: commits the draft and regenerates if it changed.
    ///
    /// Returns whether a regeneration happened.
    pub fn commit(&mut self, renderer: &mut dyn Renderer) -> Result<bool, GalaxyError> {
        match self.store.commit() {
            Ok(true) => {
                self.regenerate(renderer)?;
                Ok(true)
            }
            Ok(false) => Ok(false),
            Err(e) => {
                tracing::warn!(error = %e, "rejected parameter edit");
                Err(e.into())
            }
        }
    }
}
