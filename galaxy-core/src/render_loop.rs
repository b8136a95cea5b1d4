//! Frame-driven render loop.
//!
//! Each frame the loop:
//! 1. advances the damped orbit controls ([`OrbitCamera::update`]),
//! 2. draws the scene through the [`Renderer`].
//!
//! Scheduling of the next frame belongs to the host: a [`FrameSource`]
//! hands out frames until the host tears the loop down. The desktop viewer
//! drives [`RenderLoop::tick`] from its own per-frame callback instead.

use crate::{camera::OrbitCamera, render::Renderer, scene::Scene};

/// Timestamp of a frame, in seconds since the host started.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameTime(pub f64);

/// Supplier of display-refresh ticks.
pub trait FrameSource {
    /// Returns the next frame, or `None` once the host stops scheduling.
    fn next_frame(&mut self) -> Option<FrameTime>;
}

/// Deterministic frame source with a fixed step and frame count.
#[derive(Debug, Clone)]
pub struct ManualFrames {
    step: f64,
    now: f64,
    remaining: u64,
}

impl ManualFrames {
    pub fn new(frames: u64, step: f64) -> Self {
        Self {
            step,
            now: 0.0,
            remaining: frames,
        }
    }
}

impl FrameSource for ManualFrames {
    fn next_frame(&mut self) -> Option<FrameTime> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        let t = self.now;
        self.now += self.step;
        Some(FrameTime(t))
    }
}

/// Frame bookkeeping plus the per-frame update/draw sequence.
#[derive(Debug, Clone, Default)]
pub struct RenderLoop {
    start: Option<f64>,
    last: Option<f64>,
    frames: u64,
    fps: f64,
}

impl RenderLoop {
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs one frame. Returns `true` if the camera is still gliding.
    pub fn tick(
        &mut self,
        frame: FrameTime,
        camera: &mut OrbitCamera,
        scene: &Scene,
        renderer: &mut dyn Renderer,
    ) -> bool {
        let FrameTime(now) = frame;
        self.start.get_or_insert(now);
        if let Some(last) = self.last {
            let dt = now - last;
            if dt > 0.0 {
                // Exponential smoothing keeps the readout stable.
                let instant = 1.0 / dt;
                self.fps = if self.fps == 0.0 {
                    instant
                } else {
                    self.fps * 0.9 + instant * 0.1
                };
            }
        }
        self.last = Some(now);
        self.frames += 1;

        let moving = camera.update();
        renderer.render(scene, camera);
        moving
    }

    /// Ticks until `source` is exhausted; returns the number of frames drawn.
    pub fn run(
        &mut self,
        source: &mut dyn FrameSource,
        camera: &mut OrbitCamera,
        scene: &Scene,
        renderer: &mut dyn Renderer,
    ) -> u64 {
        let before = self.frames;
        while let Some(frame) = source.next_frame() {
            self.tick(frame, camera, scene, renderer);
        }
        self.frames - before
    }

    /// Seconds between the first and the latest frame.
    pub fn elapsed(&self) -> f64 {
        match (self.start, self.last) {
            (Some(start), Some(last)) => last - start,
            _ => 0.0,
        }
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Smoothed frames per second; zero until two frames have been seen.
    pub fn fps(&self) -> f64 {
        self.fps
    }
}
