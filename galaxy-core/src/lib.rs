//! Core of the procedural spiral-galaxy viewer, independent of any UI toolkit.
//!
//! Main components:
//! - [`config`] — the galaxy parameter record and its validation.
//! - [`controls`] — control ranges and the draft/committed parameter store.
//! - [`generator`] — point placement and coloring.
//! - [`buffer`] — generated point buffers, materials and point clouds.
//! - [`scene`] — the single-slot scene graph.
//! - [`camera`] — perspective camera with damped orbit controls.
//! - [`viewport`] — surface size and pixel-ratio handling on resize.
//! - [`render`] — the renderer backend trait.
//! - [`render_loop`] — per-frame update/draw driver and frame sources.
//! - [`session`] — ties store, scene and random source together.
//! - [`color`] / [`error`] — shared types.

pub mod buffer;
pub mod camera;
pub mod color;
pub mod config;
pub mod controls;
pub mod error;
pub mod generator;
pub mod render;
pub mod render_loop;
pub mod scene;
pub mod session;
pub mod viewport;

#[cfg(test)]
pub(crate) mod test_support;
