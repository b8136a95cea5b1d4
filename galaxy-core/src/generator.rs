//! Procedural placement of galaxy points.
//!
//! Each point is assigned round-robin to one of `branches` spiral arms,
//! placed at a uniformly random radius along that arm, rotated by
//! `radius * spin`, and pushed off the arm by a signed, power-biased jitter.
//! Its color is blended from the inner to the outer color by normalized
//! radius.

use std::f32::consts::TAU;
use std::time::Instant;

use rand::Rng;

use crate::{
    buffer::{PointBuffer, PointCloud, PointMaterial},
    config::GalaxyParams,
};

/// Index of the arm point `i` belongs to.
#[inline]
pub fn branch_of(i: u32, branches: u32) -> u32 {
    i % branches
}

/// Base angle of arm `branch` out of `branches`, in radians.
#[inline]
pub fn branch_angle(branch: u32, branches: u32) -> f32 {
    branch as f32 / branches as f32 * TAU
}

/// Draws one jitter component: `u^power * (±1) * randomness`.
///
/// The magnitude never exceeds `randomness`; larger `power` pulls samples
/// towards zero.
pub fn jitter(rng: &mut impl Rng, randomness: f32, power: f32) -> f32 {
    let magnitude = rng.random::<f32>().powf(power);
    let sign = if rng.random_bool(0.5) { 1.0 } else { -1.0 };
    magnitude * sign * randomness
}

/// Builds a fresh point buffer from `params`.
///
/// `params` are expected to have passed [`GalaxyParams::validate`].
pub fn generate(params: &GalaxyParams, rng: &mut impl Rng) -> PointBuffer {
    let started = Instant::now();
    let count = params.count as usize;
    let mut positions = Vec::with_capacity(count * 3);
    let mut colors = Vec::with_capacity(count * 3);

    for i in 0..params.count {
        let radius = rng.random_range(0.0..params.radius);
        let spin_angle = radius * params.spin;
        let angle = branch_angle(branch_of(i, params.branches), params.branches) + spin_angle;

        // Axis order x, y, z; each axis draws its own magnitude and sign.
        let jx = jitter(rng, params.randomness, params.randomness_power);
        let jy = jitter(rng, params.randomness, params.randomness_power);
        let jz = jitter(rng, params.randomness, params.randomness_power);

        positions.extend_from_slice(&[
            angle.cos() * radius + jx,
            jy * params.height,
            angle.sin() * radius + jz,
        ]);

        let mixed = params
            .inner_color
            .lerp(params.out_color, radius / params.radius);
        colors.extend_from_slice(&mixed.to_array());
    }

    tracing::debug!(
        count,
        elapsed_ms = started.elapsed().as_secs_f64() * 1000.0,
        "generated galaxy points"
    );

    PointBuffer::from_parts(positions, colors)
}

/// Generates a buffer and wraps it in the galaxy point material.
pub fn build_cloud(params: &GalaxyParams, rng: &mut impl Rng) -> PointCloud {
    PointCloud {
        buffer: generate(params, rng),
        material: PointMaterial::galaxy(params.size),
    }
}
