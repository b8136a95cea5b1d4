use crate::{color::Rgb, error::ParamError};

/// Parameter record read by [`crate::generator::generate`].
///
/// ### Fields
/// - `count` - Number of points in the galaxy.
/// - `radius` - Outer radius of the spiral arms.
/// - `size` - World-space point size handed to the point material.
/// - `branches` - Number of evenly spaced spiral arms.
/// - `spin` - Extra rotation per unit of radius; sign selects the winding direction.
/// - `randomness` - Maximum jitter per axis.
/// - `randomness_power` - Exponent concentrating jitter near the arm (higher is tighter).
/// - `height` - Scale applied to the vertical jitter only.
/// - `inner_color` / `out_color` - Colors at the center and at `radius`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GalaxyParams {
    pub count: u32,
    pub radius: f32,
    pub size: f32,
    pub branches: u32,
    pub spin: f32,
    pub randomness: f32,
    pub randomness_power: f32,
    pub height: f32,
    pub inner_color: Rgb,
    pub out_color: Rgb,
}

impl Default for GalaxyParams {
    fn default() -> Self {
        Self {
            count: 10_000,
            radius: 7.0,
            size: 0.02,
            branches: 5,
            spin: 1.0,
            randomness: 0.25,
            randomness_power: 5.0,
            height: 3.0,
            // #ff6030
            inner_color: Rgb::new(1.0, 96.0 / 255.0, 48.0 / 255.0),
            // #1b3984
            out_color: Rgb::new(27.0 / 255.0, 57.0 / 255.0, 132.0 / 255.0),
        }
    }
}

impl GalaxyParams {
    /// Checks the record before it is allowed to reach the generator.
    ///
    /// The control panel already clamps its inputs, but records built in
    /// code bypass it, so the generator's preconditions are enforced here.
    pub fn validate(&self) -> Result<(), ParamError> {
        if self.count == 0 {
            return Err(ParamError::field("count", "must be at least 1"));
        }
        if !(self.radius.is_finite() && self.radius > 0.0) {
            return Err(ParamError::field("radius", "must be a positive number"));
        }
        if !(self.size.is_finite() && self.size > 0.0) {
            return Err(ParamError::field("size", "must be a positive number"));
        }
        if self.branches == 0 {
            return Err(ParamError::field("branches", "must be at least 1"));
        }
        if !self.spin.is_finite() {
            return Err(ParamError::field("spin", "must be finite"));
        }
        if !(self.randomness.is_finite() && self.randomness >= 0.0) {
            return Err(ParamError::field("randomness", "must be zero or positive"));
        }
        if !(self.randomness_power.is_finite() && self.randomness_power >= 1.0) {
            return Err(ParamError::field("randomness_power", "must be at least 1"));
        }
        if !self.height.is_finite() {
            return Err(ParamError::field("height", "must be finite"));
        }
        Ok(())
    }
}
