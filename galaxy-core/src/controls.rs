//! Control panel model: per-field ranges and the two-phase parameter store.
//!
//! Widgets write into a draft record through [`ParamStore::stage`]; the
//! generator only ever reads [`ParamStore::committed`]. A drag or a
//! half-typed value therefore never triggers a rebuild: the host calls
//! [`ParamStore::commit`] once the interaction has finished.

use crate::{color::Rgb, config::GalaxyParams, error::ParamError};

/// One field of [`GalaxyParams`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Field {
    Count,
    Radius,
    Size,
    Branches,
    Spin,
    Randomness,
    RandomnessPower,
    Height,
    InnerColor,
    OutColor,
}

impl Field {
    pub fn name(self) -> &'static str {
        match self {
            Field::Count => "count",
            Field::Radius => "radius",
            Field::Size => "size",
            Field::Branches => "branches",
            Field::Spin => "spin",
            Field::Randomness => "randomness",
            Field::RandomnessPower => "randomnessPower",
            Field::Height => "height",
            Field::InnerColor => "innerColor",
            Field::OutColor => "outColor",
        }
    }

    pub fn is_color(self) -> bool {
        matches!(self, Field::InnerColor | Field::OutColor)
    }
}

/// Range and step granularity of a numeric control.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ControlSpec {
    pub field: Field,
    pub min: f64,
    pub max: f64,
    pub step: f64,
}

impl ControlSpec {
    const fn new(field: Field, min: f64, max: f64, step: f64) -> Self {
        Self {
            field,
            min,
            max,
            step,
        }
    }

    /// Clamps `value` into range and snaps it to the step grid anchored at `min`.
    pub fn constrain(&self, value: f64) -> f64 {
        if !value.is_finite() {
            return self.min;
        }
        let clamped = value.clamp(self.min, self.max);
        let steps = ((clamped - self.min) / self.step).round();
        // Rounding to a few decimals past the step removes float noise like 0.30000000000000004.
        let decimals = (-self.step.log10()).ceil().max(0.0) as i32 + 2;
        let scale = 10f64.powi(decimals);
        let snapped = ((self.min + steps * self.step) * scale).round() / scale;
        snapped.clamp(self.min, self.max)
    }

    /// Whether the control only takes whole numbers.
    pub fn is_integer(&self) -> bool {
        self.step.fract() == 0.0 && self.min.fract() == 0.0
    }
}

/// Numeric controls in panel order.
pub static CONTROLS: [ControlSpec; 8] = [
    ControlSpec::new(Field::Count, 100.0, 100_000.0, 100.0),
    ControlSpec::new(Field::Radius, 1.0, 20.0, 1.0),
    ControlSpec::new(Field::Size, 0.01, 0.1, 0.001),
    ControlSpec::new(Field::Branches, 2.0, 20.0, 1.0),
    ControlSpec::new(Field::Spin, -5.0, 5.0, 0.01),
    ControlSpec::new(Field::Randomness, 0.0, 2.0, 0.01),
    ControlSpec::new(Field::RandomnessPower, 1.0, 10.0, 0.01),
    ControlSpec::new(Field::Height, 1.0, 10.0, 0.1),
];

/// Color controls in panel order.
pub const COLOR_CONTROLS: [Field; 2] = [Field::InnerColor, Field::OutColor];

pub fn control_for(field: Field) -> Option<&'static ControlSpec> {
    CONTROLS.iter().find(|c| c.field == field)
}

/// A single pending change from the panel.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Edit {
    Number(Field, f64),
    Color(Field, Rgb),
}

/// Reads a numeric field; `None` for color fields.
pub fn numeric_value(params: &GalaxyParams, field: Field) -> Option<f64> {
    let v = match field {
        Field::Count => params.count as f64,
        Field::Radius => params.radius as f64,
        Field::Size => params.size as f64,
        Field::Branches => params.branches as f64,
        Field::Spin => params.spin as f64,
        Field::Randomness => params.randomness as f64,
        Field::RandomnessPower => params.randomness_power as f64,
        Field::Height => params.height as f64,
        Field::InnerColor | Field::OutColor => return None,
    };
    Some(v)
}

pub fn color_value(params: &GalaxyParams, field: Field) -> Option<Rgb> {
    match field {
        Field::InnerColor => Some(params.inner_color),
        Field::OutColor => Some(params.out_color),
        _ => None,
    }
}

fn apply(params: &mut GalaxyParams, edit: Edit) -> Result<(), ParamError> {
    match edit {
        Edit::Number(field, value) => {
            let spec = control_for(field)
                .ok_or_else(|| ParamError::field(field.name(), "not a numeric control"))?;
            let v = spec.constrain(value);
            match field {
                Field::Count => params.count = v as u32,
                Field::Radius => params.radius = v as f32,
                Field::Size => params.size = v as f32,
                Field::Branches => params.branches = v as u32,
                Field::Spin => params.spin = v as f32,
                Field::Randomness => params.randomness = v as f32,
                Field::RandomnessPower => params.randomness_power = v as f32,
                Field::Height => params.height = v as f32,
                Field::InnerColor | Field::OutColor => unreachable!("colors have no ControlSpec"),
            }
        }
        Edit::Color(Field::InnerColor, c) => params.inner_color = c,
        Edit::Color(Field::OutColor, c) => params.out_color = c,
        Edit::Color(field, _) => {
            return Err(ParamError::field(field.name(), "not a color control"));
        }
    }
    Ok(())
}

/// Committed parameter record plus the panel's in-progress draft.
#[derive(Debug, Clone)]
pub struct ParamStore {
    committed: GalaxyParams,
    draft: GalaxyParams,
}

impl ParamStore {
    pub fn new(params: GalaxyParams) -> Result<Self, ParamError> {
        params.validate()?;
        Ok(Self {
            committed: params,
            draft: params,
        })
    }

    /// The last committed record; the only one the generator reads.
    pub fn committed(&self) -> &GalaxyParams {
        &self.committed
    }

    pub fn draft(&self) -> &GalaxyParams {
        &self.draft
    }

    pub fn is_dirty(&self) -> bool {
        self.draft != self.committed
    }

    /// Applies `edit` to the draft, constrained to the control's range and step.
    pub fn stage(&mut self, edit: Edit) -> Result<(), ParamError> {
        apply(&mut self.draft, edit)
    }

    /// Stages the default record for every field.
    pub fn reset_to_defaults(&mut self) {
        self.draft = GalaxyParams::default();
    }

    /// Throws the draft away.
    pub fn discard(&mut self) {
        self.draft = self.committed;
    }

    /// Publishes the draft.
    ///
    /// Returns `Ok(true)` when the committed record changed and `Ok(false)`
    /// when the draft was identical. An invalid draft is discarded and its
    /// error returned; the committed record stays as it was.
    pub fn commit(&mut self) -> Result<bool, ParamError> {
        if !self.is_dirty() {
            return Ok(false);
        }
        if let Err(e) = self.draft.validate() {
            self.discard();
            return Err(e);
        }
        self.committed = self.draft;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constrain_clamps_and_snaps() {
        let count = control_for(Field::Count).unwrap();
        assert_eq!(count.constrain(12_345.0), 12_300.0);
        assert_eq!(count.constrain(5.0), 100.0);
        assert_eq!(count.constrain(1e9), 100_000.0);

        let height = control_for(Field::Height).unwrap();
        assert_eq!(height.constrain(2.34), 2.3);

        let size = control_for(Field::Size).unwrap();
        assert_eq!(size.constrain(0.0234), 0.023);

        let spin = control_for(Field::Spin).unwrap();
        assert_eq!(spin.constrain(-7.0), -5.0);
        assert_eq!(spin.constrain(f64::NAN), -5.0);
    }

    #[test]
    fn integer_controls_are_detected() {
        assert!(control_for(Field::Count).unwrap().is_integer());
        assert!(control_for(Field::Branches).unwrap().is_integer());
        assert!(!control_for(Field::Spin).unwrap().is_integer());
    }

    #[test]
    fn every_numeric_field_has_a_control() {
        let numeric: Vec<_> = CONTROLS.iter().map(|c| c.field).collect();
        assert_eq!(numeric.len() + COLOR_CONTROLS.len(), 10);
        for f in numeric {
            assert!(!f.is_color());
            assert!(numeric_value(&GalaxyParams::default(), f).is_some());
        }
    }

    #[test]
    fn staged_edits_are_invisible_until_commit() {
        let mut store = ParamStore::new(GalaxyParams::default()).unwrap();

        store.stage(Edit::Number(Field::Branches, 9.0)).unwrap();
        store
            .stage(Edit::Color(Field::OutColor, Rgb::new(0.0, 1.0, 0.0)))
            .unwrap();

        assert_eq!(store.committed().branches, 5);
        assert_eq!(store.draft().branches, 9);
        assert!(store.is_dirty());

        assert_eq!(store.commit(), Ok(true));
        assert_eq!(store.committed().branches, 9);
        assert_eq!(store.committed().out_color, Rgb::new(0.0, 1.0, 0.0));
        assert!(!store.is_dirty());
    }

    #[test]
    fn commit_without_changes_reports_false() {
        let mut store = ParamStore::new(GalaxyParams::default()).unwrap();
        assert_eq!(store.commit(), Ok(false));

        // Staging the current value is not a change either.
        store.stage(Edit::Number(Field::Radius, 7.0)).unwrap();
        assert_eq!(store.commit(), Ok(false));
    }

    #[test]
    fn staged_values_are_constrained() {
        let mut store = ParamStore::new(GalaxyParams::default()).unwrap();
        store.stage(Edit::Number(Field::Branches, 1.0)).unwrap();
        store.stage(Edit::Number(Field::Count, 250.0)).unwrap();
        assert_eq!(store.draft().branches, 2);
        assert_eq!(store.draft().count, 300);
    }

    #[test]
    fn mismatched_edits_are_rejected() {
        let mut store = ParamStore::new(GalaxyParams::default()).unwrap();
        assert!(store.stage(Edit::Number(Field::InnerColor, 1.0)).is_err());
        assert!(store.stage(Edit::Color(Field::Spin, Rgb::BLACK)).is_err());
        assert!(!store.is_dirty());
    }

    #[test]
    fn discard_and_reset() {
        let mut store = ParamStore::new(GalaxyParams {
            spin: 2.0,
            ..GalaxyParams::default()
        })
        .unwrap();

        store.stage(Edit::Number(Field::Spin, -1.0)).unwrap();
        store.discard();
        assert!(!store.is_dirty());

        store.reset_to_defaults();
        assert_eq!(store.draft().spin, 1.0);
        assert_eq!(store.committed().spin, 2.0);
    }

    #[test]
    fn invalid_initial_record_is_refused() {
        let bad = GalaxyParams {
            radius: -1.0,
            ..GalaxyParams::default()
        };
        assert!(ParamStore::new(bad).is_err());
    }
}
