//! Error types shared across the galaxy crates.

/// A parameter record or a single field failed validation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParamError {
    #[error("invalid value for `{field}`: {reason}")]
    InvalidField { field: &'static str, reason: String },

    #[error("invalid color `{0}`: expected #rrggbb or #rgb")]
    InvalidColor(String),
}

impl ParamError {
    pub(crate) fn field(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidField {
            field,
            reason: reason.into(),
        }
    }
}

/// Failures raised by a [`crate::render::Renderer`] backend.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RenderError {
    #[error("out of memory: cannot allocate {requested} points (budget {budget})")]
    OutOfMemory { requested: usize, budget: usize },
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GalaxyError {
    #[error(transparent)]
    Param(#[from] ParamError),

    #[error(transparent)]
    Render(#[from] RenderError),
}
