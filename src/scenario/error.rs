//! Error taxonomy for scenario generation
//!
//! Every core operation reports failures synchronously through
//! [`ScenarioError`]; nothing is retried or defaulted internally.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScenarioError {
    /// Malformed entity field, raised at construction
    #[error("invalid {field}: {reason}")]
    Validation { field: &'static str, reason: String },

    /// A phase does not match the state width frozen by the program's first phase
    #[error("phase state width {found} does not match width {expected} of program [{program}]")]
    PhaseLengthMismatch {
        program: String,
        expected: usize,
        found: usize,
    },

    /// Webster input whose flow ratios leave no finite cycle length
    #[error("flow ratios sum to {total_ratio:.3}; no finite cycle length exists")]
    Oversaturated { total_ratio: f64 },

    /// Referential-integrity failure found while serializing
    #[error("{kind} [{missing}] referenced by [{owner}] does not exist")]
    DanglingReference {
        kind: &'static str,
        owner: String,
        missing: String,
    },

    #[error("unknown template [{0}]; expected one of 4way, 3way, roundabout, grid, corridor, highway")]
    UnknownTemplate(String),

    #[error("could not serialize scenario file: {0}")]
    Serialization(String),
}

pub type Result<T> = std::result::Result<T, ScenarioError>;

impl ScenarioError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        ScenarioError::Validation {
            field,
            reason: reason.into(),
        }
    }

    pub(crate) fn dangling(
        kind: &'static str,
        owner: impl Into<String>,
        missing: impl Into<String>,
    ) -> Self {
        ScenarioError::DanglingReference {
            kind,
            owner: owner.into(),
            missing: missing.into(),
        }
    }
}

pub(crate) fn require_id(field: &'static str, id: &str) -> Result<()> {
    if id.trim().is_empty() {
        return Err(ScenarioError::invalid(field, "must be a non-empty string"));
    }
    Ok(())
}

pub(crate) fn require_positive(field: &'static str, value: f64) -> Result<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(ScenarioError::invalid(
            field,
            format!("must be a positive number, got {value}"),
        ));
    }
    Ok(())
}

pub(crate) fn require_non_negative(field: &'static str, value: f64) -> Result<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(ScenarioError::invalid(
            field,
            format!("must be a non-negative number, got {value}"),
        ));
    }
    Ok(())
}

pub(crate) fn require_finite(field: &'static str, value: f64) -> Result<()> {
    if !value.is_finite() {
        return Err(ScenarioError::invalid(field, "must be a finite number"));
    }
    Ok(())
}
