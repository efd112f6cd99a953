//! Scenario errors

use thiserror::Error;

/// Scenario result type
pub type Result<T> = std::result::Result<T, ScenarioError>;

/// Scenario errors
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ScenarioError {
    /// Rejected input; prior state is left untouched
    #[error("invalid {what}: {value}")]
    InvalidArgument { what: &'static str, value: f64 },

    /// Protocol violation in the simulation lists; the session must not continue
    #[error("inconsistent simulation state: {0}")]
    InconsistentState(String),

    #[error("unknown parameter: {0}")]
    UnknownParameter(String),

    #[error("cannot parse command: {0}")]
    InvalidCommand(String),
}

impl ScenarioError {
    pub fn invalid(what: &'static str, value: f64) -> Self {
        ScenarioError::InvalidArgument { what, value }
    }

    pub fn is_fatal(&self) -> bool {
        matches!(self, ScenarioError::InconsistentState(_))
    }
}

/// Reject NaN and infinities
pub fn require_finite(what: &'static str, value: f64) -> Result<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ScenarioError::invalid(what, value))
    }
}
