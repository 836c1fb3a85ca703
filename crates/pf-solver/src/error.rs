//! Error types for solver operations.

use thiserror::Error;

/// Errors raised by the solvers themselves (as opposed to the residual).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SolverError {
    #[error("Invalid solver bounds: [{lower}, {upper}]")]
    InvalidBounds { lower: f64, upper: f64 },

    #[error("Non-finite {what} at x = {value}")]
    NonFinite { what: &'static str, value: f64 },

    #[error("Invalid solver configuration: {what}")]
    InvalidConfig { what: &'static str },
}

pub type SolverResult<T> = Result<T, SolverError>;
