//! Air property errors.

use pf_core::PfError;
use pf_solver::SolverError;
use thiserror::Error;

/// Result type for air property operations.
pub type AirResult<T> = Result<T, AirError>;

/// Errors that can occur during psychrometric calculations.
///
/// Solver non-convergence is not an error; it is reported on
/// [`SolveReport`](crate::SolveReport).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AirError {
    /// Unrecognized input kind tag.
    #[error("Invalid input kind: {0:?} (expected dbt_wbt, dbt_rh, dbt_dpt or wbt_rh)")]
    InvalidInputKind(String),

    /// A relation was evaluated outside its mathematical domain
    /// (e.g. vapor pressure at or above total pressure).
    #[error("Numeric domain error: {what}")]
    NumericDomain { what: String },

    /// Solver misconfiguration.
    #[error("Solver error: {0}")]
    Solver(#[from] SolverError),

    #[error("{0}")]
    Core(#[from] PfError),
}

impl AirError {
    pub(crate) fn domain(what: impl Into<String>) -> Self {
        AirError::NumericDomain { what: what.into() }
    }
}
