//! Scalar root-finding for property inversions.
//!
//! Every solver answers the same question: find `x` inside a clamp window such
//! that a residual `r(x)` is (close to) zero. The two strategies here are
//! interchangeable behind [`ScalarSolver`]:
//!
//! - [`FixedPoint`]: linear relaxation `x <- x + gain * r(x)` with a fixed gain.
//! - [`Newton`]: Newton-Raphson on a forward-difference derivative, with a
//!   half-step toward an anchor when the derivative vanishes.
//!
//! Neither strategy treats running out of iterations as an error. The last
//! iterate comes back with `converged = false` and the caller decides what to
//! do with it.

pub mod error;
pub mod fixed_point;
pub mod newton;

pub use error::{SolverError, SolverResult};
pub use fixed_point::{FixedPoint, FixedPointConfig};
pub use newton::{Newton, NewtonConfig};

/// Closed interval every iterate is clamped into.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub lower: f64,
    pub upper: f64,
}

impl Bounds {
    pub fn new(lower: f64, upper: f64) -> Self {
        Self { lower, upper }
    }

    /// Check that the window is finite and ordered.
    pub fn validate(&self) -> SolverResult<()> {
        if !self.lower.is_finite() || !self.upper.is_finite() || self.lower > self.upper {
            return Err(SolverError::InvalidBounds {
                lower: self.lower,
                upper: self.upper,
            });
        }
        Ok(())
    }

    pub fn clamp(&self, x: f64) -> f64 {
        x.clamp(self.lower, self.upper)
    }

    pub fn midpoint(&self) -> f64 {
        0.5 * (self.lower + self.upper)
    }
}

/// Outcome of a scalar solve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScalarSolution {
    /// Final iterate
    pub x: f64,
    /// Residual at `x`
    pub residual: f64,
    /// Number of residual evaluations that drove an update
    pub iterations: usize,
    /// Converged flag
    pub converged: bool,
}

/// A scalar root-finding strategy.
///
/// The residual closure may fail with the caller's own error type, which is
/// propagated unchanged. Configuration problems surface as [`SolverError`]
/// converted into that same type.
pub trait ScalarSolver {
    fn solve<E, F>(&self, residual: F, seed: f64, bounds: Bounds) -> Result<ScalarSolution, E>
    where
        E: From<SolverError>,
        F: FnMut(f64) -> Result<f64, E>;
}

pub(crate) fn check_seed(seed: f64) -> SolverResult<()> {
    if seed.is_finite() {
        Ok(())
    } else {
        Err(SolverError::NonFinite {
            what: "solver seed",
            value: seed,
        })
    }
}

pub(crate) fn check_residual(value: f64, x: f64) -> SolverResult<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(SolverError::NonFinite {
            what: "residual",
            value: x,
        })
    }
}
