//! Fixed-gain relaxation solver.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::SolverError;
use crate::{Bounds, ScalarSolution, ScalarSolver, check_residual, check_seed};

/// Fixed-point solver configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FixedPointConfig {
    /// Gain applied to the residual on every update
    pub gain: f64,
    /// Absolute tolerance on the residual
    pub tolerance: f64,
    /// Maximum number of updates
    pub max_iterations: usize,
}

impl Default for FixedPointConfig {
    fn default() -> Self {
        Self {
            gain: 10.0,
            tolerance: 0.01,
            max_iterations: 50,
        }
    }
}

impl FixedPointConfig {
    pub fn validate(&self) -> Result<(), SolverError> {
        if !self.gain.is_finite() || self.gain == 0.0 {
            return Err(SolverError::InvalidConfig {
                what: "fixed-point gain must be finite and non-zero",
            });
        }
        if !(self.tolerance > 0.0) {
            return Err(SolverError::InvalidConfig {
                what: "fixed-point tolerance must be positive",
            });
        }
        Ok(())
    }
}

/// Relaxation `x <- clamp(x + gain * r(x))`.
///
/// The gain is a heuristic, not a derivative, so there is no guaranteed rate of
/// convergence. It works when `r` is monotonic over the window and the gain is
/// small enough not to overshoot.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedPoint {
    config: FixedPointConfig,
}

impl FixedPoint {
    pub fn new(config: FixedPointConfig) -> Self {
        Self { config }
    }
}

impl ScalarSolver for FixedPoint {
    fn solve<E, F>(&self, mut residual: F, seed: f64, bounds: Bounds) -> Result<ScalarSolution, E>
    where
        E: From<SolverError>,
        F: FnMut(f64) -> Result<f64, E>,
    {
        self.config.validate()?;
        bounds.validate()?;
        check_seed(seed)?;

        let cfg = &self.config;
        let mut x = bounds.clamp(seed);
        let mut r = check_residual(residual(x)?, x)?;

        for iter in 0..cfg.max_iterations {
            if r.abs() < cfg.tolerance {
                debug!(x, residual = r, iterations = iter, "fixed-point converged");
                return Ok(ScalarSolution {
                    x,
                    residual: r,
                    iterations: iter,
                    converged: true,
                });
            }

            x = bounds.clamp(x + cfg.gain * r);
            r = check_residual(residual(x)?, x)?;
        }

        let converged = r.abs() < cfg.tolerance;
        debug!(
            x,
            residual = r,
            iterations = cfg.max_iterations,
            converged,
            "fixed-point hit iteration limit"
        );
        Ok(ScalarSolution {
            x,
            residual: r,
            iterations: cfg.max_iterations,
            converged,
        })
    }
}
