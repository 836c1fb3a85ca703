//! Scalar Newton solver with a finite-difference derivative.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::SolverError;
use crate::{Bounds, ScalarSolution, ScalarSolver, check_residual, check_seed};

/// Newton solver configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NewtonConfig {
    /// Absolute tolerance on the residual
    pub tolerance: f64,
    /// Maximum iterations
    pub max_iterations: usize,
    /// Forward-difference step used to estimate the derivative
    pub derivative_step: f64,
    /// Below this derivative magnitude the Newton step is replaced by a
    /// half-step toward the anchor
    pub min_derivative: f64,
}

impl Default for NewtonConfig {
    fn default() -> Self {
        Self {
            tolerance: 1e-3,
            max_iterations: 100,
            derivative_step: 1e-3,
            min_derivative: 1e-10,
        }
    }
}

impl NewtonConfig {
    pub fn validate(&self) -> Result<(), SolverError> {
        if !(self.tolerance > 0.0) {
            return Err(SolverError::InvalidConfig {
                what: "newton tolerance must be positive",
            });
        }
        if !(self.derivative_step > 0.0) || !self.derivative_step.is_finite() {
            return Err(SolverError::InvalidConfig {
                what: "newton derivative step must be positive and finite",
            });
        }
        if !(self.min_derivative >= 0.0) {
            return Err(SolverError::InvalidConfig {
                what: "newton derivative floor must be non-negative",
            });
        }
        Ok(())
    }
}

/// Newton-Raphson with clamped iterates.
///
/// When the estimated derivative is flatter than `min_derivative` the step
/// bisects toward the anchor instead (the window midpoint if no anchor is set).
#[derive(Debug, Clone, Copy, Default)]
pub struct Newton {
    config: NewtonConfig,
    anchor: Option<f64>,
}

impl Newton {
    pub fn new(config: NewtonConfig) -> Self {
        Self {
            config,
            anchor: None,
        }
    }

    /// Point the derivative-guard half-step moves toward.
    pub fn with_anchor(mut self, anchor: f64) -> Self {
        self.anchor = Some(anchor);
        self
    }
}

impl ScalarSolver for Newton {
    fn solve<E, F>(&self, mut residual: F, seed: f64, bounds: Bounds) -> Result<ScalarSolution, E>
    where
        E: From<SolverError>,
        F: FnMut(f64) -> Result<f64, E>,
    {
        self.config.validate()?;
        bounds.validate()?;
        check_seed(seed)?;

        let cfg = &self.config;
        let anchor = self.anchor.unwrap_or_else(|| bounds.midpoint());
        let mut x = bounds.clamp(seed);
        let mut r = check_residual(residual(x)?, x)?;
        let mut bisections = 0usize;

        for iter in 0..cfg.max_iterations {
            if r.abs() < cfg.tolerance {
                debug!(x, residual = r, iterations = iter, bisections, "newton converged");
                return Ok(ScalarSolution {
                    x,
                    residual: r,
                    iterations: iter,
                    converged: true,
                });
            }

            let h = cfg.derivative_step;
            let r_step = check_residual(residual(x + h)?, x + h)?;
            let derivative = (r_step - r) / h;

            x = if derivative.abs() < cfg.min_derivative {
                bisections += 1;
                bounds.clamp(0.5 * (x + anchor))
            } else {
                bounds.clamp(x - r / derivative)
            };
            r = check_residual(residual(x)?, x)?;
        }

        let converged = r.abs() < cfg.tolerance;
        debug!(
            x,
            residual = r,
            iterations = cfg.max_iterations,
            bisections,
            converged,
            "newton hit iteration limit"
        );
        Ok(ScalarSolution {
            x,
            residual: r,
            iterations: cfg.max_iterations,
            converged,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tight() -> NewtonConfig {
        NewtonConfig {
            tolerance: 1e-12,
            max_iterations: 50,
            derivative_step: 1e-7,
            min_derivative: 1e-10,
        }
    }

    #[test]
    fn simple_quadratic() {
        // Solve x^2 - 4 = 0, x > 0
        let solver = Newton::new(tight());
        let sol = solver
            .solve(|x| Ok::<f64, SolverError>(x * x - 4.0), 3.0, Bounds::new(0.0, 10.0))
            .unwrap();
        assert!(sol.converged);
        assert!((sol.x - 2.0).abs() < 1e-6);
    }

    #[test]
    fn root_outside_window_stays_clamped() {
        // root at 5, window stops at 3
        let solver = Newton::new(tight());
        let sol = solver
            .solve(|x| Ok::<f64, SolverError>(x - 5.0), 1.0, Bounds::new(0.0, 3.0))
            .unwrap();
        assert!(!sol.converged);
        assert_eq!(sol.x, 3.0);
    }

    #[test]
    fn flat_residual_bisects_toward_anchor() {
        // residual constant: derivative is zero, every step halves the gap to 0
        let solver = Newton::new(NewtonConfig {
            tolerance: 1e-6,
            max_iterations: 3,
            ..NewtonConfig::default()
        })
        .with_anchor(0.0);
        let sol = solver
            .solve(|_| Ok::<f64, SolverError>(1.0), 8.0, Bounds::new(-10.0, 10.0))
            .unwrap();
        assert!(!sol.converged);
        assert!((sol.x - 1.0).abs() < 1e-12);
    }

    #[test]
    fn flat_residual_without_anchor_uses_midpoint() {
        let solver = Newton::new(NewtonConfig {
            tolerance: 1e-6,
            max_iterations: 1,
            ..NewtonConfig::default()
        });
        let sol = solver
            .solve(|_| Ok::<f64, SolverError>(1.0), 8.0, Bounds::new(0.0, 4.0))
            .unwrap();
        // seed clamps to 4, one half-step toward midpoint 2
        assert!((sol.x - 3.0).abs() < 1e-12);
    }

    #[test]
    fn invalid_step_is_rejected() {
        let solver = Newton::new(NewtonConfig {
            derivative_step: 0.0,
            ..NewtonConfig::default()
        });
        let err = solver
            .solve(|x| Ok::<f64, SolverError>(x), 1.0, Bounds::new(0.0, 2.0))
            .unwrap_err();
        assert!(matches!(err, SolverError::InvalidConfig { .. }));
    }
}
