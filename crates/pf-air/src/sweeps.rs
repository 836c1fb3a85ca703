//! Parametric sweeps over the first input value.
//!
//! A sweep holds the kind, the second value and the altitude fixed and steps
//! the first value between two bounds, producing one [`InputSpec`] per point.
//! Used for tables of RH against temperature, wet bulb against dry bulb, etc.

use std::fmt;

use pf_core::{PfError, PfResult, Tolerances, ensure_finite, nearly_equal};
use serde::{Deserialize, Serialize};

use crate::state::{InputKind, InputSpec};

/// Type of sweep progression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SweepType {
    /// Uniformly spaced points
    #[default]
    Linear,
    /// Logarithmically spaced points (both bounds positive)
    Logarithmic,
}

/// Bounds and spacing of one sweep.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SweepDefinition {
    pub start: f64,
    pub end: f64,
    pub num_points: usize,
    pub sweep_type: SweepType,
}

impl SweepDefinition {
    /// Validated constructor.
    pub fn new(start: f64, end: f64, num_points: usize, sweep_type: SweepType) -> PfResult<Self> {
        ensure_finite(start, "sweep start")?;
        ensure_finite(end, "sweep end")?;

        if num_points < 2 {
            return Err(PfError::InvalidArg {
                what: "sweep must have at least 2 points",
            });
        }
        if nearly_equal(start, end, Tolerances::default()) {
            return Err(PfError::InvalidArg {
                what: "sweep start and end must differ",
            });
        }
        if sweep_type == SweepType::Logarithmic && (start <= 0.0 || end <= 0.0) {
            return Err(PfError::InvalidArg {
                what: "logarithmic sweep bounds must be positive",
            });
        }

        Ok(Self {
            start,
            end,
            num_points,
            sweep_type,
        })
    }

    /// All points, first to last; the last point is exactly `end`.
    pub fn generate_points(&self) -> Vec<f64> {
        if self.num_points <= 1 {
            return vec![self.start];
        }

        let steps = (self.num_points - 1) as f64;
        let mut points: Vec<f64> = match self.sweep_type {
            SweepType::Linear => {
                let delta = (self.end - self.start) / steps;
                (0..self.num_points)
                    .map(|i| self.start + i as f64 * delta)
                    .collect()
            }
            SweepType::Logarithmic => {
                let log_start = self.start.ln();
                let log_delta = (self.end.ln() - log_start) / steps;
                (0..self.num_points)
                    .map(|i| (log_start + i as f64 * log_delta).exp())
                    .collect()
            }
        };

        points[self.num_points - 1] = self.end;
        points
    }

    /// One input row per point, with `fixed_value2` and `altitude_m` held.
    pub fn rows(&self, kind: InputKind, fixed_value2: f64, altitude_m: f64) -> Vec<InputSpec> {
        self.generate_points()
            .into_iter()
            .map(|v1| InputSpec::new(kind, v1, fixed_value2, altitude_m))
            .collect()
    }
}

impl fmt::Display for SweepType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Linear => write!(f, "linear"),
            Self::Logarithmic => write!(f, "logarithmic"),
        }
    }
}

impl fmt::Display for SweepDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "sweep from {} to {} ({} points, {})",
            self.start, self.end, self.num_points, self.sweep_type
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linear_sweep_generation() {
        let sweep = SweepDefinition::new(10.0, 30.0, 5, SweepType::Linear).unwrap();
        let points = sweep.generate_points();
        assert_eq!(points.len(), 5);
        assert!((points[0] - 10.0).abs() < 1e-9);
        assert!((points[2] - 20.0).abs() < 1e-9);
        assert_eq!(points[4], 30.0);
    }

    #[test]
    fn descending_sweep() {
        let points = SweepDefinition::new(30.0, -10.0, 3, SweepType::Linear)
            .unwrap()
            .generate_points();
        assert_eq!(points, vec![30.0, 10.0, -10.0]);
    }

    #[test]
    fn logarithmic_sweep_generation() {
        let sweep = SweepDefinition::new(1.0, 100.0, 3, SweepType::Logarithmic).unwrap();
        let points = sweep.generate_points();
        assert_eq!(points.len(), 3);
        assert!((points[0] - 1.0).abs() < 1e-9);
        assert!((points[1] - 10.0).abs() < 1e-9);
        assert_eq!(points[2], 100.0);
    }

    #[test]
    fn rows_hold_second_value_and_altitude() {
        let rows = SweepDefinition::new(0.0, 40.0, 5, SweepType::Linear)
            .unwrap()
            .rows(InputKind::DbtRh, 50.0, 250.0);
        assert_eq!(rows.len(), 5);
        assert!(rows.iter().all(|r| r.kind == InputKind::DbtRh));
        assert!(rows.iter().all(|r| r.value2 == 50.0 && r.altitude_m == 250.0));
        assert_eq!(rows[4].value1, 40.0);
    }

    #[test]
    fn reject_invalid_point_count() {
        assert!(SweepDefinition::new(10.0, 20.0, 1, SweepType::Linear).is_err());
    }

    #[test]
    fn reject_identical_bounds() {
        assert!(SweepDefinition::new(20.0, 20.0, 5, SweepType::Linear).is_err());
    }

    #[test]
    fn reject_non_positive_log_bounds() {
        let err = SweepDefinition::new(-5.0, 20.0, 5, SweepType::Logarithmic).unwrap_err();
        assert!(matches!(err, PfError::InvalidArg { .. }));
    }
}
