//! Caller-side sanity ranges.
//!
//! The property engine evaluates any finite input. These limits are what the
//! front-ends accept before handing a row to it.

use pf_air::{InputKind, InputSpec};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

/// Inclusive range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Limit {
    pub min: f64,
    pub max: f64,
}

impl Limit {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    pub fn check(&self, what: &'static str, value: f64) -> AppResult<()> {
        if self.contains(value) {
            Ok(())
        } else {
            Err(AppError::OutOfLimits {
                what,
                value,
                min: self.min,
                max: self.max,
            })
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputLimits {
    pub altitude_m: Limit,
    pub temperature_c: Limit,
    pub relative_humidity_pct: Limit,
}

impl Default for InputLimits {
    fn default() -> Self {
        Self {
            altitude_m: Limit::new(0.0, 10_000.0),
            temperature_c: Limit::new(-100.0, 100.0),
            relative_humidity_pct: Limit::new(0.0, 100.0),
        }
    }
}

impl InputLimits {
    /// Range-check both values (by their meaning for `spec.kind`) and the
    /// altitude. NaN is never inside a limit.
    pub fn check(&self, spec: &InputSpec) -> AppResult<()> {
        let (first, second) = match spec.kind {
            InputKind::DbtWbt => ("dry bulb", "wet bulb"),
            InputKind::DbtRh => ("dry bulb", "relative humidity"),
            InputKind::DbtDpt => ("dry bulb", "dew point"),
            InputKind::WbtRh => ("wet bulb", "relative humidity"),
        };

        self.temperature_c.check(first, spec.value1)?;
        if spec.kind.second_is_rh() {
            self.relative_humidity_pct.check(second, spec.value2)?;
        } else {
            self.temperature_c.check(second, spec.value2)?;
        }
        self.altitude_m.check("altitude", spec.altitude_m)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_accept_sample_rows() {
        let limits = InputLimits::default();
        for spec in [
            InputSpec::new(InputKind::DbtWbt, 25.0, 20.0, 0.0),
            InputSpec::new(InputKind::DbtRh, 30.0, 65.0, 500.0),
            InputSpec::new(InputKind::DbtDpt, 22.0, 15.0, 100.0),
            InputSpec::new(InputKind::WbtRh, 18.0, 70.0, 0.0),
        ] {
            limits.check(&spec).unwrap();
        }
    }

    #[test]
    fn rh_limit_only_applies_to_rh_kinds() {
        let limits = InputLimits::default();
        // -5 is a fine dew point but not a relative humidity
        assert!(limits.check(&InputSpec::new(InputKind::DbtDpt, 10.0, -5.0, 0.0)).is_ok());
        let err = limits
            .check(&InputSpec::new(InputKind::DbtRh, 10.0, -5.0, 0.0))
            .unwrap_err();
        assert!(matches!(err, AppError::OutOfLimits { what: "relative humidity", .. }));
    }

    #[test]
    fn altitude_above_limit_is_rejected() {
        let err = InputLimits::default()
            .check(&InputSpec::new(InputKind::DbtWbt, 25.0, 20.0, 20_000.0))
            .unwrap_err();
        assert!(matches!(err, AppError::OutOfLimits { what: "altitude", .. }));
    }

    #[test]
    fn nan_is_out_of_limits() {
        assert!(!Limit::new(0.0, 1.0).contains(f64::NAN));
    }
}
