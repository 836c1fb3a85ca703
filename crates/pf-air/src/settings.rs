//! Tunable solver parameters.
//!
//! Defaults are the calibrated published values; a settings file only
//! needs to name the values it changes.

use pf_solver::{FixedPointConfig, NewtonConfig};
use serde::{Deserialize, Deserializer, Serialize};

/// Parameters of the three temperature inversions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverSettings {
    /// Wet bulb from dry bulb + RH
    #[serde(deserialize_with = "wet_bulb_from_rh_config")]
    pub wet_bulb_from_rh: FixedPointConfig,
    /// Lowest wet bulb the RH inversion may return [°C]
    pub wet_bulb_floor_c: f64,
    /// Wet bulb from dry bulb + dew point
    #[serde(deserialize_with = "wet_bulb_from_dew_point_config")]
    pub wet_bulb_from_dew_point: FixedPointConfig,
    /// Dry bulb from wet bulb + RH
    pub dry_bulb_from_wet_bulb: DryBulbSolverSettings,
}

impl Default for SolverSettings {
    fn default() -> Self {
        Self {
            wet_bulb_from_rh: FixedPointConfig {
                gain: 10.0,
                tolerance: 0.01,
                max_iterations: 50,
            },
            wet_bulb_floor_c: -50.0,
            wet_bulb_from_dew_point: FixedPointConfig {
                gain: 5.0,
                tolerance: 0.01,
                max_iterations: 50,
            },
            dry_bulb_from_wet_bulb: DryBulbSolverSettings::default(),
        }
    }
}

/// Fixed-point entry as written in a settings file; absent keys keep the
/// default of the solver the entry belongs to.
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct FixedPointOverrides {
    gain: Option<f64>,
    tolerance: Option<f64>,
    max_iterations: Option<usize>,
}

impl FixedPointOverrides {
    fn apply(self, base: FixedPointConfig) -> FixedPointConfig {
        FixedPointConfig {
            gain: self.gain.unwrap_or(base.gain),
            tolerance: self.tolerance.unwrap_or(base.tolerance),
            max_iterations: self.max_iterations.unwrap_or(base.max_iterations),
        }
    }
}

fn wet_bulb_from_rh_config<'de, D: Deserializer<'de>>(d: D) -> Result<FixedPointConfig, D::Error> {
    let base = SolverSettings::default().wet_bulb_from_rh;
    Ok(FixedPointOverrides::deserialize(d)?.apply(base))
}

fn wet_bulb_from_dew_point_config<'de, D: Deserializer<'de>>(
    d: D,
) -> Result<FixedPointConfig, D::Error> {
    let base = SolverSettings::default().wet_bulb_from_dew_point;
    Ok(FixedPointOverrides::deserialize(d)?.apply(base))
}

/// Newton inversion for dry bulb, plus its acceptance test and fallback.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DryBulbSolverSettings {
    pub newton: NewtonConfig,
    /// Iterates stay within `wbt - window_below_c` ..
    pub window_below_c: f64,
    /// .. `wbt + window_above_c`
    pub window_above_c: f64,
    /// Seed is `wbt + (100 - RH) / seed_divisor`
    pub seed_divisor: f64,
    /// Largest relative humidity-ratio mismatch accepted from Newton
    pub acceptance_rel_error: f64,
    /// Rejected results are replaced by `wbt + (100 - RH) / fallback_divisor`
    pub fallback_divisor: f64,
}

impl Default for DryBulbSolverSettings {
    fn default() -> Self {
        Self {
            newton: NewtonConfig {
                tolerance: 1e-3,
                max_iterations: 100,
                derivative_step: 1e-3,
                min_derivative: 1e-10,
            },
            window_below_c: 10.0,
            window_above_c: 50.0,
            seed_divisor: 4.0,
            acceptance_rel_error: 0.05,
            fallback_divisor: 3.0,
        }
    }
}
