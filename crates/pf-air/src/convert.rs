//! Closed-form conversions between moist-air properties.
//!
//! Every function takes one consistent state at a single total pressure.
//! Temperatures in °C, pressures in kPa, humidity ratio in kg water per kg dry
//! air, RH in percent. Only RH is clamped (to [0, 100]); temperatures are
//! passed through untouched.

use crate::constants::{
    CP_DRY_AIR, CP_VAPOR, KELVIN_OFFSET, LATENT_HEAT_0C, MW_RATIO, R_DRY_AIR, wet_bulb,
};
use crate::error::{AirError, AirResult};
use crate::saturation::{saturated_vapor_pressure_kpa, saturation_temperature_c};

/// Humidity ratio of air whose water vapor exerts `p_w_kpa` at total
/// pressure `p_kpa`.
///
/// Fails when the vapor pressure reaches the total pressure, where the
/// relation has its singularity.
pub fn humidity_ratio_from_partial_pressure(p_w_kpa: f64, p_kpa: f64) -> AirResult<f64> {
    let dry = p_kpa - p_w_kpa;
    if !(dry > 0.0) {
        return Err(AirError::domain(format!(
            "vapor pressure {p_w_kpa:.4} kPa is not below total pressure {p_kpa:.4} kPa"
        )));
    }
    Ok(MW_RATIO * p_w_kpa / dry)
}

/// Humidity ratio at saturation.
pub fn saturated_humidity_ratio(t_c: f64, p_kpa: f64) -> AirResult<f64> {
    humidity_ratio_from_partial_pressure(saturated_vapor_pressure_kpa(t_c), p_kpa)
}

/// Humidity ratio from dry-bulb and wet-bulb temperatures.
///
/// Empirical approximation, not exact thermodynamics: saturation humidity
/// ratio at the wet bulb followed by the correction
/// `[(1093 - 0.556 wbt) Ws - 0.240 (dbt - wbt)] / (1093 + 0.444 dbt - wbt)`.
pub fn humidity_ratio_from_wet_bulb(dbt_c: f64, wbt_c: f64, p_kpa: f64) -> AirResult<f64> {
    let w_s = saturated_humidity_ratio(wbt_c, p_kpa)?;
    let numerator = (wet_bulb::C0 - wet_bulb::C1 * wbt_c) * w_s - wet_bulb::C2 * (dbt_c - wbt_c);
    let denominator = wet_bulb::C0 + wet_bulb::C3 * dbt_c - wbt_c;
    let w = numerator / denominator;
    if !w.is_finite() {
        return Err(AirError::domain(format!(
            "wet-bulb correction is singular at dbt={dbt_c}, wbt={wbt_c}"
        )));
    }
    Ok(w)
}

/// Humidity ratio from dry-bulb temperature and relative humidity.
pub fn humidity_ratio_from_rh(dbt_c: f64, rh_pct: f64, p_kpa: f64) -> AirResult<f64> {
    let p_w = rh_pct / 100.0 * saturated_vapor_pressure_kpa(dbt_c);
    humidity_ratio_from_partial_pressure(p_w, p_kpa)
}

/// Humidity ratio from dew point.
pub fn humidity_ratio_from_dew_point(dpt_c: f64, p_kpa: f64) -> AirResult<f64> {
    saturated_humidity_ratio(dpt_c, p_kpa)
}

/// Partial pressure of water vapor for humidity ratio `w` [kPa].
pub fn vapor_pressure_kpa(w: f64, p_kpa: f64) -> f64 {
    w * p_kpa / (MW_RATIO + w)
}

/// Relative humidity from dry bulb and humidity ratio, clamped to [0, 100].
pub fn relative_humidity_from_humidity_ratio(dbt_c: f64, w: f64, p_kpa: f64) -> f64 {
    let p_w = vapor_pressure_kpa(w, p_kpa);
    (100.0 * p_w / saturated_vapor_pressure_kpa(dbt_c)).clamp(0.0, 100.0)
}

/// Relative humidity from dry bulb and dew point, clamped to [0, 100].
pub fn relative_humidity_from_dew_point(dbt_c: f64, dpt_c: f64) -> f64 {
    (100.0 * saturated_vapor_pressure_kpa(dpt_c) / saturated_vapor_pressure_kpa(dbt_c))
        .clamp(0.0, 100.0)
}

/// Dew point for humidity ratio `w`, by inverting Antoine on the vapor
/// partial pressure.
pub fn dew_point_from_humidity_ratio(w: f64, p_kpa: f64) -> f64 {
    saturation_temperature_c(vapor_pressure_kpa(w, p_kpa))
}

/// Specific enthalpy of moist air [kJ/kg dry air].
pub fn enthalpy_kj_per_kg(dbt_c: f64, w: f64) -> f64 {
    CP_DRY_AIR * dbt_c + w * (LATENT_HEAT_0C + CP_VAPOR * dbt_c)
}

/// Specific volume of moist air [m³/kg dry air].
pub fn specific_volume_m3_per_kg(dbt_c: f64, w: f64, p_kpa: f64) -> f64 {
    let p_w = vapor_pressure_kpa(w, p_kpa);
    R_DRY_AIR * (dbt_c + KELVIN_OFFSET) / ((p_kpa - p_w) * 1000.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    const P0: f64 = 101.325;

    #[test]
    fn saturated_air_has_wet_bulb_equal_dry_bulb_ratio() {
        let w_s = saturated_humidity_ratio(20.0, P0).unwrap();
        let w = humidity_ratio_from_wet_bulb(20.0, 20.0, P0).unwrap();
        assert!((w - w_s).abs() < 1e-12);
    }

    #[test]
    fn wet_bulb_depression_lowers_humidity_ratio() {
        let w = humidity_ratio_from_wet_bulb(25.0, 20.0, P0).unwrap();
        let w_s = saturated_humidity_ratio(20.0, P0).unwrap();
        assert!(w < w_s);
        assert!((w - 0.0135).abs() < 2e-4, "W = {w}");
    }

    #[test]
    fn rh_and_humidity_ratio_are_inverse() {
        let w = humidity_ratio_from_rh(30.0, 65.0, 95.46).unwrap();
        let rh = relative_humidity_from_humidity_ratio(30.0, w, 95.46);
        assert!((rh - 65.0).abs() < 1e-9);
    }

    #[test]
    fn dew_point_and_humidity_ratio_are_inverse() {
        let w = humidity_ratio_from_dew_point(15.0, 100.0).unwrap();
        let dpt = dew_point_from_humidity_ratio(w, 100.0);
        assert!((dpt - 15.0).abs() < 1e-9);
    }

    #[test]
    fn rh_is_clamped() {
        assert_eq!(relative_humidity_from_dew_point(20.0, 25.0), 100.0);
        assert_eq!(relative_humidity_from_humidity_ratio(20.0, 0.5, P0), 100.0);
        assert_eq!(relative_humidity_from_humidity_ratio(20.0, -0.01, P0), 0.0);
    }

    #[test]
    fn vapor_pressure_at_or_above_total_is_domain_error() {
        // P_ws(100 °C) is about 101.3 kPa, far above the 50 kPa ambient
        let err = saturated_humidity_ratio(100.0, 50.0).unwrap_err();
        assert!(matches!(err, AirError::NumericDomain { .. }));
    }

    #[test]
    fn dry_air_enthalpy_and_volume() {
        assert!((enthalpy_kj_per_kg(20.0, 0.0) - 20.12).abs() < 1e-12);
        let v = specific_volume_m3_per_kg(0.0, 0.0, P0);
        assert!((v - 0.7738).abs() < 1e-3, "v = {v}");
    }

    #[test]
    fn moist_air_enthalpy() {
        let h = enthalpy_kj_per_kg(25.0, 0.01);
        assert!((h - (25.15 + 0.01 * (2501.0 + 46.5))).abs() < 1e-9);
    }

    #[test]
    fn vapor_pressure_of_dry_air_is_zero() {
        assert_eq!(vapor_pressure_kpa(0.0, P0), 0.0);
    }
}
