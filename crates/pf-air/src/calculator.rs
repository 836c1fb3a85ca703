//! Air-state resolution from one measured input pair.

use pf_core::units::{Pressure, as_kpa, m};
use pf_core::ensure_finite;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::convert::{
    dew_point_from_humidity_ratio, enthalpy_kj_per_kg, humidity_ratio_from_dew_point,
    humidity_ratio_from_rh, humidity_ratio_from_wet_bulb, relative_humidity_from_dew_point,
    relative_humidity_from_humidity_ratio, specific_volume_m3_per_kg, vapor_pressure_kpa,
};
use crate::error::{AirError, AirResult};
use crate::saturation::barometric_pressure;
use crate::settings::SolverSettings;
use crate::solve::{
    SolveReport, dry_bulb_from_wet_bulb_rh, wet_bulb_from_dew_point, wet_bulb_from_rh,
};
use crate::state::{AirState, InputKind, InputSpec};

/// Unrounded outcome of one resolution.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Resolution {
    pub spec: InputSpec,
    /// Ambient pressure derived from the altitude
    pub pressure: Pressure,
    pub state: AirState,
    pub report: SolveReport,
}

impl Resolution {
    pub fn pressure_kpa(&self) -> f64 {
        as_kpa(self.pressure)
    }

    /// State at output precision.
    pub fn rounded(&self) -> AirState {
        self.state.rounded()
    }
}

/// Temperatures and moisture content, before the derived properties.
struct Psychrometrics {
    dbt: f64,
    wbt: f64,
    rh: f64,
    dpt: f64,
    w: f64,
}

/// Resolve the full air state for `spec`.
///
/// No range validation happens here: any finite input is evaluated. The
/// humidity ratio is floored at zero as soon as it is known, so RH and dew
/// point are always derived from a physical moisture content.
pub fn compute_air_state(spec: &InputSpec, settings: &SolverSettings) -> AirResult<Resolution> {
    let v1 = ensure_finite(spec.value1, "value1")?;
    let v2 = ensure_finite(spec.value2, "value2")?;
    let altitude = ensure_finite(spec.altitude_m, "altitude")?;

    let pressure = barometric_pressure(m(altitude));
    let p = as_kpa(pressure);
    if !(p.is_finite() && p > 0.0) {
        return Err(AirError::domain(format!(
            "no barometric pressure at altitude {altitude} m"
        )));
    }

    let (psy, report) = match spec.kind {
        InputKind::DbtWbt => {
            let (dbt, wbt) = (v1, v2);
            let w = humidity_ratio_from_wet_bulb(dbt, wbt, p)?.max(0.0);
            let psy = Psychrometrics {
                dbt,
                wbt,
                rh: relative_humidity_from_humidity_ratio(dbt, w, p),
                dpt: dew_point_from_humidity_ratio(w, p),
                w,
            };
            (psy, SolveReport::closed_form())
        }
        InputKind::DbtRh => {
            let (dbt, rh) = (v1, v2);
            let w = humidity_ratio_from_rh(dbt, rh, p)?.max(0.0);
            let (wbt, report) = wet_bulb_from_rh(dbt, rh, p, settings)?;
            let psy = Psychrometrics {
                dbt,
                wbt,
                rh: rh.clamp(0.0, 100.0),
                dpt: dew_point_from_humidity_ratio(w, p),
                w,
            };
            (psy, report)
        }
        InputKind::DbtDpt => {
            let (dbt, dpt) = (v1, v2);
            let w = humidity_ratio_from_dew_point(dpt, p)?.max(0.0);
            let (wbt, report) = wet_bulb_from_dew_point(dbt, dpt, p, settings)?;
            let psy = Psychrometrics {
                dbt,
                wbt,
                rh: relative_humidity_from_dew_point(dbt, dpt),
                dpt,
                w,
            };
            (psy, report)
        }
        InputKind::WbtRh => {
            let (wbt, rh) = (v1, v2);
            let (dbt, report) = dry_bulb_from_wet_bulb_rh(wbt, rh, p, settings)?;
            let w = humidity_ratio_from_wet_bulb(dbt, wbt, p)?.max(0.0);
            let psy = Psychrometrics {
                dbt,
                wbt,
                rh: rh.clamp(0.0, 100.0),
                dpt: dew_point_from_humidity_ratio(w, p),
                w,
            };
            (psy, report)
        }
    };

    let state = AirState {
        dry_bulb_c: psy.dbt,
        wet_bulb_c: psy.wbt,
        relative_humidity_pct: psy.rh,
        dew_point_c: psy.dpt,
        humidity_ratio: psy.w,
        enthalpy_kj_per_kg: enthalpy_kj_per_kg(psy.dbt, psy.w),
        specific_volume_m3_per_kg: specific_volume_m3_per_kg(psy.dbt, psy.w, p),
        vapor_pressure_kpa: vapor_pressure_kpa(psy.w, p),
    };

    if let Some((name, value)) = state.fields().into_iter().find(|(_, v)| !v.is_finite()) {
        return Err(AirError::domain(format!(
            "{name} is {value} for {} ({v1}, {v2}) at {altitude} m",
            spec.kind
        )));
    }

    debug!(
        kind = %spec.kind,
        value1 = v1,
        value2 = v2,
        pressure_kpa = p,
        iterations = report.iterations,
        converged = report.converged,
        fallback_used = report.fallback_used,
        "resolved air state"
    );

    Ok(Resolution {
        spec: *spec,
        pressure,
        state,
        report,
    })
}

/// Resolve from a kind tag with default solver settings, rounded to output
/// precision.
///
/// Fails with [`AirError::InvalidInputKind`] for an unknown tag.
pub fn resolve(kind: &str, value1: f64, value2: f64, altitude_m: f64) -> AirResult<AirState> {
    let kind: InputKind = kind.parse()?;
    let spec = InputSpec::new(kind, value1, value2, altitude_m);
    Ok(compute_air_state(&spec, &SolverSettings::default())?.rounded())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pf_core::PfError;

    fn settings() -> SolverSettings {
        SolverSettings::default()
    }

    #[test]
    fn sea_level_pressure_is_standard() {
        let spec = InputSpec::new(InputKind::DbtWbt, 25.0, 20.0, 0.0);
        let res = compute_air_state(&spec, &settings()).unwrap();
        assert!((res.pressure_kpa() - 101.325).abs() < 1e-12);
        assert!(res.report.solver.is_none());
    }

    #[test]
    fn dbt_wbt_orders_temperatures() {
        let s = compute_air_state(&InputSpec::new(InputKind::DbtWbt, 25.0, 20.0, 0.0), &settings())
            .unwrap()
            .state;
        assert!(s.dew_point_c < s.wet_bulb_c && s.wet_bulb_c < s.dry_bulb_c);
        assert!((50.0..75.0).contains(&s.relative_humidity_pct));
    }

    #[test]
    fn dbt_dpt_keeps_input_dew_point() {
        let s = compute_air_state(&InputSpec::new(InputKind::DbtDpt, 22.0, 15.0, 100.0), &settings())
            .unwrap()
            .state;
        assert_eq!(s.dew_point_c, 15.0);
        assert!(s.relative_humidity_pct > 0.0 && s.relative_humidity_pct < 100.0);
    }

    #[test]
    fn very_dry_air_floors_humidity_ratio() {
        // 40 °C dry bulb with a 0 °C wet bulb is drier than dry air
        let s = compute_air_state(&InputSpec::new(InputKind::DbtWbt, 40.0, 0.0, 0.0), &settings())
            .unwrap()
            .state;
        assert_eq!(s.humidity_ratio, 0.0);
        assert_eq!(s.relative_humidity_pct, 0.0);
        assert_eq!(s.vapor_pressure_kpa, 0.0);
        assert!(s.dew_point_c.is_finite());
    }

    #[test]
    fn rh_output_is_clamped() {
        let s = compute_air_state(&InputSpec::new(InputKind::DbtRh, 20.0, 100.0, 0.0), &settings())
            .unwrap()
            .state;
        assert_eq!(s.relative_humidity_pct, 100.0);
        assert!((s.wet_bulb_c - 20.0).abs() < 1e-9);
    }

    #[test]
    fn vapor_pressure_above_ambient_is_a_domain_error() {
        // Saturation at 120 °C exceeds one atmosphere
        let err = compute_air_state(&InputSpec::new(InputKind::DbtRh, 120.0, 100.0, 0.0), &settings())
            .unwrap_err();
        assert!(matches!(err, AirError::NumericDomain { .. }), "{err}");
    }

    #[test]
    fn altitude_beyond_atmosphere_is_a_domain_error() {
        let err = compute_air_state(&InputSpec::new(InputKind::DbtWbt, 25.0, 20.0, 50_000.0), &settings())
            .unwrap_err();
        assert!(matches!(err, AirError::NumericDomain { .. }));
    }

    #[test]
    fn nan_input_is_rejected() {
        let err = compute_air_state(&InputSpec::new(InputKind::DbtRh, f64::NAN, 50.0, 0.0), &settings())
            .unwrap_err();
        assert!(matches!(err, AirError::Core(PfError::NonFinite { what: "value1", .. })));
    }

    #[test]
    fn resolve_rounds_output() {
        let s = resolve("dbt_wbt", 25.0, 20.0, 0.0).unwrap();
        assert_eq!(s, s.rounded());
        assert_eq!(s.dry_bulb_c, 25.0);
        assert_eq!(s.wet_bulb_c, 20.0);
    }

    #[test]
    fn resolve_rejects_unknown_kind() {
        let err = resolve("rh_only", 25.0, 20.0, 0.0).unwrap_err();
        assert_eq!(err, AirError::InvalidInputKind("rh_only".into()));
    }
}
