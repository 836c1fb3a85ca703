//! Saturation vapor pressure and ambient pressure.

use pf_core::units::{Length, Pressure, as_m, kpa};

use crate::constants::{MMHG_TO_KPA, antoine, standard_atmosphere};

/// Saturation vapor pressure of water over a flat surface [kPa].
///
/// Antoine equation, `log10(P_mmHg) = A - B / (C + T)`. The coefficients were
/// fitted between 1 and 100 °C; outside that range (sub-zero air in
/// particular) the value is an extrapolation with reduced accuracy. No
/// clamping is applied. The correlation has a pole at `T = -233.426 °C`.
pub fn saturated_vapor_pressure_kpa(t_c: f64) -> f64 {
    let log_p_mmhg = antoine::A - antoine::B / (antoine::C + t_c);
    10f64.powf(log_p_mmhg) * MMHG_TO_KPA
}

/// Temperature at which the saturation pressure equals `p_kpa` [°C].
///
/// Inverse of [`saturated_vapor_pressure_kpa`]. A zero partial pressure maps
/// to the pole of the correlation (-233.426 °C) rather than an error.
pub fn saturation_temperature_c(p_kpa: f64) -> f64 {
    antoine::B / (antoine::A - (p_kpa / MMHG_TO_KPA).log10()) - antoine::C
}

/// Barometric pressure at `altitude_m` above sea level [kPa].
///
/// Standard-atmosphere (hypsometric) approximation. Beyond roughly 44 300 m the
/// base of the power goes negative and the result is NaN; range checks belong
/// to the caller.
pub fn barometric_pressure_kpa(altitude_m: f64) -> f64 {
    use standard_atmosphere::*;
    let base = 1.0 - LAPSE_RATE * altitude_m / SEA_LEVEL_TEMPERATURE;
    SEA_LEVEL_PRESSURE * base.powf(EXPONENT)
}

/// Typed variant of [`barometric_pressure_kpa`].
pub fn barometric_pressure(altitude: Length) -> Pressure {
    kpa(barometric_pressure_kpa(as_m(altitude)))
}
