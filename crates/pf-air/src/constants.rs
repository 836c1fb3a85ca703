//! Fixed coefficients shared by every correlation in the crate.
//!
//! Units follow the relations that use them: °C, kPa, kJ/kg, kg/kg dry air.

/// Ratio of molecular weights, water vapor over dry air.
pub const MW_RATIO: f64 = 0.621_945;

/// Antoine coefficients for water, P in mmHg, T in °C (fitted for 1..100 °C).
pub mod antoine {
    pub const A: f64 = 8.071_31;
    pub const B: f64 = 1730.63;
    pub const C: f64 = 233.426;
}

/// mmHg to kPa.
pub const MMHG_TO_KPA: f64 = 0.133_322;

/// Specific gas constant of dry air [J/(kg·K)].
pub const R_DRY_AIR: f64 = 287.055;

/// Offset between °C and K.
pub const KELVIN_OFFSET: f64 = 273.15;

/// Specific heat of dry air [kJ/(kg·K)].
pub const CP_DRY_AIR: f64 = 1.006;

/// Specific heat of water vapor [kJ/(kg·K)].
pub const CP_VAPOR: f64 = 1.86;

/// Latent heat of vaporization at 0 °C [kJ/kg].
pub const LATENT_HEAT_0C: f64 = 2501.0;

/// Standard atmosphere used by the hypsometric relation.
pub mod standard_atmosphere {
    /// Sea-level pressure [kPa]
    pub const SEA_LEVEL_PRESSURE: f64 = 101.325;
    /// Temperature lapse rate [K/m]
    pub const LAPSE_RATE: f64 = 0.0065;
    /// Sea-level temperature [K]
    pub const SEA_LEVEL_TEMPERATURE: f64 = 288.15;
    pub const EXPONENT: f64 = 5.255;
}

/// Empirical wet-bulb correction coefficients.
///
/// Uncredited; reproduced exactly rather than derived.
pub mod wet_bulb {
    pub const C0: f64 = 1093.0;
    pub const C1: f64 = 0.556;
    pub const C2: f64 = 0.240;
    pub const C3: f64 = 0.444;
}
