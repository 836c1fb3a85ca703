//! Input and output state definitions.

use std::fmt;
use std::str::FromStr;

use pf_core::round_to;
use serde::{Deserialize, Serialize};

use crate::error::AirError;

/// Which pair of measured quantities an [`InputSpec`] carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputKind {
    /// Dry-bulb and wet-bulb temperatures
    DbtWbt,
    /// Dry-bulb temperature and relative humidity
    DbtRh,
    /// Dry-bulb temperature and dew point
    DbtDpt,
    /// Wet-bulb temperature and relative humidity
    WbtRh,
}

impl InputKind {
    pub const ALL: [InputKind; 4] = [Self::DbtWbt, Self::DbtRh, Self::DbtDpt, Self::WbtRh];

    /// Tag used on the wire (CSV, CLI).
    pub fn tag(self) -> &'static str {
        match self {
            Self::DbtWbt => "dbt_wbt",
            Self::DbtRh => "dbt_rh",
            Self::DbtDpt => "dbt_dpt",
            Self::WbtRh => "wbt_rh",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::DbtWbt => "DBT-WBT",
            Self::DbtRh => "DBT-RH",
            Self::DbtDpt => "DBT-DPT",
            Self::WbtRh => "WBT-RH",
        }
    }

    pub fn first_label(self) -> &'static str {
        match self {
            Self::DbtWbt | Self::DbtRh | Self::DbtDpt => "Dry-bulb temperature [°C]",
            Self::WbtRh => "Wet-bulb temperature [°C]",
        }
    }

    pub fn second_label(self) -> &'static str {
        match self {
            Self::DbtWbt => "Wet-bulb temperature [°C]",
            Self::DbtRh | Self::WbtRh => "Relative humidity [%]",
            Self::DbtDpt => "Dew-point temperature [°C]",
        }
    }

    /// Whether the second value is a relative humidity rather than a temperature.
    pub fn second_is_rh(self) -> bool {
        matches!(self, Self::DbtRh | Self::WbtRh)
    }
}

impl fmt::Display for InputKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for InputKind {
    type Err = AirError;

    /// Accepts the wire tags case-insensitively, with `-` or `_` as separator.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|kind| kind.tag() == normalized)
            .ok_or_else(|| AirError::InvalidInputKind(s.to_string()))
    }
}

/// One resolution request: an input pair plus the altitude that fixes the
/// ambient pressure.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InputSpec {
    pub kind: InputKind,
    /// Meaning depends on `kind` (see [`InputKind::first_label`])
    pub value1: f64,
    /// Meaning depends on `kind` (see [`InputKind::second_label`])
    pub value2: f64,
    /// Altitude above sea level [m]
    pub altitude_m: f64,
}

impl InputSpec {
    pub fn new(kind: InputKind, value1: f64, value2: f64, altitude_m: f64) -> Self {
        Self {
            kind,
            value1,
            value2,
            altitude_m,
        }
    }
}

/// Complete moist-air state at one pressure.
///
/// All eight fields are mutually consistent under the relations in
/// [`convert`](crate::convert); the humidity ratio is never negative.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AirState {
    pub dry_bulb_c: f64,
    pub wet_bulb_c: f64,
    pub relative_humidity_pct: f64,
    pub dew_point_c: f64,
    /// kg water / kg dry air
    pub humidity_ratio: f64,
    /// kJ / kg dry air
    pub enthalpy_kj_per_kg: f64,
    /// m³ / kg dry air
    pub specific_volume_m3_per_kg: f64,
    pub vapor_pressure_kpa: f64,
}

impl AirState {
    /// Copy rounded to the published output precision: temperatures, RH and
    /// enthalpy to 0.1, humidity ratio to 1e-4, specific volume to 1e-3,
    /// vapor pressure to 0.01.
    pub fn rounded(&self) -> AirState {
        AirState {
            dry_bulb_c: round_to(self.dry_bulb_c, 1),
            wet_bulb_c: round_to(self.wet_bulb_c, 1),
            relative_humidity_pct: round_to(self.relative_humidity_pct, 1),
            dew_point_c: round_to(self.dew_point_c, 1),
            humidity_ratio: round_to(self.humidity_ratio, 4),
            enthalpy_kj_per_kg: round_to(self.enthalpy_kj_per_kg, 1),
            specific_volume_m3_per_kg: round_to(self.specific_volume_m3_per_kg, 3),
            vapor_pressure_kpa: round_to(self.vapor_pressure_kpa, 2),
        }
    }

    /// Field values with names, in output column order.
    pub fn fields(&self) -> [(&'static str, f64); 8] {
        [
            ("dry_bulb_c", self.dry_bulb_c),
            ("wet_bulb_c", self.wet_bulb_c),
            ("relative_humidity_pct", self.relative_humidity_pct),
            ("dew_point_c", self.dew_point_c),
            ("humidity_ratio", self.humidity_ratio),
            ("enthalpy_kj_per_kg", self.enthalpy_kj_per_kg),
            ("specific_volume_m3_per_kg", self.specific_volume_m3_per_kg),
            ("vapor_pressure_kpa", self.vapor_pressure_kpa),
        ]
    }
}
