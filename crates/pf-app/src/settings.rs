//! Application settings file.
//!
//! ```yaml
//! solver:
//!   wet_bulb_from_rh:
//!     max_iterations: 200
//! limits:
//!   altitude_m: { min: 0, max: 5000 }
//! batch:
//!   yield_stride: 500
//! ```
//!
//! Every key is optional; omitted values keep their defaults. Files ending in
//! `.json` are read as JSON with the same layout.

use std::path::Path;

use pf_air::SolverSettings;
use serde::{Deserialize, Serialize};

use crate::batch::BatchOptions;
use crate::error::{AppError, AppResult};
use crate::limits::InputLimits;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    pub solver: SolverSettings,
    pub limits: InputLimits,
    pub batch: BatchOptions,
}

impl AppSettings {
    pub fn from_yaml(text: &str) -> AppResult<Self> {
        // An empty document deserializes as unit, not as an empty map
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(text)?)
    }

    pub fn to_yaml(&self) -> AppResult<String> {
        Ok(serde_yaml::to_string(self)?)
    }
}

pub fn load_settings(path: &Path) -> AppResult<AppSettings> {
    let content = std::fs::read_to_string(path).map_err(|source| AppError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    if is_json {
        Ok(serde_json::from_str(&content)?)
    } else {
        AppSettings::from_yaml(&content)
    }
}

/// Defaults when no path is given.
pub fn load_settings_or_default(path: Option<&Path>) -> AppResult<AppSettings> {
    match path {
        Some(path) => load_settings(path),
        None => Ok(AppSettings::default()),
    }
}
