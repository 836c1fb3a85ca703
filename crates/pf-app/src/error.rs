//! Error types for the pf-app service layer.

use std::path::PathBuf;

use pf_air::AirError;
use pf_core::PfError;

/// Application error type wrapping the engine errors plus everything that can
/// go wrong reading files, settings and CSV rows.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Failed to read {path}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write {path}")]
    FileWrite {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV input has no header row")]
    MissingHeader,

    #[error("CSV header has no {0} column")]
    MissingColumn(&'static str),

    #[error("Row {row}: {message}")]
    InvalidRow { row: usize, message: String },

    #[error("{what} {value} is outside the allowed range {min}..={max}")]
    OutOfLimits {
        what: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("Invalid input: {0}")]
    InvalidInput(#[from] PfError),

    #[error(transparent)]
    Air(#[from] AirError),
}

/// Result type for pf-app operations.
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn out_of_limits_message_names_range() {
        let err = AppError::OutOfLimits {
            what: "altitude",
            value: 12000.0,
            min: 0.0,
            max: 10000.0,
        };
        assert_eq!(
            err.to_string(),
            "altitude 12000 is outside the allowed range 0..=10000"
        );
    }

    #[test]
    fn air_errors_pass_through() {
        let err: AppError = AirError::InvalidInputKind("x".into()).into();
        assert!(err.to_string().starts_with("Invalid input kind"));
    }
}
