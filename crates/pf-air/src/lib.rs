//! pf-air: moist-air property calculations for psychroflow.
//!
//! Provides:
//! - Physical constants and correlations (Antoine, standard atmosphere)
//! - Saturation vapor pressure and barometric pressure from altitude
//! - Closed-form converters between humidity ratio, RH, dew point, vapor
//!   pressure, enthalpy and specific volume
//! - Iterative inversions for the temperatures with no closed form
//! - Air-state resolution from any of four measured input pairs
//! - Parametric sweeps that expand into rows for batch evaluation
//!
//! # Example
//!
//! ```
//! use pf_air::{InputKind, InputSpec, SolverSettings, compute_air_state};
//!
//! let spec = InputSpec::new(InputKind::DbtWbt, 25.0, 20.0, 0.0);
//! let resolution = compute_air_state(&spec, &SolverSettings::default()).unwrap();
//! let state = resolution.state.rounded();
//! assert!(state.dew_point_c < state.wet_bulb_c);
//! ```

pub mod calculator;
pub mod constants;
pub mod convert;
pub mod error;
pub mod saturation;
pub mod settings;
pub mod solve;
pub mod state;
pub mod sweeps;

// Re-exports for ergonomics
pub use calculator::{Resolution, compute_air_state, resolve};
pub use error::{AirError, AirResult};
pub use saturation::{barometric_pressure, barometric_pressure_kpa, saturated_vapor_pressure_kpa};
pub use settings::{DryBulbSolverSettings, SolverSettings};
pub use solve::{SolveReport, SolverKind};
pub use state::{AirState, InputKind, InputSpec};
pub use sweeps::{SweepDefinition, SweepType};
