//! pf-core: stable foundation for psychroflow.
//!
//! Contains:
//! - units (uom SI types + constructors in the units the psychrometric
//!   relations are written in: kPa, m)
//! - numeric (Real + tolerances + rounding + float helpers)
//! - error (shared error types)

pub mod error;
pub mod numeric;
pub mod units;

// Re-exports: nice ergonomics for downstream crates
pub use error::{PfError, PfResult};
pub use numeric::*;
pub use units::*;
