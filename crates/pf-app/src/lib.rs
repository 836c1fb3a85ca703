//! Application service layer for psychroflow.
//!
//! Everything a front-end needs on top of the property engine: caller-side
//! input limits, the CSV data contract, batch evaluation with progress and
//! cancellation, and YAML settings.

pub mod batch;
pub mod csv_io;
pub mod error;
pub mod limits;
pub mod progress;
pub mod settings;

pub use batch::{
    BatchOptions, BatchOutcome, BatchRow, CancelFlag, RowError, RowSuccess, resolve_batch,
    resolve_single,
};
pub use csv_io::{EXPORT_HEADER, export_results, parse_rows};
pub use error::{AppError, AppResult};
pub use limits::{InputLimits, Limit};
pub use progress::{BatchProgressEvent, BatchStage};
pub use settings::{AppSettings, load_settings, load_settings_or_default};
