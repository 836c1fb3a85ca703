//! Batch evaluation with per-row error isolation.
//!
//! A row that fails to parse, falls outside the input limits, or hits a
//! numeric domain error in the engine becomes a [`RowError`]; the remaining
//! rows are still resolved. Results keep input order and are addressable by
//! their original row number.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use pf_air::{AirState, InputSpec, Resolution, SolveReport, SolverSettings, compute_air_state};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{AppError, AppResult};
use crate::limits::InputLimits;
use crate::progress::{BatchProgressEvent, BatchStage};
use crate::settings::AppSettings;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchOptions {
    /// Emit a [`BatchStage::Yield`] event every this many rows (0 disables)
    pub yield_stride: usize,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self { yield_stride: 100 }
    }
}

/// One numbered input row, or the reason it could not be read.
#[derive(Debug)]
pub struct BatchRow {
    pub row_number: usize,
    pub input: AppResult<InputSpec>,
}

impl BatchRow {
    pub fn new(row_number: usize, input: AppResult<InputSpec>) -> Self {
        Self { row_number, input }
    }

    /// Row whose spec has already been range-checked against `limits`.
    pub fn checked(row_number: usize, spec: InputSpec, limits: &InputLimits) -> Self {
        Self::new(row_number, limits.check(&spec).map(|()| spec))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RowSuccess {
    pub row_number: usize,
    pub input: InputSpec,
    /// Unrounded; round with [`AirState::rounded`] for output
    pub state: AirState,
    pub report: SolveReport,
}

#[derive(Debug)]
pub struct RowError {
    pub row_number: usize,
    pub error: AppError,
}

#[derive(Debug, Default)]
pub struct BatchOutcome {
    pub successes: Vec<RowSuccess>,
    pub errors: Vec<RowError>,
    pub rows_total: usize,
    /// Stopped early; only the rows before the cancellation were processed
    pub cancelled: bool,
}

impl BatchOutcome {
    pub fn rows_processed(&self) -> usize {
        self.successes.len() + self.errors.len()
    }

    /// Successes whose solver fell back or did not converge.
    pub fn unreliable(&self) -> impl Iterator<Item = &RowSuccess> {
        self.successes.iter().filter(|s| !s.report.is_reliable())
    }
}

/// Cooperative cancellation shared between a batch and whoever may stop it.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

fn emit_progress(
    progress_cb: &mut Option<&mut dyn FnMut(BatchProgressEvent)>,
    stage: BatchStage,
    rows_done: usize,
    rows_total: usize,
    row_number: Option<usize>,
) {
    if let Some(cb) = progress_cb.as_deref_mut() {
        cb(BatchProgressEvent::new(stage, rows_done, rows_total, row_number));
    }
}

/// Resolve every row in order.
///
/// The cancel flag is checked before each row. Progress events go to
/// `progress_cb` after every row; the fraction reported never decreases and is
/// 1.0 on the final `Completed` event.
pub fn resolve_batch(
    rows: Vec<BatchRow>,
    options: &BatchOptions,
    settings: &SolverSettings,
    mut progress_cb: Option<&mut dyn FnMut(BatchProgressEvent)>,
    cancel: Option<&CancelFlag>,
) -> BatchOutcome {
    let rows_total = rows.len();
    let mut outcome = BatchOutcome {
        rows_total,
        ..BatchOutcome::default()
    };

    info!(rows = rows_total, "batch started");
    emit_progress(&mut progress_cb, BatchStage::Started, 0, rows_total, None);

    for (done, row) in rows.into_iter().enumerate() {
        if cancel.is_some_and(CancelFlag::is_cancelled) {
            outcome.cancelled = true;
            info!(rows_done = done, rows = rows_total, "batch cancelled");
            emit_progress(&mut progress_cb, BatchStage::Cancelled, done, rows_total, None);
            return outcome;
        }

        let row_number = row.row_number;
        let resolved = row
            .input
            .and_then(|spec| compute_air_state(&spec, settings).map_err(AppError::from));

        match resolved {
            Ok(res) => outcome.successes.push(RowSuccess {
                row_number,
                input: res.spec,
                state: res.state,
                report: res.report,
            }),
            Err(error) => {
                warn!(row = row_number, %error, "row failed");
                outcome.errors.push(RowError { row_number, error });
            }
        }

        let rows_done = done + 1;
        emit_progress(
            &mut progress_cb,
            BatchStage::RowCompleted,
            rows_done,
            rows_total,
            Some(row_number),
        );
        if options.yield_stride > 0
            && rows_done % options.yield_stride == 0
            && rows_done < rows_total
        {
            emit_progress(&mut progress_cb, BatchStage::Yield, rows_done, rows_total, None);
        }
    }

    info!(
        succeeded = outcome.successes.len(),
        failed = outcome.errors.len(),
        "batch completed"
    );
    emit_progress(&mut progress_cb, BatchStage::Completed, rows_total, rows_total, None);
    outcome
}

/// Limit-check and resolve one input.
pub fn resolve_single(spec: &InputSpec, settings: &AppSettings) -> AppResult<Resolution> {
    settings.limits.check(spec)?;
    Ok(compute_air_state(spec, &settings.solver)?)
}
