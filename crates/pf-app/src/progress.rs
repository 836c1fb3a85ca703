use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BatchStage {
    Started,
    RowCompleted,
    /// Hand-off point for a host scheduler, every `yield_stride` rows
    Yield,
    Cancelled,
    Completed,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchProgressEvent {
    pub stage: BatchStage,
    pub rows_done: usize,
    pub rows_total: usize,
    /// Never decreases over one batch; 1.0 on completion
    pub fraction_complete: f64,
    /// Row the event refers to, for `RowCompleted`
    pub row_number: Option<usize>,
}

impl BatchProgressEvent {
    pub fn new(
        stage: BatchStage,
        rows_done: usize,
        rows_total: usize,
        row_number: Option<usize>,
    ) -> Self {
        let fraction_complete = if rows_total == 0 {
            1.0
        } else {
            rows_done as f64 / rows_total as f64
        };
        Self {
            stage,
            rows_done,
            rows_total,
            fraction_complete,
            row_number,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_batch_is_complete() {
        let e = BatchProgressEvent::new(BatchStage::Completed, 0, 0, None);
        assert_eq!(e.fraction_complete, 1.0);
    }

    #[test]
    fn fraction_tracks_rows() {
        let e = BatchProgressEvent::new(BatchStage::RowCompleted, 1, 4, Some(1));
        assert_eq!(e.fraction_complete, 0.25);
    }
}
