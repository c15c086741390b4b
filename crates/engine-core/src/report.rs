use crate::{key::StorageKey, state::RunState};
use model::core::run_date::RunDate;
use serde::Serialize;

/// Summary of a finished run.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub run_date: RunDate,
    pub batch_size: usize,
    pub state: RunState,
    pub fetch_calls: usize,
    pub pages_written: usize,
    pub records_written: usize,
    pub bytes_written: usize,
    /// Records written positionally under a header they did not match.
    pub drifted_records: usize,
    pub keys: Vec<StorageKey>,
    pub took_ms: u128,
}

impl RunReport {
    pub fn new(run_date: RunDate, batch_size: usize) -> Self {
        RunReport {
            run_date,
            batch_size,
            state: RunState::Start,
            fetch_calls: 0,
            pages_written: 0,
            records_written: 0,
            bytes_written: 0,
            drifted_records: 0,
            keys: Vec::new(),
            took_ms: 0,
        }
    }
}
