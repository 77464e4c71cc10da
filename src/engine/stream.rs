//! Fact stream driver
//!
//! Streams a fact table exactly once, handing each row to a processor.
//! Row-level faults (malformed rows, processor errors) are logged and skipped;
//! a read failure on the source fails the whole stream.

use crate::error::{AnalyticsError, Result};
use crate::source::{Record, RecordSource};
use serde::Serialize;
use tracing::{debug, error, info, warn};

/// Lifecycle of one pass over a fact table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum StreamState {
    NotStarted,
    Streaming,
    Completed,
    Failed(String),
}

/// What the processor did with a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowOutcome {
    /// Folded into the result.
    Accepted,
    /// Did not resolve or did not match the country filter.
    Excluded,
}

/// Counters for one completed stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StreamReport {
    pub source_id: String,
    pub state: StreamState,
    pub rows_read: usize,
    pub rows_accepted: usize,
    pub rows_excluded: usize,
    pub rows_faulted: usize,
}

impl StreamReport {
    fn new(source_id: &str) -> Self {
        Self {
            source_id: source_id.to_string(),
            state: StreamState::NotStarted,
            rows_read: 0,
            rows_accepted: 0,
            rows_excluded: 0,
            rows_faulted: 0,
        }
    }
}

pub struct FactStream<'a> {
    source: &'a dyn RecordSource,
    report: StreamReport,
}

impl<'a> FactStream<'a> {
    pub fn new(source: &'a dyn RecordSource) -> Self {
        Self {
            report: StreamReport::new(source.source_id()),
            source,
        }
    }

    pub fn state(&self) -> &StreamState {
        &self.report.state
    }

    /// Run `process` over every row. Consumes the stream: each `FactStream` is one pass.
    pub fn run<F>(mut self, mut process: F) -> Result<StreamReport>
    where
        F: FnMut(&Record) -> Result<RowOutcome>,
    {
        self.report.state = StreamState::Streaming;
        debug!("Streaming {} ({})", self.report.source_id, self.source.source_type());

        let source = self.source;
        let rows = match source.open() {
            Ok(rows) => rows,
            Err(e) => return Err(self.fail(e)),
        };

        for (idx, item) in rows.enumerate() {
            self.report.rows_read += 1;
            let outcome = match item {
                Ok(record) => process(&record),
                Err(e) if e.is_row_level() => Err(e),
                Err(e) => return Err(self.fail(e)),
            };

            match outcome {
                Ok(RowOutcome::Accepted) => self.report.rows_accepted += 1,
                Ok(RowOutcome::Excluded) => self.report.rows_excluded += 1,
                Err(e) => {
                    self.report.rows_faulted += 1;
                    warn!("Error processing row {} in {}: {}", idx, self.report.source_id, e);
                }
            }
        }

        self.report.state = StreamState::Completed;
        info!(
            "Finished reading {}, processed {} rows ({} excluded, {} faulted)",
            self.report.source_id,
            self.report.rows_accepted,
            self.report.rows_excluded,
            self.report.rows_faulted
        );
        Ok(self.report)
    }

    fn fail(&mut self, e: AnalyticsError) -> AnalyticsError {
        error!("Error reading {}: {}", self.report.source_id, e);
        self.report.state = StreamState::Failed(e.to_string());
        e
    }
}
