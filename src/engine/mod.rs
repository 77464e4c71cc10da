//! Join-Filter-Aggregate Engine
//!
//! - `stream`: single-pass fact streaming with row-level fault isolation
//! - `aggregate`: insertion-ordered grouping accumulators
//! - `pipeline`: the two-phase weather/sales join shared by every view

pub mod aggregate;
pub mod pipeline;
pub mod stream;

pub use aggregate::{GroupedAccumulator, RowCount, SalesTotal, TransactionTotals};
pub use pipeline::{FactSources, JoinPipeline, View, ViewResult};
pub use stream::{FactStream, RowOutcome, StreamReport, StreamState};
