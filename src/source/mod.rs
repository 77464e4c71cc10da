//! Record Source - Abstract interface for tabular inputs
//!
//! A source yields a fresh, lazy sequence of records on every `open` call,
//! so the same fact table can be streamed once per query.

pub mod csv_source;

pub use csv_source::CsvSource;

use crate::error::Result;
use std::collections::HashMap;

/// One parsed row: header name -> raw string value.
pub type Record = HashMap<String, String>;

/// Lazy sequence of records produced by one `open` call.
pub type RecordStream<'a> = Box<dyn Iterator<Item = Result<Record>> + Send + 'a>;

/// Record Source Trait
///
/// Implementations:
/// - CsvSource: delimited file on disk or CSV text held in memory
pub trait RecordSource: Send + Sync {
    /// Start a new pass over the source.
    fn open(&self) -> Result<RecordStream<'_>>;

    /// Get source ID (file path or label, used in logs)
    fn source_id(&self) -> &str;

    /// Get source type (e.g., "csv-file", "csv-text")
    fn source_type(&self) -> &str;
}

/// Field value or "" when the column is absent.
pub fn field<'a>(record: &'a Record, column: &str) -> &'a str {
    record.get(column).map(String::as_str).unwrap_or("")
}
