use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalyticsError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to load dimension table {table}: {message}")]
    DimensionLoad { table: String, message: String },

    #[error("Stream error in {source_id}: {message}")]
    Stream { source_id: String, message: String },

    #[error("Malformed row {row} in {source_id}: {message}")]
    MalformedRow {
        source_id: String,
        row: usize,
        message: String,
    },

    #[error("Row fault: {0}")]
    RowFault(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl AnalyticsError {
    /// Row-level errors are skipped by the streaming driver; everything else aborts the stream.
    pub fn is_row_level(&self) -> bool {
        matches!(self, AnalyticsError::MalformedRow { .. } | AnalyticsError::RowFault(_))
    }
}

pub type Result<T> = std::result::Result<T, AnalyticsError>;
