//! CSV Source - Streams delimited files (or in-memory CSV text) as records

use crate::error::{AnalyticsError, Result};
use crate::source::{Record, RecordSource, RecordStream};
use csv::{ReaderBuilder, StringRecord};
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

enum Origin {
    File(PathBuf),
    Text(String),
}

/// CSV Source - Wraps a CSV file path or CSV text and yields one record per data row.
pub struct CsvSource {
    source_id: String,
    origin: Origin,
}

impl CsvSource {
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        Self {
            source_id: path.display().to_string(),
            origin: Origin::File(path),
        }
    }

    pub fn from_text(source_id: impl Into<String>, csv_text: impl Into<String>) -> Self {
        Self {
            source_id: source_id.into(),
            origin: Origin::Text(csv_text.into()),
        }
    }

    fn stream<'a, R: Read + Send + 'a>(&'a self, reader: R) -> Result<RecordStream<'a>> {
        let mut rdr = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let headers = rdr
            .headers()
            .map_err(|e| self.stream_error(&e))?
            .iter()
            .map(|h| h.trim_start_matches('\u{feff}').trim().to_string())
            .collect::<Vec<_>>();

        let source_id = self.source_id.as_str();
        let rows = rdr.into_records().enumerate().map(move |(idx, result)| {
            match result {
                Ok(row) => Ok(to_record(&headers, &row)),
                Err(e) if e.is_io_error() => Err(AnalyticsError::Stream {
                    source_id: source_id.to_string(),
                    message: e.to_string(),
                }),
                Err(e) => Err(AnalyticsError::MalformedRow {
                    source_id: source_id.to_string(),
                    row: idx,
                    message: e.to_string(),
                }),
            }
        });

        Ok(Box::new(rows))
    }

    fn stream_error(&self, e: &csv::Error) -> AnalyticsError {
        AnalyticsError::Stream {
            source_id: self.source_id.clone(),
            message: format!("Failed to read CSV headers: {}", e),
        }
    }
}

fn to_record(headers: &[String], row: &StringRecord) -> Record {
    headers
        .iter()
        .zip(row.iter())
        .map(|(h, v)| (h.clone(), v.to_string()))
        .collect()
}

impl RecordSource for CsvSource {
    fn open(&self) -> Result<RecordStream<'_>> {
        match &self.origin {
            Origin::File(path) => {
                let file = File::open(path).map_err(|e| AnalyticsError::Stream {
                    source_id: self.source_id.clone(),
                    message: format!("Failed to open {}: {}", path.display(), e),
                })?;
                self.stream(file)
            }
            Origin::Text(text) => self.stream(text.as_bytes()),
        }
    }

    fn source_id(&self) -> &str {
        &self.source_id
    }

    fn source_type(&self) -> &str {
        match self.origin {
            Origin::File(_) => "csv-file",
            Origin::Text(_) => "csv-text",
        }
    }
}
