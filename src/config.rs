//! Service configuration and input-file catalog.

use crate::error::{AnalyticsError, Result};
use crate::schema::{DimensionKind, FactKind};
use crate::source::CsvSource;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_DATA_DIR: &str = "csv";
pub const DEFAULT_COUNTRY: &str = "United Kingdom";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub data_dir: PathBuf,
    /// Only facts resolving to this country are aggregated.
    pub filter_country: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            filter_country: DEFAULT_COUNTRY.to_string(),
        }
    }
}

impl AppConfig {
    /// Read `PORT`, `BIND_HOST`, `DATA_DIR` and `FILTER_COUNTRY`, falling back to defaults.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let port = match lookup("PORT").filter(|v| !v.trim().is_empty()) {
            Some(raw) => raw.trim().parse::<u16>().map_err(|e| {
                AnalyticsError::Config(format!("Invalid PORT value '{}': {}", raw, e))
            })?,
            None => defaults.port,
        };

        Ok(Self {
            host: lookup("BIND_HOST").unwrap_or(defaults.host),
            port,
            data_dir: lookup("DATA_DIR").map(PathBuf::from).unwrap_or(defaults.data_dir),
            filter_country: lookup("FILTER_COUNTRY").unwrap_or(defaults.filter_country),
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn catalog(&self) -> DataCatalog {
        DataCatalog::new(&self.data_dir)
    }
}

/// Locates the dimension and fact files inside the data directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataCatalog {
    data_dir: PathBuf,
}

impl DataCatalog {
    pub fn new(data_dir: impl AsRef<Path>) -> Self {
        Self {
            data_dir: data_dir.as_ref().to_path_buf(),
        }
    }

    pub fn dimension_path(&self, kind: DimensionKind) -> PathBuf {
        self.data_dir.join(kind.file_name())
    }

    pub fn fact_path(&self, kind: FactKind) -> PathBuf {
        self.data_dir.join(kind.file_name())
    }

    pub fn dimension_source(&self, kind: DimensionKind) -> CsvSource {
        CsvSource::from_path(self.dimension_path(kind))
    }

    pub fn fact_source(&self, kind: FactKind) -> CsvSource {
        CsvSource::from_path(self.fact_path(kind))
    }
}
