//! Dimension Cache
//!
//! Loads the six dimension tables fully into memory once, before any query is
//! served. The cache is never mutated afterwards, so it is shared read-only
//! (behind an `Arc`) by every concurrent query.

use crate::error::{AnalyticsError, Result};
use crate::schema::DimensionKind;
use crate::source::{Record, RecordSource};
use tracing::info;

/// A dimension table: records in file order.
#[derive(Debug, Clone)]
pub struct DimensionTable {
    kind: DimensionKind,
    records: Vec<Record>,
}

impl DimensionTable {
    pub fn new(kind: DimensionKind, records: Vec<Record>) -> Self {
        Self { kind, records }
    }

    /// Read every row of `source`. Any malformed row or read failure fails the whole table.
    pub fn load(kind: DimensionKind, source: &dyn RecordSource) -> Result<Self> {
        let to_load_error = |e: AnalyticsError| AnalyticsError::DimensionLoad {
            table: kind.file_name().to_string(),
            message: e.to_string(),
        };

        let records = source
            .open()
            .map_err(to_load_error)?
            .collect::<Result<Vec<_>>>()
            .map_err(to_load_error)?;

        info!("Loaded {} ({} rows) from {}", kind, records.len(), source.source_id());
        Ok(Self { kind, records })
    }

    pub fn kind(&self) -> DimensionKind {
        self.kind
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Read-only cache of all six dimension tables.
#[derive(Debug, Clone)]
pub struct DimensionCache {
    tables: [DimensionTable; 6],
}

impl DimensionCache {
    /// Load all dimension tables. There is no partial-success mode: the first
    /// table that cannot be read aborts the load.
    pub fn load<F, S>(mut source_for: F) -> Result<Self>
    where
        F: FnMut(DimensionKind) -> S,
        S: RecordSource,
    {
        info!("Loading dimension tables...");
        let mut loaded = Vec::with_capacity(DimensionKind::ALL.len());
        for kind in DimensionKind::ALL {
            let source = source_for(kind);
            loaded.push(DimensionTable::load(kind, &source)?);
        }
        let cache = Self::from_tables(loaded)?;
        info!("Dimension tables loaded into memory");
        Ok(cache)
    }

    /// Assemble a cache from already-built tables; every kind must appear exactly once.
    pub fn from_tables(tables: Vec<DimensionTable>) -> Result<Self> {
        let mut slots: [Option<DimensionTable>; 6] = Default::default();
        for table in tables {
            let slot = &mut slots[table.kind.slot()];
            if slot.is_some() {
                return Err(AnalyticsError::DimensionLoad {
                    table: table.kind.file_name().to_string(),
                    message: "table supplied more than once".to_string(),
                });
            }
            *slot = Some(table);
        }

        let mut missing = Vec::new();
        for kind in DimensionKind::ALL {
            if slots[kind.slot()].is_none() {
                missing.push(kind.file_name());
            }
        }
        if !missing.is_empty() {
            return Err(AnalyticsError::DimensionLoad {
                table: missing.join(", "),
                message: "table not supplied".to_string(),
            });
        }

        let ordered: Vec<DimensionTable> = slots.into_iter().flatten().collect();
        let tables: [DimensionTable; 6] =
            ordered
                .try_into()
                .map_err(|_| AnalyticsError::DimensionLoad {
                    table: "dimension cache".to_string(),
                    message: "unexpected table count".to_string(),
                })?;
        Ok(Self { tables })
    }

    pub fn table(&self, kind: DimensionKind) -> &DimensionTable {
        &self.tables[kind.slot()]
    }

    pub fn records(&self, kind: DimensionKind) -> &[Record] {
        self.table(kind).records()
    }
}
