//! Outcome of loading one collection.

use crate::record::Collection;
use serde::Serialize;

/// A data row that could not be turned into a record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedRow {
    /// 1-based line in the file
    pub line: usize,
    pub reason: String,
    /// Cell values as read, in collection column order when the row fits
    /// the header; written back unchanged on the next save.
    pub raw: Vec<String>,
}

/// What happened while loading a collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoadReport {
    pub collection: Collection,
    /// The backing file did not exist and defaults were used
    pub initialized: bool,
    /// The backing file exists on disk after the load
    pub persisted: bool,
    /// Data rows accepted
    pub rows_read: usize,
    /// Data rows quarantined
    pub skipped: Vec<SkippedRow>,
}

impl LoadReport {
    pub(crate) fn new(collection: Collection) -> Self {
        Self {
            collection,
            initialized: false,
            persisted: true,
            rows_read: 0,
            skipped: Vec::new(),
        }
    }

    /// Number of quarantined rows.
    pub fn skipped(&self) -> usize {
        self.skipped.len()
    }

    /// True when every row loaded and the file is on disk.
    pub fn is_clean(&self) -> bool {
        self.persisted && self.skipped.is_empty()
    }
}

/// Records of one collection plus the load report.
#[derive(Debug, Clone)]
pub struct Loaded<R> {
    pub records: Vec<R>,
    pub report: LoadReport,
}
