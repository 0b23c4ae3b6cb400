//! Persistence layer for the task and staff collections.
//!
//! Each collection lives in its own comma-separated file with a header row.
//! Saves rewrite the whole file. There is no locking: two processes saving
//! the same collection race and the last writer wins.

mod report;

pub use report::{LoadReport, Loaded, SkippedRow};

use crate::config::BoardConfig;
use crate::csv;
use crate::error::{BoardError, Result};
use crate::record::{Collection, Record, Row, Staff, Task};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Reads and writes collection files.
#[derive(Debug, Clone)]
pub struct RecordStore {
    tasks_path: PathBuf,
    staff_path: PathBuf,
}

impl RecordStore {
    /// Create a store over explicit file paths.
    pub fn new(tasks_path: PathBuf, staff_path: PathBuf) -> Self {
        Self {
            tasks_path,
            staff_path,
        }
    }

    /// Create a store using the configured data directory and file names.
    pub fn from_config(config: &BoardConfig) -> Self {
        Self::new(config.tasks_path(), config.staff_path())
    }

    /// Backing file of a collection.
    pub fn path_for(&self, collection: Collection) -> &Path {
        match collection {
            Collection::Tasks => &self.tasks_path,
            Collection::Staff => &self.staff_path,
        }
    }

    pub fn load_tasks(&self) -> Result<Loaded<Task>> {
        self.load()
    }

    pub fn load_staff(&self) -> Result<Loaded<Staff>> {
        self.load()
    }

    /// Load a collection, creating its file with seed records on first use.
    ///
    /// A failed initial write is logged and reported, never returned as an
    /// error. Rows that cannot be parsed are skipped and listed in the report.
    pub fn load<R: Record>(&self) -> Result<Loaded<R>> {
        let collection = R::COLLECTION;
        let path = self.path_for(collection);
        let mut report = LoadReport::new(collection);

        if !path.exists() {
            let records = R::seed();
            report.initialized = true;
            report.rows_read = records.len();

            let rows: Vec<Vec<String>> = records.iter().map(|r| r.to_row()).collect();
            if let Err(e) = write_rows::<R>(path, &rows) {
                warn!(
                    collection = %collection,
                    path = ?path,
                    error = %e,
                    "Could not initialize collection file, using in-memory defaults"
                );
                report.persisted = false;
            } else {
                info!(
                    collection = %collection,
                    path = ?path,
                    seeded = records.len(),
                    "Initialized collection file"
                );
            }

            return Ok(Loaded { records, report });
        }

        let content = std::fs::read_to_string(path)?;
        let mut lines = csv::parse(&content).into_iter();

        let Some(header) = lines.next() else {
            warn!(collection = %collection, path = ?path, "Collection file is empty");
            return Ok(Loaded {
                records: Vec::new(),
                report,
            });
        };
        check_header::<R>(path, &header.fields)?;

        let mut records = Vec::new();
        for line in lines {
            match parse_line::<R>(&header.fields, &line) {
                Ok(record) => records.push(record),
                Err(reason) => {
                    warn!(
                        collection = %collection,
                        line = line.line,
                        reason = %reason,
                        "Skipping malformed row"
                    );
                    report.skipped.push(SkippedRow {
                        line: line.line,
                        reason,
                        raw: raw_cells::<R>(&header.fields, &line.fields),
                    });
                }
            }
        }
        report.rows_read = records.len();

        debug!(
            collection = %collection,
            rows = report.rows_read,
            skipped = report.skipped(),
            "Loaded collection"
        );

        Ok(Loaded { records, report })
    }

    /// Overwrite a collection file with the given records.
    pub fn save<R: Record>(&self, records: &[R]) -> Result<()> {
        self.save_keeping(records, &[])
    }

    /// Overwrite a collection file, appending rows that were skipped at load.
    ///
    /// Skipped rows keep their cells as read, so a save never drops data the
    /// store could not parse.
    pub fn save_keeping<R: Record>(&self, records: &[R], skipped: &[SkippedRow]) -> Result<()> {
        let collection = R::COLLECTION;
        let path = self.path_for(collection);
        let mut rows: Vec<Vec<String>> = records.iter().map(|r| r.to_row()).collect();
        rows.extend(skipped.iter().map(|s| s.raw.clone()));
        write_rows::<R>(path, &rows)?;
        debug!(
            collection = %collection,
            rows = records.len(),
            kept = skipped.len(),
            "Saved collection"
        );
        Ok(())
    }
}

fn write_rows<R: Record>(path: &Path, rows: &[Vec<String>]) -> Result<()> {
    let content = csv::write_table(R::COLUMNS, rows);

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    std::fs::write(path, content)?;
    Ok(())
}

/// Cells of a skipped row, reordered to the collection's columns when the
/// row fits the header and kept verbatim otherwise.
fn raw_cells<R: Record>(header: &[String], fields: &[String]) -> Vec<String> {
    if fields.len() > header.len() {
        return fields.to_vec();
    }
    let row = Row::new(header, fields);
    R::COLUMNS
        .iter()
        .map(|column| row.get(column).to_string())
        .collect()
}

fn check_header<R: Record>(path: &Path, header: &[String]) -> Result<()> {
    let missing: Vec<&str> = R::COLUMNS
        .iter()
        .copied()
        .filter(|column| !header.iter().any(|h| h.trim() == *column))
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(BoardError::Schema {
            path: path.to_path_buf(),
            message: format!("missing column(s) {}", missing.join(", ")),
        })
    }
}

fn parse_line<R: Record>(
    header: &[String],
    line: &csv::CsvRecord,
) -> std::result::Result<R, String> {
    if !line.terminated {
        return Err("unterminated quoted field".to_string());
    }
    if line.fields.len() > header.len() {
        return Err(format!(
            "expected at most {} fields, found {}",
            header.len(),
            line.fields.len()
        ));
    }
    R::from_row(&Row::new(header, &line.fields)).map_err(|e| e.to_string())
}
