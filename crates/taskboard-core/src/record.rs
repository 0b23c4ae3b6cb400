//! Task and staff records and their tabular schema.

use crate::error::{BoardError, Result};
use chrono::{Duration, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Date format written to collection files.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Assignee used when a task is created with no staff on record.
pub const UNASSIGNED: &str = "Tanımsız";

/// The two persisted collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Collection {
    Tasks,
    Staff,
}

impl Collection {
    pub fn name(&self) -> &'static str {
        match self {
            Collection::Tasks => "tasks",
            Collection::Staff => "staff",
        }
    }

    /// The collection that is not `self`.
    pub fn other(&self) -> Collection {
        match self {
            Collection::Tasks => Collection::Staff,
            Collection::Staff => Collection::Tasks,
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Lifecycle state of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Pending,
    InProgress,
    Done,
    Cancelled,
}

impl TaskStatus {
    pub const ALL: [TaskStatus; 4] = [
        TaskStatus::Pending,
        TaskStatus::InProgress,
        TaskStatus::Done,
        TaskStatus::Cancelled,
    ];

    /// Label stored in the `Durum` column.
    pub fn label(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "Bekliyor",
            TaskStatus::InProgress => "Devam Ediyor",
            TaskStatus::Done => "Tamamlandı",
            TaskStatus::Cancelled => "İptal",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for TaskStatus {
    type Err = BoardError;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        if let Some(status) = Self::ALL.iter().find(|st| st.label() == trimmed) {
            return Ok(*status);
        }

        let normalized: String = trimmed
            .chars()
            .filter(|c| c.is_alphanumeric())
            .collect::<String>()
            .to_lowercase();
        match normalized.as_str() {
            "pending" => Ok(TaskStatus::Pending),
            "inprogress" => Ok(TaskStatus::InProgress),
            "done" => Ok(TaskStatus::Done),
            "cancelled" | "canceled" => Ok(TaskStatus::Cancelled),
            _ => Err(BoardError::InvalidValue {
                column: "Durum",
                value: s.to_string(),
            }),
        }
    }
}

/// A tracked unit of work.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Opaque identifier
    pub id: String,
    pub name: String,
    /// Staff name, matched by value
    pub assignee: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub status: TaskStatus,
    /// Completion percentage, 0-100
    pub percent: u8,
}

impl Task {
    /// Check the invariants a stored task must satisfy.
    pub fn validate(&self) -> Result<()> {
        if self.end < self.start {
            return Err(BoardError::Validation(format!(
                "task {} ends ({}) before it starts ({})",
                self.id, self.end, self.start
            )));
        }
        if self.percent > 100 {
            return Err(BoardError::Validation(format!(
                "task {} has percent {} outside 0-100",
                self.id, self.percent
            )));
        }
        Ok(())
    }

    /// Apply a partial edit in place.
    pub fn apply_patch(&mut self, patch: &TaskPatch) {
        if let Some(name) = &patch.name {
            self.name = name.clone();
        }
        if let Some(assignee) = &patch.assignee {
            self.assignee = assignee.clone();
        }
        if let Some(start) = patch.start {
            self.start = start;
        }
        if let Some(end) = patch.end {
            self.end = end;
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(percent) = patch.percent {
            self.percent = percent;
        }
    }
}

/// Partial edit of a task, as produced by a table edit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskPatch {
    pub name: Option<String>,
    pub assignee: Option<String>,
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    pub status: Option<TaskStatus>,
    pub percent: Option<u8>,
}

impl TaskPatch {
    pub fn is_empty(&self) -> bool {
        *self == TaskPatch::default()
    }
}

/// Form input for a new task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTask {
    pub name: String,
    pub assignee: String,
    pub start: NaiveDate,
    /// Length in days, at least 1
    pub duration_days: u32,
}

impl NewTask {
    /// Build the stored task with a fresh id, `Pending` and 0%.
    pub fn into_task(self) -> Result<Task> {
        if self.duration_days == 0 {
            return Err(BoardError::Validation(
                "task duration must be at least one day".to_string(),
            ));
        }
        let end = self
            .start
            .checked_add_signed(Duration::days(i64::from(self.duration_days)))
            .ok_or_else(|| BoardError::Validation("task end date out of range".to_string()))?;

        Ok(Task {
            id: generate_task_id(),
            name: self.name,
            assignee: self.assignee,
            start: self.start,
            end,
            status: TaskStatus::Pending,
            percent: 0,
        })
    }
}

/// Short random identifier for new tasks.
pub fn generate_task_id() -> String {
    let id = uuid::Uuid::new_v4().simple().to_string();
    id[..8].to_string()
}

/// A staff member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Staff {
    pub name: String,
    pub role: String,
    /// Free text
    pub skills: String,
}

impl Staff {
    pub fn new(name: impl Into<String>, role: impl Into<String>, skills: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            role: role.into(),
            skills: skills.into(),
        }
    }
}

/// Field access for one data row, addressed by header name.
pub struct Row<'a> {
    header: &'a [String],
    fields: &'a [String],
}

impl<'a> Row<'a> {
    pub fn new(header: &'a [String], fields: &'a [String]) -> Self {
        Self { header, fields }
    }

    /// Value of a column; short rows read as empty.
    pub fn get(&self, column: &str) -> &'a str {
        self.header
            .iter()
            .position(|h| h.trim() == column)
            .and_then(|idx| self.fields.get(idx))
            .map(String::as_str)
            .unwrap_or("")
    }
}

/// A record type persisted as one collection file.
pub trait Record: Sized {
    const COLLECTION: Collection;
    const COLUMNS: &'static [&'static str];

    fn to_row(&self) -> Vec<String>;

    fn from_row(row: &Row<'_>) -> Result<Self>;

    /// Records written when the collection file is first created.
    fn seed() -> Vec<Self> {
        Vec::new()
    }
}

impl Record for Task {
    const COLLECTION: Collection = Collection::Tasks;
    const COLUMNS: &'static [&'static str] = &[
        "ID",
        "GorevAdi",
        "Kisi",
        "Baslangic",
        "Bitis",
        "Durum",
        "Yuzde",
    ];

    fn to_row(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.name.clone(),
            self.assignee.clone(),
            self.start.format(DATE_FORMAT).to_string(),
            self.end.format(DATE_FORMAT).to_string(),
            self.status.label().to_string(),
            self.percent.to_string(),
        ]
    }

    fn from_row(row: &Row<'_>) -> Result<Self> {
        let status = match row.get("Durum").trim() {
            "" => TaskStatus::Pending,
            value => value.parse()?,
        };

        Ok(Task {
            id: row.get("ID").to_string(),
            name: row.get("GorevAdi").to_string(),
            assignee: row.get("Kisi").to_string(),
            start: parse_date("Baslangic", row.get("Baslangic"))?,
            end: parse_date("Bitis", row.get("Bitis"))?,
            status,
            percent: parse_percent(row.get("Yuzde"))?,
        })
    }
}

impl Record for Staff {
    const COLLECTION: Collection = Collection::Staff;
    const COLUMNS: &'static [&'static str] = &["Isim", "Rol", "Yetenekler"];

    fn to_row(&self) -> Vec<String> {
        vec![self.name.clone(), self.role.clone(), self.skills.clone()]
    }

    fn from_row(row: &Row<'_>) -> Result<Self> {
        Ok(Staff::new(row.get("Isim"), row.get("Rol"), row.get("Yetenekler")))
    }

    fn seed() -> Vec<Self> {
        vec![
            Staff::new("Ahmet Yılmaz", "Geliştirici", "Python"),
            Staff::new("Zeynep Kaya", "Tasarımcı", "UI/UX"),
        ]
    }
}

/// Parse a stored date; a time-of-day suffix is accepted and dropped.
pub fn parse_date(column: &'static str, value: &str) -> Result<NaiveDate> {
    let trimmed = value.trim();
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, DATE_FORMAT) {
        return Ok(date);
    }
    for format in [
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M:%S%.f",
    ] {
        if let Ok(datetime) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Ok(datetime.date());
        }
    }
    Err(BoardError::InvalidValue {
        column,
        value: value.to_string(),
    })
}

fn parse_percent(value: &str) -> Result<u8> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(0);
    }
    let invalid = || BoardError::InvalidValue {
        column: "Yuzde",
        value: value.to_string(),
    };

    let number: f64 = trimmed.parse().map_err(|_| invalid())?;
    if !number.is_finite() || number.fract() != 0.0 || !(0.0..=100.0).contains(&number) {
        return Err(invalid());
    }
    Ok(number as u8)
}
