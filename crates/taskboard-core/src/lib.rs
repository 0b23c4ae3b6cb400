//! Taskboard Core Components
//!
//! This crate provides the record store for the task and staff collections,
//! the dashboard metrics computed from them, the production planner and the
//! action layer that ties user edits to storage.

mod config;
mod error;
mod record;

pub mod csv;
pub mod metrics;
pub mod planner;
pub mod session;
pub mod store;
pub mod timeline;

pub use config::{BoardConfig, ProductionConfig};
pub use error::{BoardError, Result};
pub use metrics::DashboardSummary;
pub use planner::{production_bottleneck, ProductionPlan, Stage};
pub use record::{
    generate_task_id, parse_date, Collection, NewTask, Record, Row, Staff, Task, TaskPatch,
    TaskStatus, DATE_FORMAT, UNASSIGNED,
};
pub use session::{Action, Board, Dispatched, Opened, Snapshot};
pub use store::{LoadReport, Loaded, RecordStore, SkippedRow};
