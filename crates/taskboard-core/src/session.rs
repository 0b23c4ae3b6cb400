//! Request/response handling of user actions.
//!
//! A [`Snapshot`] is the working copy of both collections. Applying an
//! [`Action`] to it is pure and yields the next snapshot plus the collection
//! that changed. [`Board`] adds storage: it reloads, applies, and rewrites
//! only the changed collection. Rows skipped while reloading are written back
//! with it.

use crate::error::{BoardError, Result};
use crate::metrics::DashboardSummary;
use crate::record::{Collection, NewTask, Record, Staff, Task, TaskPatch};
use crate::store::{LoadReport, RecordStore};
use serde::Serialize;
use tracing::{info, warn};

/// A user edit.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    AddTask(NewTask),
    UpdateTask { id: String, patch: TaskPatch },
    RemoveTask(String),
    /// Whole-table edit; tasks missing from the list are deleted and only
    /// new or changed rows are validated
    ReplaceTasks(Vec<Task>),
    AddStaff(Staff),
}

impl Action {
    /// Collection this action writes.
    pub fn collection(&self) -> Collection {
        match self {
            Action::AddStaff(_) => Collection::Staff,
            _ => Collection::Tasks,
        }
    }
}

/// In-memory copy of both collections.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Snapshot {
    pub tasks: Vec<Task>,
    pub staff: Vec<Staff>,
}

impl Snapshot {
    pub fn new(tasks: Vec<Task>, staff: Vec<Staff>) -> Self {
        Self { tasks, staff }
    }

    /// Apply an action, returning the next snapshot and the changed collection.
    pub fn apply(&self, action: Action) -> Result<(Snapshot, Collection)> {
        let collection = action.collection();
        let mut next = self.clone();

        match action {
            Action::AddTask(new_task) => {
                let task = new_task.into_task()?;
                task.validate()?;
                next.tasks.push(task);
            }
            Action::UpdateTask { id, patch } => {
                let task = next
                    .tasks
                    .iter_mut()
                    .find(|t| t.id == id)
                    .ok_or(BoardError::TaskNotFound(id))?;
                task.apply_patch(&patch);
                task.validate()?;
            }
            Action::RemoveTask(id) => {
                let before = next.tasks.len();
                next.tasks.retain(|t| t.id != id);
                if next.tasks.len() == before {
                    return Err(BoardError::TaskNotFound(id));
                }
            }
            Action::ReplaceTasks(tasks) => {
                for task in tasks.iter().filter(|t| !self.tasks.contains(*t)) {
                    task.validate()?;
                }
                next.tasks = tasks;
            }
            Action::AddStaff(staff) => {
                if staff.name.trim().is_empty() {
                    return Err(BoardError::Validation(
                        "staff name must not be empty".to_string(),
                    ));
                }
                next.staff.push(staff);
            }
        }

        Ok((next, collection))
    }

    /// Default assignee for a new task: the first staff member.
    pub fn default_assignee(&self) -> &str {
        self.staff
            .first()
            .map(|s| s.name.as_str())
            .unwrap_or(crate::record::UNASSIGNED)
    }

    /// Tasks whose assignee matches no staff name.
    pub fn unassigned_tasks(&self) -> Vec<&Task> {
        self.tasks
            .iter()
            .filter(|t| !self.staff.iter().any(|s| s.name == t.assignee))
            .collect()
    }

    pub fn summary(&self) -> DashboardSummary {
        DashboardSummary::compute(&self.tasks, &self.staff)
    }
}

/// A snapshot with the reports from loading it.
#[derive(Debug, Clone)]
pub struct Opened {
    pub snapshot: Snapshot,
    pub tasks_report: LoadReport,
    pub staff_report: LoadReport,
}

/// Outcome of a dispatched action.
#[derive(Debug)]
pub struct Dispatched {
    pub snapshot: Snapshot,
    pub changed: Collection,
    /// Load report of the changed collection; its skipped rows were kept
    pub report: LoadReport,
    /// Load outcome of the other collection. On error the snapshot holds
    /// none of its records.
    pub other: Result<LoadReport>,
}

/// Binds snapshots to a record store.
#[derive(Debug, Clone)]
pub struct Board {
    store: RecordStore,
}

impl Board {
    pub fn new(store: RecordStore) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    /// Load both collections from storage.
    pub fn open(&self) -> Result<Opened> {
        let tasks = self.store.load_tasks()?;
        let staff = self.store.load_staff()?;
        Ok(Opened {
            snapshot: Snapshot::new(tasks.records, staff.records),
            tasks_report: tasks.report,
            staff_report: staff.report,
        })
    }

    /// Reload, apply the action and save the changed collection.
    ///
    /// Only the changed collection must load; a failure in the other one is
    /// returned in [`Dispatched::other`]. When the save fails the error is
    /// returned and disk keeps the previous contents.
    pub fn dispatch(&self, action: Action) -> Result<Dispatched> {
        let changed = action.collection();
        let (current, report, other) = match changed {
            Collection::Tasks => {
                let tasks = self.store.load_tasks()?;
                let (staff, other) = self.load_other::<Staff>();
                (Snapshot::new(tasks.records, staff), tasks.report, other)
            }
            Collection::Staff => {
                let staff = self.store.load_staff()?;
                let (tasks, other) = self.load_other::<Task>();
                (Snapshot::new(tasks, staff.records), staff.report, other)
            }
        };

        let (next, _) = current.apply(action)?;

        match changed {
            Collection::Tasks => self.store.save_keeping(&next.tasks, &report.skipped)?,
            Collection::Staff => self.store.save_keeping(&next.staff, &report.skipped)?,
        }

        info!(
            collection = %changed,
            tasks = next.tasks.len(),
            staff = next.staff.len(),
            kept = report.skipped(),
            "Applied action"
        );

        Ok(Dispatched {
            snapshot: next,
            changed,
            report,
            other,
        })
    }

    fn load_other<R: Record>(&self) -> (Vec<R>, Result<LoadReport>) {
        match self.store.load::<R>() {
            Ok(loaded) => (loaded.records, Ok(loaded.report)),
            Err(e) => {
                warn!(collection = %R::COLLECTION, error = %e, "Could not load collection");
                (Vec::new(), Err(e))
            }
        }
    }
}
