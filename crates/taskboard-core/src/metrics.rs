//! Dashboard aggregates over a task/staff snapshot.
//!
//! All functions are pure; they read the slices they are given and keep
//! no state between calls.

use crate::record::{Staff, Task, TaskStatus};
use serde::Serialize;

/// Share of tasks that are done, rounded down to a whole percent.
/// Zero when there are no tasks.
pub fn completion_rate(tasks: &[Task]) -> u32 {
    let total = tasks.len();
    if total == 0 {
        return 0;
    }
    (done_count(tasks) * 100 / total) as u32
}

/// Number of tasks in the `Done` state.
pub fn done_count(tasks: &[Task]) -> usize {
    tasks
        .iter()
        .filter(|t| t.status == TaskStatus::Done)
        .count()
}

/// Every task that is not done, cancelled ones included.
pub fn pending_count(tasks: &[Task]) -> usize {
    tasks.len() - done_count(tasks)
}

/// One assignee and the number of tasks on their plate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssigneeLoad {
    pub assignee: String,
    pub tasks: usize,
}

/// Task count per assignee, highest first; ties keep first-appearance order.
pub fn workload_by_assignee(tasks: &[Task]) -> Vec<AssigneeLoad> {
    let mut loads: Vec<AssigneeLoad> = Vec::new();
    for task in tasks {
        match loads.iter_mut().find(|l| l.assignee == task.assignee) {
            Some(load) => load.tasks += 1,
            None => loads.push(AssigneeLoad {
                assignee: task.assignee.clone(),
                tasks: 1,
            }),
        }
    }
    // stable sort keeps insertion order among equal counts
    loads.sort_by(|a, b| b.tasks.cmp(&a.tasks));
    loads
}

/// Task count for one status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatusCount {
    pub status: TaskStatus,
    pub tasks: usize,
}

/// Task count per status present in the data, in lifecycle order.
/// Statuses with no tasks are left out.
pub fn status_histogram(tasks: &[Task]) -> Vec<StatusCount> {
    TaskStatus::ALL
        .iter()
        .map(|status| StatusCount {
            status: *status,
            tasks: tasks.iter().filter(|t| t.status == *status).count(),
        })
        .filter(|c| c.tasks > 0)
        .collect()
}

/// Everything the overview page shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DashboardSummary {
    pub total_tasks: usize,
    pub completion_rate: u32,
    pub staff_count: usize,
    pub pending_tasks: usize,
    pub workload: Vec<AssigneeLoad>,
    pub statuses: Vec<StatusCount>,
}

impl DashboardSummary {
    pub fn compute(tasks: &[Task], staff: &[Staff]) -> Self {
        Self {
            total_tasks: tasks.len(),
            completion_rate: completion_rate(tasks),
            staff_count: staff.len(),
            pending_tasks: pending_count(tasks),
            workload: workload_by_assignee(tasks),
            statuses: status_histogram(tasks),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn task(assignee: &str, status: TaskStatus) -> Task {
        let day = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        Task {
            id: "x".to_string(),
            name: "t".to_string(),
            assignee: assignee.to_string(),
            start: day,
            end: day,
            status,
            percent: 0,
        }
    }

    #[test]
    fn test_completion_rate_empty() {
        assert_eq!(completion_rate(&[]), 0);
    }

    #[test]
    fn test_completion_rate_all_done() {
        let tasks = vec![task("a", TaskStatus::Done), task("b", TaskStatus::Done)];
        assert_eq!(completion_rate(&tasks), 100);
    }

    #[test]
    fn test_completion_rate_rounds_down() {
        let tasks = vec![
            task("a", TaskStatus::Done),
            task("a", TaskStatus::Pending),
            task("b", TaskStatus::InProgress),
        ];
        // 33.33...
        assert_eq!(completion_rate(&tasks), 33);

        let tasks = vec![
            task("a", TaskStatus::Done),
            task("a", TaskStatus::Done),
            task("b", TaskStatus::InProgress),
        ];
        // 66.66...
        assert_eq!(completion_rate(&tasks), 66);
    }

    #[test]
    fn test_pending_counts_cancelled() {
        let tasks = vec![
            task("a", TaskStatus::Done),
            task("a", TaskStatus::Cancelled),
            task("b", TaskStatus::Pending),
        ];
        assert_eq!(pending_count(&tasks), 2);
        assert_eq!(pending_count(&tasks) + done_count(&tasks), tasks.len());
    }

    #[test]
    fn test_workload_order_and_sum() {
        let tasks = vec![
            task("Zeynep", TaskStatus::Pending),
            task("Ahmet", TaskStatus::Pending),
            task("Ahmet", TaskStatus::Done),
            task("Can", TaskStatus::Pending),
        ];
        let loads = workload_by_assignee(&tasks);
        let names: Vec<&str> = loads.iter().map(|l| l.assignee.as_str()).collect();
        assert_eq!(names, vec!["Ahmet", "Zeynep", "Can"]);
        assert_eq!(loads.iter().map(|l| l.tasks).sum::<usize>(), tasks.len());
    }

    #[test]
    fn test_status_histogram_omits_absent() {
        let tasks = vec![
            task("a", TaskStatus::Done),
            task("a", TaskStatus::Pending),
            task("b", TaskStatus::Done),
        ];
        let histogram = status_histogram(&tasks);
        assert_eq!(
            histogram,
            vec![
                StatusCount {
                    status: TaskStatus::Pending,
                    tasks: 1
                },
                StatusCount {
                    status: TaskStatus::Done,
                    tasks: 2
                },
            ]
        );
        assert!(status_histogram(&[]).is_empty());
    }

    #[test]
    fn test_dashboard_summary() {
        let tasks = vec![task("a", TaskStatus::Done), task("b", TaskStatus::Pending)];
        let staff = vec![Staff::new("a", "dev", ""), Staff::new("b", "design", "")];
        let summary = DashboardSummary::compute(&tasks, &staff);
        assert_eq!(summary.total_tasks, 2);
        assert_eq!(summary.completion_rate, 50);
        assert_eq!(summary.staff_count, 2);
        assert_eq!(summary.pending_tasks, 1);
        assert_eq!(summary.workload.len(), 2);
    }
}
