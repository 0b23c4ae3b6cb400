//! Gantt timeline rows.

use crate::record::{Task, TaskStatus};
use chrono::NaiveDate;
use serde::Serialize;

/// One bar on the project calendar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GanttBar {
    pub id: String,
    pub name: String,
    pub assignee: String,
    pub status: TaskStatus,
    pub start: NaiveDate,
    pub end: NaiveDate,
    /// `end - start` in days; negative spans are kept as stored
    pub days: i64,
}

/// Bars in collection order, first task on top.
pub fn timeline(tasks: &[Task]) -> Vec<GanttBar> {
    tasks
        .iter()
        .map(|t| GanttBar {
            id: t.id.clone(),
            name: t.name.clone(),
            assignee: t.assignee.clone(),
            status: t.status,
            start: t.start,
            end: t.end,
            days: (t.end - t.start).num_days(),
        })
        .collect()
}

/// Earliest start and latest end over all tasks.
pub fn date_range(tasks: &[Task]) -> Option<(NaiveDate, NaiveDate)> {
    let start = tasks.iter().map(|t| t.start).min()?;
    let end = tasks.iter().map(|t| t.end).max()?;
    Some((start, end))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task(name: &str, start: (u32, u32), end: (u32, u32)) -> Task {
        Task {
            id: name.to_lowercase(),
            name: name.to_string(),
            assignee: "Ahmet".to_string(),
            start: NaiveDate::from_ymd_opt(2024, start.0, start.1).unwrap(),
            end: NaiveDate::from_ymd_opt(2024, end.0, end.1).unwrap(),
            status: TaskStatus::InProgress,
            percent: 50,
        }
    }

    #[test]
    fn test_timeline_keeps_order_and_span() {
        let tasks = vec![task("B", (3, 1), (3, 4)), task("A", (2, 27), (3, 2))];
        let bars = timeline(&tasks);
        assert_eq!(bars[0].name, "B");
        assert_eq!(bars[0].days, 3);
        // 2024 is a leap year
        assert_eq!(bars[1].days, 4);
    }

    #[test]
    fn test_empty_timeline() {
        assert!(timeline(&[]).is_empty());
        assert!(date_range(&[]).is_none());
    }

    #[test]
    fn test_date_range() {
        let tasks = vec![task("B", (3, 1), (3, 4)), task("A", (2, 27), (3, 2))];
        let (start, end) = date_range(&tasks).unwrap();
        assert_eq!(start, NaiveDate::from_ymd_opt(2024, 2, 27).unwrap());
        assert_eq!(end, NaiveDate::from_ymd_opt(2024, 3, 4).unwrap());
    }
}
