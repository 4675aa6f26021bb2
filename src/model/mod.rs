use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A persisted task. `id` and `created_at` are assigned by the store and
/// immutable afterwards; `text` changes via edit, `completed` via toggle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: i64,
    pub text: String,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
}

/// Counts derived from the current task list, shown in the counters panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskCounts {
    pub total: usize,
    pub pending: usize,
    pub completed: usize,
}

impl TaskCounts {
    pub fn of(tasks: &[Task]) -> Self {
        let total = tasks.len();
        let completed = tasks.iter().filter(|t| t.completed).count();
        TaskCounts {
            total,
            pending: total - completed,
            completed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    fn task(id: i64, completed: bool) -> Task {
        Task {
            id,
            text: format!("task {}", id),
            completed,
            created_at: Utc.with_ymd_and_hms(2026, 8, 1, 12, 0, 0).unwrap(),
        }
    }

    #[test]
    fn counts_partition_by_completed() {
        let tasks = vec![task(1, false), task(2, true), task(3, false)];
        let counts = TaskCounts::of(&tasks);
        assert_eq!(counts.total, 3);
        assert_eq!(counts.pending, 2);
        assert_eq!(counts.completed, 1);
    }

    #[test]
    fn counts_of_empty_list() {
        let counts = TaskCounts::of(&[]);
        assert_eq!(counts.total, 0);
        assert_eq!(counts.pending, 0);
        assert_eq!(counts.completed, 0);
    }

    #[test]
    fn task_serializes_to_wire_shape() {
        let t = task(7, false);
        let json = serde_json::to_value(&t).unwrap();
        assert_eq!(json["id"], 7);
        assert_eq!(json["text"], "task 7");
        assert_eq!(json["completed"], false);
        assert!(json["created_at"].as_str().unwrap().starts_with("2026-08-01T12:00:00"));
    }
}
