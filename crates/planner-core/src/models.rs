//! Data models for the task planner.

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

/// Title given to tasks created with [`crate::TaskStore::create`].
pub const PLACEHOLDER_TITLE: &str = "New Task";

/// Task status derived from the `completed` and `skipped` flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TaskStatus {
    #[default]
    Open,
    Completed,
    Skipped,
}

impl TaskStatus {
    pub fn label(&self) -> &'static str {
        match self {
            TaskStatus::Open => "",
            TaskStatus::Completed => "Completed",
            TaskStatus::Skipped => "Skipped",
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            TaskStatus::Open => "☐",
            TaskStatus::Completed => "☑",
            TaskStatus::Skipped => "☒",
        }
    }

    pub fn is_closed(&self) -> bool {
        !matches!(self, TaskStatus::Open)
    }
}

/// A task.
///
/// Serialized field-for-field into the user's task file. Everything except
/// `title`, `description` and `due_date` may be missing and defaults to
/// empty or `false`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub title: String,
    pub description: String,
    pub due_date: NaiveDate,
    #[serde(default)]
    pub notifications: Vec<String>,
    #[serde(default)]
    pub subtasks: Vec<String>,
    #[serde(default)]
    pub attachments: Vec<String>,
    #[serde(default)]
    completed: bool,
    #[serde(default)]
    skipped: bool,
    /// Set once any reminder on this task has fired.
    #[serde(default)]
    pub notification_shown: bool,
}

impl Task {
    pub fn new(title: &str, description: &str, due_date: NaiveDate) -> Self {
        Self {
            title: title.to_string(),
            description: description.to_string(),
            due_date,
            notifications: Vec::new(),
            subtasks: Vec::new(),
            attachments: Vec::new(),
            completed: false,
            skipped: false,
            notification_shown: false,
        }
    }

    /// The task appended by "new task": due the day after `today`.
    pub fn placeholder(today: NaiveDate) -> Self {
        Self::new(PLACEHOLDER_TITLE, "", days_after(today, 1))
    }

    pub fn status(&self) -> TaskStatus {
        match (self.completed, self.skipped) {
            (true, _) => TaskStatus::Completed,
            (false, true) => TaskStatus::Skipped,
            (false, false) => TaskStatus::Open,
        }
    }

    /// Setting one of completed/skipped always clears the other.
    pub fn set_status(&mut self, status: TaskStatus) {
        self.completed = status == TaskStatus::Completed;
        self.skipped = status == TaskStatus::Skipped;
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }

    pub fn is_skipped(&self) -> bool {
        self.skipped
    }

    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        !self.status().is_closed() && self.due_date < today
    }

    pub fn days_until_due(&self, today: NaiveDate) -> i64 {
        (self.due_date - today).num_days()
    }

    /// Whether the reminder scheduler should still look at this task.
    pub fn awaits_reminder(&self) -> bool {
        !self.notification_shown && !self.status().is_closed()
    }
}

/// Field-level edits applied by [`crate::TaskStore::update`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub due_date: Option<NaiveDate>,
    pub status: Option<TaskStatus>,
}

impl TaskUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn due_date(mut self, due_date: NaiveDate) -> Self {
        self.due_date = Some(due_date);
        self
    }

    pub fn status(mut self, status: TaskStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub(crate) fn apply(self, task: &mut Task) {
        if let Some(title) = self.title {
            task.title = title;
        }
        if let Some(description) = self.description {
            task.description = description;
        }
        if let Some(due_date) = self.due_date {
            task.due_date = due_date;
        }
        if let Some(status) = self.status {
            task.set_status(status);
        }
    }
}

/// Statistics for tasks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskStats {
    pub total: usize,
    pub open: usize,
    pub completed: usize,
    pub skipped: usize,
    pub overdue: usize,
}

impl TaskStats {
    pub fn collect<'a>(tasks: impl IntoIterator<Item = &'a Task>, today: NaiveDate) -> Self {
        let mut stats = Self::default();
        for task in tasks {
            stats.total += 1;
            match task.status() {
                TaskStatus::Open => stats.open += 1,
                TaskStatus::Completed => stats.completed += 1,
                TaskStatus::Skipped => stats.skipped += 1,
            }
            if task.is_overdue(today) {
                stats.overdue += 1;
            }
        }
        stats
    }
}

pub(crate) fn days_after(date: NaiveDate, days: u64) -> NaiveDate {
    date.checked_add_days(Days::new(days)).unwrap_or(date)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_placeholder() {
        let task = Task::placeholder(date(2024, 2, 28));
        assert_eq!(task.title, "New Task");
        assert!(task.description.is_empty());
        assert_eq!(task.due_date, date(2024, 2, 29));
        assert_eq!(task.status(), TaskStatus::Open);
        assert!(!task.notification_shown);
    }

    #[test]
    fn test_status_is_exclusive() {
        let mut task = Task::new("a", "", date(2024, 1, 1));
        task.set_status(TaskStatus::Completed);
        assert!(task.is_completed() && !task.is_skipped());
        task.set_status(TaskStatus::Skipped);
        assert!(task.is_skipped() && !task.is_completed());
        task.set_status(TaskStatus::Open);
        assert!(!task.is_skipped() && !task.is_completed());
    }

    #[test]
    fn test_missing_optional_fields_default() {
        let json = r#"{"title":"t","description":"d","due_date":"2024-05-01"}"#;
        let task: Task = serde_json::from_str(json).unwrap();
        assert_eq!(task, Task::new("t", "d", date(2024, 5, 1)));
    }

    #[test]
    fn test_missing_required_field_fails() {
        let json = r#"{"title":"t","due_date":"2024-05-01"}"#;
        assert!(serde_json::from_str::<Task>(json).is_err());
    }

    #[test]
    fn test_serialized_shape() {
        let mut task = Task::new("t", "d", date(2024, 5, 1));
        task.set_status(TaskStatus::Skipped);
        let value = serde_json::to_value(&task).unwrap();
        assert_eq!(value["due_date"], "2024-05-01");
        assert_eq!(value["skipped"], true);
        assert_eq!(value["completed"], false);
        assert_eq!(value["notification_shown"], false);
        assert!(value["notifications"].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_overdue_ignores_closed_tasks() {
        let today = date(2024, 6, 10);
        let mut task = Task::new("late", "", date(2024, 6, 9));
        assert!(task.is_overdue(today));
        assert_eq!(task.days_until_due(today), -1);
        task.set_status(TaskStatus::Completed);
        assert!(!task.is_overdue(today));
    }

    #[test]
    fn test_stats() {
        let today = date(2024, 6, 10);
        let mut done = Task::new("done", "", today);
        done.set_status(TaskStatus::Completed);
        let late = Task::new("late", "", date(2024, 6, 1));
        let stats = TaskStats::collect([&done, &late], today);
        assert_eq!(stats.total, 2);
        assert_eq!(stats.completed, 1);
        assert_eq!(stats.open, 1);
        assert_eq!(stats.overdue, 1);
    }

    fn status_strategy() -> impl Strategy<Value = TaskStatus> {
        prop_oneof![
            Just(TaskStatus::Open),
            Just(TaskStatus::Completed),
            Just(TaskStatus::Skipped),
        ]
    }

    proptest! {
        #[test]
        fn prop_completed_and_skipped_never_both(statuses in prop::collection::vec(status_strategy(), 0..32)) {
            let mut task = Task::new("p", "", date(2024, 1, 1));
            for status in statuses {
                TaskUpdate::new().status(status).apply(&mut task);
                prop_assert!(!(task.is_completed() && task.is_skipped()));
                prop_assert_eq!(task.status(), status);
            }
        }

        #[test]
        fn prop_json_round_trip(
            title in ".{0,24}",
            description in ".{0,48}",
            offset in 0u64..3650,
            subtasks in prop::collection::vec(".{0,12}", 0..4),
            status in status_strategy(),
            shown in any::<bool>(),
        ) {
            let mut task = Task::new(&title, &description, days_after(date(2000, 1, 1), offset));
            task.subtasks = subtasks;
            task.set_status(status);
            task.notification_shown = shown;
            let json = serde_json::to_string(&vec![task.clone()]).unwrap();
            let back: Vec<Task> = serde_json::from_str(&json).unwrap();
            prop_assert_eq!(back, vec![task]);
        }
    }
}
