//! JSON-file task store for one user.
//!
//! Every mutating operation writes the whole collection back to
//! `<data_dir>/<user>_tasks.json`. A failed write is reported to the caller
//! but the in-memory change is kept, so memory and disk may disagree until
//! the next successful save.

use crate::clock::{system_clock, SharedClock};
use crate::config::Config;
use crate::error::{PlannerError, PlannerResult};
use crate::models::{days_after, Task, TaskStats, TaskStatus, TaskUpdate};
use crate::reminder::Reminder;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Owns the ordered task list of one user.
pub struct TaskStore {
    user: String,
    path: PathBuf,
    tasks: Vec<Task>,
    clock: SharedClock,
    /// Set when the last save failed, cleared by the next successful one.
    unsaved: bool,
}

impl std::fmt::Debug for TaskStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskStore")
            .field("user", &self.user)
            .field("path", &self.path)
            .field("tasks", &self.tasks.len())
            .field("unsaved", &self.unsaved)
            .finish()
    }
}

impl TaskStore {
    /// Load the user's tasks, seeding and saving defaults when no file exists yet.
    pub fn open(config: &Config, user: &str) -> PlannerResult<Self> {
        Self::open_with_clock(config, user, system_clock())
    }

    pub fn open_with_clock(config: &Config, user: &str, clock: SharedClock) -> PlannerResult<Self> {
        let mut store = Self::empty_with_clock(config, user, clock)?;

        if store.path.exists() {
            store.tasks = read_tasks(&store.path)?;
            debug!(path = %store.path.display(), count = store.tasks.len(), "loaded tasks");
        } else if config.store.seed_examples {
            store.tasks = seed_tasks(store.clock.today());
            info!(user = %store.user, "no task file found, seeding example tasks");
            store.save()?;
        }

        Ok(store)
    }

    /// Like [`TaskStore::open`], but a load failure yields an empty store plus
    /// the error instead of failing. The empty store does not write anything
    /// until the next mutation.
    pub fn open_or_empty(config: &Config, user: &str) -> PlannerResult<(Self, Option<PlannerError>)> {
        Self::open_or_empty_with_clock(config, user, system_clock())
    }

    pub fn open_or_empty_with_clock(
        config: &Config,
        user: &str,
        clock: SharedClock,
    ) -> PlannerResult<(Self, Option<PlannerError>)> {
        match Self::open_with_clock(config, user, clock.clone()) {
            Ok(store) => Ok((store, None)),
            Err(e) if e.is_persistence() => Ok((Self::empty_with_clock(config, user, clock)?, Some(e))),
            Err(e) => Err(e),
        }
    }

    fn empty_with_clock(config: &Config, user: &str, clock: SharedClock) -> PlannerResult<Self> {
        validate_user(user)?;
        let path = config.data_dir().join(format!("{user}_tasks.json"));
        Ok(Self {
            user: user.to_string(),
            path,
            tasks: Vec::new(),
            clock,
            unsaved: false,
        })
    }

    /// Re-read the task file, replacing the in-memory list. A missing file
    /// leaves the list untouched.
    ///
    /// Changes whose save failed are written first, so a stale file never
    /// replaces them. If that write fails again the in-memory list is kept
    /// and the save error is returned.
    pub fn reload(&mut self) -> PlannerResult<()> {
        if self.unsaved {
            self.save()?;
            debug!(path = %self.path.display(), "flushed unsaved tasks instead of reloading");
            return Ok(());
        }
        if self.path.exists() {
            self.tasks = read_tasks(&self.path)?;
        }
        Ok(())
    }

    /// Overwrite the task file with the current collection.
    pub fn save(&mut self) -> PlannerResult<()> {
        let result = self.write_file();
        self.unsaved = result.is_err();
        result
    }

    /// True when the in-memory list holds changes that failed to save.
    pub fn has_unsaved_changes(&self) -> bool {
        self.unsaved
    }

    fn write_file(&self) -> PlannerResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| PlannerError::persistence(&self.path, e))?;
        }
        let content = serde_json::to_string_pretty(&self.tasks)
            .map_err(|e| PlannerError::persistence(&self.path, e))?;
        fs::write(&self.path, content).map_err(|e| PlannerError::persistence(&self.path, e))?;
        debug!(path = %self.path.display(), count = self.tasks.len(), "saved tasks");
        Ok(())
    }

    // Queries

    pub fn user(&self) -> &str {
        &self.user
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn get(&self, index: usize) -> PlannerResult<&Task> {
        self.tasks.get(index).ok_or(PlannerError::TaskNotFound(index))
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    pub fn stats(&self) -> TaskStats {
        TaskStats::collect(&self.tasks, self.today())
    }

    // Tasks

    /// Append a placeholder task due tomorrow and return its index.
    pub fn create(&mut self) -> PlannerResult<usize> {
        self.tasks.push(Task::placeholder(self.today()));
        self.save()?;
        Ok(self.tasks.len() - 1)
    }

    pub fn update(&mut self, index: usize, update: TaskUpdate) -> PlannerResult<()> {
        update.apply(self.task_mut(index)?);
        self.save()
    }

    pub fn complete(&mut self, index: usize) -> PlannerResult<()> {
        self.update(index, TaskUpdate::new().status(TaskStatus::Completed))
    }

    pub fn skip(&mut self, index: usize) -> PlannerResult<()> {
        self.update(index, TaskUpdate::new().status(TaskStatus::Skipped))
    }

    pub fn reopen(&mut self, index: usize) -> PlannerResult<()> {
        self.update(index, TaskUpdate::new().status(TaskStatus::Open))
    }

    pub fn delete(&mut self, index: usize) -> PlannerResult<Task> {
        if index >= self.tasks.len() {
            return Err(PlannerError::TaskNotFound(index));
        }
        let task = self.tasks.remove(index);
        self.save()?;
        Ok(task)
    }

    // Lists

    pub fn add_subtask(&mut self, index: usize, text: &str) -> PlannerResult<()> {
        let text = non_blank(text, "subtask")?;
        self.task_mut(index)?.subtasks.push(text);
        self.save()
    }

    /// Add a raw reminder string and re-arm the task's reminder latch.
    pub fn add_notification(&mut self, index: usize, text: &str) -> PlannerResult<()> {
        let text = non_blank(text, "notification")?;
        let task = self.task_mut(index)?;
        task.notifications.push(text);
        task.notification_shown = false;
        self.save()
    }

    pub fn add_reminder(&mut self, index: usize, at: NaiveDateTime, text: &str) -> PlannerResult<()> {
        let text = non_blank(text, "notification")?;
        self.add_notification(index, &Reminder::format(at, &text))
    }

    /// Record a reference to an existing file. The file is not copied.
    pub fn add_attachment(&mut self, index: usize, path: &Path) -> PlannerResult<()> {
        if path.as_os_str().is_empty() {
            return Err(PlannerError::Validation("attachment path is empty".to_string()));
        }
        self.task_mut(index)?;
        let resolved = path.canonicalize().map_err(|e| {
            PlannerError::Validation(format!("cannot attach {}: {e}", path.display()))
        })?;
        self.task_mut(index)?
            .attachments
            .push(resolved.to_string_lossy().into_owned());
        self.save()
    }

    pub fn remove_attachment(&mut self, index: usize, attachment: usize) -> PlannerResult<String> {
        let task = self.task_mut(index)?;
        if attachment >= task.attachments.len() {
            return Err(PlannerError::AttachmentNotFound {
                task: index,
                index: attachment,
            });
        }
        let removed = task.attachments.remove(attachment);
        self.save()?;
        Ok(removed)
    }

    /// Resolve an attachment for opening; fails if the file has since vanished.
    pub fn attachment_path(&self, index: usize, attachment: usize) -> PlannerResult<PathBuf> {
        let path = self
            .get(index)?
            .attachments
            .get(attachment)
            .map(PathBuf::from)
            .ok_or(PlannerError::AttachmentNotFound {
                task: index,
                index: attachment,
            })?;
        if !path.exists() {
            return Err(PlannerError::Validation(format!(
                "attachment file not found: {}",
                path.display()
            )));
        }
        Ok(path)
    }

    /// Set the reminder latch in memory only; the caller decides when to save.
    pub fn mark_notified(&mut self, index: usize) -> PlannerResult<()> {
        self.task_mut(index)?.notification_shown = true;
        Ok(())
    }

    fn task_mut(&mut self, index: usize) -> PlannerResult<&mut Task> {
        self.tasks.get_mut(index).ok_or(PlannerError::TaskNotFound(index))
    }
}

fn read_tasks(path: &Path) -> PlannerResult<Vec<Task>> {
    let content = fs::read_to_string(path).map_err(|e| PlannerError::persistence(path, e))?;
    let mut tasks: Vec<Task> =
        serde_json::from_str(&content).map_err(|e| PlannerError::persistence(path, e))?;
    // A hand-edited file may set both flags; completion wins.
    for task in &mut tasks {
        task.set_status(task.status());
    }
    Ok(tasks)
}

fn validate_user(user: &str) -> PlannerResult<()> {
    let trimmed = user.trim();
    if trimmed.is_empty() {
        return Err(PlannerError::Validation("username is empty".to_string()));
    }
    if trimmed != user || user == "." || user == ".." || user.contains(['/', '\\']) {
        return Err(PlannerError::Validation(format!("invalid username: {user:?}")));
    }
    Ok(())
}

fn non_blank(text: &str, what: &str) -> PlannerResult<String> {
    let text = text.trim();
    if text.is_empty() {
        return Err(PlannerError::Validation(format!("{what} text is empty")));
    }
    Ok(text.to_string())
}

/// Example tasks for a first run.
fn seed_tasks(today: NaiveDate) -> Vec<Task> {
    let mut lab = Task::new("Lab work", "Run the experiments", days_after(today, 3));
    let remind_at = days_after(today, 2).and_time(NaiveTime::from_hms_opt(9, 0, 0).unwrap_or_default());
    lab.notifications.push(Reminder::format(remind_at, "Start two days ahead"));
    lab.subtasks.push("Prepare the equipment".to_string());

    vec![
        lab,
        Task::new("Term paper", "Write chapter 2", days_after(today, 7)),
        Task::new("Exam preparation", "Review the lectures", days_after(today, 14)),
    ]
}
