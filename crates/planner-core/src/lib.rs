//! Core of the task planner: a per-user task store and a reminder scheduler.
//!
//! The store keeps one user's tasks in `<user>_tasks.json` and writes the
//! whole list back after every change. The scheduler checks the tasks'
//! reminder strings against the wall clock and fires each task at most once.
//!
//! # Features
//!
//! - **Task Store**: create, edit, complete/skip, delete; subtasks, reminders
//!   and file attachments (stored by reference)
//! - **Reminder Scheduler**: interval ticks, per-task fire latch, malformed
//!   reminders skipped and logged
//! - **Configuration**: TOML config with platform data directories

pub mod clock;
pub mod config;
pub mod error;
pub mod models;
pub mod reminder;
pub mod scheduler;
pub mod store;

// Re-exports
pub use clock::{Clock, FixedClock, SharedClock, SystemClock};
pub use config::{Config, DisplayConfig, SchedulerConfig, StoreConfig};
pub use error::{PersistenceSource, PlannerError, PlannerResult};
pub use models::{Task, TaskStats, TaskStatus, TaskUpdate, PLACEHOLDER_TITLE};
pub use reminder::{Reminder, REMINDER_FORMAT};
pub use scheduler::{ReminderAlert, ReminderScheduler, Tick, TickReport, Ticker};
pub use store::TaskStore;
