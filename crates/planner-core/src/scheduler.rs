//! Reminder scheduler.
//!
//! The check itself is synchronous and runs on whoever owns the
//! [`TaskStore`]. The timer is a separate tokio task ([`Ticker`]) that only
//! sends [`Tick`] messages, so the store keeps a single mutator.
//!
//! Firing is latched per task: once any reminder of a task fires, the task's
//! `notification_shown` flag is set and none of its other reminders are
//! evaluated until a new notification re-arms it.

use crate::clock::{system_clock, SharedClock};
use crate::error::PlannerError;
use crate::reminder::{Reminder, REMINDER_FORMAT};
use crate::store::TaskStore;
use chrono::{NaiveDate, NaiveDateTime};
use std::fmt;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// A reminder that fired during a check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReminderAlert {
    pub task_index: usize,
    pub title: String,
    pub due_date: NaiveDate,
    /// The stored reminder string that fired.
    pub reminder: String,
    /// Parsed time of the reminder.
    pub at: NaiveDateTime,
}

impl fmt::Display for ReminderAlert {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Task: {}", self.title)?;
        writeln!(f, "Due: {}", self.due_date.format("%d.%m.%Y"))?;
        write!(f, "Reminder: {}", self.reminder)
    }
}

/// Outcome of one scheduler check.
#[derive(Debug, Default)]
pub struct TickReport {
    pub checked_at: Option<NaiveDateTime>,
    pub fired: Vec<ReminderAlert>,
    /// Reminder strings that could not be parsed, as `(task, reminder)` positions.
    pub skipped: Vec<(usize, usize)>,
    /// Set when saving the fired flags failed. The flags stay set in memory.
    pub save_error: Option<PlannerError>,
}

impl TickReport {
    pub fn has_fired(&self) -> bool {
        !self.fired.is_empty()
    }
}

/// Evaluates reminders against the clock.
pub struct ReminderScheduler {
    clock: SharedClock,
    ticks: u64,
}

impl Default for ReminderScheduler {
    fn default() -> Self {
        Self::new(system_clock())
    }
}

impl ReminderScheduler {
    pub fn new(clock: SharedClock) -> Self {
        Self { clock, ticks: 0 }
    }

    /// Number of checks run so far.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Run one check over every task in the store.
    pub fn check(&mut self, store: &mut TaskStore) -> TickReport {
        let now = self.clock.now();
        self.ticks += 1;

        let mut report = TickReport {
            checked_at: Some(now),
            ..TickReport::default()
        };

        let due = scan(store, now, &mut report.skipped);
        for alert in due {
            if let Err(e) = store.mark_notified(alert.task_index) {
                warn!("cannot latch reminder: {e}");
                continue;
            }
            info!(task = %alert.title, at = %alert.at.format(REMINDER_FORMAT), "reminder fired");
            report.fired.push(alert);
        }

        if report.has_fired() {
            if let Err(e) = store.save() {
                warn!("cannot persist fired reminders: {e}");
                report.save_error = Some(e);
            }
        }

        debug!(
            tick = self.ticks,
            fired = report.fired.len(),
            skipped = report.skipped.len(),
            "reminder check done"
        );
        report
    }
}

/// First due reminder of every task still awaiting one.
fn scan(store: &TaskStore, now: NaiveDateTime, skipped: &mut Vec<(usize, usize)>) -> Vec<ReminderAlert> {
    let mut due = Vec::new();

    for (task_index, task) in store.tasks().iter().enumerate() {
        if !task.awaits_reminder() {
            continue;
        }

        for (reminder_index, raw) in task.notifications.iter().enumerate() {
            let reminder = match Reminder::parse(raw) {
                Ok(r) => r,
                Err(e) => {
                    warn!(task = %task.title, "skipping reminder: {e}");
                    skipped.push((task_index, reminder_index));
                    continue;
                }
            };

            if reminder.is_due(now) {
                due.push(ReminderAlert {
                    task_index,
                    title: task.title.clone(),
                    due_date: task.due_date,
                    reminder: raw.clone(),
                    at: reminder.at,
                });
                break;
            }
        }
    }

    due
}

/// A timer tick delivered to the store owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tick {
    pub seq: u64,
}

/// Background interval timer that emits [`Tick`]s.
pub struct Ticker {
    handle: JoinHandle<()>,
}

impl Ticker {
    /// Start ticking every `period`. The first tick is immediate.
    pub fn spawn(period: Duration) -> (Self, mpsc::Receiver<Tick>) {
        let (tx, rx) = mpsc::channel(4);

        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            let mut seq = 0;

            loop {
                interval.tick().await;
                seq += 1;
                if tx.send(Tick { seq }).await.is_err() {
                    debug!("tick receiver dropped, stopping ticker");
                    return;
                }
            }
        });

        (Self { handle }, rx)
    }

    pub fn stop(self) {
        self.handle.abort();
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
