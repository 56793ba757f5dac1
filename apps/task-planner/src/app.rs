//! Application state and command handling.

use crate::ui;
use anyhow::{bail, Result};
use chrono::{NaiveDate, NaiveDateTime};
use planner_core::{
    Config, PlannerError, PlannerResult, ReminderScheduler, TaskStore, TaskUpdate, TickReport,
    Ticker,
};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info};

pub struct App {
    pub config: Config,
    pub store: TaskStore,
}

impl App {
    pub fn new(config: Config, user: &str) -> Result<Self> {
        let (store, load_error) = TaskStore::open_or_empty(&config, user)?;
        if let Some(e) = load_error {
            ui::warn(&format!("could not load tasks: {e}"));
        }
        debug!(user = %store.user(), path = %store.path().display(), "session started");
        Ok(Self { config, store })
    }

    pub fn list(&self) {
        ui::print_list(&self.store, &self.config.display);
    }

    pub fn show(&self, task: usize) -> Result<()> {
        let index = to_index(task)?;
        let task = self.store.get(index)?;
        ui::print_task(index, task, self.store.today(), &self.config.display);
        Ok(())
    }

    pub fn create(&mut self) {
        let result = self.store.create();
        let index = self.store.len() - 1;
        if self.notice(result.map(|_| ())).is_ok() {
            ui::message(&format!("Task {} created", index + 1));
        }
    }

    pub fn edit(
        &mut self,
        task: usize,
        title: Option<String>,
        description: Option<String>,
        due: Option<NaiveDate>,
    ) -> Result<()> {
        let update = TaskUpdate {
            title,
            description,
            due_date: due,
            status: None,
        };
        if update.is_empty() {
            bail!("nothing to change: pass --title, --description or --due");
        }
        let result = self.store.update(to_index(task)?, update);
        self.notice(result)?;
        ui::message("Changes saved");
        Ok(())
    }

    pub fn complete(&mut self, task: usize) -> Result<()> {
        let result = self.store.complete(to_index(task)?);
        self.notice(result)
    }

    pub fn skip(&mut self, task: usize) -> Result<()> {
        let result = self.store.skip(to_index(task)?);
        self.notice(result)
    }

    pub fn reopen(&mut self, task: usize) -> Result<()> {
        let result = self.store.reopen(to_index(task)?);
        self.notice(result)
    }

    pub fn delete(&mut self, task: usize) -> Result<()> {
        match self.store.delete(to_index(task)?) {
            Ok(removed) => ui::message(&format!("Deleted \"{}\"", removed.title)),
            Err(e) => self.notice(Err(e))?,
        }
        Ok(())
    }

    pub fn add_subtask(&mut self, task: usize, text: &str) -> Result<()> {
        let result = self.store.add_subtask(to_index(task)?, text);
        self.notice(result)
    }

    pub fn add_reminder(&mut self, task: usize, at: NaiveDateTime, text: &str) -> Result<()> {
        let result = self.store.add_reminder(to_index(task)?, at, text);
        self.notice(result)
    }

    pub fn attach(&mut self, task: usize, path: &Path) -> Result<()> {
        let result = self.store.add_attachment(to_index(task)?, path);
        self.notice(result)
    }

    pub fn detach(&mut self, task: usize, attachment: usize) -> Result<()> {
        let result = self
            .store
            .remove_attachment(to_index(task)?, to_index(attachment)?)
            .map(|_| ());
        self.notice(result)
    }

    /// Run reminder checks on an interval until Ctrl-C.
    pub async fn watch(&mut self, interval_secs: Option<u64>) -> Result<()> {
        if !self.config.scheduler.enabled && interval_secs.is_none() {
            ui::warn("reminders are disabled in the configuration");
            return Ok(());
        }
        let period = interval_secs
            .map(|s| Duration::from_secs(s.max(1)))
            .unwrap_or_else(|| self.config.scheduler.interval());

        let mut scheduler = ReminderScheduler::default();
        let (ticker, mut ticks) = Ticker::spawn(period);
        info!(user = %self.store.user(), every = ?period, "watching reminders");

        loop {
            tokio::select! {
                tick = ticks.recv() => {
                    let Some(tick) = tick else { break };
                    self.tick(&mut scheduler);
                    debug!(seq = tick.seq, "tick handled");
                }
                _ = tokio::signal::ctrl_c() => {
                    info!("interrupted, stopping reminders");
                    break;
                }
            }
        }

        ticker.stop();
        Ok(())
    }

    /// One reminder check against the latest file contents.
    fn tick(&mut self, scheduler: &mut ReminderScheduler) -> TickReport {
        if let Err(e) = self.store.reload() {
            ui::warn(&format!("could not reload tasks, using last known state: {e}"));
        }
        let report = scheduler.check(&mut self.store);
        for alert in &report.fired {
            ui::print_alert(alert);
        }
        if let Some(e) = &report.save_error {
            ui::warn(&format!("could not save tasks: {e}"));
        }
        report
    }

    /// Turn recoverable store errors into warnings; everything else is fatal
    /// to the command.
    fn notice(&self, result: PlannerResult<()>) -> Result<()> {
        match result {
            Ok(()) => Ok(()),
            Err(e @ PlannerError::Validation(_)) => {
                ui::warn(&format!("ignored: {e}"));
                Ok(())
            }
            Err(e @ PlannerError::Persistence { .. }) => {
                ui::warn(&format!("could not save tasks: {e}"));
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }
}

/// Convert a 1-based number from the command line.
fn to_index(n: usize) -> Result<usize> {
    match n.checked_sub(1) {
        Some(i) => Ok(i),
        None => bail!("numbers start at 1"),
    }
}
