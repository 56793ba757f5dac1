//! Plain-text output.

use chrono::NaiveDate;
use planner_core::{DisplayConfig, ReminderAlert, Task, TaskStore};

pub fn message(text: &str) {
    println!("{text}");
}

pub fn warn(text: &str) {
    eprintln!("warning: {text}");
}

pub fn print_list(store: &TaskStore, display: &DisplayConfig) {
    if store.is_empty() {
        println!("No tasks. Create one with `new`.");
        return;
    }

    let today = store.today();
    for (i, task) in store.tasks().iter().enumerate() {
        println!("{}", list_line(i, task, today, display));
    }

    let stats = store.stats();
    println!();
    println!(
        "{} tasks: {} open, {} completed, {} skipped, {} overdue",
        stats.total, stats.open, stats.completed, stats.skipped, stats.overdue
    );
}

pub fn list_line(index: usize, task: &Task, today: NaiveDate, display: &DisplayConfig) -> String {
    let status = task.status();
    let mut line = format!(
        "{:>3}. {} {} - {}",
        index + 1,
        status.symbol(),
        task.title,
        task.due_date.format(&display.date_format)
    );
    if status.is_closed() {
        line.push_str(&format!(" ({})", status.label()));
    } else if task.is_overdue(today) {
        line.push_str(" (overdue)");
    }
    line
}

pub fn print_task(index: usize, task: &Task, today: NaiveDate, display: &DisplayConfig) {
    println!("{}", list_line(index, task, today, display));
    if !task.status().is_closed() {
        println!("{}", due_in(task, today));
    }
    if !task.description.is_empty() {
        println!("\n{}\n", task.description);
    }
    print_section("Subtasks", &task.subtasks);
    print_section("Reminders", &task.notifications);
    print_section("Attachments", &task.attachments);
    if task.notification_shown {
        println!("Reminder already shown");
    }
}

fn due_in(task: &Task, today: NaiveDate) -> String {
    match task.days_until_due(today) {
        0 => "Due today".to_string(),
        1 => "Due tomorrow".to_string(),
        -1 => "1 day overdue".to_string(),
        n if n < 0 => format!("{} days overdue", -n),
        n => format!("Due in {n} days"),
    }
}

fn print_section(title: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }
    println!("{title}:");
    for (i, item) in items.iter().enumerate() {
        println!("  {}. {item}", i + 1);
    }
}

pub fn print_alert(alert: &ReminderAlert) {
    println!("\u{7}== Task reminder ==");
    println!("{alert}");
    println!();
}
