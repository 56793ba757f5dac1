//! Reminder strings.
//!
//! A reminder is stored as plain text of the form `dd.MM.yyyy HH:mm - text`.
//! Only the leading timestamp matters to the scheduler; the rest is shown to
//! the user as-is.

use crate::error::{PlannerError, PlannerResult};
use chrono::NaiveDateTime;
use std::fmt;

/// Timestamp format of the reminder prefix.
pub const REMINDER_FORMAT: &str = "%d.%m.%Y %H:%M";

const SEPARATOR: &str = " - ";

/// A parsed reminder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reminder {
    /// When the reminder becomes due (local wall time).
    pub at: NaiveDateTime,
    /// Free text after the separator.
    pub text: String,
}

impl Reminder {
    pub fn new(at: NaiveDateTime, text: impl Into<String>) -> Self {
        Self {
            at,
            text: text.into(),
        }
    }

    /// Parse the leading `dd.MM.yyyy HH:mm` of a stored reminder string.
    pub fn parse(input: &str) -> PlannerResult<Self> {
        let mut tokens = input.split_whitespace();
        let (Some(date), Some(time)) = (tokens.next(), tokens.next()) else {
            return Err(PlannerError::reminder(input, "expected \"dd.MM.yyyy HH:mm\" prefix"));
        };

        let at = parse_timestamp(date, time).map_err(|reason| PlannerError::reminder(input, reason))?;

        let text = input
            .split_once(SEPARATOR)
            .map(|(_, rest)| rest.trim().to_string())
            .unwrap_or_default();

        Ok(Self { at, text })
    }

    /// Parse separate `dd.MM.yyyy` and `HH:mm` tokens, as typed by a user.
    pub fn parse_at(date: &str, time: &str) -> PlannerResult<NaiveDateTime> {
        parse_timestamp(date, time)
            .map_err(|reason| PlannerError::reminder(&format!("{date} {time}"), reason))
    }

    /// Render a reminder in its stored form.
    pub fn format(at: NaiveDateTime, text: &str) -> String {
        format!("{}{}{}", at.format(REMINDER_FORMAT), SEPARATOR, text.trim())
    }

    pub fn is_due(&self, now: NaiveDateTime) -> bool {
        now >= self.at
    }
}

/// Fields must be zero-padded: `5.3.2024 9:30` is rejected.
fn parse_timestamp(date: &str, time: &str) -> Result<NaiveDateTime, String> {
    if !digit_groups(date, '.', &[2, 2, 4]) || !digit_groups(time, ':', &[2, 2]) {
        return Err("expected zero-padded \"dd.MM.yyyy HH:mm\"".to_string());
    }
    NaiveDateTime::parse_from_str(&format!("{date} {time}"), REMINDER_FORMAT).map_err(|e| e.to_string())
}

fn digit_groups(token: &str, sep: char, widths: &[usize]) -> bool {
    let groups: Vec<&str> = token.split(sep).collect();
    groups.len() == widths.len()
        && groups
            .iter()
            .zip(widths)
            .all(|(group, &width)| group.len() == width && group.bytes().all(|b| b.is_ascii_digit()))
}

impl fmt::Display for Reminder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&Self::format(self.at, &self.text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    }

    #[test]
    fn test_parse_reminder() {
        let r = Reminder::parse("05.03.2024 09:30 - Start early").unwrap();
        assert_eq!(r.at, at(2024, 3, 5, 9, 30));
        assert_eq!(r.text, "Start early");
    }

    #[test]
    fn test_parse_without_text() {
        let r = Reminder::parse("01.01.2020 00:00").unwrap();
        assert_eq!(r.at, at(2020, 1, 1, 0, 0));
        assert!(r.text.is_empty());
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert!(Reminder::parse("not-a-date - text").is_err());
        assert!(Reminder::parse("").is_err());
        assert!(Reminder::parse("31.02.2024 10:00 - no such day").is_err());
        assert!(Reminder::parse("2024-03-05 09:30 - iso").is_err());
    }

    #[test]
    fn test_parse_requires_zero_padding() {
        for input in ["5.3.2024 9:30 - x", "05.03.2024 9:30 - x", "5.03.2024 09:30 - x", "05.03.24 09:30 - x"] {
            assert!(Reminder::parse(input).is_err(), "{input}");
        }
        assert_eq!(Reminder::parse("05.03.2024 09:30 - x").unwrap().at, at(2024, 3, 5, 9, 30));
        assert!(Reminder::parse_at("5.3.2024", "09:30").is_err());
        assert_eq!(Reminder::parse_at("05.03.2024", "09:30").unwrap(), at(2024, 3, 5, 9, 30));
    }

    #[test]
    fn test_parse_error_kind() {
        let err = Reminder::parse("garbage").unwrap_err();
        assert!(matches!(err, PlannerError::ReminderParse { .. }));
    }

    #[test]
    fn test_format_matches_parse() {
        let s = Reminder::format(at(2025, 12, 31, 23, 59), "  New year ");
        assert_eq!(s, "31.12.2025 23:59 - New year");
        assert_eq!(Reminder::parse(&s).unwrap().to_string(), s);
    }

    #[test]
    fn test_is_due_inclusive() {
        let r = Reminder::new(at(2024, 1, 1, 12, 0), "x");
        assert!(!r.is_due(at(2024, 1, 1, 11, 59)));
        assert!(r.is_due(at(2024, 1, 1, 12, 0)));
        assert!(r.is_due(at(2024, 1, 2, 0, 0)));
    }
}
