//! Calendar date value used for `created` and `deadline` fields.
//!
//! # Responsibility
//! - Hold a plain (day, month, year) triple without time or timezone.
//! - Parse and format the `DD.MM.YYYY` / `-` text grammar.
//!
//! # Invariants
//! - Dates are validated syntactically only; `31.02.2024` is accepted.
//! - Ordering is the lexicographic `(year, month, day)` triple.

use chrono::{Datelike, Local};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt::{Display, Formatter};

/// Text used for "no date" in the persisted format and in user input.
pub const NO_DATE: &str = "-";

static DATE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d{1,9})\.(\d{1,9})\.(\d{1,9})$").expect("date pattern must compile")
});

/// Calendar date with no time-of-day component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskDate {
    pub day: u32,
    pub month: u32,
    pub year: u32,
}

impl TaskDate {
    pub fn new(day: u32, month: u32, year: u32) -> Self {
        Self { day, month, year }
    }

    /// Returns today's date from the local system clock.
    pub fn today() -> Self {
        let now = Local::now().date_naive();
        Self {
            day: now.day(),
            month: now.month(),
            // Years before the common era are not representable in the file format.
            year: u32::try_from(now.year()).unwrap_or(0),
        }
    }

    fn sort_key(&self) -> (u32, u32, u32) {
        (self.year, self.month, self.day)
    }
}

impl Ord for TaskDate {
    fn cmp(&self, other: &Self) -> Ordering {
        self.sort_key().cmp(&other.sort_key())
    }
}

impl PartialOrd for TaskDate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Display for TaskDate {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:02}.{:02}.{:04}", self.day, self.month, self.year)
    }
}

impl Serialize for TaskDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Parses the `DD.MM.YYYY` / `-` grammar.
///
/// Returns `None` for `-`, blank input, and anything that does not match
/// three dot-separated numbers. Invalid dates never surface as errors.
pub fn parse_date(value: &str) -> Option<TaskDate> {
    let trimmed = value.trim();
    if trimmed.is_empty() || trimmed == NO_DATE {
        return None;
    }

    let captures = DATE_PATTERN.captures(trimmed)?;
    let day = captures[1].parse().ok()?;
    let month = captures[2].parse().ok()?;
    let year = captures[3].parse().ok()?;
    Some(TaskDate::new(day, month, year))
}

/// Formats an optional date, using `-` for absence.
pub fn format_date(value: Option<TaskDate>) -> String {
    match value {
        Some(date) => date.to_string(),
        None => NO_DATE.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::{format_date, parse_date, TaskDate};

    #[test]
    fn parse_accepts_padded_and_unpadded_numbers() {
        assert_eq!(parse_date("01.02.2024"), Some(TaskDate::new(1, 2, 2024)));
        assert_eq!(parse_date(" 7.3.2025 "), Some(TaskDate::new(7, 3, 2025)));
    }

    #[test]
    fn parse_resolves_absence_and_garbage_to_none() {
        assert_eq!(parse_date("-"), None);
        assert_eq!(parse_date(""), None);
        assert_eq!(parse_date("tomorrow"), None);
        assert_eq!(parse_date("01-02-2024"), None);
        assert_eq!(parse_date("01.02"), None);
    }

    #[test]
    fn parse_does_not_check_calendar_ranges() {
        assert_eq!(parse_date("31.02.2024"), Some(TaskDate::new(31, 2, 2024)));
    }

    #[test]
    fn format_pads_day_month_and_year() {
        assert_eq!(format_date(Some(TaskDate::new(1, 2, 999))), "01.02.0999");
        assert_eq!(format_date(None), "-");
    }

    #[test]
    fn ordering_compares_year_then_month_then_day() {
        assert!(TaskDate::new(31, 12, 2019) < TaskDate::new(1, 1, 2020));
        assert!(TaskDate::new(1, 2, 2020) > TaskDate::new(28, 1, 2020));
        assert!(TaskDate::new(2, 1, 2020) > TaskDate::new(1, 1, 2020));
    }
}
