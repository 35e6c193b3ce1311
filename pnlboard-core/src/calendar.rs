//! Calendar helpers: month labels, month keys, month lengths.

use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Errors raised when a month cannot be resolved.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CalendarError {
    #[error("cannot parse month label '{0}' (expected '<Prefix> <N>')")]
    UnparseableLabel(String),
    #[error("month {0} is outside 1..=12")]
    MonthOutOfRange(u32),
    #[error("year {0} is outside the supported calendar range")]
    YearOutOfRange(i32),
}

/// A calendar month, ordered chronologically.
///
/// Fields are private so every key in circulation has a valid month and a
/// year chrono can represent (including the following month).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct MonthKey {
    year: i32,
    month: u32,
}

impl MonthKey {
    pub fn new(year: i32, month: u32) -> Result<Self, CalendarError> {
        if !(1..=12).contains(&month) {
            return Err(CalendarError::MonthOutOfRange(month));
        }
        let key = Self { year, month };
        if NaiveDate::from_ymd_opt(year, month, 1).is_none() || key.next_first_day().is_none() {
            return Err(CalendarError::YearOutOfRange(year));
        }
        Ok(key)
    }

    /// Resolve a label such as `"Month 02"` (any prefix) plus a year.
    pub fn from_label(label: &str, year: i32) -> Result<Self, CalendarError> {
        Self::new(year, parse_month_label(label)?)
    }

    /// The month containing `date`.
    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    /// Gregorian month length: day 0 of the following month.
    pub fn days_in_month(&self) -> u32 {
        self.next_first_day()
            .and_then(|d| d.pred_opt())
            .map_or(0, |d| d.day())
    }

    /// Date for a day-of-month, `None` when the day does not exist.
    pub fn date(&self, day: u32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, day)
    }

    /// Days of this month that have elapsed as of `as_of` (inclusive).
    ///
    /// Earlier months are fully elapsed, later months not at all.
    pub fn elapsed_days(&self, as_of: NaiveDate) -> u32 {
        let current = Self::of(as_of);
        match current.cmp(self) {
            std::cmp::Ordering::Greater => self.days_in_month(),
            std::cmp::Ordering::Equal => as_of.day(),
            std::cmp::Ordering::Less => 0,
        }
    }

    /// Compact `MM/YY` label used on the month selector.
    pub fn short_label(&self) -> String {
        format!("{:02}/{:02}", self.month, self.year.rem_euclid(100))
    }

    fn next_first_day(&self) -> Option<NaiveDate> {
        let (year, month) = if self.month == 12 {
            (self.year.checked_add(1)?, 1)
        } else {
            (self.year, self.month + 1)
        };
        NaiveDate::from_ymd_opt(year, month, 1)
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

/// Parse the month number out of a `"<Prefix> <N>"` label.
///
/// Only the last whitespace-separated token matters, so `"Month 02"`,
/// `"Tháng 2"` and a bare `"02"` all resolve to February.
pub fn parse_month_label(label: &str) -> Result<u32, CalendarError> {
    let token = label
        .split_whitespace()
        .last()
        .ok_or_else(|| CalendarError::UnparseableLabel(label.to_string()))?;
    let month: u32 = token
        .parse()
        .map_err(|_| CalendarError::UnparseableLabel(label.to_string()))?;
    if !(1..=12).contains(&month) {
        return Err(CalendarError::MonthOutOfRange(month));
    }
    Ok(month)
}
