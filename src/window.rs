//! Calendar-day parsing and the trailing date window used by the
//! precipitation and observation routes.

use chrono::{Days, NaiveDate};
use std::fmt;
use thiserror::Error;

/// Format of every date stored in the dataset and accepted on the API.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Default length of the trailing window, in days.
pub const DEFAULT_WINDOW_DAYS: u32 = 365;

#[derive(Debug, Error)]
pub enum DayError {
    // chrono's %Y also takes signed and 5+ digit years, which break text ordering in SQL
    #[error("not in YYYY-MM-DD layout")]
    Layout,

    #[error(transparent)]
    Parse(#[from] chrono::ParseError),
}

/// Parse a `YYYY-MM-DD` calendar day: four-digit year, two-digit month and
/// day, nothing else.
pub fn parse_day(value: &str) -> Result<NaiveDate, DayError> {
    let value = value.trim();
    if !has_day_layout(value) {
        return Err(DayError::Layout);
    }
    Ok(NaiveDate::parse_from_str(value, DATE_FORMAT)?)
}

fn has_day_layout(value: &str) -> bool {
    let bytes = value.as_bytes();
    bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        })
}

/// Render a day the way the dataset stores it, so text comparison in SQL
/// matches calendar order.
pub fn format_day(day: NaiveDate) -> String {
    day.format(DATE_FORMAT).to_string()
}

/// Inclusive range of calendar days.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateWindow {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// The window `[end - days, end]`. Both bounds are included, so a
    /// 365-day window spans 366 calendar days.
    pub fn trailing(end: NaiveDate, days: u32) -> Self {
        let start = end
            .checked_sub_days(Days::new(u64::from(days)))
            .unwrap_or(NaiveDate::MIN);
        Self { start, end }
    }

    pub fn contains(&self, day: NaiveDate) -> bool {
        self.start <= day && day <= self.end
    }

    /// `(start, end)` as stored-date strings, ready to bind into a query.
    pub fn bounds(&self) -> (String, String) {
        (format_day(self.start), format_day(self.end))
    }
}

impl fmt::Display for DateWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..={}", format_day(self.start), format_day(self.end))
    }
}
