//! Date resolver.
//!
//! Turns a `<MonthName> <day>, <year>` substring into an [`AppointmentDate`]. Only literal
//! bounds are checked (day 1-31, four-digit year); per-month day counts and leap years are
//! left to the system that produced the document.

use crate::constants::{MAX_DAY, MAX_YEAR, MIN_DAY, MONTH_NAMES};
use chrono::{Datelike, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;

static DATE_TEXT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\p{Alphabetic}+)\s+([0-9]+),\s*([0-9]+)$").expect("date text pattern is valid")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum DateError {
    #[error("date text is not in '<MonthName> <day>, <year>' form")]
    Malformed,
    #[error("month name is not a full English month name")]
    UnknownMonth,
    #[error("day is outside 1-31")]
    DayOutOfRange,
    #[error("year is not a four-digit number")]
    YearOutOfRange,
}

/// Calendar date as written in the source document.
///
/// Not a `NaiveDate`: only literal bounds apply, so "February 30, 2025" is representable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AppointmentDate {
    year: u32,
    month: u32,
    day: u32,
}

impl AppointmentDate {
    pub fn new(year: u32, month: u32, day: u32) -> Result<Self, DateError> {
        if !(1..=12).contains(&month) {
            return Err(DateError::UnknownMonth);
        }
        if !(MIN_DAY..=MAX_DAY).contains(&day) {
            return Err(DateError::DayOutOfRange);
        }
        if year > MAX_YEAR {
            return Err(DateError::YearOutOfRange);
        }
        Ok(Self { year, month, day })
    }

    pub fn from_naive(date: NaiveDate) -> Self {
        Self {
            year: date.year().clamp(0, MAX_YEAR as i32) as u32,
            month: date.month(),
            day: date.day(),
        }
    }

    pub fn year(&self) -> u32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn day(&self) -> u32 {
        self.day
    }

    /// Zero-padded month, day and two-digit year, e.g. `121825`.
    pub fn mmddyy(&self) -> String {
        format!("{:02}{:02}{:02}", self.month, self.day, self.year % 100)
    }
}

/// Month number for a full English month name, ignoring case.
pub fn month_number(name: &str) -> Option<u32> {
    MONTH_NAMES
        .iter()
        .position(|month| month.eq_ignore_ascii_case(name))
        .map(|index| index as u32 + 1)
}

/// Parses a `<MonthName> <day>, <year>` string.
///
/// # Errors
///
/// Returns a [`DateError`] describing the first rule the text breaks.
pub fn resolve_date(raw: &str) -> Result<AppointmentDate, DateError> {
    let captures = DATE_TEXT.captures(raw.trim()).ok_or(DateError::Malformed)?;

    let month = month_number(&captures[1]).ok_or(DateError::UnknownMonth)?;

    let day_text = &captures[2];
    let day: u32 = day_text.parse().map_err(|_| DateError::DayOutOfRange)?;
    if day_text.len() > 2 {
        return Err(DateError::DayOutOfRange);
    }

    let year_text = &captures[3];
    if year_text.len() != 4 {
        return Err(DateError::YearOutOfRange);
    }
    let year: u32 = year_text.parse().map_err(|_| DateError::YearOutOfRange)?;

    AppointmentDate::new(year, month, day)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_reference_date() {
        let date = resolve_date("December 18, 2025").unwrap();
        assert_eq!((date.year(), date.month(), date.day()), (2025, 12, 18));
        assert_eq!(date.mmddyy(), "121825");
    }

    #[test]
    fn test_resolve_every_month() {
        for (index, name) in MONTH_NAMES.iter().enumerate() {
            let date = resolve_date(&format!("{} 5, 2024", name)).unwrap();
            assert_eq!(date.month(), index as u32 + 1);
            assert_eq!(date.day(), 5);
        }
    }

    #[test]
    fn test_month_names_ignore_case() {
        assert_eq!(month_number("december"), Some(12));
        assert_eq!(month_number("MAY"), Some(5));
        assert_eq!(month_number("Dec"), None);
    }

    #[test]
    fn test_mmddyy_zero_pads() {
        let date = AppointmentDate::new(2007, 3, 4).unwrap();
        assert_eq!(date.mmddyy(), "030407");
    }

    #[test]
    fn test_unknown_month() {
        assert_eq!(resolve_date("Decembre 18, 2025"), Err(DateError::UnknownMonth));
        assert_eq!(resolve_date("Dec 18, 2025"), Err(DateError::UnknownMonth));
    }

    #[test]
    fn test_day_bounds() {
        assert_eq!(resolve_date("March 0, 2024"), Err(DateError::DayOutOfRange));
        assert_eq!(resolve_date("March 32, 2024"), Err(DateError::DayOutOfRange));
        assert_eq!(resolve_date("March 031, 2024"), Err(DateError::DayOutOfRange));
        assert!(resolve_date("March 31, 2024").is_ok());
    }

    #[test]
    fn test_no_day_count_validation() {
        let date = resolve_date("February 30, 2025").unwrap();
        assert_eq!(date.mmddyy(), "023025");
    }

    #[test]
    fn test_year_must_have_four_digits() {
        assert_eq!(resolve_date("March 3, 25"), Err(DateError::YearOutOfRange));
        assert_eq!(resolve_date("March 3, 20255"), Err(DateError::YearOutOfRange));
    }

    #[test]
    fn test_zero_padded_year_is_four_digits() {
        let date = resolve_date("March 3, 0999").unwrap();
        assert_eq!(date.year(), 999);
        assert_eq!(date.mmddyy(), "030399");
        assert_eq!(AppointmentDate::new(10000, 3, 3), Err(DateError::YearOutOfRange));
    }

    #[test]
    fn test_malformed() {
        assert_eq!(resolve_date("18 December 2025"), Err(DateError::Malformed));
        assert_eq!(resolve_date("December 18 2025"), Err(DateError::Malformed));
        assert_eq!(resolve_date(""), Err(DateError::Malformed));
    }

    #[test]
    fn test_from_naive() {
        let date = AppointmentDate::from_naive(NaiveDate::from_ymd_opt(2026, 10, 18).unwrap());
        assert_eq!(date.mmddyy(), "101826");
    }
}
