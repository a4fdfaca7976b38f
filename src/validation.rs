//! Request parameter validation.
//!
//! Rules run in a fixed order and stop at the first failure:
//! selected year, start date, end date, start/end ordering, then the
//! selected year against each end of the window.

use chrono::{Datelike, NaiveDate};

use crate::errors::ValidationError;
use crate::models::DateRangeFilter;

pub fn validate(
    start_date: Option<&str>,
    end_date: Option<&str>,
    selected_year: Option<&str>,
) -> Result<DateRangeFilter, ValidationError> {
    let year = selected_year.map(parse_year).transpose()?;

    let start = start_date
        .map(|raw| parse_date(raw).ok_or(ValidationError::InvalidStartDate))
        .transpose()?;
    let end = end_date
        .map(|raw| parse_date(raw).ok_or(ValidationError::InvalidEndDate))
        .transpose()?;

    if let (Some(start), Some(end)) = (start, end) {
        if start > end {
            return Err(ValidationError::StartAfterEnd);
        }
    }

    if let Some(year) = year {
        if let Some(start) = start {
            if year < start.year() {
                return Err(ValidationError::YearBeforeStart {
                    year,
                    start_date: format_date(start),
                });
            }
        }
        if let Some(end) = end {
            if year > end.year() {
                return Err(ValidationError::YearAfterEnd {
                    year,
                    end_date: format_date(end),
                });
            }
        }
    }

    Ok(DateRangeFilter::new(start, end, year))
}

/// Parse a selected year: digits only, non-zero, at most four significant
/// digits.
pub fn parse_year(raw: &str) -> Result<i32, ValidationError> {
    let digits = raw.trim();
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ValidationError::InvalidYear);
    }

    let significant = digits.trim_start_matches('0');
    if significant.is_empty() {
        return Err(ValidationError::ZeroYear);
    }
    if significant.len() > 4 {
        return Err(ValidationError::YearTooLong);
    }

    significant.parse().map_err(|_| ValidationError::InvalidYear)
}

/// Parse `YYYY-MM-DD`. The year must have four digits and be at least 1;
/// month and day may have one or two digits.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let mut parts = raw.trim().split('-');
    let (year, month, day) = (parts.next()?, parts.next()?, parts.next()?);
    if parts.next().is_some() {
        return None;
    }

    if year.len() != 4 || !is_digits(year) {
        return None;
    }
    if !(1..=2).contains(&month.len()) || !is_digits(month) {
        return None;
    }
    if !(1..=2).contains(&day.len()) || !is_digits(day) {
        return None;
    }

    let year: i32 = year.parse().ok()?;
    if year < 1 {
        return None;
    }
    NaiveDate::from_ymd_opt(year, month.parse().ok()?, day.parse().ok()?)
}

pub fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

fn is_digits(s: &str) -> bool {
    s.bytes().all(|b| b.is_ascii_digit())
}
