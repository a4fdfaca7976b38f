//! Month names and month-by-month iteration.

use chrono::{Datelike, NaiveDate};

const MONTH_NAMES: [(&str, &str); 12] = [
    ("Jan", "January"),
    ("Feb", "February"),
    ("Mar", "March"),
    ("Apr", "April"),
    ("May", "May"),
    ("Jun", "June"),
    ("Jul", "July"),
    ("Aug", "August"),
    ("Sep", "September"),
    ("Oct", "October"),
    ("Nov", "November"),
    ("Dec", "December"),
];

/// Abbreviated month name ("Jan") for a month number in 1..=12.
pub fn month_name_short(month: u32) -> Option<&'static str> {
    lookup(month).map(|(short, _)| short)
}

/// Full month name ("January") for a month number in 1..=12.
pub fn month_name(month: u32) -> Option<&'static str> {
    lookup(month).map(|(_, full)| full)
}

fn lookup(month: u32) -> Option<(&'static str, &'static str)> {
    let index = month.checked_sub(1)? as usize;
    MONTH_NAMES.get(index).copied()
}

pub fn month_key(year: i32, month: u32) -> String {
    format!("{:04}-{:02}", year, month)
}

pub fn month_key_of(date: NaiveDate) -> String {
    date.format("%Y-%m").to_string()
}

/// Parse a "YYYY-MM" key into (year, month). The month is not range checked.
pub fn parse_month_key(key: &str) -> Option<(i32, u32)> {
    let (year, month) = key.trim().split_once('-')?;
    if year.len() != 4 || month.is_empty() || month.len() > 2 {
        return None;
    }
    if !year.bytes().chain(month.bytes()).all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some((year.parse().ok()?, month.parse().ok()?))
}

/// Inclusive iterator over calendar months, yielding (year, month).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MonthRange {
    next: (i32, u32),
    last: (i32, u32),
}

impl MonthRange {
    pub fn new(first: (i32, u32), last: (i32, u32)) -> Self {
        Self { next: first, last }
    }

    pub fn between(first: NaiveDate, last: NaiveDate) -> Self {
        Self::new((first.year(), first.month()), (last.year(), last.month()))
    }
}

impl Iterator for MonthRange {
    type Item = (i32, u32);

    fn next(&mut self) -> Option<Self::Item> {
        if self.next > self.last {
            return None;
        }
        let current = self.next;
        self.next = if current.1 >= 12 {
            (current.0 + 1, 1)
        } else {
            (current.0, current.1 + 1)
        };
        Some(current)
    }
}
