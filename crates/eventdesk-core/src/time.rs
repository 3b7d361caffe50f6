//! Calendar types for scheduled events.
//!
//! This module provides [`EventDate`] for a validated `DD-MM-YYYY` calendar
//! day, [`TimeOfDay`] for a validated `HH:MM` start time, and [`MinuteSpan`]
//! for half-open minute ranges within a day. The text forms are only used
//! for parsing and display; ordering and equality use the underlying values.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::ValidationError;

/// Earliest accepted year.
pub const MIN_YEAR: i32 = 1900;
/// Latest accepted year.
pub const MAX_YEAR: i32 = 3000;
/// Minutes in one day.
pub const MINUTES_PER_DAY: i64 = 24 * 60;
/// Every event occupies exactly this many minutes from its start.
pub const EVENT_DURATION_MINUTES: i64 = 60;

/// Returns true for Gregorian leap years.
pub fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

/// Returns the number of days in `month` of `year`, or 0 for an invalid month.
pub fn days_in_month(month: u32, year: i32) -> u32 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 if is_leap_year(year) => 29,
        2 => 28,
        _ => 0,
    }
}

/// Returns true if `input` is a valid `DD-MM-YYYY` date.
pub fn is_valid_date(input: &str) -> bool {
    EventDate::parse(input).is_ok()
}

/// Returns true if `input` is a valid `HH:MM` time.
pub fn is_valid_time(input: &str) -> bool {
    TimeOfDay::parse(input).is_ok()
}

/// Reads a run of ASCII digits as a number.
fn digits(bytes: &[u8]) -> Option<u32> {
    bytes.iter().try_fold(0u32, |acc, b| {
        b.is_ascii_digit().then(|| acc * 10 + u32::from(b - b'0'))
    })
}

/// A validated calendar day between 1900 and 3000.
///
/// Ordered chronologically (year, month, day) regardless of its
/// `DD-MM-YYYY` text form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EventDate(NaiveDate);

impl EventDate {
    /// Parses a `DD-MM-YYYY` date.
    ///
    /// The input must be exactly ten characters with `-` separators at
    /// positions 2 and 5 and digits everywhere else.
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let invalid = || ValidationError::invalid_date(input);
        let bytes = input.as_bytes();
        if bytes.len() != 10 || bytes[2] != b'-' || bytes[5] != b'-' {
            return Err(invalid());
        }
        let day = digits(&bytes[0..2]).ok_or_else(invalid)?;
        let month = digits(&bytes[3..5]).ok_or_else(invalid)?;
        let year = digits(&bytes[6..10]).ok_or_else(invalid)?;
        Self::from_dmy(day, month, year as i32).ok_or_else(invalid)
    }

    /// Builds a date from its parts, applying the range and leap-year rules.
    pub fn from_dmy(day: u32, month: u32, year: i32) -> Option<Self> {
        if !(MIN_YEAR..=MAX_YEAR).contains(&year) || !(1..=12).contains(&month) {
            return None;
        }
        if day == 0 || day > days_in_month(month, year) {
            return None;
        }
        NaiveDate::from_ymd_opt(year, month, day).map(Self)
    }

    /// Converts a chrono date, e.g. today's local date from the system clock.
    pub fn from_naive(date: NaiveDate) -> Option<Self> {
        Self::from_dmy(date.day(), date.month(), date.year())
    }

    /// Returns the underlying chrono date.
    pub fn as_naive(&self) -> NaiveDate {
        self.0
    }

    pub fn day(&self) -> u32 {
        self.0.day()
    }

    pub fn month(&self) -> u32 {
        self.0.month()
    }

    pub fn year(&self) -> i32 {
        self.0.year()
    }
}

impl fmt::Display for EventDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}-{:02}-{:04}", self.day(), self.month(), self.year())
    }
}

impl FromStr for EventDate {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for EventDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for EventDate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}

/// A validated wall-clock time, stored as minutes since midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeOfDay {
    minutes: u16,
}

impl TimeOfDay {
    /// Parses an `HH:MM` 24-hour time.
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let invalid = || ValidationError::invalid_time(input);
        let bytes = input.as_bytes();
        if bytes.len() != 5 || bytes[2] != b':' {
            return Err(invalid());
        }
        let hour = digits(&bytes[0..2]).ok_or_else(invalid)?;
        let minute = digits(&bytes[3..5]).ok_or_else(invalid)?;
        Self::from_hm(hour, minute).ok_or_else(invalid)
    }

    /// Builds a time from hour (0-23) and minute (0-59).
    pub fn from_hm(hour: u32, minute: u32) -> Option<Self> {
        (hour < 24 && minute < 60).then(|| Self {
            minutes: (hour * 60 + minute) as u16,
        })
    }

    /// Normalizes any minute count into a time of day.
    ///
    /// Negative values clamp to midnight; the rest wrap modulo 24 hours.
    pub fn from_minutes(minutes: i64) -> Self {
        let wrapped = minutes.max(0) % MINUTES_PER_DAY;
        Self {
            minutes: wrapped as u16,
        }
    }

    /// Minutes since midnight, in `[0, 1440)`.
    pub fn to_minutes(self) -> i64 {
        i64::from(self.minutes)
    }

    pub fn hour(self) -> u32 {
        u32::from(self.minutes / 60)
    }

    pub fn minute(self) -> u32 {
        u32::from(self.minutes % 60)
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

impl FromStr for TimeOfDay {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for TimeOfDay {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for TimeOfDay {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}

/// A half-open range of minutes since midnight: `[start, end)`.
///
/// `end` may run past midnight for late events; spans never wrap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MinuteSpan {
    /// First occupied minute (inclusive).
    pub start: i64,
    /// First free minute after the span (exclusive).
    pub end: i64,
}

impl MinuteSpan {
    /// Creates a span.
    ///
    /// # Panics
    ///
    /// Panics if `start` is after `end`.
    pub fn new(start: i64, end: i64) -> Self {
        assert!(start <= end, "MinuteSpan start must be <= end");
        Self { start, end }
    }

    /// The span of `duration` minutes starting at `time`.
    pub fn starting_at(time: TimeOfDay, duration: i64) -> Self {
        let start = time.to_minutes();
        Self::new(start, start + duration.max(0))
    }

    /// Length of the span in minutes.
    pub fn duration(&self) -> i64 {
        self.end - self.start
    }

    /// Strict overlap test; touching spans do not overlap.
    pub fn overlaps(&self, other: &MinuteSpan) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// Start as a time of day.
    pub fn start_time(&self) -> TimeOfDay {
        TimeOfDay::from_minutes(self.start)
    }

    /// End as a time of day (wrapped past midnight).
    pub fn end_time(&self) -> TimeOfDay {
        TimeOfDay::from_minutes(self.end)
    }
}
