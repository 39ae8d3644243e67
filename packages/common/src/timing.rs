//! Presentation values derived from a contest's timestamps.
//!
//! The typed functions take parsed `DateTime<Utc>` values and are total.
//! The `compute_*` functions take raw timestamp strings as they arrive from
//! an API and return [`Computed::Invalid`] instead of failing when a
//! timestamp does not parse.

use std::fmt;

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Serialize, Serializer};

use crate::contest_status::ContestStatus;

/// Result of a timing computation over possibly malformed input.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Computed<T> {
    Valid(T),
    /// One of the input timestamps could not be parsed.
    Invalid,
}

impl<T> Computed<T> {
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid(_))
    }

    pub fn valid(self) -> Option<T> {
        match self {
            Self::Valid(value) => Some(value),
            Self::Invalid => None,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Computed<U> {
        match self {
            Self::Valid(value) => Computed::Valid(f(value)),
            Self::Invalid => Computed::Invalid,
        }
    }
}

impl<T> From<Option<T>> for Computed<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(value) => Self::Valid(value),
            None => Self::Invalid,
        }
    }
}

/// Text shown in place of a value that could not be computed.
pub trait Placeholder {
    const PLACEHOLDER: &'static str;
}

impl Placeholder for Remaining {
    const PLACEHOLDER: &'static str = "--:--:--";
}

impl Placeholder for f64 {
    const PLACEHOLDER: &'static str = "--";
}

impl Placeholder for ContestStatus {
    const PLACEHOLDER: &'static str = "--";
}

impl<T: fmt::Display + Placeholder> fmt::Display for Computed<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Valid(value) => value.fmt(f),
            Self::Invalid => f.write_str(T::PLACEHOLDER),
        }
    }
}

/// A non-negative duration split into display units.
///
/// Hours are not wrapped at 24. Serializes as `HH:MM:SS`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct Remaining {
    pub hours: u64,
    pub minutes: u8,
    pub seconds: u8,
}

impl Remaining {
    pub const ZERO: Remaining = Remaining {
        hours: 0,
        minutes: 0,
        seconds: 0,
    };

    /// Split a number of seconds into units. Negative input clamps to zero.
    pub fn from_seconds(total: i64) -> Self {
        let total = u64::try_from(total).unwrap_or(0);
        Self {
            hours: total / 3600,
            minutes: ((total % 3600) / 60) as u8,
            seconds: (total % 60) as u8,
        }
    }

    pub fn total_seconds(&self) -> u64 {
        self.hours * 3600 + u64::from(self.minutes) * 60 + u64::from(self.seconds)
    }

    pub fn is_zero(&self) -> bool {
        *self == Self::ZERO
    }
}

impl fmt::Display for Remaining {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02}:{:02}:{:02}",
            self.hours, self.minutes, self.seconds
        )
    }
}

impl Serialize for Remaining {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Parse an RFC 3339 timestamp, normalized to UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw.trim())
        .ok()
        .map(|t| t.with_timezone(&Utc))
}

/// Time left until `end`, truncated to whole seconds and floored at zero.
pub fn remaining(end: DateTime<Utc>, now: DateTime<Utc>) -> Remaining {
    Remaining::from_seconds((end - now).num_seconds())
}

/// Time left until `start`, floored at zero.
pub fn until_start(start: DateTime<Utc>, now: DateTime<Utc>) -> Remaining {
    Remaining::from_seconds((start - now).num_seconds())
}

/// Elapsed share of the contest window as a percentage in `[0, 100]`.
///
/// A window with no duration (`end <= start`) counts as fully elapsed.
pub fn progress(start: DateTime<Utc>, end: DateTime<Utc>, now: DateTime<Utc>) -> f64 {
    if end <= start {
        return 100.0;
    }
    if now <= start {
        return 0.0;
    }
    if now >= end {
        return 100.0;
    }
    let elapsed = span(now - start);
    let total = span(end - start);
    (elapsed / total * 100.0).clamp(0.0, 100.0)
}

/// Length in nanoseconds, or milliseconds scaled up once that overflows.
fn span(delta: TimeDelta) -> f64 {
    match delta.num_nanoseconds() {
        Some(ns) => ns as f64,
        None => delta.num_milliseconds() as f64 * 1_000_000.0,
    }
}

/// Status implied by the timestamps alone. Never returns `Cancelled`.
pub fn classify(start: DateTime<Utc>, end: DateTime<Utc>, now: DateTime<Utc>) -> ContestStatus {
    if now < start {
        ContestStatus::Upcoming
    } else if now < end {
        ContestStatus::Live
    } else {
        ContestStatus::Completed
    }
}

fn parse_window(start: &str, end: &str) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
    Some((parse_timestamp(start)?, parse_timestamp(end)?))
}

pub fn compute_remaining(start: &str, end: &str, now: DateTime<Utc>) -> Computed<Remaining> {
    parse_window(start, end)
        .map(|(_, end)| remaining(end, now))
        .into()
}

pub fn compute_progress(start: &str, end: &str, now: DateTime<Utc>) -> Computed<f64> {
    parse_window(start, end)
        .map(|(start, end)| progress(start, end, now))
        .into()
}

pub fn classify_status(start: &str, end: &str, now: DateTime<Utc>) -> Computed<ContestStatus> {
    parse_window(start, end)
        .map(|(start, end)| classify(start, end, now))
        .into()
}
