//! Minute-based time-of-day arithmetic.
//!
//! Every time the engine exchanges with its callers is a 24-hour `"HH:MM"`
//! string. Internally all arithmetic happens on minutes since midnight.

use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Minutes in a day; valid times of day are `0..MINUTES_PER_DAY`.
pub const MINUTES_PER_DAY: u32 = 24 * 60;

/// Time parsing errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimeError {
    /// Not a 24-hour `HH:MM` string
    #[error("Invalid time '{0}': expected HH:MM")]
    InvalidFormat(String),
}

/// Result type for time conversions
pub type TimeResult<T> = Result<T, TimeError>;

/// Convert an `"HH:MM"` string into minutes since midnight.
///
/// # Errors
///
/// Returns [`TimeError::InvalidFormat`] if the string is not a valid 24-hour time.
pub fn time_to_minutes(time: &str) -> TimeResult<u32> {
    let parsed = NaiveTime::parse_from_str(time.trim(), "%H:%M")
        .map_err(|_| TimeError::InvalidFormat(time.to_string()))?;
    Ok(parsed.hour() * 60 + parsed.minute())
}

/// Convert minutes since midnight into a zero-padded `"HH:MM"` string.
///
/// Values past 23:59 keep counting hours (`1450` is `"24:10"`) so that
/// overrun diagnostics stay readable. Such strings are display-only:
/// [`time_to_minutes`] rejects them.
pub fn minutes_to_time(minutes: u32) -> String {
    format!("{:02}:{:02}", minutes / 60, minutes % 60)
}

/// Half-open interval intersection: `[a_start, a_end)` vs `[b_start, b_end)`.
pub fn overlaps(a_start: u32, a_end: u32, b_start: u32, b_end: u32) -> bool {
    a_start < b_end && b_start < a_end
}

/// A resolved `[start, end)` window in minutes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    pub start: u32,
    pub end: u32,
}

impl TimeWindow {
    pub fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    /// Parse a window from two `"HH:MM"` strings.
    pub fn parse(start: &str, end: &str) -> TimeResult<Self> {
        Ok(Self::new(time_to_minutes(start)?, time_to_minutes(end)?))
    }

    pub fn duration(&self) -> u32 {
        self.end.saturating_sub(self.start)
    }

    /// Whether `[start, start + duration)` intersects this window
    pub fn overlaps_interval(&self, start: u32, duration: u32) -> bool {
        overlaps(start, start.saturating_add(duration), self.start, self.end)
    }

    pub fn contains(&self, minute: u32) -> bool {
        self.start <= minute && minute < self.end
    }
}

impl std::fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}-{}",
            minutes_to_time(self.start),
            minutes_to_time(self.end)
        )
    }
}
