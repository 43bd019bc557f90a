//! Scheduler error types.

use crate::time::TimeError;
use thiserror::Error;

/// Scheduling errors.
///
/// The first three variants mean the configuration cannot produce a
/// timetable; no partial schedule is ever returned alongside them.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScheduleError {
    /// Nothing left to place after removing byes
    #[error("No schedulable matches")]
    NoSchedulableMatches,

    /// Lunch and break windows leave no room for a match
    #[error("Breaks are too dense to schedule a match (stuck at {at})")]
    BreaksTooDense { at: String },

    /// The day ended with matches still waiting
    #[error("Cannot fit all matches in the time window: {remaining} left at {at}")]
    WindowTooShort { remaining: usize, at: String },

    /// Malformed `HH:MM` value
    #[error(transparent)]
    InvalidTime(#[from] TimeError),

    /// Settings that can never be satisfied
    #[error("Invalid schedule settings: {0}")]
    InvalidSettings(String),

    #[error("Slot index {index} out of range for {len} slots")]
    SlotOutOfRange { index: usize, len: usize },

    #[error("Slot {0} is not a match slot")]
    NotAMatchSlot(usize),
}

/// Result type for scheduling operations
pub type ScheduleResult<T> = Result<T, ScheduleError>;
