//! Timetable entries.

use super::errors::{ScheduleError, ScheduleResult};
use crate::competition::MatchId;
use crate::time::{TimeResult, TimeWindow, minutes_to_time};
use serde::{Deserialize, Serialize};

/// What happens during a time slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SlotType {
    Match,
    Break,
    Lunch,
    Preparation,
    Cleanup,
}

impl std::fmt::Display for SlotType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SlotType::Match => write!(f, "match"),
            SlotType::Break => write!(f, "break"),
            SlotType::Lunch => write!(f, "lunch"),
            SlotType::Preparation => write!(f, "preparation"),
            SlotType::Cleanup => write!(f, "cleanup"),
        }
    }
}

/// One entry of a generated timetable
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeSlot {
    pub start_time: String,
    pub end_time: String,
    #[serde(rename = "type")]
    pub slot_type: SlotType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub court_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub match_id: Option<MatchId>,
    #[serde(default)]
    pub description: String,
}

impl TimeSlot {
    /// A slot without court or match
    pub fn new(window: TimeWindow, slot_type: SlotType, description: impl Into<String>) -> Self {
        Self {
            start_time: minutes_to_time(window.start),
            end_time: minutes_to_time(window.end),
            slot_type,
            court_id: None,
            match_id: None,
            description: description.into(),
        }
    }

    /// A match placed on a court
    pub fn for_match(
        window: TimeWindow,
        court_id: impl Into<String>,
        match_id: impl Into<MatchId>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            court_id: Some(court_id.into()),
            match_id: Some(match_id.into()),
            ..Self::new(window, SlotType::Match, description)
        }
    }

    pub fn is_match(&self) -> bool {
        self.slot_type == SlotType::Match
    }

    /// The slot's interval in minutes.
    ///
    /// A last match that runs past midnight carries an end time such as
    /// `"24:10"`. That value is for display only and makes this return
    /// [`TimeError::InvalidFormat`](crate::time::TimeError::InvalidFormat).
    pub fn window(&self) -> TimeResult<TimeWindow> {
        TimeWindow::parse(&self.start_time, &self.end_time)
    }
}

/// Exchange the matches held by two match slots, keeping times and courts.
///
/// Used for manual reordering of a generated timetable.
///
/// # Errors
///
/// Returns [`ScheduleError::SlotOutOfRange`] for a bad index and
/// [`ScheduleError::NotAMatchSlot`] when either slot is a break or similar.
pub fn swap_slots(slots: &mut [TimeSlot], i: usize, j: usize) -> ScheduleResult<()> {
    let len = slots.len();
    for index in [i, j] {
        if index >= len {
            return Err(ScheduleError::SlotOutOfRange { index, len });
        }
        if !slots[index].is_match() {
            return Err(ScheduleError::NotAMatchSlot(index));
        }
    }
    if i == j {
        return Ok(());
    }

    let (low, high) = (i.min(j), i.max(j));
    let (head, tail) = slots.split_at_mut(high);
    let (a, b) = (&mut head[low], &mut tail[0]);
    std::mem::swap(&mut a.match_id, &mut b.match_id);
    std::mem::swap(&mut a.description, &mut b.description);
    Ok(())
}
