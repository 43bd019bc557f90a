//! Schedule settings supplied by the calling layer.

use super::errors::{ScheduleError, ScheduleResult};
use super::slot::TimeSlot;
use crate::time::{MINUTES_PER_DAY, TimeWindow};
use serde::{Deserialize, Serialize};

/// Courts the scheduler can run in parallel
pub const MAX_COURTS: usize = 2;

/// A named pause in the day (lunch or an extra break)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BreakWindow {
    pub name: String,
    pub start_time: String,
    pub end_time: String,
}

impl BreakWindow {
    pub fn new(name: impl Into<String>, start_time: impl Into<String>, end_time: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            start_time: start_time.into(),
            end_time: end_time.into(),
        }
    }
}

/// Temporal settings of one sport's timetable
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleSettings {
    /// First possible match start (`HH:MM`)
    pub start_time: String,
    /// No match may start at or after this time (`HH:MM`)
    pub end_time: String,
    /// Length of one match in minutes
    pub match_duration: u32,
    /// Gap after each round of matches in minutes
    pub break_duration: u32,
    /// Parallel courts (1 or 2)
    pub court_count: usize,
    /// Display names of the courts, by position
    #[serde(default)]
    pub court_names: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lunch_break: Option<BreakWindow>,
    /// Extra breaks (opening ceremony, other events, ...)
    #[serde(default)]
    pub breaks: Vec<BreakWindow>,
    /// Last generated timetable
    #[serde(default)]
    pub time_slots: Vec<TimeSlot>,
}

impl Default for ScheduleSettings {
    fn default() -> Self {
        Self {
            start_time: "09:00".to_string(),
            end_time: "17:00".to_string(),
            match_duration: 15,
            break_duration: 5,
            court_count: 1,
            court_names: vec!["Court 1".to_string()],
            lunch_break: None,
            breaks: Vec::new(),
            time_slots: Vec::new(),
        }
    }
}

/// A court a match can be placed on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Court {
    /// Stable id stored on time slots (`court1`, `court2`)
    pub id: String,
    pub name: String,
}

/// A break window with its times resolved to minutes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedWindow {
    pub name: String,
    pub window: TimeWindow,
}

/// Settings after validation, in minutes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedSettings {
    pub window: TimeWindow,
    pub match_duration: u32,
    pub break_duration: u32,
    pub courts: Vec<Court>,
    pub lunch: Option<NamedWindow>,
    pub breaks: Vec<NamedWindow>,
}

fn resolve_break(kind: &str, b: &BreakWindow) -> ScheduleResult<NamedWindow> {
    let window = TimeWindow::parse(&b.start_time, &b.end_time)?;
    if window.end <= window.start {
        return Err(ScheduleError::InvalidSettings(format!(
            "{} '{}' must end after it starts",
            kind, b.name
        )));
    }
    Ok(NamedWindow {
        name: b.name.clone(),
        window,
    })
}

impl ScheduleSettings {
    /// Court id for a zero-based court index
    pub fn court_id(index: usize) -> String {
        format!("court{}", index + 1)
    }

    /// Display name for a zero-based court index
    pub fn court_name(&self, index: usize) -> String {
        self.court_names
            .get(index)
            .cloned()
            .unwrap_or_else(|| format!("Court {}", index + 1))
    }

    /// Validate and resolve every time into minutes
    ///
    /// # Errors
    ///
    /// Returns [`ScheduleError::InvalidTime`] for malformed times and
    /// [`ScheduleError::InvalidSettings`] for an empty day, zero-length
    /// matches, durations longer than a day, an unsupported court count or
    /// inverted break windows.
    pub fn validate(&self) -> ScheduleResult<ResolvedSettings> {
        let window = TimeWindow::parse(&self.start_time, &self.end_time)?;
        if window.end <= window.start {
            return Err(ScheduleError::InvalidSettings(
                "End time must be after start time".to_string(),
            ));
        }

        if self.match_duration == 0 {
            return Err(ScheduleError::InvalidSettings(
                "Match duration must be greater than 0".to_string(),
            ));
        }

        for (label, minutes) in [("Match", self.match_duration), ("Break", self.break_duration)] {
            if minutes > MINUTES_PER_DAY {
                return Err(ScheduleError::InvalidSettings(format!(
                    "{label} duration must be at most {MINUTES_PER_DAY} minutes, got {minutes}"
                )));
            }
        }

        if self.court_count == 0 || self.court_count > MAX_COURTS {
            return Err(ScheduleError::InvalidSettings(format!(
                "Court count must be between 1 and {}, got {}",
                MAX_COURTS, self.court_count
            )));
        }

        let courts = (0..self.court_count)
            .map(|i| Court {
                id: Self::court_id(i),
                name: self.court_name(i),
            })
            .collect();

        let lunch = self
            .lunch_break
            .as_ref()
            .map(|b| resolve_break("Lunch break", b))
            .transpose()?;

        let breaks = self
            .breaks
            .iter()
            .map(|b| resolve_break("Break", b))
            .collect::<ScheduleResult<Vec<_>>>()?;

        Ok(ResolvedSettings {
            window,
            match_duration: self.match_duration,
            break_duration: self.break_duration,
            courts,
            lunch,
            breaks,
        })
    }
}
