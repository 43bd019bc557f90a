//! Command line configuration.
//!
//! Consolidates all environment variable reads and provides validated configuration.

use sports_day::schedule::{MAX_COURTS, ScheduleSettings};
use sports_day::time::MINUTES_PER_DAY;
use sports_day::time_to_minutes;

/// Defaults loaded from environment variables
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliConfig {
    /// Schedule used for sports that carry no settings of their own
    pub schedule: ScheduleDefaults,
    /// Deterministic shuffle seed
    pub seed: Option<u64>,
}

/// Day layout defaults
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleDefaults {
    pub start_time: String,
    pub end_time: String,
    pub match_duration: u32,
    pub break_duration: u32,
    pub court_count: usize,
}

impl Default for ScheduleDefaults {
    fn default() -> Self {
        let settings = ScheduleSettings::default();
        Self {
            start_time: settings.start_time,
            end_time: settings.end_time,
            match_duration: settings.match_duration,
            break_duration: settings.break_duration,
            court_count: settings.court_count,
        }
    }
}

impl ScheduleDefaults {
    /// Full schedule settings with no lunch, breaks or previous timetable
    pub fn to_settings(&self) -> ScheduleSettings {
        ScheduleSettings {
            start_time: self.start_time.clone(),
            end_time: self.end_time.clone(),
            match_duration: self.match_duration,
            break_duration: self.break_duration,
            court_count: self.court_count,
            court_names: (0..self.court_count)
                .map(|i| format!("Court {}", i + 1))
                .collect(),
            ..Default::default()
        }
    }
}

impl CliConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns error if a variable is set but cannot be parsed
    pub fn from_env() -> Result<Self, ConfigError> {
        let fallback = ScheduleDefaults::default();
        let schedule = ScheduleDefaults {
            start_time: std::env::var("SD_START_TIME").unwrap_or(fallback.start_time),
            end_time: std::env::var("SD_END_TIME").unwrap_or(fallback.end_time),
            match_duration: parse_env_or("SD_MATCH_DURATION", fallback.match_duration)?,
            break_duration: parse_env_or("SD_BREAK_DURATION", fallback.break_duration)?,
            court_count: parse_env_or("SD_COURT_COUNT", fallback.court_count)?,
        };

        let seed = match std::env::var("SD_SEED") {
            Ok(raw) => Some(parse_value("SD_SEED", &raw)?),
            Err(_) => None,
        };

        Ok(Self { schedule, seed })
    }

    /// Validate configuration after loading
    pub fn validate(&self) -> Result<(), ConfigError> {
        let start = time_to_minutes(&self.schedule.start_time).map_err(|e| ConfigError::Invalid {
            var: "SD_START_TIME".to_string(),
            reason: e.to_string(),
        })?;
        let end = time_to_minutes(&self.schedule.end_time).map_err(|e| ConfigError::Invalid {
            var: "SD_END_TIME".to_string(),
            reason: e.to_string(),
        })?;

        if end <= start {
            return Err(ConfigError::Invalid {
                var: "SD_END_TIME".to_string(),
                reason: format!("Must be after start time ({})", self.schedule.start_time),
            });
        }

        if self.schedule.match_duration == 0 {
            return Err(ConfigError::Invalid {
                var: "SD_MATCH_DURATION".to_string(),
                reason: "Must be greater than 0".to_string(),
            });
        }

        for (var, minutes) in [
            ("SD_MATCH_DURATION", self.schedule.match_duration),
            ("SD_BREAK_DURATION", self.schedule.break_duration),
        ] {
            if minutes > MINUTES_PER_DAY {
                return Err(ConfigError::Invalid {
                    var: var.to_string(),
                    reason: format!("Must be at most {MINUTES_PER_DAY} minutes"),
                });
            }
        }

        if self.schedule.court_count == 0 || self.schedule.court_count > MAX_COURTS {
            return Err(ConfigError::Invalid {
                var: "SD_COURT_COUNT".to_string(),
                reason: format!("Must be between 1 and {MAX_COURTS}"),
            });
        }

        Ok(())
    }
}

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration for {var}: {reason}")]
    Invalid { var: String, reason: String },
}

fn parse_value<T>(key: &str, raw: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim().parse::<T>().map_err(|e| ConfigError::Invalid {
        var: key.to_string(),
        reason: format!("'{raw}': {e}"),
    })
}

/// Helper to parse environment variable with default fallback
fn parse_env_or<T>(key: &str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => parse_value(key, &raw),
        Err(_) => Ok(default),
    }
}
