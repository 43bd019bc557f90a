//! # Sports Day
//!
//! Competition and timetable engine for school sports days.
//!
//! A sports day runs several sports side by side, each as one of four
//! competition types:
//!
//! - **Tournament**: single elimination with byes and an optional third-place match
//! - **Round robin**: everyone plays everyone, ranked on points
//! - **League**: round-robin blocks feeding a seeded knockout playoff
//! - **Ranking**: a single timed or measured event, no pairings
//!
//! Teams are usually school classes ("1-A", "2-B red"), and a class must never
//! be on two courts at once. The engine derives the class from a team's name
//! and keeps it out of parallel slots.
//!
//! ## Core Modules
//!
//! - [`competition`]: teams, blocks, standings, brackets and playoffs
//! - [`schedule`]: court timetables around lunch and breaks
//! - [`time`]: `"HH:MM"` conversions and interval overlap
//! - [`shuffle`]: seedable randomness for draws and match order
//!
//! ## Example
//!
//! ```
//! use sports_day::{Shuffler, Sport, SportType, Team};
//! use sports_day::competition::generate_round_robin;
//! use sports_day::schedule::{CourtScheduler, ScheduleSettings};
//!
//! let mut sport = Sport::new("tt", "Table tennis", SportType::RoundRobin);
//! sport.teams = (1..=4).map(|i| Team::new(format!("t{i}"), format!("{i}-A"))).collect();
//! sport.matches = generate_round_robin(&sport.teams, &mut Shuffler::with_seed(7));
//!
//! let settings = ScheduleSettings { court_count: 2, ..Default::default() };
//! let slots = CourtScheduler::new(&settings)
//!     .unwrap()
//!     .with_shuffler(Shuffler::with_seed(7))
//!     .generate(&sport, true)
//!     .unwrap();
//! assert_eq!(slots.len(), 6);
//! ```

/// Teams, blocks, standings, brackets and playoffs.
pub mod competition;
pub use competition::{Block, Match, MatchStatus, Sport, SportType, Team};

/// Court scheduling.
pub mod schedule;
pub use schedule::{ScheduleError, ScheduleSettings, SlotType, TimeSlot, generate_schedule};

pub mod shuffle;
pub use shuffle::Shuffler;

pub mod time;
pub use time::{TimeError, TimeWindow, minutes_to_time, overlaps, time_to_minutes};
