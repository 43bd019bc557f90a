//! Court timetables.
//!
//! Turns a sport's matches into time slots on one or two courts inside the
//! day's window, around lunch and any extra breaks. No team and no class
//! ever plays twice in the same slot, and a knockout match is never placed
//! before the matches that feed it.
//!
//! ## Example
//!
//! ```
//! use sports_day::competition::{Match, Sport, SportType, Team};
//! use sports_day::schedule::{ScheduleSettings, generate_schedule};
//!
//! let mut sport = Sport::new("vb", "Volleyball", SportType::RoundRobin);
//! sport.teams = vec![Team::new("a", "1-A"), Team::new("b", "1-B")];
//! sport.matches = vec![Match::between("m1", "a", "b", 1, 1)];
//!
//! let slots = generate_schedule(&sport, &ScheduleSettings::default(), false).unwrap();
//! assert_eq!(slots[0].start_time, "09:00");
//! assert_eq!(slots[0].description, "1-A vs 1-B");
//! ```

pub mod errors;
pub mod queue;
pub mod scheduler;
pub mod settings;
pub mod slot;

pub use errors::{ScheduleError, ScheduleResult};
pub use queue::{Finale, QueueBuilder, ScheduleQueue};
pub use scheduler::{
    CourtScheduler, DEADLOCK_STEP_MINUTES, MAX_BREAK_ADJUSTMENTS, generate_schedule,
    schedule_sport,
};
pub use settings::{BreakWindow, Court, MAX_COURTS, ResolvedSettings, ScheduleSettings};
pub use slot::{SlotType, TimeSlot, swap_slots};
