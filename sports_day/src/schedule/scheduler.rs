//! Greedy court allocation.
//!
//! A clock sweeps the day from the start time. At every tick each court takes
//! the first queued match that shares no team and no class with the matches
//! already placed at that tick, and whose feeding matches have been played.
//! Lunch and breaks push the clock past themselves; a tick where nothing fits
//! moves the clock forward by a few minutes instead.

use super::errors::{ScheduleError, ScheduleResult};
use super::queue::{Finale, QueueBuilder, ScheduleQueue};
use super::settings::{ResolvedSettings, ScheduleSettings};
use super::slot::{SlotType, TimeSlot};
use crate::competition::{Match, SlotOccupancy, Sport, SportType, Team};
use crate::shuffle::Shuffler;
use crate::time::{TimeWindow, minutes_to_time};
use std::collections::HashMap;

/// Clock adjustments for breaks allowed before giving up on a tick
pub const MAX_BREAK_ADJUSTMENTS: usize = 100;

/// Clock advance when no court could take a match
pub const DEADLOCK_STEP_MINUTES: u32 = 5;

/// Places a sport's matches onto courts and times.
pub struct CourtScheduler {
    settings: ResolvedSettings,
    previous: Vec<TimeSlot>,
    shuffler: Shuffler,
}

impl CourtScheduler {
    /// Create a scheduler for validated settings
    ///
    /// # Errors
    ///
    /// Returns the validation error of [`ScheduleSettings::validate`].
    pub fn new(settings: &ScheduleSettings) -> ScheduleResult<Self> {
        Ok(Self {
            settings: settings.validate()?,
            previous: settings.time_slots.clone(),
            shuffler: Shuffler::new(),
        })
    }

    /// Use a specific shuffler (e.g. a seeded one)
    pub fn with_shuffler(mut self, shuffler: Shuffler) -> Self {
        self.shuffler = shuffler;
        self
    }

    /// Generate the timetable for `sport`.
    ///
    /// With `shuffle == false` nothing is shuffled and the order of the
    /// previous timetable in the settings is kept, so rescheduling after a
    /// settings change reproduces the same pairing-to-slot assignment.
    ///
    /// # Errors
    ///
    /// [`ScheduleError::NoSchedulableMatches`], [`ScheduleError::BreaksTooDense`]
    /// or [`ScheduleError::WindowTooShort`]; no partial timetable is returned.
    pub fn generate(&mut self, sport: &Sport, shuffle: bool) -> ScheduleResult<Vec<TimeSlot>> {
        let mut slots = self.fixed_slots();

        if sport.sport_type == SportType::Ranking {
            slots.push(TimeSlot::new(
                self.settings.window,
                SlotType::Preparation,
                format!("{}: ranking event", sport.name),
            ));
            sort_slots(&mut slots);
            return Ok(slots);
        }

        let queue = if shuffle {
            QueueBuilder::shuffled(&mut self.shuffler).build(sport)
        } else {
            QueueBuilder::preserving(&self.previous).build(sport)
        };
        if queue.is_empty() {
            return Err(ScheduleError::NoSchedulableMatches);
        }
        let total = queue.len();

        let mut timetable = Timetable::new(&self.settings, sport, slots);
        let ScheduleQueue { phases, finale } = queue;
        for phase in phases {
            timetable.place_phase(phase)?;
        }
        timetable.place_finale(finale)?;

        let mut slots = timetable.slots;
        sort_slots(&mut slots);

        log::info!(
            "Scheduled {} matches of {} on {} court(s), last slot ends {}",
            total,
            sport.name,
            self.settings.courts.len(),
            slots.last().map(|s| s.end_time.as_str()).unwrap_or("-")
        );
        Ok(slots)
    }

    // Lunch and extra breaks appear in every timetable.
    fn fixed_slots(&self) -> Vec<TimeSlot> {
        let lunch = self
            .settings
            .lunch
            .iter()
            .map(|l| TimeSlot::new(l.window, SlotType::Lunch, l.name.clone()));
        let breaks = self
            .settings
            .breaks
            .iter()
            .map(|b| TimeSlot::new(b.window, SlotType::Break, b.name.clone()));
        lunch.chain(breaks).collect()
    }
}

// Zero-padded "HH:MM" strings order chronologically; the sort is stable.
fn sort_slots(slots: &mut [TimeSlot]) {
    slots.sort_by(|a, b| a.start_time.cmp(&b.start_time));
}

/// Working state of one scheduling run
struct Timetable<'a> {
    settings: &'a ResolvedSettings,
    sport: &'a Sport,
    teams: HashMap<&'a str, &'a Team>,
    /// Last bracket round, for "Final" labels
    final_round: Option<u32>,
    clock: u32,
    slots: Vec<TimeSlot>,
}

impl<'a> Timetable<'a> {
    fn new(settings: &'a ResolvedSettings, sport: &'a Sport, slots: Vec<TimeSlot>) -> Self {
        let final_round = match sport.sport_type {
            SportType::Tournament | SportType::League => sport
                .playoff_matches()
                .filter(|m| !m.is_third_place())
                .map(|m| m.round)
                .max(),
            SportType::RoundRobin | SportType::Ranking => None,
        };
        Self {
            settings,
            sport,
            teams: sport.team_index(),
            final_round,
            clock: settings.window.start,
            slots,
        }
    }

    /// First start at or after `from` whose match interval avoids lunch and breaks.
    fn next_free_start(&self, from: u32) -> ScheduleResult<u32> {
        let duration = self.settings.match_duration;
        let mut clock = from;
        for _ in 0..MAX_BREAK_ADJUSTMENTS {
            let blocking = self
                .settings
                .lunch
                .iter()
                .chain(self.settings.breaks.iter())
                .find(|b| b.window.overlaps_interval(clock, duration));
            match blocking {
                None => return Ok(clock),
                Some(b) => clock = b.window.end,
            }
        }
        Err(ScheduleError::BreaksTooDense {
            at: minutes_to_time(clock),
        })
    }

    fn ensure_time_left(&self, remaining: usize) -> ScheduleResult<()> {
        if self.clock >= self.settings.window.end {
            return Err(ScheduleError::WindowTooShort {
                remaining,
                at: minutes_to_time(self.clock),
            });
        }
        Ok(())
    }

    /// Move the clock to the next usable start, failing if the day is over.
    fn advance_to_free_start(&mut self, remaining: usize) -> ScheduleResult<TimeWindow> {
        self.ensure_time_left(remaining)?;
        self.clock = self.next_free_start(self.clock)?;
        self.ensure_time_left(remaining)?;
        Ok(TimeWindow::new(
            self.clock,
            self.clock + self.settings.match_duration,
        ))
    }

    fn is_eligible(&self, m: &Match, occupancy: &SlotOccupancy, pending: &[Match]) -> bool {
        !occupancy.conflicts_with(m, &self.teams)
            && m.previous_match_ids.iter().all(|feeder| {
                !occupancy.contains_match(feeder) && !pending.iter().any(|p| &p.id == feeder)
            })
    }

    fn place_phase(&mut self, mut pending: Vec<Match>) -> ScheduleResult<()> {
        let settings = self.settings;
        while !pending.is_empty() {
            let window = self.advance_to_free_start(pending.len())?;
            let mut occupancy = SlotOccupancy::new();

            for court in &settings.courts {
                let Some(index) = pending
                    .iter()
                    .position(|m| self.is_eligible(m, &occupancy, &pending))
                else {
                    if !pending.is_empty() {
                        log::warn!(
                            "{} idle at {}: all {} waiting matches conflict",
                            court.name,
                            minutes_to_time(window.start),
                            pending.len()
                        );
                    }
                    continue;
                };
                let m = pending.remove(index);
                occupancy.place(&m, &self.teams);
                self.push_match(window, &court.id, &m);
            }

            self.clock += if occupancy.is_empty() {
                DEADLOCK_STEP_MINUTES
            } else {
                settings.match_duration + settings.break_duration
            };
        }
        Ok(())
    }

    /// Final and third-place match close the day: side by side on two
    /// courts, otherwise third place first and the final right after.
    fn place_finale(&mut self, finale: Finale) -> ScheduleResult<()> {
        let settings = self.settings;
        let step = settings.match_duration + settings.break_duration;

        match (finale.final_match, finale.third_place) {
            (Some(final_match), Some(third)) if settings.courts.len() >= 2 => {
                let window = self.advance_to_free_start(2)?;
                self.push_match(window, &settings.courts[0].id, &final_match);
                self.push_match(window, &settings.courts[1].id, &third);
                self.clock += step;
            }
            (final_match, third) => {
                let ordered: Vec<Match> = third.into_iter().chain(final_match).collect();
                let mut remaining = ordered.len();
                for m in ordered {
                    let window = self.advance_to_free_start(remaining)?;
                    self.push_match(window, &settings.courts[0].id, &m);
                    self.clock += step;
                    remaining -= 1;
                }
            }
        }
        Ok(())
    }

    fn push_match(&mut self, window: TimeWindow, court_id: &str, m: &Match) {
        let description = self.describe(m);
        log::debug!(
            "{} {}: {} ({})",
            minutes_to_time(window.start),
            court_id,
            description,
            m.id
        );
        self.slots
            .push(TimeSlot::for_match(window, court_id, m.id.clone(), description));
    }

    fn team_name<'m>(&self, team_id: Option<&'m str>) -> &'m str
    where
        'a: 'm,
    {
        match team_id {
            // Ids missing from the team list are shown as-is
            Some(id) => self.teams.get(id).copied().map_or(id, |t| t.name.as_str()),
            None => "TBD",
        }
    }

    fn describe(&self, m: &Match) -> String {
        let pairing = format!(
            "{} vs {}",
            self.team_name(m.team1_id.as_deref()),
            self.team_name(m.team2_id.as_deref())
        );

        if let Some(block_id) = &m.block_id {
            let block = self
                .sport
                .blocks
                .iter()
                .find(|b| &b.id == block_id)
                .map(|b| b.name.as_str())
                .unwrap_or(block_id.as_str());
            return format!("Block {block}: {pairing}");
        }
        if self.final_round.is_none() {
            return pairing;
        }
        if m.is_third_place() {
            format!("Third place: {pairing}")
        } else if Some(m.round) == self.final_round {
            format!("Final: {pairing}")
        } else {
            format!("Round {}: {pairing}", m.round)
        }
    }
}

/// Generate a timetable with a fresh shuffler.
pub fn generate_schedule(
    sport: &Sport,
    settings: &ScheduleSettings,
    shuffle: bool,
) -> ScheduleResult<Vec<TimeSlot>> {
    CourtScheduler::new(settings)?.generate(sport, shuffle)
}

/// Schedule `sport` with its own settings (or the defaults) and store the
/// result on it. On error the sport is left untouched.
pub fn schedule_sport(sport: &mut Sport, shuffler: Shuffler, shuffle: bool) -> ScheduleResult<()> {
    let settings = sport.schedule_settings.clone().unwrap_or_default();
    let slots = CourtScheduler::new(&settings)?
        .with_shuffler(shuffler)
        .generate(sport, shuffle)?;
    sport.schedule_settings = Some(ScheduleSettings {
        time_slots: slots,
        ..settings
    });
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::competition::Team;
    use crate::schedule::BreakWindow;

    fn round_robin(pairs: &[(&str, &str)]) -> Sport {
        let mut sport = Sport::new("s", "Volleyball", SportType::RoundRobin);
        for (a, b) in pairs {
            for id in [a, b] {
                if sport.team(id).is_none() {
                    sport.teams.push(Team::new(*id, *id));
                }
            }
        }
        sport.matches = pairs
            .iter()
            .enumerate()
            .map(|(i, (a, b))| Match::between(format!("m{}", i + 1), *a, *b, 1, i as u32 + 1))
            .collect();
        sport
    }

    fn settings(start: &str, end: &str, duration: u32, gap: u32, courts: usize) -> ScheduleSettings {
        ScheduleSettings {
            start_time: start.to_string(),
            end_time: end.to_string(),
            match_duration: duration,
            break_duration: gap,
            court_count: courts,
            court_names: Vec::new(),
            lunch_break: None,
            breaks: Vec::new(),
            time_slots: Vec::new(),
        }
    }

    fn match_slots(slots: &[TimeSlot]) -> Vec<&TimeSlot> {
        slots.iter().filter(|s| s.is_match()).collect()
    }

    #[test]
    fn test_single_court_sequence() {
        let sport = round_robin(&[("a", "b"), ("c", "d"), ("e", "f")]);
        let slots = generate_schedule(&sport, &settings("09:00", "10:00", 20, 5, 1), false).unwrap();

        let times: Vec<(&str, &str)> = slots
            .iter()
            .map(|s| (s.start_time.as_str(), s.end_time.as_str()))
            .collect();
        assert_eq!(
            times,
            vec![("09:00", "09:20"), ("09:25", "09:45"), ("09:50", "10:10")]
        );
        assert!(slots.iter().all(|s| s.court_id.as_deref() == Some("court1")));
    }

    #[test]
    fn test_window_too_short() {
        let sport = round_robin(&[("a", "b"), ("c", "d"), ("e", "f"), ("g", "h")]);
        let err = generate_schedule(&sport, &settings("09:00", "10:00", 20, 5, 1), false).unwrap_err();
        assert_eq!(
            err,
            ScheduleError::WindowTooShort {
                remaining: 1,
                at: "10:15".to_string()
            }
        );
    }

    #[test]
    fn test_two_courts_share_time_windows() {
        let sport = round_robin(&[("a", "b"), ("c", "d"), ("e", "f"), ("g", "h")]);
        let slots = generate_schedule(&sport, &settings("09:00", "12:00", 30, 0, 2), true).unwrap();

        assert_eq!(slots.len(), 4);
        let starts: Vec<&str> = slots.iter().map(|s| s.start_time.as_str()).collect();
        assert_eq!(starts, vec!["09:00", "09:00", "09:30", "09:30"]);
        assert_ne!(slots[0].court_id, slots[1].court_id);
    }

    #[test]
    fn test_shared_team_not_simultaneous() {
        let sport = round_robin(&[("a", "b"), ("a", "c")]);
        let slots = generate_schedule(&sport, &settings("09:00", "12:00", 30, 0, 2), true).unwrap();
        assert_ne!(slots[0].start_time, slots[1].start_time);
    }

    #[test]
    fn test_shared_class_not_simultaneous() {
        let mut sport = round_robin(&[("a", "b"), ("c", "d")]);
        sport.teams = vec![
            Team::new("a", "1-A red"),
            Team::new("b", "2-B"),
            Team::new("c", "1-A white"),
            Team::new("d", "3-C"),
        ];
        let slots = generate_schedule(&sport, &settings("09:00", "12:00", 30, 0, 2), true).unwrap();
        assert_ne!(slots[0].start_time, slots[1].start_time);
    }

    #[test]
    fn test_lunch_is_skipped() {
        let sport = round_robin(&[("a", "b"), ("c", "d")]);
        let mut s = settings("11:30", "15:00", 20, 5, 1);
        s.lunch_break = Some(BreakWindow::new("Lunch", "11:50", "12:40"));

        let slots = generate_schedule(&sport, &s, false).unwrap();
        let lunch = slots.iter().find(|s| s.slot_type == SlotType::Lunch).unwrap();
        assert_eq!(lunch.start_time, "11:50");

        let matches = match_slots(&slots);
        assert_eq!(matches[0].start_time, "11:30");
        assert_eq!(matches[1].start_time, "12:40");
    }

    #[test]
    fn test_consecutive_breaks_are_chained() {
        let sport = round_robin(&[("a", "b")]);
        let mut s = settings("09:00", "15:00", 30, 0, 1);
        s.breaks = vec![
            BreakWindow::new("Opening", "09:00", "09:20"),
            BreakWindow::new("Relay", "09:20", "10:00"),
        ];
        let slots = generate_schedule(&sport, &s, false).unwrap();
        assert_eq!(match_slots(&slots)[0].start_time, "10:00");
        assert_eq!(slots.len(), 3);
    }

    #[test]
    fn test_break_until_end_of_day() {
        let sport = round_robin(&[("a", "b")]);
        let mut s = settings("09:00", "10:00", 30, 0, 1);
        s.lunch_break = Some(BreakWindow::new("Lunch", "09:00", "11:00"));
        let err = generate_schedule(&sport, &s, false).unwrap_err();
        assert!(matches!(err, ScheduleError::WindowTooShort { .. }));
    }

    #[test]
    fn test_breaks_too_dense() {
        let sport = round_robin(&[("a", "b")]);
        let mut s = settings("00:00", "23:59", 10, 0, 1);
        // Back-to-back 5-minute breaks never leave a 10-minute gap
        s.breaks = (0..(MAX_BREAK_ADJUSTMENTS as u32 + 10))
            .map(|i| {
                BreakWindow::new(
                    format!("b{i}"),
                    minutes_to_time(i * 5),
                    minutes_to_time(i * 5 + 5),
                )
            })
            .collect();
        let err = generate_schedule(&sport, &s, false).unwrap_err();
        assert!(matches!(err, ScheduleError::BreaksTooDense { .. }));
    }

    #[test]
    fn test_oversized_match_duration_is_rejected() {
        let sport = round_robin(&[("a", "b")]);
        let s = ScheduleSettings {
            match_duration: u32::MAX - 10,
            ..Default::default()
        };
        assert!(matches!(
            generate_schedule(&sport, &s, true),
            Err(ScheduleError::InvalidSettings(_))
        ));
    }

    #[test]
    fn test_last_match_may_run_past_midnight() {
        let sport = round_robin(&[("a", "b")]);
        let slots = generate_schedule(&sport, &settings("23:30", "23:59", 40, 0, 1), false).unwrap();
        assert_eq!(slots[0].start_time, "23:30");
        assert_eq!(slots[0].end_time, "24:10");
        assert!(slots[0].window().is_err());
    }

    #[test]
    fn test_no_matches() {
        let sport = Sport::new("s", "Volleyball", SportType::RoundRobin);
        assert_eq!(
            generate_schedule(&sport, &ScheduleSettings::default(), true),
            Err(ScheduleError::NoSchedulableMatches)
        );
    }

    #[test]
    fn test_ranking_gets_preparation_slot() {
        let sport = Sport::new("s", "100m sprint", SportType::Ranking);
        let slots = generate_schedule(&sport, &settings("09:00", "11:00", 10, 0, 1), true).unwrap();
        assert_eq!(slots.len(), 1);
        assert_eq!(slots[0].slot_type, SlotType::Preparation);
        assert_eq!(slots[0].start_time, "09:00");
        assert_eq!(slots[0].end_time, "11:00");
    }

    #[test]
    fn test_descriptions_use_team_names() {
        let mut sport = round_robin(&[("a", "b")]);
        sport.teams = vec![Team::new("a", "1-A"), Team::new("b", "1-B")];
        let slots = generate_schedule(&sport, &ScheduleSettings::default(), false).unwrap();
        assert_eq!(slots[0].description, "1-A vs 1-B");
    }

    #[test]
    fn test_schedule_sport_stores_slots() {
        let mut sport = round_robin(&[("a", "b"), ("c", "d")]);
        schedule_sport(&mut sport, Shuffler::with_seed(1), true).unwrap();
        let stored = &sport.schedule_settings.as_ref().unwrap().time_slots;
        assert_eq!(stored.len(), 2);
    }

    #[test]
    fn test_schedule_sport_untouched_on_error() {
        let mut sport = Sport::new("s", "Volleyball", SportType::RoundRobin);
        assert!(schedule_sport(&mut sport, Shuffler::with_seed(1), true).is_err());
        assert!(sport.schedule_settings.is_none());
    }
}
