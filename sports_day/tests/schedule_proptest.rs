//! Property-based tests for time conversion and court scheduling using proptest
//!
//! These tests verify the timetable guarantees across randomly generated
//! team counts, court counts and shuffles.

#[cfg(test)]
mod schedule_property_tests {
    use proptest::prelude::*;
    use sports_day::competition::{Match, extract_class_id, generate_round_robin, generate_tournament};
    use sports_day::schedule::{BreakWindow, CourtScheduler, ScheduleSettings, TimeSlot};
    use sports_day::time::MINUTES_PER_DAY;
    use sports_day::{Shuffler, Sport, SportType, Team, minutes_to_time, overlaps, time_to_minutes};
    use std::collections::{BTreeMap, HashMap, HashSet};

    // Team names drawn from a few grades so classes collide
    fn teams_strategy() -> impl Strategy<Value = Vec<Team>> {
        prop::collection::vec((1u8..=3, 0u8..4), 2..=9).prop_map(|classes| {
            classes
                .into_iter()
                .enumerate()
                .map(|(i, (grade, section))| {
                    Team::new(
                        format!("t{i}"),
                        format!("{}-{} #{}", grade, (b'A' + section) as char, i),
                    )
                })
                .collect()
        })
    }

    fn day_settings(court_count: usize) -> ScheduleSettings {
        ScheduleSettings {
            start_time: "08:00".to_string(),
            end_time: "21:00".to_string(),
            match_duration: 10,
            break_duration: 5,
            court_count,
            court_names: Vec::new(),
            lunch_break: Some(BreakWindow::new("Lunch", "12:00", "13:00")),
            breaks: vec![BreakWindow::new("Relay", "15:00", "15:30")],
            time_slots: Vec::new(),
        }
    }

    fn schedule(sport: &Sport, court_count: usize, seed: u64) -> Vec<TimeSlot> {
        CourtScheduler::new(&day_settings(court_count))
            .unwrap()
            .with_shuffler(Shuffler::with_seed(seed))
            .generate(sport, true)
            .unwrap()
    }

    // Match slots grouped by start time
    fn by_start<'s>(slots: &'s [TimeSlot]) -> BTreeMap<&'s str, Vec<&'s TimeSlot>> {
        let mut ticks: BTreeMap<&str, Vec<&TimeSlot>> = BTreeMap::new();
        for slot in slots.iter().filter(|s| s.is_match()) {
            ticks.entry(slot.start_time.as_str()).or_default().push(slot);
        }
        ticks
    }

    proptest! {
        #[test]
        fn test_time_round_trip(minutes in 0u32..MINUTES_PER_DAY) {
            prop_assert_eq!(time_to_minutes(&minutes_to_time(minutes)).unwrap(), minutes);
        }

        #[test]
        fn test_overlap_is_symmetric(a in 0u32..1000, la in 1u32..120, b in 0u32..1000, lb in 1u32..120) {
            prop_assert_eq!(overlaps(a, a + la, b, b + lb), overlaps(b, b + lb, a, a + la));
        }

        #[test]
        fn test_touching_intervals_do_not_overlap(a in 0u32..1000, len in 1u32..120, next in 1u32..120) {
            prop_assert!(!overlaps(a, a + len, a + len, a + len + next));
        }

        #[test]
        fn test_round_robin_schedule_invariants(
            teams in teams_strategy(),
            court_count in 1usize..=2,
            seed in any::<u64>(),
        ) {
            let mut sport = Sport::new("rr", "Round robin", SportType::RoundRobin);
            sport.matches = generate_round_robin(&teams, &mut Shuffler::with_seed(seed));
            sport.teams = teams;
            let matches: HashMap<&str, &Match> = sport.matches.iter().map(|m| (m.id.as_str(), m)).collect();

            let slots = schedule(&sport, court_count, seed);

            // Every match exactly once
            let placed: Vec<&str> = slots.iter().filter_map(|s| s.match_id.as_deref()).collect();
            let unique: HashSet<&str> = placed.iter().copied().collect();
            prop_assert_eq!(placed.len(), sport.matches.len());
            prop_assert_eq!(unique.len(), placed.len());

            let lunch = (time_to_minutes("12:00").unwrap(), time_to_minutes("13:00").unwrap());
            let relay = (time_to_minutes("15:00").unwrap(), time_to_minutes("15:30").unwrap());

            for (_, tick) in by_start(&slots) {
                prop_assert!(tick.len() <= court_count);

                let courts: HashSet<_> = tick.iter().map(|s| s.court_id.clone()).collect();
                prop_assert_eq!(courts.len(), tick.len());

                let mut seen_teams = HashSet::new();
                let mut seen_classes = HashSet::new();
                for slot in &tick {
                    let start = time_to_minutes(&slot.start_time).unwrap();
                    let end = time_to_minutes(&slot.end_time).unwrap();
                    prop_assert!(!overlaps(start, end, lunch.0, lunch.1));
                    prop_assert!(!overlaps(start, end, relay.0, relay.1));

                    let m = matches[slot.match_id.as_deref().unwrap()];
                    for team_id in m.team_ids() {
                        prop_assert!(seen_teams.insert(team_id.clone()));
                        let team = sport.team(team_id).unwrap();
                        if let Some(class) = extract_class_id(&team.name) {
                            prop_assert!(seen_classes.insert(class), "class twice in {}", slot.start_time);
                        }
                    }
                }
            }
        }

        #[test]
        fn test_tournament_feeders_finish_first(
            n in 2usize..=12,
            court_count in 1usize..=2,
            seed in any::<u64>(),
        ) {
            let teams: Vec<Team> = (0..n).map(|i| Team::new(format!("t{i}"), format!("Team {i}"))).collect();
            let mut sport = Sport::new("ko", "Knockout", SportType::Tournament);
            sport.matches = generate_tournament(&teams, true, &mut Shuffler::with_seed(seed));
            sport.teams = teams;

            let slots = schedule(&sport, court_count, seed);
            let placed: HashMap<&str, &TimeSlot> = slots
                .iter()
                .filter_map(|s| s.match_id.as_deref().map(|id| (id, s)))
                .collect();

            for m in &sport.matches {
                match placed.get(m.id.as_str()) {
                    None => prop_assert!(m.is_bye(1)),
                    Some(slot) => {
                        let start = time_to_minutes(&slot.start_time).unwrap();
                        for feeder in m.previous_match_ids.iter().filter_map(|id| placed.get(id.as_str())) {
                            prop_assert!(time_to_minutes(&feeder.end_time).unwrap() <= start);
                        }
                    }
                }
            }
        }
    }
}
