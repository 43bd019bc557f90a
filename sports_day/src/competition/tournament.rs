//! Stand-alone tournament and round-robin competitions.

use super::blocks::round_robin_pairings;
use super::bracket::{BracketOptions, build_bracket, propagate_results};
use super::models::{Match, Sport, Team, TeamId};
use super::standings::{PointsRule, StandingRow, calculate_standings};
use crate::shuffle::Shuffler;

/// Id prefix of round-robin matches
pub const ROUND_ROBIN_ID_PREFIX: &str = "rr";

/// Draw a single-elimination bracket starting at round 1.
///
/// Teams are shuffled into seed order; byes go to the top seeds and advance
/// straight to round 2. Fewer than two teams produce no matches.
pub fn generate_tournament(teams: &[Team], third_place: bool, shuffler: &mut Shuffler) -> Vec<Match> {
    if teams.len() < 2 {
        log::warn!("Tournament needs at least 2 teams, got {}", teams.len());
        return Vec::new();
    }

    let ids: Vec<TeamId> = teams.iter().map(|t| t.id.clone()).collect();
    let seeded = shuffler.shuffled(&ids);
    let options = BracketOptions {
        first_round: 1,
        id_prefix: "",
        third_place,
    };
    let matches = build_bracket(&seeded, &options);

    log::info!(
        "Generated tournament bracket: {} teams, {} matches",
        teams.len(),
        matches.len()
    );
    matches
}

/// Propagate completed tournament results into later rounds.
pub fn update_tournament_matches(matches: &[Match]) -> Vec<Match> {
    propagate_results(matches)
}

/// Every team plays every other team once, in round 1.
pub fn generate_round_robin(teams: &[Team], shuffler: &mut Shuffler) -> Vec<Match> {
    let ids: Vec<TeamId> = teams.iter().map(|t| t.id.clone()).collect();
    let drawn = shuffler.shuffled(&ids);
    round_robin_pairings(&drawn, None, ROUND_ROBIN_ID_PREFIX)
}

/// Points table of a round-robin sport, scored with its own settings.
pub fn round_robin_standings(sport: &Sport) -> Vec<StandingRow> {
    let rule = sport
        .round_robin_settings
        .as_ref()
        .map(PointsRule::from)
        .unwrap_or_default();
    let ids: Vec<TeamId> = sport.teams.iter().map(|t| t.id.clone()).collect();
    calculate_standings(&ids, &sport.matches, &rule)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::competition::models::{RoundRobinSettings, SportType};

    fn make_teams(n: usize) -> Vec<Team> {
        (1..=n)
            .map(|i| Team::new(format!("t{i}"), format!("{}-{}", i % 3 + 1, i)))
            .collect()
    }

    #[test]
    fn test_tournament_of_six() {
        let matches = generate_tournament(&make_teams(6), true, &mut Shuffler::with_seed(9));

        // 4 + 2 + 1 bracket nodes plus the third-place match
        assert_eq!(matches.len(), 8);
        let byes: Vec<&Match> = matches.iter().filter(|m| m.is_bye(1)).collect();
        assert_eq!(byes.len(), 2);
        assert!(byes.iter().all(|m| m.is_completed() && m.winner_id.is_some()));
        assert_eq!(matches.iter().filter(|m| m.is_third_place()).count(), 1);
    }

    #[test]
    fn test_every_team_enters_bracket_once() {
        let teams = make_teams(7);
        let matches = generate_tournament(&teams, false, &mut Shuffler::new());
        for team in &teams {
            let appearances = matches
                .iter()
                .filter(|m| m.round == 1 && m.involves(&team.id))
                .count();
            assert_eq!(appearances, 1);
        }
    }

    #[test]
    fn test_tournament_too_small() {
        assert!(generate_tournament(&make_teams(1), false, &mut Shuffler::new()).is_empty());
    }

    #[test]
    fn test_update_tournament_matches() {
        let mut matches = generate_tournament(&make_teams(4), false, &mut Shuffler::with_seed(3));
        let semi = matches.iter_mut().find(|m| m.id == "r1-m2").unwrap();
        semi.record_result(0, 1);
        let winner = semi.winner_id.clone();

        let updated = update_tournament_matches(&matches);
        let final_match = updated.iter().find(|m| m.id == "r2-m1").unwrap();
        assert_eq!(final_match.team2_id, winner);
    }

    #[test]
    fn test_round_robin_generation() {
        let matches = generate_round_robin(&make_teams(5), &mut Shuffler::with_seed(4));
        assert_eq!(matches.len(), 10);
        assert!(matches.iter().all(|m| m.id.starts_with("rr-m") && m.block_id.is_none()));
    }

    #[test]
    fn test_round_robin_standings_use_sport_settings() {
        let mut sport = Sport::new("s", "Table tennis", SportType::RoundRobin);
        sport.teams = make_teams(2);
        sport.round_robin_settings = Some(RoundRobinSettings {
            win_points: 2,
            draw_points: 1,
            lose_points: 1,
            count_lose_points: true,
        });
        let mut m = Match::between("rr-m1", "t1", "t2", 1, 1);
        m.record_result(11, 7);
        sport.matches.push(m);

        let table = round_robin_standings(&sport);
        assert_eq!(table[0].team_id, "t1");
        assert_eq!(table[0].points, 2);
        assert_eq!(table[1].points, 1);
    }
}
