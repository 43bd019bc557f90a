//! Points tables for blocks and round-robin competitions.

use super::models::{Block, Match, RoundRobinSettings, TeamId};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashMap;

/// Points awarded per result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointsRule {
    pub win: u32,
    pub draw: u32,
    pub lose: u32,
    /// Whether a loss earns `lose` points at all
    pub count_lose_points: bool,
}

impl Default for PointsRule {
    /// League scoring: 3 for a win, 1 for a draw, nothing for a loss
    fn default() -> Self {
        Self {
            win: 3,
            draw: 1,
            lose: 0,
            count_lose_points: false,
        }
    }
}

impl From<&RoundRobinSettings> for PointsRule {
    fn from(settings: &RoundRobinSettings) -> Self {
        Self {
            win: settings.win_points,
            draw: settings.draw_points,
            lose: settings.lose_points,
            count_lose_points: settings.count_lose_points,
        }
    }
}

/// One line of a points table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StandingRow {
    pub team_id: TeamId,
    pub played: u32,
    pub wins: u32,
    pub draws: u32,
    pub losses: u32,
    pub goals_for: u32,
    pub goals_against: u32,
    pub points: u32,
}

impl StandingRow {
    fn new(team_id: TeamId) -> Self {
        Self {
            team_id,
            played: 0,
            wins: 0,
            draws: 0,
            losses: 0,
            goals_for: 0,
            goals_against: 0,
            points: 0,
        }
    }

    pub fn goal_difference(&self) -> i64 {
        self.goals_for as i64 - self.goals_against as i64
    }

    fn record(&mut self, scored: u32, conceded: u32, rule: &PointsRule) {
        self.played += 1;
        self.goals_for += scored;
        self.goals_against += conceded;
        match scored.cmp(&conceded) {
            Ordering::Greater => {
                self.wins += 1;
                self.points += rule.win;
            }
            Ordering::Equal => {
                self.draws += 1;
                self.points += rule.draw;
            }
            Ordering::Less => {
                self.losses += 1;
                if rule.count_lose_points {
                    self.points += rule.lose;
                }
            }
        }
    }
}

// Points, then goal difference, then goals scored; all descending.
fn compare_rows(a: &StandingRow, b: &StandingRow) -> Ordering {
    b.points
        .cmp(&a.points)
        .then_with(|| b.goal_difference().cmp(&a.goal_difference()))
        .then_with(|| b.goals_for.cmp(&a.goals_for))
}

/// Build the ranked points table for `team_ids` from completed `matches`.
///
/// Only completed matches between two listed teams count. Teams level on
/// every criterion keep their order in `team_ids`, so equal inputs always
/// rank the same way.
pub fn calculate_standings(
    team_ids: &[TeamId],
    matches: &[Match],
    rule: &PointsRule,
) -> Vec<StandingRow> {
    let mut rows: Vec<StandingRow> = team_ids.iter().cloned().map(StandingRow::new).collect();
    let position: HashMap<&str, usize> = team_ids
        .iter()
        .enumerate()
        .map(|(i, id)| (id.as_str(), i))
        .collect();

    for m in matches.iter().filter(|m| m.is_completed()) {
        let (Some(team1), Some(team2)) = (m.team1_id.as_deref(), m.team2_id.as_deref()) else {
            continue;
        };
        let (Some(&i1), Some(&i2)) = (position.get(team1), position.get(team2)) else {
            continue;
        };
        rows[i1].record(m.team1_score, m.team2_score, rule);
        rows[i2].record(m.team2_score, m.team1_score, rule);
    }

    // Stable sort: the draw order is the final tie-break
    rows.sort_by(compare_rows);
    rows
}

/// Team ids of a block, best first, under league scoring.
pub fn rank_block(block: &Block) -> Vec<TeamId> {
    calculate_standings(&block.team_ids, &block.matches, &PointsRule::default())
        .into_iter()
        .map(|row| row.team_id)
        .collect()
}
