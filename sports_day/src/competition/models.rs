//! Competition data models: teams, matches, blocks and sports.

use super::conflict::extract_class_id;
use crate::schedule::ScheduleSettings;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Team ID type
pub type TeamId = String;

/// Match ID type
pub type MatchId = String;

/// Block ID type
pub type BlockId = String;

/// Match number reserved for the third-place match
pub const THIRD_PLACE_MATCH_NUMBER: u32 = 0;

/// Any match whose id contains this marker is the third-place match
pub const THIRD_PLACE_MARKER: &str = "third-place";

/// A team taking part in a sport.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Team {
    /// Team ID
    pub id: TeamId,
    /// Display name, usually carrying the class (e.g. "1-A")
    pub name: String,
    /// Class the team belongs to; two teams of one class never play at once
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class_id: Option<String>,
    /// Group-stage block, once assigned
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_id: Option<BlockId>,
}

impl Team {
    /// Create a team, deriving its class from the name when possible
    pub fn new(id: impl Into<TeamId>, name: impl Into<String>) -> Self {
        let name = name.into();
        let class_id = extract_class_id(&name);
        Self {
            id: id.into(),
            name,
            class_id,
            block_id: None,
        }
    }

    /// Override the derived class
    pub fn with_class(mut self, class_id: impl Into<String>) -> Self {
        self.class_id = Some(class_id.into());
        self
    }

    /// Class used for conflict checks.
    ///
    /// Teams stored before `class_id` existed fall back to parsing the name.
    pub fn class_key(&self) -> Option<String> {
        self.class_id
            .clone()
            .or_else(|| extract_class_id(&self.name))
    }
}

/// Match lifecycle
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MatchStatus {
    #[default]
    Scheduled,
    InProgress,
    Completed,
}

/// A single game between two (possibly undetermined) teams.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Match {
    /// Match ID
    pub id: MatchId,
    /// First team, `None` while undetermined or for a bye
    #[serde(default)]
    pub team1_id: Option<TeamId>,
    /// Second team, `None` while undetermined or for a bye
    #[serde(default)]
    pub team2_id: Option<TeamId>,
    #[serde(default)]
    pub team1_score: u32,
    #[serde(default)]
    pub team2_score: u32,
    /// Round number (1 = first round / group round)
    pub round: u32,
    /// Position within the round; 0 is the third-place match
    pub match_number: u32,
    #[serde(default)]
    pub status: MatchStatus,
    /// Present for group-stage matches only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_id: Option<BlockId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub winner_id: Option<TeamId>,
    /// Matches whose results feed this one
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub previous_match_ids: Vec<MatchId>,
}

impl Match {
    /// Create a match with both team slots empty
    pub fn new(id: impl Into<MatchId>, round: u32, match_number: u32) -> Self {
        Self {
            id: id.into(),
            team1_id: None,
            team2_id: None,
            team1_score: 0,
            team2_score: 0,
            round,
            match_number,
            status: MatchStatus::Scheduled,
            block_id: None,
            winner_id: None,
            previous_match_ids: Vec::new(),
        }
    }

    /// Create a match between two known teams
    pub fn between(
        id: impl Into<MatchId>,
        team1: impl Into<TeamId>,
        team2: impl Into<TeamId>,
        round: u32,
        match_number: u32,
    ) -> Self {
        let mut m = Self::new(id, round, match_number);
        m.team1_id = Some(team1.into());
        m.team2_id = Some(team2.into());
        m
    }

    /// Attach the match to a group-stage block
    pub fn in_block(mut self, block_id: impl Into<BlockId>) -> Self {
        self.block_id = Some(block_id.into());
        self
    }

    pub fn is_third_place(&self) -> bool {
        self.match_number == THIRD_PLACE_MATCH_NUMBER || self.id.contains(THIRD_PLACE_MARKER)
    }

    pub fn is_group_stage(&self) -> bool {
        self.block_id.is_some()
    }

    pub fn is_completed(&self) -> bool {
        self.status == MatchStatus::Completed
    }

    /// Assigned team ids, team1 first
    pub fn team_ids(&self) -> impl Iterator<Item = &TeamId> {
        self.team1_id.iter().chain(self.team2_id.iter())
    }

    pub fn assigned_team_count(&self) -> usize {
        self.team_ids().count()
    }

    pub fn involves(&self, team_id: &str) -> bool {
        self.team_ids().any(|id| id == team_id)
    }

    /// A first-round match with exactly one team: never played, only advanced.
    pub fn is_bye(&self, first_round: u32) -> bool {
        !self.is_third_place() && self.round == first_round && self.assigned_team_count() == 1
    }

    /// Record a final score and complete the match.
    ///
    /// A draw completes the match without a winner.
    pub fn record_result(&mut self, team1_score: u32, team2_score: u32) {
        self.team1_score = team1_score;
        self.team2_score = team2_score;
        self.status = MatchStatus::Completed;
        self.winner_id = match team1_score.cmp(&team2_score) {
            std::cmp::Ordering::Greater => self.team1_id.clone(),
            std::cmp::Ordering::Less => self.team2_id.clone(),
            std::cmp::Ordering::Equal => None,
        };
    }

    /// The beaten side, once a winner is known
    pub fn loser_id(&self) -> Option<&TeamId> {
        let winner = self.winner_id.as_ref()?;
        if self.team1_id.as_ref() == Some(winner) {
            self.team2_id.as_ref()
        } else if self.team2_id.as_ref() == Some(winner) {
            self.team1_id.as_ref()
        } else {
            None
        }
    }
}

/// A group-stage partition playing an internal round robin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Block {
    pub id: BlockId,
    pub name: String,
    /// Member teams in draw order
    pub team_ids: Vec<TeamId>,
    #[serde(default)]
    pub matches: Vec<Match>,
}

impl Block {
    pub fn contains(&self, team_id: &str) -> bool {
        self.team_ids.iter().any(|id| id == team_id)
    }
}

/// Competition format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SportType {
    /// Single elimination
    Tournament,
    /// Everyone plays everyone
    RoundRobin,
    /// Group blocks followed by a playoff
    League,
    /// Timed or measured events, no matches
    Ranking,
}

impl std::fmt::Display for SportType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SportType::Tournament => write!(f, "tournament"),
            SportType::RoundRobin => write!(f, "roundRobin"),
            SportType::League => write!(f, "league"),
            SportType::Ranking => write!(f, "ranking"),
        }
    }
}

/// League configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeagueSettings {
    /// Number of group-stage blocks
    pub block_count: usize,
    /// Teams advancing from each block to the playoff
    pub advancing_teams: usize,
    #[serde(default)]
    pub has_third_place_match: bool,
}

impl Default for LeagueSettings {
    fn default() -> Self {
        Self {
            block_count: 2,
            advancing_teams: 2,
            has_third_place_match: false,
        }
    }
}

/// Tournament configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TournamentSettings {
    #[serde(default)]
    pub has_third_place_match: bool,
}

/// Round-robin points configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoundRobinSettings {
    pub win_points: u32,
    pub draw_points: u32,
    pub lose_points: u32,
    /// Whether a loss earns `lose_points`
    #[serde(default)]
    pub count_lose_points: bool,
}

impl Default for RoundRobinSettings {
    fn default() -> Self {
        Self {
            win_points: 3,
            draw_points: 1,
            lose_points: 0,
            count_lose_points: false,
        }
    }
}

/// One competition of the sports day, as supplied by the calling layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sport {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub sport_type: SportType,
    #[serde(default)]
    pub teams: Vec<Team>,
    /// Every match of the sport, group stage and playoff alike
    #[serde(default)]
    pub matches: Vec<Match>,
    #[serde(default)]
    pub blocks: Vec<Block>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub league_settings: Option<LeagueSettings>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tournament_settings: Option<TournamentSettings>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub round_robin_settings: Option<RoundRobinSettings>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schedule_settings: Option<ScheduleSettings>,
}

impl Sport {
    /// Create an empty sport
    pub fn new(id: impl Into<String>, name: impl Into<String>, sport_type: SportType) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            sport_type,
            teams: Vec::new(),
            matches: Vec::new(),
            blocks: Vec::new(),
            league_settings: None,
            tournament_settings: None,
            round_robin_settings: None,
            schedule_settings: None,
        }
    }

    pub fn team(&self, team_id: &str) -> Option<&Team> {
        self.teams.iter().find(|t| t.id == team_id)
    }

    /// Lookup table by team id
    pub fn team_index(&self) -> HashMap<&str, &Team> {
        self.teams.iter().map(|t| (t.id.as_str(), t)).collect()
    }

    pub fn group_matches(&self) -> impl Iterator<Item = &Match> {
        self.matches.iter().filter(|m| m.is_group_stage())
    }

    pub fn playoff_matches(&self) -> impl Iterator<Item = &Match> {
        self.matches.iter().filter(|m| !m.is_group_stage())
    }
}
