//! Playoff generation from group-stage standings.

use super::bracket::{BracketOptions, build_bracket, propagate_results, round_count};
use super::models::{Block, Match, Sport, Team, TeamId};
use super::standings::rank_block;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

/// Prefix of every playoff match id
pub const PLAYOFF_ID_PREFIX: &str = "playoff-";

/// The group stage is round 1, so the playoff starts at round 2
pub const PLAYOFF_FIRST_ROUND: u32 = 2;

/// Reasons a playoff cannot be generated
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlayoffError {
    #[error("No blocks to qualify from")]
    NoBlocks,

    #[error("At least one team must advance from each block")]
    NoAdvancingTeams,

    #[error("Not enough qualified teams: need at least 2, have {0}")]
    NotEnoughQualifiers(usize),

    #[error("Block {block} lists unknown team {team}")]
    UnknownTeam { block: String, team: TeamId },

    #[error("Sport {0} has no league settings")]
    MissingLeagueSettings(String),
}

pub type PlayoffResult<T> = Result<T, PlayoffError>;

/// Structured result of a playoff generation; never an error to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayoffOutcome {
    pub success: bool,
    pub message: String,
    pub matches: Vec<Match>,
}

impl PlayoffOutcome {
    fn succeeded(matches: Vec<Match>, qualifiers: usize) -> Self {
        Self {
            success: true,
            message: format!(
                "Generated {} playoff matches for {} qualified teams",
                matches.len(),
                qualifiers
            ),
            matches,
        }
    }

    fn failed(error: PlayoffError) -> Self {
        Self {
            success: false,
            message: format!("Failed to generate playoff: {error}"),
            matches: Vec::new(),
        }
    }
}

/// Top `advancing_teams` of every block, concatenated in block order.
///
/// The count is clipped to each block's size.
pub fn qualifiers(blocks: &[Block], advancing_teams: usize) -> Vec<TeamId> {
    blocks
        .iter()
        .flat_map(|block| rank_block(block).into_iter().take(advancing_teams))
        .collect()
}

/// Qualifiers in seed order: every block winner (in block order), then every
/// runner-up, and so on. Seed 1 is the first block's winner.
fn seeded_qualifiers(blocks: &[Block], advancing_teams: usize) -> Vec<TeamId> {
    let rankings: Vec<Vec<TeamId>> = blocks.iter().map(rank_block).collect();
    let mut seeded = Vec::new();
    for place in 0..advancing_teams {
        for ranking in &rankings {
            if let Some(team) = ranking.get(place) {
                seeded.push(team.clone());
            }
        }
    }
    seeded
}

fn check_blocks(blocks: &[Block], teams: &[Team]) -> PlayoffResult<()> {
    let known: HashSet<&str> = teams.iter().map(|t| t.id.as_str()).collect();
    for block in blocks {
        if let Some(team) = block.team_ids.iter().find(|id| !known.contains(id.as_str())) {
            return Err(PlayoffError::UnknownTeam {
                block: block.name.clone(),
                team: team.clone(),
            });
        }
    }
    Ok(())
}

fn try_generate(
    blocks: &[Block],
    teams: &[Team],
    advancing_teams: usize,
    third_place: bool,
) -> PlayoffResult<(Vec<Match>, usize)> {
    if blocks.is_empty() {
        return Err(PlayoffError::NoBlocks);
    }
    if advancing_teams == 0 {
        return Err(PlayoffError::NoAdvancingTeams);
    }
    check_blocks(blocks, teams)?;

    if let Some(small) = blocks.iter().find(|b| b.team_ids.len() < advancing_teams) {
        log::warn!(
            "Block {} has {} teams, fewer than the {} requested to advance",
            small.name,
            small.team_ids.len(),
            advancing_teams
        );
    }

    let seeded = seeded_qualifiers(blocks, advancing_teams);
    if seeded.len() < 2 {
        return Err(PlayoffError::NotEnoughQualifiers(seeded.len()));
    }

    let options = BracketOptions {
        first_round: PLAYOFF_FIRST_ROUND,
        id_prefix: PLAYOFF_ID_PREFIX,
        third_place,
    };
    let matches = build_bracket(&seeded, &options);

    log::debug!(
        "Playoff bracket: {} qualifiers, {} rounds",
        seeded.len(),
        round_count(seeded.len())
    );

    Ok((matches, seeded.len()))
}

/// Generate the playoff for a league.
///
/// Never fails outward: any problem is reported as an outcome with
/// `success == false`, an explanatory message and no matches.
pub fn generate_playoff(
    blocks: &[Block],
    teams: &[Team],
    advancing_teams: usize,
    third_place: bool,
) -> PlayoffOutcome {
    match try_generate(blocks, teams, advancing_teams, third_place) {
        Ok((matches, qualified)) => {
            let outcome = PlayoffOutcome::succeeded(matches, qualified);
            log::info!("{}", outcome.message);
            outcome
        }
        Err(e) => {
            log::warn!("Playoff generation failed: {}", e);
            PlayoffOutcome::failed(e)
        }
    }
}

/// A sport's blocks with their matches taken from `sport.matches`, where
/// scores are recorded.
pub fn blocks_with_results(sport: &Sport) -> Vec<Block> {
    sport
        .blocks
        .iter()
        .map(|block| Block {
            matches: sport
                .matches
                .iter()
                .filter(|m| m.block_id.as_ref() == Some(&block.id))
                .cloned()
                .collect(),
            ..block.clone()
        })
        .collect()
}

/// Generate the playoff of a league sport from its current results and settings.
pub fn generate_playoff_for_sport(sport: &Sport) -> PlayoffOutcome {
    let Some(settings) = &sport.league_settings else {
        return PlayoffOutcome::failed(PlayoffError::MissingLeagueSettings(sport.id.clone()));
    };
    generate_playoff(
        &blocks_with_results(sport),
        &sport.teams,
        settings.advancing_teams,
        settings.has_third_place_match,
    )
}

/// Replace a sport's playoff matches, keeping its group stage.
pub fn attach_playoff(sport: &mut Sport, playoff: Vec<Match>) {
    sport.matches.retain(|m| m.is_group_stage());
    sport.matches.extend(playoff);
}

/// Propagate completed playoff results: winners move on, semifinal losers
/// fill the third-place match.
pub fn update_playoff_matches(matches: &[Match]) -> Vec<Match> {
    propagate_results(matches)
}
