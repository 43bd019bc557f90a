//! Group-stage block generation.

use super::models::{Block, BlockId, Match, Sport, Team, TeamId};
use crate::shuffle::Shuffler;

/// Block letter for a zero-based index: A, B, ..., Z, AA, AB, ...
fn block_letter(index: usize) -> String {
    let mut n = index;
    let mut letters = Vec::new();
    loop {
        letters.push((b'A' + (n % 26) as u8) as char);
        if n < 26 {
            break;
        }
        n = n / 26 - 1;
    }
    letters.iter().rev().collect()
}

/// Split `teams` into `block_count` balanced blocks, each with a full round robin.
///
/// Teams are shuffled, then dealt one at a time across the blocks, so block
/// sizes never differ by more than one. An empty team list or a zero block
/// count yields no blocks.
pub fn generate_blocks(teams: &[Team], block_count: usize, shuffler: &mut Shuffler) -> Vec<Block> {
    if teams.is_empty() || block_count == 0 {
        return Vec::new();
    }

    let team_ids: Vec<TeamId> = teams.iter().map(|t| t.id.clone()).collect();
    let drawn = shuffler.shuffled(&team_ids);

    let mut blocks: Vec<Block> = (0..block_count)
        .map(|i| {
            let name = block_letter(i);
            Block {
                id: format!("block-{}", name.to_lowercase()),
                name,
                team_ids: Vec::new(),
                matches: Vec::new(),
            }
        })
        .collect();

    for (i, team_id) in drawn.into_iter().enumerate() {
        blocks[i % block_count].team_ids.push(team_id);
    }

    for block in &mut blocks {
        block.matches = round_robin_pairings(&block.team_ids, Some(&block.id), &block.id);
    }

    log::info!(
        "Generated {} blocks for {} teams ({} group matches)",
        blocks.len(),
        teams.len(),
        blocks.iter().map(|b| b.matches.len()).sum::<usize>()
    );

    blocks
}

/// Every unordered pair of `team_ids`, in draw order, as round-1 matches.
///
/// Match ids are `{id_prefix}-m{n}` with `n` counting from 1.
pub fn round_robin_pairings(
    team_ids: &[TeamId],
    block_id: Option<&BlockId>,
    id_prefix: &str,
) -> Vec<Match> {
    let mut matches = Vec::with_capacity(team_ids.len() * team_ids.len().saturating_sub(1) / 2);
    let mut match_number = 1;

    for i in 0..team_ids.len() {
        for j in (i + 1)..team_ids.len() {
            let mut m = Match::between(
                format!("{id_prefix}-m{match_number}"),
                team_ids[i].clone(),
                team_ids[j].clone(),
                1,
                match_number,
            );
            m.block_id = block_id.cloned();
            matches.push(m);
            match_number += 1;
        }
    }

    matches
}

/// Store freshly generated blocks on a league sport.
///
/// Replaces the sport's group-stage matches with the blocks' matches (playoff
/// matches are dropped since they no longer match the draw) and records each
/// team's block.
pub fn assign_blocks(sport: &mut Sport, blocks: Vec<Block>) {
    for team in &mut sport.teams {
        team.block_id = blocks
            .iter()
            .find(|b| b.contains(&team.id))
            .map(|b| b.id.clone());
    }

    sport.matches = blocks.iter().flat_map(|b| b.matches.clone()).collect();
    sport.blocks = blocks;
}
