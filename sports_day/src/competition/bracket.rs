//! Single-elimination bracket structure, seeding and result propagation.
//!
//! A bracket for `P` participants is laid out for the next power of two
//! `S >= P`. Round `r` (1-based inside the bracket) has `S / 2^r` matches,
//! and match `n` of round `r` feeds match `ceil(n / 2)` of round `r + 1`:
//! odd `n` into the team1 slot, even `n` into the team2 slot.
//!
//! Seeds follow the standard order (1 v S, 2 v S-1, top seeds in opposite
//! halves), so the highest seeds meet as late as possible and the
//! `S - P` missing seeds become byes for the top seeds.

use super::models::{MatchId, Match, MatchStatus, THIRD_PLACE_MARKER, THIRD_PLACE_MATCH_NUMBER, TeamId};

/// Smallest field in which both semifinals are played
pub const MIN_THIRD_PLACE_TEAMS: usize = 4;

/// Which side of a match a team occupies
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotPosition {
    Team1,
    Team2,
}

/// A `(round, match_number)` node of the bracket tree
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BracketSlot {
    pub round: u32,
    pub match_number: u32,
}

/// Where a seed starts in the first round
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedPlacement {
    /// 1-based seed
    pub seed: usize,
    pub match_number: u32,
    pub position: SlotPosition,
}

/// How to materialise a bracket into matches
#[derive(Debug, Clone)]
pub struct BracketOptions<'a> {
    /// Round number given to the bracket's first round
    pub first_round: u32,
    /// Prepended to every match id
    pub id_prefix: &'a str,
    /// Add a third-place match fed by the semifinal losers
    pub third_place: bool,
}

/// Next power of two holding `participants` (at least 2)
pub fn bracket_size(participants: usize) -> usize {
    participants.max(2).next_power_of_two()
}

/// Number of rounds needed for `participants`
pub fn round_count(participants: usize) -> u32 {
    bracket_size(participants).trailing_zeros()
}

/// Every match node of the bracket, round by round
pub fn bracket_structure(participants: usize) -> Vec<BracketSlot> {
    let size = bracket_size(participants);
    let mut slots = Vec::with_capacity(size - 1);
    for round in 1..=round_count(participants) {
        let matches_in_round = (size >> round) as u32;
        for match_number in 1..=matches_in_round {
            slots.push(BracketSlot {
                round,
                match_number,
            });
        }
    }
    slots
}

/// Standard seeding order for a bracket of `size` (a power of two).
///
/// Consecutive pairs are first-round opponents: `8 -> [1, 8, 4, 5, 2, 7, 3, 6]`.
pub fn seed_order(size: usize) -> Vec<usize> {
    let mut order = vec![1];
    while order.len() < size {
        let mirror = order.len() * 2 + 1;
        order = order.iter().flat_map(|&s| [s, mirror - s]).collect();
    }
    order
}

/// First-round positions of seeds `1..=participants`; missing seeds are byes.
pub fn seed_placements(participants: usize) -> Vec<SeedPlacement> {
    seed_order(bracket_size(participants))
        .into_iter()
        .enumerate()
        .filter(|&(_, seed)| seed <= participants)
        .map(|(i, seed)| SeedPlacement {
            seed,
            match_number: (i / 2 + 1) as u32,
            position: if i % 2 == 0 {
                SlotPosition::Team1
            } else {
                SlotPosition::Team2
            },
        })
        .collect()
}

/// The match a winner of `match_number` moves on to, and on which side
pub fn next_slot(match_number: u32) -> (u32, SlotPosition) {
    let position = if match_number % 2 == 1 {
        SlotPosition::Team1
    } else {
        SlotPosition::Team2
    };
    (match_number.div_ceil(2), position)
}

pub fn match_id(prefix: &str, round: u32, match_number: u32) -> MatchId {
    format!("{prefix}r{round}-m{match_number}")
}

pub fn third_place_id(prefix: &str) -> MatchId {
    format!("{prefix}{THIRD_PLACE_MARKER}")
}

fn set_slot(m: &mut Match, position: SlotPosition, team_id: Option<TeamId>) {
    match position {
        SlotPosition::Team1 => m.team1_id = team_id,
        SlotPosition::Team2 => m.team2_id = team_id,
    }
}

fn find_mut(matches: &mut [Match], round: u32, match_number: u32) -> Option<&mut Match> {
    matches
        .iter_mut()
        .find(|m| m.round == round && m.match_number == match_number && !m.is_third_place())
}

/// Build the match tree for teams listed in seed order (index 0 is seed 1).
///
/// Byes are resolved one level deep: the lone team of a first-round match is
/// moved into its second-round slot and the bye is marked completed. Fewer
/// than two teams produce no matches. The third-place match needs at least
/// four teams; with three, one semifinal is a bye and never yields a loser.
pub fn build_bracket(seeded: &[TeamId], options: &BracketOptions<'_>) -> Vec<Match> {
    let participants = seeded.len();
    if participants < 2 {
        return Vec::new();
    }

    let offset = options.first_round - 1;
    let prefix = options.id_prefix;
    let rounds = round_count(participants);

    let mut matches: Vec<Match> = bracket_structure(participants)
        .into_iter()
        .map(|slot| {
            let round = slot.round + offset;
            let mut m = Match::new(match_id(prefix, round, slot.match_number), round, slot.match_number);
            if slot.round > 1 {
                m.previous_match_ids = vec![
                    match_id(prefix, round - 1, slot.match_number * 2 - 1),
                    match_id(prefix, round - 1, slot.match_number * 2),
                ];
            }
            m
        })
        .collect();

    for placement in seed_placements(participants) {
        // First-round matches lead the list in match-number order
        let m = &mut matches[placement.match_number as usize - 1];
        set_slot(m, placement.position, Some(seeded[placement.seed - 1].clone()));
    }

    if options.third_place && participants >= MIN_THIRD_PLACE_TEAMS {
        let final_round = rounds + offset;
        let mut third = Match::new(third_place_id(prefix), final_round, THIRD_PLACE_MATCH_NUMBER);
        third.previous_match_ids = vec![
            match_id(prefix, final_round - 1, 1),
            match_id(prefix, final_round - 1, 2),
        ];
        matches.push(third);
    }

    advance_byes(&mut matches, options.first_round);
    matches
}

// One level only: a second-round match made of two byes is not resolved further.
fn advance_byes(matches: &mut [Match], first_round: u32) {
    let advancing: Vec<(u32, TeamId)> = matches
        .iter_mut()
        .filter(|m| m.is_bye(first_round))
        .filter_map(|m| {
            let team = m.team_ids().next().cloned()?;
            m.status = MatchStatus::Completed;
            m.winner_id = Some(team.clone());
            Some((m.match_number, team))
        })
        .collect();

    for (match_number, team) in advancing {
        let (next_number, position) = next_slot(match_number);
        if let Some(next) = find_mut(matches, first_round + 1, next_number) {
            set_slot(next, position, Some(team));
        }
    }
}

/// Push known results through the bracket.
///
/// Winners of completed matches move into their next-round slot; once both
/// semifinals have a winner the third-place match receives the two losers
/// (first semifinal's loser as team1). Group-stage matches are left as they are.
pub fn propagate_results(matches: &[Match]) -> Vec<Match> {
    let mut updated = matches.to_vec();

    let Some(final_round) = updated
        .iter()
        .filter(|m| !m.is_group_stage() && !m.is_third_place())
        .map(|m| m.round)
        .max()
    else {
        return updated;
    };

    let advancing: Vec<(u32, u32, TeamId)> = updated
        .iter()
        .filter(|m| !m.is_group_stage() && !m.is_third_place() && m.round < final_round)
        .filter(|m| m.is_completed())
        .filter_map(|m| Some((m.round, m.match_number, m.winner_id.clone()?)))
        .collect();

    for (round, match_number, winner) in advancing {
        let (next_number, position) = next_slot(match_number);
        if let Some(next) = updated
            .iter_mut()
            .filter(|m| !m.is_group_stage())
            .find(|m| m.round == round + 1 && m.match_number == next_number && !m.is_third_place())
        {
            set_slot(next, position, Some(winner));
        }
    }

    let semifinal_loser = |number: u32| {
        updated
            .iter()
            .filter(|m| !m.is_group_stage() && !m.is_third_place())
            .find(|m| m.round + 1 == final_round && m.match_number == number)
            .and_then(|m| m.loser_id().cloned())
    };
    let losers = (semifinal_loser(1), semifinal_loser(2));

    if let (Some(first), Some(second)) = losers {
        if let Some(third) = updated
            .iter_mut()
            .find(|m| !m.is_group_stage() && m.is_third_place())
        {
            third.team1_id = Some(first);
            third.team2_id = Some(second);
        }
    }

    updated
}
