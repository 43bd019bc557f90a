//! Match queues handed to the court scheduler.
//!
//! Each competition type orders its matches differently before placement:
//! - Tournament: byes removed, rounds in ascending order, shuffled inside a round
//! - Round robin: the whole list shuffled
//! - League: blocks shuffled and interleaved one match at a time, then the
//!   playoff by round with the final and third-place match held back

use super::slot::TimeSlot;
use crate::competition::{Match, MatchId, Sport, SportType};
use crate::shuffle::Shuffler;
use std::collections::{BTreeMap, HashMap};

/// Matches played last, after the rest of the playoff
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Finale {
    pub final_match: Option<Match>,
    pub third_place: Option<Match>,
}

impl Finale {
    pub fn is_empty(&self) -> bool {
        self.final_match.is_none() && self.third_place.is_none()
    }

    pub fn len(&self) -> usize {
        self.final_match.iter().count() + self.third_place.iter().count()
    }
}

/// Ordered matches to place, phase by phase
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScheduleQueue {
    /// Placed one after another; a phase starts once the previous one is empty
    pub phases: Vec<Vec<Match>>,
    pub finale: Finale,
}

impl ScheduleQueue {
    /// Matches waiting in total
    pub fn len(&self) -> usize {
        self.phases.iter().map(Vec::len).sum::<usize>() + self.finale.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Position of each match in a previously generated timetable
fn prior_order(slots: &[TimeSlot]) -> HashMap<MatchId, usize> {
    let mut placed: Vec<&TimeSlot> = slots.iter().filter(|s| s.is_match()).collect();
    // "HH:MM" strings sort chronologically
    placed.sort_by(|a, b| {
        a.start_time
            .cmp(&b.start_time)
            .then_with(|| a.court_id.cmp(&b.court_id))
    });
    placed
        .into_iter()
        .filter_map(|s| s.match_id.clone())
        .enumerate()
        .map(|(i, id)| (id, i))
        .collect()
}

/// Builds a [`ScheduleQueue`] for one sport.
pub struct QueueBuilder<'a> {
    /// `None` keeps the existing order
    shuffler: Option<&'a mut Shuffler>,
    prior: HashMap<MatchId, usize>,
}

impl<'a> QueueBuilder<'a> {
    /// Shuffle inside every group the competition type allows
    pub fn shuffled(shuffler: &'a mut Shuffler) -> Self {
        Self {
            shuffler: Some(shuffler),
            prior: HashMap::new(),
        }
    }

    /// Keep input order, or the order of `previous` when it lists the matches
    pub fn preserving(previous: &[TimeSlot]) -> Self {
        Self {
            shuffler: None,
            prior: prior_order(previous),
        }
    }

    fn arrange(&mut self, matches: &mut [Match]) {
        if let Some(shuffler) = self.shuffler.as_deref_mut() {
            shuffler.shuffle(matches);
        }
    }

    // Without shuffling, a previous timetable dictates the order; matches it
    // does not list keep their relative order after the listed ones.
    fn follow_prior(&self, matches: &mut [Match]) {
        if self.shuffler.is_some() || self.prior.is_empty() {
            return;
        }
        matches.sort_by_key(|m| self.prior.get(&m.id).copied().unwrap_or(usize::MAX));
    }

    /// Build the queue for `sport`; ranking sports have nothing to queue.
    pub fn build(mut self, sport: &Sport) -> ScheduleQueue {
        match sport.sport_type {
            SportType::Tournament => {
                let mut phase = self.bracket_by_round(sport.matches.iter());
                self.follow_prior(&mut phase);
                ScheduleQueue {
                    phases: vec![phase],
                    finale: Finale::default(),
                }
            }
            SportType::RoundRobin => {
                let mut phase = sport.matches.clone();
                self.arrange(&mut phase);
                self.follow_prior(&mut phase);
                ScheduleQueue {
                    phases: vec![phase],
                    finale: Finale::default(),
                }
            }
            SportType::League => {
                let mut group = self.interleave_blocks(sport);
                self.follow_prior(&mut group);

                let mut playoff = self.bracket_by_round(sport.playoff_matches());
                let finale = take_finale(&mut playoff);
                self.follow_prior(&mut playoff);

                ScheduleQueue {
                    phases: vec![group, playoff],
                    finale,
                }
            }
            SportType::Ranking => ScheduleQueue::default(),
        }
    }

    // Bracket matches minus first-round byes, ascending rounds, arranged within a round.
    fn bracket_by_round<'m>(&mut self, matches: impl Iterator<Item = &'m Match>) -> Vec<Match> {
        let matches: Vec<&Match> = matches.collect();
        let Some(first_round) = matches.iter().map(|m| m.round).min() else {
            return Vec::new();
        };

        let mut rounds: BTreeMap<u32, Vec<Match>> = BTreeMap::new();
        for m in matches.into_iter().filter(|m| !m.is_bye(first_round)) {
            rounds.entry(m.round).or_default().push(m.clone());
        }

        let mut queue = Vec::new();
        for (_, mut round) in rounds {
            self.arrange(&mut round);
            queue.extend(round);
        }
        queue
    }

    // One match from each block in turn, so no block is left for the end of the day.
    fn interleave_blocks(&mut self, sport: &Sport) -> Vec<Match> {
        let mut block_order: Vec<&str> = Vec::new();
        let mut by_block: HashMap<&str, Vec<Match>> = HashMap::new();
        for m in sport.group_matches() {
            let Some(block_id) = m.block_id.as_deref() else {
                continue;
            };
            if !by_block.contains_key(block_id) {
                block_order.push(block_id);
            }
            by_block.entry(block_id).or_default().push(m.clone());
        }

        let mut queues: Vec<std::collections::VecDeque<Match>> = block_order
            .iter()
            .filter_map(|id| by_block.remove(id))
            .map(|mut matches| {
                self.arrange(&mut matches);
                matches.into()
            })
            .collect();

        let mut interleaved = Vec::new();
        while queues.iter().any(|q| !q.is_empty()) {
            for queue in &mut queues {
                if let Some(m) = queue.pop_front() {
                    interleaved.push(m);
                }
            }
        }
        interleaved
    }
}

/// Pull the final and the third-place match out of a playoff queue.
fn take_finale(playoff: &mut Vec<Match>) -> Finale {
    let final_round = playoff
        .iter()
        .filter(|m| !m.is_third_place())
        .map(|m| m.round)
        .max();

    let mut finale = Finale::default();
    let mut rest = Vec::with_capacity(playoff.len());
    for m in playoff.drain(..) {
        if m.is_third_place() {
            finale.third_place = Some(m);
        } else if Some(m.round) == final_round && m.match_number == 1 && finale.final_match.is_none() {
            finale.final_match = Some(m);
        } else {
            rest.push(m);
        }
    }
    *playoff = rest;
    finale
}
