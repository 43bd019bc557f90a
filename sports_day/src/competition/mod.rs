//! Competition graph: teams, blocks, standings and brackets.
//!
//! This module builds everything the court scheduler later places on the
//! timetable:
//! - Balanced group-stage blocks with a full round robin each
//! - Points tables with a deterministic tie-break
//! - Single-elimination brackets with standard seeding, byes and an optional
//!   third-place match
//! - Playoffs seeded from block standings, and result propagation
//!
//! ## Example
//!
//! ```
//! use sports_day::competition::{Team, generate_blocks, generate_playoff};
//! use sports_day::Shuffler;
//!
//! let teams: Vec<Team> = (1..=8)
//!     .map(|i| Team::new(format!("t{i}"), format!("{}-{}", (i - 1) / 4 + 1, i)))
//!     .collect();
//!
//! let mut shuffler = Shuffler::with_seed(2024);
//! let blocks = generate_blocks(&teams, 2, &mut shuffler);
//! assert_eq!(blocks.len(), 2);
//!
//! // Nothing is scored yet, so the draw order decides who advances
//! let playoff = generate_playoff(&blocks, &teams, 2, true);
//! assert!(playoff.success);
//! ```

pub mod blocks;
pub mod bracket;
pub mod conflict;
pub mod models;
pub mod playoff;
pub mod standings;
pub mod tournament;

pub use blocks::{assign_blocks, generate_blocks, round_robin_pairings};
pub use bracket::{BracketOptions, SeedPlacement, SlotPosition, build_bracket, seed_order};
pub use conflict::{SlotOccupancy, extract_class_id, matches_conflict};
pub use models::{
    Block, BlockId, LeagueSettings, Match, MatchId, MatchStatus, RoundRobinSettings, Sport,
    SportType, THIRD_PLACE_MARKER, THIRD_PLACE_MATCH_NUMBER, Team, TeamId, TournamentSettings,
};
pub use playoff::{
    PlayoffError, PlayoffOutcome, PlayoffResult, attach_playoff, generate_playoff,
    generate_playoff_for_sport, update_playoff_matches,
};
pub use standings::{PointsRule, StandingRow, calculate_standings, rank_block};
pub use tournament::{
    generate_round_robin, generate_tournament, round_robin_standings, update_tournament_matches,
};
