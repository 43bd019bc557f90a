//! Team and class conflicts between simultaneously played matches.
//!
//! A class (homeroom) usually enters several sports. Two matches placed in
//! the same time slot must not need the same team, nor the same class, twice.

use super::models::{Match, MatchId, Team, TeamId};
use std::collections::{HashMap, HashSet};

/// Suffix used by "3年2組"-style names
const CLASS_SUFFIX: char = '組';

/// Longest grade / section accepted by [`extract_class_id`]
const MAX_GRADE_DIGITS: usize = 2;
const MAX_SECTION_CHARS: usize = 2;

/// Derive a normalised class id (`"<grade>-<SECTION>"`) from a free-text team name.
///
/// Kept for team records created before classes were stored explicitly.
/// Recognises "1-A", "1 A", "1年A組", full-width variants and trailing
/// decorations ("1-A white"). Returns `None` when no class is found.
pub fn extract_class_id(name: &str) -> Option<String> {
    let chars: Vec<char> = name.chars().map(normalize_char).collect();
    let mut i = 0;

    while i < chars.len() {
        if !chars[i].is_ascii_digit() || (i > 0 && chars[i - 1].is_ascii_alphanumeric()) {
            i += 1;
            continue;
        }

        let grade_start = i;
        while i < chars.len() && chars[i].is_ascii_digit() {
            i += 1;
        }
        let grade: String = chars[grade_start..i].iter().collect();
        if grade.len() > MAX_GRADE_DIGITS {
            continue;
        }

        if let Some(section) = parse_section(&chars, i) {
            return Some(format!("{}-{}", grade, section.to_ascii_uppercase()));
        }
    }

    None
}

// Separator then section, starting right after the grade digits.
fn parse_section(chars: &[char], mut i: usize) -> Option<String> {
    let mut saw_separator = false;
    while i < chars.len() && matches!(chars[i], '-' | '年' | ' ') {
        saw_separator = true;
        i += 1;
    }
    if !saw_separator {
        return None;
    }

    let start = i;
    while i < chars.len() && chars[i].is_ascii_alphanumeric() {
        i += 1;
    }
    let len = i - start;
    if len == 0 || len > MAX_SECTION_CHARS {
        return None;
    }

    match chars.get(i) {
        None => {}
        Some(&c) if c == CLASS_SUFFIX || !c.is_alphanumeric() => {}
        Some(_) => return None,
    }

    Some(chars[start..i].iter().collect())
}

fn normalize_char(c: char) -> char {
    match c {
        // Full-width ASCII block
        '\u{FF01}'..='\u{FF5E}' => char::from_u32(c as u32 - 0xFEE0).unwrap_or(c),
        '\u{2010}' | '\u{2011}' | '\u{2012}' | '\u{2013}' | '\u{2212}' => '-',
        '\u{3000}' | '\t' => ' ',
        _ => c,
    }
}

fn class_of(team_id: &str, teams: &HashMap<&str, &Team>) -> Option<String> {
    teams.get(team_id).and_then(|t| t.class_key())
}

/// Teams, classes and matches already placed in one time slot.
#[derive(Debug, Clone, Default)]
pub struct SlotOccupancy {
    teams: HashSet<TeamId>,
    classes: HashSet<String>,
    matches: HashSet<MatchId>,
}

impl SlotOccupancy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `m` would reuse a team or a class already playing in this slot
    pub fn conflicts_with(&self, m: &Match, teams: &HashMap<&str, &Team>) -> bool {
        m.team_ids().any(|id| {
            self.teams.contains(id)
                || class_of(id, teams).is_some_and(|class| self.classes.contains(&class))
        })
    }

    /// Record `m` as playing in this slot
    pub fn place(&mut self, m: &Match, teams: &HashMap<&str, &Team>) {
        for id in m.team_ids() {
            self.teams.insert(id.clone());
            if let Some(class) = class_of(id, teams) {
                self.classes.insert(class);
            }
        }
        self.matches.insert(m.id.clone());
    }

    pub fn contains_match(&self, match_id: &str) -> bool {
        self.matches.contains(match_id)
    }

    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    pub fn len(&self) -> usize {
        self.matches.len()
    }
}

/// Whether two matches could not be played at the same time.
pub fn matches_conflict(a: &Match, b: &Match, teams: &HashMap<&str, &Team>) -> bool {
    let mut slot = SlotOccupancy::new();
    slot.place(a, teams);
    slot.conflicts_with(b, teams)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_hyphenated_class() {
        assert_eq!(extract_class_id("1-A").as_deref(), Some("1-A"));
        assert_eq!(extract_class_id("3-b").as_deref(), Some("3-B"));
        assert_eq!(extract_class_id("2-10").as_deref(), Some("2-10"));
    }

    #[test]
    fn test_extract_with_decorations() {
        assert_eq!(extract_class_id("1-A white").as_deref(), Some("1-A"));
        assert_eq!(extract_class_id("Team 2 C").as_deref(), Some("2-C"));
        assert_eq!(extract_class_id("(1-A)").as_deref(), Some("1-A"));
    }

    #[test]
    fn test_extract_japanese_style() {
        assert_eq!(extract_class_id("3年2組").as_deref(), Some("3-2"));
        assert_eq!(extract_class_id("1年A組 赤").as_deref(), Some("1-A"));
    }

    #[test]
    fn test_extract_full_width() {
        assert_eq!(extract_class_id("１－Ａ").as_deref(), Some("1-A"));
        assert_eq!(extract_class_id("２年Ｂ組").as_deref(), Some("2-B"));
    }

    #[test]
    fn test_extract_none() {
        assert_eq!(extract_class_id("Red Dragons"), None);
        assert_eq!(extract_class_id("Team10"), None);
        assert_eq!(extract_class_id("1-Alpha"), None);
        assert_eq!(extract_class_id("2024-A"), None);
        assert_eq!(extract_class_id(""), None);
    }

    fn teams() -> Vec<Team> {
        vec![
            Team::new("a1", "1-A red"),
            Team::new("a2", "1-A white"),
            Team::new("b1", "1-B"),
            Team::new("c1", "1-C"),
            Team::new("x", "Staff"),
            Team::new("y", "Parents"),
        ]
    }

    #[test]
    fn test_same_team_conflicts() {
        let teams = teams();
        let index: HashMap<&str, &Team> = teams.iter().map(|t| (t.id.as_str(), t)).collect();
        let a = Match::between("m1", "x", "b1", 1, 1);
        let b = Match::between("m2", "y", "x", 1, 2);
        assert!(matches_conflict(&a, &b, &index));
    }

    #[test]
    fn test_same_class_conflicts() {
        let teams = teams();
        let index: HashMap<&str, &Team> = teams.iter().map(|t| (t.id.as_str(), t)).collect();
        let a = Match::between("m1", "a1", "b1", 1, 1);
        let b = Match::between("m2", "a2", "c1", 1, 2);
        assert!(matches_conflict(&a, &b, &index));
    }

    #[test]
    fn test_disjoint_matches_do_not_conflict() {
        let teams = teams();
        let index: HashMap<&str, &Team> = teams.iter().map(|t| (t.id.as_str(), t)).collect();
        let a = Match::between("m1", "a1", "b1", 1, 1);
        let b = Match::between("m2", "x", "y", 1, 2);
        assert!(!matches_conflict(&a, &b, &index));
    }

    #[test]
    fn test_undetermined_slots_never_conflict() {
        let teams = teams();
        let index: HashMap<&str, &Team> = teams.iter().map(|t| (t.id.as_str(), t)).collect();
        let a = Match::new("final", 3, 1);
        let b = Match::new("third", 3, 0);
        assert!(!matches_conflict(&a, &b, &index));
    }

    #[test]
    fn test_occupancy_tracks_matches() {
        let teams = teams();
        let index: HashMap<&str, &Team> = teams.iter().map(|t| (t.id.as_str(), t)).collect();
        let mut slot = SlotOccupancy::new();
        assert!(slot.is_empty());

        slot.place(&Match::between("m1", "a1", "b1", 1, 1), &index);
        assert_eq!(slot.len(), 1);
        assert!(slot.contains_match("m1"));
        assert!(!slot.contains_match("m2"));
    }
}
