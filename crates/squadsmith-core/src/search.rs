// Player lookup: fuzzy name search, position filter, id lookup, top scorers.

use std::cmp::Ordering;

use serde::Serialize;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

use crate::player::{Player, Position};
use crate::scoring::{normalize_scores, Weights};

pub const DEFAULT_SEARCH_LIMIT: usize = 5;

const EXACT_MATCH: f64 = 100.0;
const SUBSTRING_MATCH: f64 = 80.0;
const WORD_MATCH: f64 = 60.0;
const FUZZY_MATCH: f64 = 40.0;
/// Fuzzy similarities at or below this are discarded.
const FUZZY_FLOOR: f64 = 20.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchMatch<'a> {
    pub player: &'a Player,
    pub similarity: f64,
}

/// Lower-case, strip accents and punctuation, collapse whitespace.
pub fn fold_name(s: &str) -> String {
    let stripped: String = s
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c.is_whitespace())
        .collect();
    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Similarity of a folded query to a folded name, 0-100.
fn similarity(query: &str, name: &str) -> f64 {
    if name == query {
        return EXACT_MATCH;
    }
    if name.contains(query) {
        return SUBSTRING_MATCH;
    }

    let words: Vec<&str> = name.split(' ').collect();
    let query_words: Vec<&str> = query.split(' ').collect();
    let matched = query_words
        .iter()
        .filter(|qw| words.iter().any(|w| w.contains(*qw)))
        .count();
    if matched > 0 {
        return matched as f64 / query_words.len() as f64 * WORD_MATCH;
    }

    let max_len = query.chars().count().max(name.chars().count());
    if max_len == 0 {
        return 0.0;
    }
    let distance = strsim::levenshtein(query, name);
    let fuzzy = (max_len - distance) as f64 / max_len as f64 * FUZZY_MATCH;
    if fuzzy > FUZZY_FLOOR {
        fuzzy
    } else {
        0.0
    }
}

/// Players whose name resembles `query`, best first, at most `limit`.
///
/// An exact folded match scores 100, a substring 80, partial word overlap up
/// to 60, and otherwise edit-distance similarity up to 40 when above 20.
/// Ties keep pool order.
pub fn search_by_name<'a>(players: &'a [Player], query: &str, limit: usize) -> Vec<SearchMatch<'a>> {
    let query = fold_name(query);
    if query.is_empty() {
        return Vec::new();
    }

    let mut matches: Vec<SearchMatch<'a>> = players
        .iter()
        .map(|p| SearchMatch {
            player: p,
            similarity: similarity(&query, &fold_name(&p.name)),
        })
        .filter(|m| m.similarity > 0.0)
        .collect();

    matches.sort_by(|a, b| {
        b.similarity
            .partial_cmp(&a.similarity)
            .unwrap_or(Ordering::Equal)
    });
    matches.truncate(limit);
    matches
}

pub fn by_position(players: &[Player], pos: Position) -> Vec<&Player> {
    players.iter().filter(|p| p.pos == pos).collect()
}

pub fn find_by_id(players: &[Player], id: u32) -> Option<&Player> {
    players.iter().find(|p| p.id == id)
}

/// Highest scoring players, optionally restricted to one position, with their
/// scores attached.
pub fn top_players(
    players: &[Player],
    weights: &Weights,
    position: Option<Position>,
    limit: usize,
) -> Vec<Player> {
    let candidates: Vec<Player> = players
        .iter()
        .filter(|p| position.map_or(true, |pos| p.pos == pos))
        .cloned()
        .collect();
    let mut scored = normalize_scores(&candidates, weights);
    scored.sort_by(|a, b| {
        b.score
            .unwrap_or(0.0)
            .partial_cmp(&a.score.unwrap_or(0.0))
            .unwrap_or(Ordering::Equal)
    });
    scored.truncate(limit);
    scored
}
