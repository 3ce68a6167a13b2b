// Replacement suggestions within a score-similarity band.
//
// Candidates are ranked by the size of their score swing, up or down, so
// lateral and cheaper alternatives surface next to upgrades.

use std::cmp::Ordering;
use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::player::Player;
use crate::scoring::{round2, score, Weights};
use crate::squad::{Squad, SquadSlot};

/// Largest absolute score difference for a candidate to be suggested.
pub const SIMILARITY_BAND: f64 = 1.5;

pub const DEFAULT_SUGGESTION_LIMIT: usize = 5;

/// Slack so that score pairs exactly 1.5 apart are not lost to float error.
const BAND_EPSILON: f64 = 1e-9;

/// An alternative for a squad slot. `delta` is candidate score minus the
/// original player's score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    pub id: u32,
    pub name: String,
    pub price: f64,
    pub delta: f64,
}

/// Constraints on a suggestion search.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestionRequest {
    #[serde(default)]
    pub exclude_ids: Vec<u32>,
    pub max_price: f64,
    pub limit: usize,
}

impl SuggestionRequest {
    pub fn new(max_price: f64, limit: usize) -> Self {
        SuggestionRequest {
            exclude_ids: Vec::new(),
            max_price,
            limit,
        }
    }

    pub fn excluding(mut self, ids: impl IntoIterator<Item = u32>) -> Self {
        self.exclude_ids.extend(ids);
        self
    }
}

/// Rank same-position alternatives to `player` drawn from `pool`.
///
/// Candidates must differ from `player`, share its position, cost at most
/// `max_price`, be available and not be excluded. Those within
/// [`SIMILARITY_BAND`] of the original score are sorted by absolute delta,
/// largest first (ties keep pool order), and truncated to `limit`.
pub fn suggest(
    player: &Player,
    request: &SuggestionRequest,
    pool: &[Player],
    weights: &Weights,
) -> Vec<Suggestion> {
    let original = score(player, weights);
    let excluded: HashSet<u32> = request.exclude_ids.iter().copied().collect();

    let mut ranked: Vec<(&Player, f64)> = pool
        .iter()
        .filter(|c| {
            c.id != player.id
                && c.pos == player.pos
                && c.price <= request.max_price
                && c.status.is_available()
                && !excluded.contains(&c.id)
        })
        .map(|c| (c, score(c, weights) - original))
        .filter(|(_, delta)| delta.abs() <= SIMILARITY_BAND + BAND_EPSILON)
        .collect();

    ranked.sort_by(|a, b| b.1.abs().partial_cmp(&a.1.abs()).unwrap_or(Ordering::Equal));
    ranked.truncate(request.limit);

    debug!(
        "suggestions for player {}: {} within band (score {:.2})",
        player.id,
        ranked.len(),
        original
    );

    ranked
        .into_iter()
        .map(|(c, delta)| Suggestion {
            id: c.id,
            name: c.name.clone(),
            price: c.price,
            delta: round2(delta),
        })
        .collect()
}

/// Suggestions for the player occupying `slot` in `squad`: the price ceiling
/// is the slot price plus the bank, and every squad member is excluded.
pub fn suggest_for_slot(
    player: &Player,
    slot: &SquadSlot,
    squad: &Squad,
    pool: &[Player],
    weights: &Weights,
    limit: usize,
) -> Vec<Suggestion> {
    let request = SuggestionRequest::new(slot.price + squad.bank, limit)
        .excluding(squad.player_ids());
    suggest(player, &request, pool, weights)
}

// ---------------------------------------------------------------------------
// Bulk requests
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkSuggestionRequest {
    pub player_id: u32,
    pub max_price: f64,
    #[serde(default)]
    pub exclude_ids: Vec<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkSuggestions {
    pub player_id: u32,
    pub suggestions: Vec<Suggestion>,
}

/// Answer several requests against one pool. A player id missing from the
/// pool yields an empty list rather than an error.
pub fn suggest_bulk(
    requests: &[BulkSuggestionRequest],
    pool: &[Player],
    weights: &Weights,
    limit: usize,
) -> Vec<BulkSuggestions> {
    requests
        .iter()
        .map(|req| {
            let suggestions = match pool.iter().find(|p| p.id == req.player_id) {
                Some(player) => {
                    let request = SuggestionRequest::new(req.max_price, limit)
                        .excluding(req.exclude_ids.iter().copied());
                    suggest(player, &request, pool, weights)
                }
                None => Vec::new(),
            };
            BulkSuggestions {
                player_id: req.player_id,
                suggestions,
            }
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::{PlayerStatus, Position};
    use crate::scoring::Metric;

    /// Under form-only weights a player's score is exactly `form * 2`.
    fn mid(id: u32, form: f64, price: f64) -> Player {
        Player {
            id,
            name: format!("Mid {id}"),
            team_short: "TST".into(),
            pos: Position::Midfielder,
            price,
            status: PlayerStatus::Available,
            form,
            xg90: 0.0,
            xa90: 0.0,
            exp_min: 0.0,
            next3_ease: 3.0,
            avg_points: 0.0,
            value: 0.0,
            ownership: 0.0,
            score: None,
        }
    }

    fn form_weights() -> Weights {
        Weights::only(Metric::Form)
    }

    #[test]
    fn filters_ineligible_candidates() {
        let original = mid(1, 3.0, 7.0);
        let pool = vec![
            original.clone(),
            mid(2, 3.1, 7.0),
            mid(3, 3.2, 9.0), // too expensive
            Player { pos: Position::Forward, ..mid(4, 3.1, 6.0) },
            Player { status: PlayerStatus::Injured, ..mid(5, 3.1, 6.0) },
            mid(6, 3.1, 6.0), // excluded
        ];
        let request = SuggestionRequest::new(8.0, 10).excluding([6]);
        let out = suggest(&original, &request, &pool, &form_weights());
        let ids: Vec<u32> = out.iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![2]);
        assert_eq!(out[0].delta, 0.2);
    }

    #[test]
    fn keeps_only_candidates_within_band() {
        // Original scores 6.0.
        let original = mid(1, 3.0, 7.0);
        let pool = vec![
            mid(2, 3.75, 7.0), // +1.5, kept
            mid(3, 3.8, 7.0),  // +1.6, dropped
            mid(4, 2.25, 7.0), // -1.5, kept
            mid(5, 2.0, 7.0),  // -2.0, dropped
        ];
        let out = suggest(&original, &SuggestionRequest::new(10.0, 10), &pool, &form_weights());
        let ids: Vec<u32> = out.iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![2, 4]);
        assert!(out.iter().all(|s| s.delta.abs() <= SIMILARITY_BAND));
    }

    #[test]
    fn ranks_by_absolute_delta_descending() {
        let original = mid(1, 3.0, 7.0); // 6.0
        let pool = vec![
            mid(2, 3.1, 7.0), // +0.2
            mid(3, 2.5, 7.0), // -1.0
            mid(4, 3.5, 7.0), // +1.0
            mid(5, 3.6, 7.0), // +1.2
        ];
        let out = suggest(&original, &SuggestionRequest::new(10.0, 10), &pool, &form_weights());
        let ids: Vec<u32> = out.iter().map(|s| s.id).collect();
        // 1.2, then the two 1.0 swings in pool order, then 0.2
        assert_eq!(ids, vec![5, 3, 4, 2]);
        assert_eq!(out[1].delta, -1.0);
    }

    #[test]
    fn respects_limit() {
        let original = mid(1, 3.0, 7.0);
        let pool: Vec<Player> = (2..10).map(|id| mid(id, 3.0, 7.0)).collect();
        let out = suggest(&original, &SuggestionRequest::new(10.0, 3), &pool, &form_weights());
        assert_eq!(out.len(), 3);
    }

    #[test]
    fn empty_pool_gives_no_suggestions() {
        let original = mid(1, 3.0, 7.0);
        let out = suggest(&original, &SuggestionRequest::new(10.0, 5), &[], &form_weights());
        assert!(out.is_empty());
    }

    #[test]
    fn slot_suggestions_use_bank_and_exclude_squad() {
        let original = mid(1, 3.0, 6.0);
        let teammate = mid(2, 3.1, 6.0);
        let affordable = mid(3, 3.2, 7.0);
        let pricey = mid(4, 3.3, 8.0);
        let pool = vec![original.clone(), teammate.clone(), affordable, pricey];

        let mut squad = Squad::new(1.0);
        squad.starting_xi.push(SquadSlot::from(&original));
        squad.bench.push(SquadSlot::from(&teammate));

        let slot = squad.starting_xi[0].clone();
        let out = suggest_for_slot(&original, &slot, &squad, &pool, &form_weights(), 5);
        let ids: Vec<u32> = out.iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![3]);
    }

    #[test]
    fn bulk_handles_unknown_players() {
        let pool = vec![mid(1, 3.0, 7.0), mid(2, 3.2, 7.0)];
        let requests = vec![
            BulkSuggestionRequest {
                player_id: 1,
                max_price: 8.0,
                exclude_ids: vec![],
            },
            BulkSuggestionRequest {
                player_id: 99,
                max_price: 8.0,
                exclude_ids: vec![],
            },
        ];
        let out = suggest_bulk(&requests, &pool, &form_weights(), DEFAULT_SUGGESTION_LIMIT);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].suggestions.len(), 1);
        assert_eq!(out[0].suggestions[0].id, 2);
        assert_eq!(out[1].player_id, 99);
        assert!(out[1].suggestions.is_empty());
    }
}
