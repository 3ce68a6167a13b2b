// Per-slot scores, labels and replacement suggestions for an existing squad.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::Squad;
use crate::player::Player;
use crate::scoring::{label, round2, score, PlayerLabel, Weights};
use crate::suggest::{suggest_for_slot, Suggestion};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// The pool record with its score attached.
    pub player: Player,
    pub score: f64,
    pub label: PlayerLabel,
    pub suggestions: Vec<Suggestion>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SquadAnalysis {
    /// Starters first, then bench, in squad order.
    pub results: Vec<AnalysisResult>,
    pub average_score: f64,
    pub flagged_players: usize,
    pub bank_left: f64,
    pub total_score: f64,
}

/// Score and label every squad member found in `pool`.
///
/// Starters also get up to `suggestion_limit` replacements priced within
/// their slot price plus the bank; bench players get none. Slots whose id is
/// not in the pool are skipped. Summary figures cover starters only.
pub fn analyze_squad(
    squad: &Squad,
    pool: &[Player],
    weights: &Weights,
    suggestion_limit: usize,
) -> SquadAnalysis {
    let by_id: HashMap<u32, &Player> = pool.iter().map(|p| (p.id, p)).collect();

    let mut results = Vec::with_capacity(squad.starting_xi.len() + squad.bench.len());
    let mut starter_total = 0.0;
    let mut starters = 0usize;
    let mut flagged = 0usize;

    for slot in &squad.starting_xi {
        let Some(&player) = by_id.get(&slot.id) else {
            warn!("starting XI player {} not found in player pool; skipped", slot.id);
            continue;
        };
        let s = score(player, weights);
        let l = label(s, player.status);
        let suggestions = suggest_for_slot(player, slot, squad, pool, weights, suggestion_limit);

        starter_total += s;
        starters += 1;
        if l != PlayerLabel::Perfect {
            flagged += 1;
        }
        results.push(scored(player, s, l, suggestions));
    }

    for slot in &squad.bench {
        let Some(&player) = by_id.get(&slot.id) else {
            warn!("bench player {} not found in player pool; skipped", slot.id);
            continue;
        };
        let s = score(player, weights);
        results.push(scored(player, s, label(s, player.status), Vec::new()));
    }

    let average_score = if starters > 0 {
        round2(starter_total / starters as f64)
    } else {
        0.0
    };

    info!(
        "analysed squad: {} players, average {:.2}, {} flagged",
        results.len(),
        average_score,
        flagged
    );

    SquadAnalysis {
        results,
        average_score,
        flagged_players: flagged,
        bank_left: round2(squad.bank),
        total_score: round2(starter_total),
    }
}

fn scored(player: &Player, s: f64, l: PlayerLabel, suggestions: Vec<Suggestion>) -> AnalysisResult {
    AnalysisResult {
        player: Player {
            score: Some(s),
            ..player.clone()
        },
        score: s,
        label: l,
        suggestions,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::{PlayerStatus, Position};
    use crate::scoring::Metric;
    use crate::squad::SquadSlot;

    fn player(id: u32, pos: Position, form: f64, price: f64) -> Player {
        Player {
            id,
            name: format!("P{id}"),
            team_short: "TST".into(),
            pos,
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

    #[test]
    fn starters_get_suggestions_and_bench_does_not() {
        let gk = player(1, Position::Goalkeeper, 4.5, 5.0); // 9.0
        let mid = player(2, Position::Midfielder, 2.5, 6.0); // 5.0
        let sub = player(3, Position::Midfielder, 2.6, 5.0); // 5.2
        let alt = player(4, Position::Midfielder, 3.0, 6.5); // 6.0
        let pool = vec![gk.clone(), mid.clone(), sub.clone(), alt];

        let mut squad = Squad::new(1.0);
        squad.starting_xi.push(SquadSlot::from(&gk));
        squad.starting_xi.push(SquadSlot::from(&mid));
        squad.bench.push(SquadSlot::from(&sub));

        let analysis = analyze_squad(&squad, &pool, &Weights::only(Metric::Form), 5);
        assert_eq!(analysis.results.len(), 3);

        let mid_result = &analysis.results[1];
        assert_eq!(mid_result.label, PlayerLabel::Poor);
        assert_eq!(mid_result.player.score, Some(5.0));
        // The bench midfielder is in the squad, so only the outsider is offered.
        let ids: Vec<u32> = mid_result.suggestions.iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![4]);

        assert!(analysis.results[2].suggestions.is_empty());
        assert_eq!(analysis.results[2].label, PlayerLabel::Poor);

        // Summary covers the two starters; counting the bench would give 4.67.
        assert_eq!(analysis.total_score, 14.0);
        assert_eq!(analysis.average_score, 7.0);
        assert_eq!(analysis.flagged_players, 1);
        assert_eq!(analysis.bank_left, 1.0);
    }

    #[test]
    fn unknown_ids_are_skipped() {
        let gk = player(1, Position::Goalkeeper, 4.0, 5.0);
        let mut squad = Squad::new(0.0);
        squad.starting_xi.push(SquadSlot::from(&gk));
        squad.starting_xi.push(SquadSlot::new(99, Position::Forward, 7.0));
        squad.bench.push(SquadSlot::new(98, Position::Defender, 4.0));

        let analysis = analyze_squad(&squad, &[gk], &Weights::only(Metric::Form), 5);
        assert_eq!(analysis.results.len(), 1);
        assert_eq!(analysis.results[0].player.id, 1);
        assert_eq!(analysis.average_score, 8.0);
        assert_eq!(analysis.flagged_players, 0);
    }

    #[test]
    fn unavailable_starter_is_flagged_not_playing() {
        let injured = Player {
            status: PlayerStatus::Injured,
            ..player(1, Position::Forward, 5.0, 9.0)
        };
        let mut squad = Squad::new(0.0);
        squad.starting_xi.push(SquadSlot::from(&injured));

        let analysis = analyze_squad(&squad, &[injured], &Weights::only(Metric::Form), 5);
        assert_eq!(analysis.results[0].label, PlayerLabel::NotPlaying);
        assert_eq!(analysis.flagged_players, 1);
    }

    #[test]
    fn empty_squad_has_zero_summary() {
        let analysis = analyze_squad(&Squad::new(2.5), &[], &Weights::default(), 5);
        assert!(analysis.results.is_empty());
        assert_eq!(analysis.average_score, 0.0);
        assert_eq!(analysis.total_score, 0.0);
        assert_eq!(analysis.bank_left, 2.5);
    }

    #[test]
    fn serializes_camel_case_summary() {
        let analysis = analyze_squad(&Squad::new(0.0), &[], &Weights::default(), 5);
        let json = serde_json::to_value(&analysis).unwrap();
        assert!(json.get("averageScore").is_some());
        assert!(json.get("flaggedPlayers").is_some());
        assert!(json.get("bankLeft").is_some());
    }
}
