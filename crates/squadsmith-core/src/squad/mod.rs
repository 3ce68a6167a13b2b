// Squad model: starting eleven, bench and bank.

pub mod analysis;
pub mod validate;

use serde::{Deserialize, Serialize};

use crate::player::{Player, Position};

pub use analysis::{analyze_squad, AnalysisResult, SquadAnalysis};
pub use validate::{validate, validate_for_analysis, Formation, ValidationResult};

pub const STARTING_XI_SIZE: usize = 11;
pub const BENCH_SIZE: usize = 4;

/// A lightweight reference to a player inside a squad.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SquadSlot {
    pub id: u32,
    pub pos: Position,
    pub price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team_short: Option<String>,
}

impl SquadSlot {
    pub fn new(id: u32, pos: Position, price: f64) -> Self {
        SquadSlot {
            id,
            pos,
            price,
            name: None,
            team_short: None,
        }
    }
}

impl From<&Player> for SquadSlot {
    fn from(p: &Player) -> Self {
        SquadSlot {
            id: p.id,
            pos: p.pos,
            price: p.price,
            name: Some(p.name.clone()),
            team_short: Some(p.team_short.clone()),
        }
    }
}

/// Eleven starters, four substitutes and the unspent budget.
///
/// Shape invariants are only checked by [`validate`]; a squad being built may
/// hold fewer slots. `bank` can be negative for an existing squad whose
/// players have risen in price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Squad {
    #[serde(rename = "startingXI")]
    pub starting_xi: Vec<SquadSlot>,
    pub bench: Vec<SquadSlot>,
    pub bank: f64,
}

impl Squad {
    /// An empty squad holding `bank`.
    pub fn new(bank: f64) -> Self {
        Squad {
            starting_xi: Vec::with_capacity(STARTING_XI_SIZE),
            bench: Vec::with_capacity(BENCH_SIZE),
            bank,
        }
    }

    /// Starters followed by bench.
    pub fn slots(&self) -> impl Iterator<Item = &SquadSlot> {
        self.starting_xi.iter().chain(self.bench.iter())
    }

    pub fn player_ids(&self) -> Vec<u32> {
        self.slots().map(|s| s.id).collect()
    }

    pub fn contains(&self, id: u32) -> bool {
        self.slots().any(|s| s.id == id)
    }

    /// Sum of all slot prices.
    pub fn total_cost(&self) -> f64 {
        self.slots().map(|s| s.price).sum()
    }

    /// Whether every starting and bench slot is filled.
    pub fn is_complete(&self) -> bool {
        self.starting_xi.len() == STARTING_XI_SIZE && self.bench.len() == BENCH_SIZE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_uses_starting_xi_key() {
        let mut squad = Squad::new(1.5);
        squad.starting_xi.push(SquadSlot::new(1, Position::Goalkeeper, 4.5));
        let json = serde_json::to_value(&squad).unwrap();
        assert!(json.get("startingXI").is_some());
        assert_eq!(json["startingXI"][0]["pos"], "GK");
        assert!(json["startingXI"][0].get("name").is_none());

        let back: Squad = serde_json::from_value(json).unwrap();
        assert_eq!(back, squad);
    }

    #[test]
    fn helpers_span_starters_and_bench() {
        let mut squad = Squad::new(0.0);
        squad.starting_xi.push(SquadSlot::new(1, Position::Goalkeeper, 4.5));
        squad.bench.push(SquadSlot::new(2, Position::Forward, 5.0));
        assert_eq!(squad.player_ids(), vec![1, 2]);
        assert!(squad.contains(2));
        assert!(!squad.contains(3));
        assert!((squad.total_cost() - 9.5).abs() < 1e-9);
        assert!(!squad.is_complete());
    }
}
