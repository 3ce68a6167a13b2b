// Structural and financial squad legality.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::{Squad, SquadSlot, BENCH_SIZE, STARTING_XI_SIZE};
use crate::player::Position;

/// Upper bound on squad value plus bank when building a squad.
pub const SQUAD_BUDGET_CAP: f64 = 100.0;

/// Slack for accumulated floating-point error in price sums.
const BUDGET_EPSILON: f64 = 1e-9;

pub const ERR_STARTING_XI_SIZE: &str = "Starting XI must have exactly 11 players";
pub const ERR_BENCH_SIZE: &str = "Bench must have exactly 4 players";
pub const ERR_FORMATION: &str =
    "Invalid formation - must have 1 GK and valid DEF/MID/FWD distribution";
pub const ERR_BUDGET: &str = "Total squad value cannot exceed 100.0";
pub const ERR_DUPLICATE: &str = "Cannot have duplicate players in squad";

// ---------------------------------------------------------------------------
// Formations
// ---------------------------------------------------------------------------

/// Outfield shape of a starting eleven. The goalkeeper count is always 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Formation {
    pub def: usize,
    pub mid: usize,
    pub fwd: usize,
}

impl Formation {
    const fn new(def: usize, mid: usize, fwd: usize) -> Self {
        Formation { def, mid, fwd }
    }

    /// The seven legal formations.
    pub const LEGAL: [Formation; 7] = [
        Formation::new(3, 4, 3),
        Formation::new(3, 5, 2),
        Formation::new(4, 3, 3),
        Formation::new(4, 4, 2),
        Formation::new(4, 5, 1),
        Formation::new(5, 3, 2),
        Formation::new(5, 4, 1),
    ];

    /// The legal formation described by `starting_xi`, if there is one.
    pub fn of(starting_xi: &[SquadSlot]) -> Option<Formation> {
        let count = |pos: Position| starting_xi.iter().filter(|s| s.pos == pos).count();
        if count(Position::Goalkeeper) != 1 {
            return None;
        }
        let shape = Formation::new(
            count(Position::Defender),
            count(Position::Midfielder),
            count(Position::Forward),
        );
        Formation::LEGAL.contains(&shape).then_some(shape)
    }
}

impl fmt::Display for Formation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}-{}", self.def, self.mid, self.fwd)
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub valid: bool,
    pub errors: Vec<String>,
}

impl ValidationResult {
    fn from_errors(errors: Vec<String>) -> Self {
        ValidationResult {
            valid: errors.is_empty(),
            errors,
        }
    }
}

/// Validate a squad being built: sizes, formation, the 100.0 budget cap and
/// duplicates. Every violated rule is reported.
///
/// The budget rule is skipped when `bank` is negative, which marks an existing
/// squad whose player prices rose past the cap.
pub fn validate(squad: &Squad) -> ValidationResult {
    let mut errors = Vec::new();
    check_shape(squad, &mut errors);
    if squad.bank >= 0.0 && squad.total_cost() + squad.bank > SQUAD_BUDGET_CAP + BUDGET_EPSILON {
        errors.push(ERR_BUDGET.to_string());
    }
    check_duplicates(squad, &mut errors);
    ValidationResult::from_errors(errors)
}

/// Validate an existing squad for read-only analysis: like [`validate`] but
/// the budget is never enforced.
pub fn validate_for_analysis(squad: &Squad) -> ValidationResult {
    let mut errors = Vec::new();
    check_shape(squad, &mut errors);
    check_duplicates(squad, &mut errors);
    ValidationResult::from_errors(errors)
}

fn check_shape(squad: &Squad, errors: &mut Vec<String>) {
    if squad.starting_xi.len() != STARTING_XI_SIZE {
        errors.push(ERR_STARTING_XI_SIZE.to_string());
    }
    if squad.bench.len() != BENCH_SIZE {
        errors.push(ERR_BENCH_SIZE.to_string());
    }
    if Formation::of(&squad.starting_xi).is_none() {
        errors.push(ERR_FORMATION.to_string());
    }
}

fn check_duplicates(squad: &Squad, errors: &mut Vec<String>) {
    let mut seen = HashSet::new();
    if !squad.slots().all(|s| seen.insert(s.id)) {
        errors.push(ERR_DUPLICATE.to_string());
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use Position::*;

    fn slot(id: u32, pos: Position, price: f64) -> SquadSlot {
        SquadSlot::new(id, pos, price)
    }

    /// 3-5-2 squad costing 88.0 with 0.5 in the bank.
    fn valid_squad() -> Squad {
        Squad {
            starting_xi: vec![
                slot(1, Goalkeeper, 5.5),
                slot(2, Defender, 6.0),
                slot(3, Defender, 5.5),
                slot(4, Defender, 5.0),
                slot(5, Midfielder, 8.5),
                slot(6, Midfielder, 7.0),
                slot(7, Midfielder, 6.5),
                slot(8, Midfielder, 6.0),
                slot(9, Midfielder, 5.5),
                slot(10, Forward, 8.0),
                slot(11, Forward, 7.5),
            ],
            bench: vec![
                slot(12, Goalkeeper, 4.0),
                slot(13, Defender, 4.0),
                slot(14, Midfielder, 4.5),
                slot(15, Forward, 4.5),
            ],
            bank: 0.5,
        }
    }

    /// Legal 4-3-3: 1 GK, 4 DEF, 3 MID, 3 FWD.
    fn four_three_three() -> Squad {
        Squad {
            starting_xi: vec![
                slot(1, Goalkeeper, 5.0),
                slot(2, Defender, 5.0),
                slot(3, Defender, 5.0),
                slot(4, Defender, 5.0),
                slot(5, Defender, 5.0),
                slot(6, Midfielder, 8.0),
                slot(7, Midfielder, 8.0),
                slot(8, Midfielder, 8.0),
                slot(9, Forward, 8.0),
                slot(10, Forward, 7.0),
                slot(11, Forward, 7.0),
            ],
            bench: vec![
                slot(12, Goalkeeper, 4.0),
                slot(13, Defender, 4.0),
                slot(14, Midfielder, 4.5),
                slot(15, Forward, 4.5),
            ],
            bank: 2.0,
        }
    }

    #[test]
    fn accepts_valid_squad() {
        let result = validate(&valid_squad());
        assert!(result.valid);
        assert!(result.errors.is_empty());
    }

    #[test]
    fn accepts_four_three_three() {
        let squad = four_three_three();
        assert_eq!(Formation::of(&squad.starting_xi), Some(Formation::new(4, 3, 3)));
        assert_eq!(
            validate(&squad),
            ValidationResult {
                valid: true,
                errors: vec![]
            }
        );
    }

    #[test]
    fn accepts_exactly_one_hundred() {
        // 88.0 of players plus 12.0 bank.
        let squad = Squad {
            bank: 12.0,
            ..four_three_three()
        };
        assert!(validate(&squad).valid);
    }

    #[test]
    fn rejects_short_starting_xi() {
        let mut squad = valid_squad();
        squad.starting_xi.truncate(10);
        let result = validate(&squad);
        assert!(!result.valid);
        assert!(result.errors.contains(&ERR_STARTING_XI_SIZE.to_string()));
    }

    #[test]
    fn rejects_short_bench() {
        let mut squad = valid_squad();
        squad.bench.truncate(3);
        let result = validate(&squad);
        assert!(!result.valid);
        assert_eq!(result.errors, vec![ERR_BENCH_SIZE.to_string()]);
    }

    #[test]
    fn rejects_invalid_formation() {
        let mut squad = valid_squad();
        // Turn three midfielders into defenders: 6-2-2.
        squad.starting_xi[4].pos = Defender;
        squad.starting_xi[5].pos = Defender;
        squad.starting_xi[6].pos = Defender;
        let result = validate(&squad);
        assert!(!result.valid);
        assert!(result.errors.contains(&ERR_FORMATION.to_string()));
    }

    #[test]
    fn rejects_two_goalkeepers() {
        let mut squad = four_three_three();
        squad.starting_xi[1].pos = Goalkeeper;
        assert_eq!(Formation::of(&squad.starting_xi), None);
        assert!(validate(&squad).errors.contains(&ERR_FORMATION.to_string()));
    }

    #[test]
    fn every_legal_formation_is_accepted() {
        for f in Formation::LEGAL {
            let mut xi = vec![slot(1, Goalkeeper, 4.0)];
            let mut id = 2;
            for (pos, n) in [(Defender, f.def), (Midfielder, f.mid), (Forward, f.fwd)] {
                for _ in 0..n {
                    xi.push(slot(id, pos, 4.0));
                    id += 1;
                }
            }
            assert_eq!(Formation::of(&xi), Some(f), "formation {f}");
        }
    }

    #[test]
    fn rejects_over_budget() {
        let squad = Squad {
            bank: 50.0,
            ..valid_squad()
        };
        let result = validate(&squad);
        assert!(!result.valid);
        assert_eq!(result.errors, vec![ERR_BUDGET.to_string()]);
    }

    #[test]
    fn negative_bank_skips_budget_rule() {
        let mut squad = four_three_three();
        // Scale prices so the squad is worth 160.
        let total = squad.total_cost();
        for s in squad.starting_xi.iter_mut().chain(squad.bench.iter_mut()) {
            s.price = s.price * 160.0 / total;
        }
        squad.bank = -50.0;
        let result = validate(&squad);
        assert!(result.valid, "unexpected errors: {:?}", result.errors);
    }

    #[test]
    fn negative_bank_still_reports_other_rules() {
        let mut squad = four_three_three();
        squad.bank = -50.0;
        squad.bench.truncate(2);
        let result = validate(&squad);
        assert_eq!(result.errors, vec![ERR_BENCH_SIZE.to_string()]);
    }

    #[test]
    fn rejects_duplicates_alongside_other_errors() {
        let mut squad = valid_squad();
        squad.starting_xi[10] = slot(1, Forward, 7.5);
        squad.bench.truncate(3);
        squad.bank = 50.0;
        let result = validate(&squad);
        assert!(!result.valid);
        assert!(result.errors.contains(&ERR_DUPLICATE.to_string()));
        assert!(result.errors.contains(&ERR_BENCH_SIZE.to_string()));
        assert!(result.errors.contains(&ERR_BUDGET.to_string()));
    }

    #[test]
    fn errors_are_reported_in_rule_order() {
        let squad = Squad {
            starting_xi: vec![slot(1, Goalkeeper, 60.0), slot(1, Defender, 60.0)],
            bench: vec![],
            bank: 0.0,
        };
        let result = validate(&squad);
        assert_eq!(
            result.errors,
            vec![
                ERR_STARTING_XI_SIZE.to_string(),
                ERR_BENCH_SIZE.to_string(),
                ERR_FORMATION.to_string(),
                ERR_BUDGET.to_string(),
                ERR_DUPLICATE.to_string(),
            ]
        );
    }

    #[test]
    fn analysis_validation_ignores_budget() {
        let squad = Squad {
            bank: 50.0,
            ..valid_squad()
        };
        assert!(validate_for_analysis(&squad).valid);

        let mut dup = valid_squad();
        dup.bench[0].id = 1;
        let result = validate_for_analysis(&dup);
        assert_eq!(result.errors, vec![ERR_DUPLICATE.to_string()]);
    }

    #[test]
    fn formation_display() {
        assert_eq!(Formation::new(4, 4, 2).to_string(), "4-4-2");
    }
}
