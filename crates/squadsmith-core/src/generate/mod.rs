// Greedy squad generator.
//
// Fills the mandatory core of the starting eleven, then the flexible outfield
// slots, then the bench, always taking the best affordable unused candidate.
// The result is not globally optimal: an early expensive pick can starve later
// slots, and the flexible fill may produce a shape outside the legal
// formations. Callers validate the output.

pub mod strategy;

use std::cmp::Ordering;
use std::collections::HashSet;

use tracing::{debug, info, warn};

use crate::player::{Player, Position};
use crate::scoring::{round2, score, Weights};
use crate::squad::{Squad, SquadSlot, STARTING_XI_SIZE};

pub use strategy::{Comparator, Strategy};

pub const DEFAULT_BUDGET: f64 = 100.0;

/// Slack for float noise when comparing a price with the bank.
const PRICE_EPSILON: f64 = 1e-9;

/// Bank above which the upgrade pass runs.
pub const UPGRADE_THRESHOLD: f64 = 2.0;

/// Starting slots filled before the flexible ones.
const CORE: [(Position, usize); 4] = [
    (Position::Goalkeeper, 1),
    (Position::Defender, 3),
    (Position::Midfielder, 3),
    (Position::Forward, 1),
];

const FLEXIBLE: [Position; 3] = [Position::Defender, Position::Midfielder, Position::Forward];

const BENCH: [Position; 4] = [
    Position::Goalkeeper,
    Position::Defender,
    Position::Midfielder,
    Position::Forward,
];

#[derive(Debug, Clone, Copy)]
struct Candidate<'a> {
    player: &'a Player,
    score: f64,
}

/// Available players per position, each pool sorted by score descending.
struct Pools<'a> {
    by_pos: [Vec<Candidate<'a>>; 4],
}

impl<'a> Pools<'a> {
    fn new(players: &'a [Player], weights: &Weights) -> Self {
        let mut by_pos: [Vec<Candidate<'a>>; 4] = Default::default();
        for player in players.iter().filter(|p| p.status.is_available()) {
            by_pos[player.pos.sort_order() as usize].push(Candidate {
                player,
                score: score(player, weights),
            });
        }
        for pool in by_pos.iter_mut() {
            pool.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
        }
        Pools { by_pos }
    }

    fn get(&self, pos: Position) -> &[Candidate<'a>] {
        &self.by_pos[pos.sort_order() as usize]
    }

    fn score_of(&self, slot: &SquadSlot) -> Option<f64> {
        self.get(slot.pos)
            .iter()
            .find(|c| c.player.id == slot.id)
            .map(|c| c.score)
    }
}

/// Highest comparator key among candidates passing `eligible`. The first
/// candidate in pool order wins a tie.
fn best_by<'a>(
    pool: &[Candidate<'a>],
    comparator: Comparator,
    eligible: impl Fn(&Candidate<'a>) -> bool,
) -> Option<Candidate<'a>> {
    let mut best: Option<(Candidate<'a>, f64)> = None;
    for c in pool.iter().filter(|c| eligible(c)) {
        let key = comparator.key(c.score, c.player.price);
        match best {
            Some((_, k)) if key <= k => {}
            _ => best = Some((*c, key)),
        }
    }
    best.map(|(c, _)| c)
}

/// In-progress squad plus the ids already taken. `squad.bank` is kept
/// unrounded until the squad is returned.
struct Builder {
    squad: Squad,
    used: HashSet<u32>,
    comparator: Comparator,
}

impl Builder {
    fn best_affordable<'a>(&self, pool: &[Candidate<'a>]) -> Option<Candidate<'a>> {
        let bank = self.squad.bank;
        best_by(pool, self.comparator, |c| {
            !self.used.contains(&c.player.id) && c.player.price <= bank + PRICE_EPSILON
        })
    }

    fn take(&mut self, c: Candidate<'_>, bench: bool) {
        self.used.insert(c.player.id);
        self.squad.bank -= c.player.price;
        let slot = SquadSlot::from(c.player);
        debug!(
            "picked {} ({}, {:.1}) score {:.2}, bank {:.2}",
            c.player.name, c.player.pos, c.player.price, c.score, self.squad.bank
        );
        if bench {
            self.squad.bench.push(slot);
        } else {
            self.squad.starting_xi.push(slot);
        }
    }

    fn fill(&mut self, pools: &Pools<'_>, pos: Position, bench: bool) {
        match self.best_affordable(pools.get(pos)) {
            Some(c) => self.take(c, bench),
            None => warn!(
                "no affordable {} left with bank {:.2}; slot left empty",
                pos, self.squad.bank
            ),
        }
    }

    /// Best flexible candidate: the comparator picks one per outfield
    /// position, then the highest raw score wins (earlier position on ties).
    fn fill_flexible(&mut self, pools: &Pools<'_>) {
        let mut chosen: Option<Candidate<'_>> = None;
        for pos in FLEXIBLE {
            if let Some(c) = self.best_affordable(pools.get(pos)) {
                if chosen.map_or(true, |best| c.score > best.score) {
                    chosen = Some(c);
                }
            }
        }
        match chosen {
            Some(c) => self.take(c, false),
            None => warn!(
                "no affordable outfield player left with bank {:.2}; slot left empty",
                self.squad.bank
            ),
        }
    }

    /// One pass over the starting eleven swapping each player for a pricier,
    /// higher-scoring one the bank can cover.
    fn upgrade(&mut self, pools: &Pools<'_>) {
        let mut swaps = 0;
        for i in 0..self.squad.starting_xi.len() {
            let current = self.squad.starting_xi[i].clone();
            let Some(current_score) = pools.score_of(&current) else {
                continue;
            };
            let budget = self.squad.bank + current.price;
            let upgrade = best_by(pools.get(current.pos), self.comparator, |c| {
                !self.used.contains(&c.player.id)
                    && c.player.price > current.price
                    && c.player.price <= budget + PRICE_EPSILON
            });
            let Some(upgrade) = upgrade.filter(|u| u.score > current_score) else {
                continue;
            };

            debug!(
                "upgrading {} -> {} ({:.2} -> {:.2})",
                current.id, upgrade.player.id, current_score, upgrade.score
            );
            self.squad.bank += current.price - upgrade.player.price;
            self.squad.starting_xi[i] = SquadSlot::from(upgrade.player);
            self.used.remove(&current.id);
            self.used.insert(upgrade.player.id);
            swaps += 1;
        }
        debug!("upgrade pass made {} swaps", swaps);
    }
}

/// Build a squad from `players` within `budget`.
///
/// Only available players are considered. Candidates are ranked by the
/// strategy's comparator over scores computed with `weights`. A slot with no
/// affordable candidate stays empty; see [`Squad::is_complete`]. The
/// returned bank is rounded to two decimals.
pub fn generate(players: &[Player], weights: &Weights, budget: f64, strategy: Strategy) -> Squad {
    let pools = Pools::new(players, weights);
    let mut builder = Builder {
        squad: Squad::new(budget),
        used: HashSet::new(),
        comparator: strategy.comparator(),
    };

    for (pos, count) in CORE {
        for _ in 0..count {
            builder.fill(&pools, pos, false);
        }
    }

    let flexible = STARTING_XI_SIZE.saturating_sub(builder.squad.starting_xi.len());
    for _ in 0..flexible {
        builder.fill_flexible(&pools);
    }

    for pos in BENCH {
        builder.fill(&pools, pos, true);
    }

    if builder.squad.bank > UPGRADE_THRESHOLD {
        builder.upgrade(&pools);
    }

    let mut squad = builder.squad;
    squad.bank = round2(squad.bank);
    info!(
        "generated {} squad: {} starters, {} bench, bank {:.2}",
        strategy,
        squad.starting_xi.len(),
        squad.bench.len(),
        squad.bank
    );
    squad
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
