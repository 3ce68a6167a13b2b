// Weighted player scores, qualitative labels and aggregate reductions.

use serde::{Deserialize, Serialize};

use super::normalize::{normalize, Metric};
use super::round2;
use super::weights::Weights;
use crate::player::{Player, PlayerStatus, Position};

/// Cap applied to the normalised term of open-ended metrics.
pub const TERM_CAP: f64 = 10.0;

pub const PERFECT_THRESHOLD: f64 = 8.0;
pub const GOOD_THRESHOLD: f64 = 6.0;
pub const POOR_THRESHOLD: f64 = 4.0;

// ---------------------------------------------------------------------------
// Scores
// ---------------------------------------------------------------------------

/// Normalised contribution of one metric before weighting.
pub fn metric_term(player: &Player, metric: Metric) -> f64 {
    let term = normalize(metric, player.metric(metric));
    if metric.is_capped() {
        term.min(TERM_CAP)
    } else {
        term
    }
}

/// Weighted sum of the normalised metrics, rounded to 2 decimals.
///
/// The sum itself is not clamped: it stays within 0-10 only when `weights`
/// sums to 1 and the raw metrics are within their documented ranges.
pub fn score(player: &Player, weights: &Weights) -> f64 {
    let total: f64 = Metric::ALL
        .iter()
        .map(|&m| metric_term(player, m) * weights.get(m))
        .sum();
    round2(total)
}

/// Copy every player with `score` attached. Order is preserved.
pub fn normalize_scores(players: &[Player], weights: &Weights) -> Vec<Player> {
    players
        .iter()
        .map(|p| Player {
            score: Some(score(p, weights)),
            ..p.clone()
        })
        .collect()
}

/// Sum of attached scores; unscored players count as 0.
pub fn total_score(players: &[Player]) -> f64 {
    players.iter().filter_map(|p| p.score).sum()
}

/// Mean over players that carry a score, 0 when none do.
pub fn average_score(players: &[Player]) -> f64 {
    let scores: Vec<f64> = players.iter().filter_map(|p| p.score).collect();
    if scores.is_empty() {
        return 0.0;
    }
    scores.iter().sum::<f64>() / scores.len() as f64
}

// ---------------------------------------------------------------------------
// Labels
// ---------------------------------------------------------------------------

/// Qualitative verdict for a scored player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PlayerLabel {
    Perfect,
    Good,
    Poor,
    Urgent,
    NotPlaying,
}

impl PlayerLabel {
    pub const ALL: [PlayerLabel; 5] = [
        PlayerLabel::Perfect,
        PlayerLabel::Good,
        PlayerLabel::Poor,
        PlayerLabel::Urgent,
        PlayerLabel::NotPlaying,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PlayerLabel::Perfect => "perfect",
            PlayerLabel::Good => "good",
            PlayerLabel::Poor => "poor",
            PlayerLabel::Urgent => "urgent",
            PlayerLabel::NotPlaying => "not-playing",
        }
    }
}

/// Label a score. Any status other than available overrides the score.
pub fn label(score: f64, status: PlayerStatus) -> PlayerLabel {
    if !status.is_available() {
        return PlayerLabel::NotPlaying;
    }
    if score >= PERFECT_THRESHOLD {
        PlayerLabel::Perfect
    } else if score >= GOOD_THRESHOLD {
        PlayerLabel::Good
    } else if score >= POOR_THRESHOLD {
        PlayerLabel::Poor
    } else {
        PlayerLabel::Urgent
    }
}

// ---------------------------------------------------------------------------
// Aggregates
// ---------------------------------------------------------------------------

/// Average score per position. Always carries all four positions; a position
/// with no scored player averages 0.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PositionAverages {
    #[serde(rename = "GK")]
    pub gk: f64,
    #[serde(rename = "DEF")]
    pub def: f64,
    #[serde(rename = "MID")]
    pub mid: f64,
    #[serde(rename = "FWD")]
    pub fwd: f64,
}

impl PositionAverages {
    pub fn get(&self, pos: Position) -> f64 {
        match pos {
            Position::Goalkeeper => self.gk,
            Position::Defender => self.def,
            Position::Midfielder => self.mid,
            Position::Forward => self.fwd,
        }
    }
}

pub fn position_averages(players: &[Player]) -> PositionAverages {
    let mut sums = [0.0_f64; 4];
    let mut counts = [0usize; 4];
    for player in players {
        if let Some(s) = player.score {
            let idx = player.pos.sort_order() as usize;
            sums[idx] += s;
            counts[idx] += 1;
        }
    }
    let avg = |idx: usize| {
        if counts[idx] == 0 {
            0.0
        } else {
            sums[idx] / counts[idx] as f64
        }
    };
    PositionAverages {
        gk: avg(0),
        def: avg(1),
        mid: avg(2),
        fwd: avg(3),
    }
}

/// Number of scored players under each label. All five labels are present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LabelCounts {
    pub perfect: usize,
    pub good: usize,
    pub poor: usize,
    pub urgent: usize,
    #[serde(rename = "not-playing")]
    pub not_playing: usize,
}

impl LabelCounts {
    pub fn get(&self, label: PlayerLabel) -> usize {
        match label {
            PlayerLabel::Perfect => self.perfect,
            PlayerLabel::Good => self.good,
            PlayerLabel::Poor => self.poor,
            PlayerLabel::Urgent => self.urgent,
            PlayerLabel::NotPlaying => self.not_playing,
        }
    }

    fn bump(&mut self, label: PlayerLabel) {
        let slot = match label {
            PlayerLabel::Perfect => &mut self.perfect,
            PlayerLabel::Good => &mut self.good,
            PlayerLabel::Poor => &mut self.poor,
            PlayerLabel::Urgent => &mut self.urgent,
            PlayerLabel::NotPlaying => &mut self.not_playing,
        };
        *slot += 1;
    }
}

pub fn label_counts(players: &[Player]) -> LabelCounts {
    let mut counts = LabelCounts::default();
    for player in players {
        if let Some(s) = player.score {
            counts.bump(label(s, player.status));
        }
    }
    counts
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
