// Metric normalisation onto a common 0-10 scale.
//
// These functions never clamp. Open-ended metrics (form, xG, xA, average
// points, value) can exceed 10 here; the engine caps their terms at
// summation time.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The fixed metric bundle carried by every player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Metric {
    Form,
    Xg90,
    Xa90,
    ExpMin,
    Next3Ease,
    AvgPoints,
    Value,
    Ownership,
}

impl Metric {
    pub const ALL: [Metric; 8] = [
        Metric::Form,
        Metric::Xg90,
        Metric::Xa90,
        Metric::ExpMin,
        Metric::Next3Ease,
        Metric::AvgPoints,
        Metric::Value,
        Metric::Ownership,
    ];

    /// Field name used in player records and weight tables.
    pub fn key(&self) -> &'static str {
        match self {
            Metric::Form => "form",
            Metric::Xg90 => "xg90",
            Metric::Xa90 => "xa90",
            Metric::ExpMin => "expMin",
            Metric::Next3Ease => "next3Ease",
            Metric::AvgPoints => "avgPoints",
            Metric::Value => "value",
            Metric::Ownership => "ownership",
        }
    }

    /// Whether the metric's raw range is open-ended, so its normalised term
    /// is capped at 10 before weighting.
    pub fn is_capped(&self) -> bool {
        matches!(
            self,
            Metric::Form | Metric::Xg90 | Metric::Xa90 | Metric::AvgPoints | Metric::Value
        )
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}

/// Form (nominally 0-5): `form * 2`.
pub fn form(raw: f64) -> f64 {
    raw * 2.0
}

/// Expected goals per 90: `xg90 * 20`.
pub fn xg90(raw: f64) -> f64 {
    raw * 20.0
}

/// Expected assists per 90: `xa90 * 25`.
pub fn xa90(raw: f64) -> f64 {
    raw * 25.0
}

/// Expected minutes as a share of a full match: `(minutes / 90) * 10`.
pub fn exp_min(raw: f64) -> f64 {
    (raw / 90.0) * 10.0
}

/// Average difficulty of the next three fixtures (1-5, lower = easier),
/// inverted into an ease score: `(6 - difficulty) * 2`.
pub fn next3_ease(difficulty: f64) -> f64 {
    (6.0 - difficulty) * 2.0
}

/// Average points per game: `points * 0.5`.
pub fn avg_points(raw: f64) -> f64 {
    raw * 0.5
}

/// Points-per-million value ratio: `value * 2`.
pub fn value(raw: f64) -> f64 {
    raw * 2.0
}

/// Ownership percentage (0-100): `ownership / 10`.
pub fn ownership(raw: f64) -> f64 {
    raw / 10.0
}

/// Dispatch to the normaliser for `metric`.
pub fn normalize(metric: Metric, raw: f64) -> f64 {
    match metric {
        Metric::Form => form(raw),
        Metric::Xg90 => xg90(raw),
        Metric::Xa90 => xa90(raw),
        Metric::ExpMin => exp_min(raw),
        Metric::Next3Ease => next3_ease(raw),
        Metric::AvgPoints => avg_points(raw),
        Metric::Value => value(raw),
        Metric::Ownership => ownership(raw),
    }
}
