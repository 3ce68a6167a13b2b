// Scoring engine: metric normalisation, weighted scores, labels, aggregates.

pub mod engine;
pub mod normalize;
pub mod weights;

pub use engine::{
    average_score, label, label_counts, normalize_scores, position_averages, score,
    total_score, LabelCounts, PlayerLabel, PositionAverages,
};
pub use normalize::Metric;
pub use weights::{WeightError, Weights};

/// Round half-up to 2 decimal places.
pub fn round2(x: f64) -> f64 {
    (x * 100.0 + 0.5).floor() / 100.0
}
