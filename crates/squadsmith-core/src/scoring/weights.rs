// Weight vectors over the player metric bundle.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::normalize::Metric;

/// Tolerance used to treat an already-normalised vector as summing to 1.
const SUM_EPSILON: f64 = 1e-12;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum WeightError {
    #[error("weight `{metric}` must be finite and non-negative, got {value}")]
    Invalid { metric: Metric, value: f64 },

    #[error("at least one weight must be greater than zero")]
    AllZero,
}

/// One non-negative weight per metric.
///
/// The weighted sum does not require the weights to sum to 1, but scores only
/// stay within 0-10 for a normalised vector; use [`Weights::normalized`]
/// before comparing scores across runs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Weights {
    #[serde(default)]
    pub form: f64,
    #[serde(default)]
    pub xg90: f64,
    #[serde(default)]
    pub xa90: f64,
    #[serde(default, alias = "exp_min")]
    pub exp_min: f64,
    #[serde(default, alias = "next3_ease")]
    pub next3_ease: f64,
    #[serde(default, alias = "avg_points")]
    pub avg_points: f64,
    #[serde(default)]
    pub value: f64,
    #[serde(default)]
    pub ownership: f64,
}

impl Default for Weights {
    /// The analysis defaults: form-led, no weight on points, value or
    /// ownership.
    fn default() -> Self {
        Weights {
            form: 0.3,
            xg90: 0.25,
            xa90: 0.2,
            exp_min: 0.15,
            next3_ease: 0.1,
            avg_points: 0.0,
            value: 0.0,
            ownership: 0.0,
        }
    }
}

// ---------------------------------------------------------------------------
// Presets
// ---------------------------------------------------------------------------

/// Weights in `Metric::ALL` order: form, xg90, xa90, exp_min, next3_ease,
/// avg_points, value, ownership.
const fn preset(w: [f64; 8]) -> Weights {
    Weights {
        form: w[0],
        xg90: w[1],
        xa90: w[2],
        exp_min: w[3],
        next3_ease: w[4],
        avg_points: w[5],
        value: w[6],
        ownership: w[7],
    }
}

pub const BALANCED: Weights = preset([0.15, 0.15, 0.15, 0.2, 0.15, 0.15, 0.05, 0.0]);
pub const PREMIUM: Weights = preset([0.15, 0.25, 0.25, 0.2, 0.05, 0.05, 0.0, 0.05]);
pub const VALUE: Weights = preset([0.15, 0.15, 0.15, 0.15, 0.1, 0.1, 0.2, 0.0]);
pub const DIFFERENTIAL: Weights = preset([0.2, 0.2, 0.15, 0.15, 0.15, 0.1, 0.03, 0.02]);
pub const FORM: Weights = preset([0.25, 0.15, 0.1, 0.15, 0.25, 0.05, 0.03, 0.02]);
pub const TEMPLATE: Weights = preset([0.1, 0.1, 0.1, 0.25, 0.1, 0.2, 0.05, 0.1]);
pub const SET_AND_FORGET: Weights = preset([0.05, 0.15, 0.15, 0.3, 0.05, 0.25, 0.03, 0.02]);
pub const WILDCARD: Weights = preset([0.3, 0.2, 0.15, 0.1, 0.2, 0.02, 0.02, 0.01]);

impl Weights {
    /// All weights zero.
    pub fn zero() -> Self {
        Weights {
            form: 0.0,
            xg90: 0.0,
            xa90: 0.0,
            exp_min: 0.0,
            next3_ease: 0.0,
            avg_points: 0.0,
            value: 0.0,
            ownership: 0.0,
        }
    }

    /// A vector with weight 1 on `metric` and 0 elsewhere.
    pub fn only(metric: Metric) -> Self {
        Self::zero().with(metric, 1.0)
    }

    pub fn get(&self, metric: Metric) -> f64 {
        match metric {
            Metric::Form => self.form,
            Metric::Xg90 => self.xg90,
            Metric::Xa90 => self.xa90,
            Metric::ExpMin => self.exp_min,
            Metric::Next3Ease => self.next3_ease,
            Metric::AvgPoints => self.avg_points,
            Metric::Value => self.value,
            Metric::Ownership => self.ownership,
        }
    }

    /// Copy of `self` with `metric` set to `weight`.
    pub fn with(mut self, metric: Metric, weight: f64) -> Self {
        let slot = match metric {
            Metric::Form => &mut self.form,
            Metric::Xg90 => &mut self.xg90,
            Metric::Xa90 => &mut self.xa90,
            Metric::ExpMin => &mut self.exp_min,
            Metric::Next3Ease => &mut self.next3_ease,
            Metric::AvgPoints => &mut self.avg_points,
            Metric::Value => &mut self.value,
            Metric::Ownership => &mut self.ownership,
        };
        *slot = weight;
        self
    }

    pub fn sum(&self) -> f64 {
        Metric::ALL.iter().map(|&m| self.get(m)).sum()
    }

    /// Divide every weight by the total so the vector sums to 1.
    ///
    /// A vector that already sums to 1, or whose sum is zero or not finite,
    /// is returned unchanged, so applying this twice gives the same result.
    pub fn normalized(&self) -> Self {
        let total = self.sum();
        if !total.is_finite() || total <= 0.0 || (total - 1.0).abs() < SUM_EPSILON {
            return *self;
        }
        let mut out = *self;
        for metric in Metric::ALL {
            out = out.with(metric, self.get(metric) / total);
        }
        out
    }

    /// Reject negative or non-finite weights, and an all-zero vector.
    pub fn validate(&self) -> Result<(), WeightError> {
        for metric in Metric::ALL {
            let value = self.get(metric);
            if !value.is_finite() || value < 0.0 {
                return Err(WeightError::Invalid { metric, value });
            }
        }
        if self.sum() <= 0.0 {
            return Err(WeightError::AllZero);
        }
        Ok(())
    }
}
