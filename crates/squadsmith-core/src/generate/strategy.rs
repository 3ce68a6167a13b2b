// Generation strategies: a weight preset plus a candidate comparator each.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::scoring::weights::{
    BALANCED, DIFFERENTIAL, FORM, PREMIUM, SET_AND_FORGET, TEMPLATE, VALUE, WILDCARD,
};
use crate::scoring::Weights;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Strategy {
    #[default]
    Balanced,
    Premium,
    Value,
    Differential,
    Form,
    Template,
    #[serde(rename = "setforget", alias = "set-and-forget")]
    SetAndForget,
    Wildcard,
}

impl Strategy {
    pub const ALL: [Strategy; 8] = [
        Strategy::Balanced,
        Strategy::Premium,
        Strategy::Value,
        Strategy::Differential,
        Strategy::Form,
        Strategy::Template,
        Strategy::SetAndForget,
        Strategy::Wildcard,
    ];

    /// Identifier used in config files and on the command line.
    pub fn name(&self) -> &'static str {
        match self {
            Strategy::Balanced => "balanced",
            Strategy::Premium => "premium",
            Strategy::Value => "value",
            Strategy::Differential => "differential",
            Strategy::Form => "form",
            Strategy::Template => "template",
            Strategy::SetAndForget => "setforget",
            Strategy::Wildcard => "wildcard",
        }
    }

    /// Case-insensitive lookup by identifier.
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim().to_ascii_lowercase();
        match s.as_str() {
            "set-and-forget" | "set_and_forget" => Some(Strategy::SetAndForget),
            _ => Strategy::ALL.into_iter().find(|st| st.name() == s),
        }
    }

    /// Like [`Strategy::parse`] but an unknown identifier falls back to
    /// `Balanced` with a warning.
    pub fn from_name(s: &str) -> Self {
        Strategy::parse(s).unwrap_or_else(|| {
            warn!("unknown strategy `{}`; falling back to balanced", s);
            Strategy::Balanced
        })
    }

    pub fn weights(&self) -> Weights {
        match self {
            Strategy::Balanced => BALANCED,
            Strategy::Premium => PREMIUM,
            Strategy::Value => VALUE,
            Strategy::Differential => DIFFERENTIAL,
            Strategy::Form => FORM,
            Strategy::Template => TEMPLATE,
            Strategy::SetAndForget => SET_AND_FORGET,
            Strategy::Wildcard => WILDCARD,
        }
    }

    pub fn comparator(&self) -> Comparator {
        match self {
            Strategy::Premium => Comparator::Premium,
            Strategy::Value => Comparator::Value,
            _ => Comparator::Score,
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// How candidates for a slot are ranked; larger keys are preferred.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparator {
    /// Raw score.
    Score,
    /// Score boosted by price: `score * (1 + price * 0.1)`.
    Premium,
    /// Score per unit of price.
    Value,
}

impl Comparator {
    pub fn key(&self, score: f64, price: f64) -> f64 {
        match self {
            Comparator::Score => score,
            Comparator::Premium => score * (1.0 + price * 0.1),
            Comparator::Value => score / price,
        }
    }
}
