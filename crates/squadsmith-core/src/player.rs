// Enriched player records as supplied by the data collaborator.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::scoring::Metric;

// ---------------------------------------------------------------------------
// Position
// ---------------------------------------------------------------------------

/// Fantasy football positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Position {
    #[serde(rename = "GK")]
    Goalkeeper,
    #[serde(rename = "DEF")]
    Defender,
    #[serde(rename = "MID")]
    Midfielder,
    #[serde(rename = "FWD")]
    Forward,
}

impl Position {
    pub const ALL: [Position; 4] = [
        Position::Goalkeeper,
        Position::Defender,
        Position::Midfielder,
        Position::Forward,
    ];

    /// Parse a position string into a Position enum.
    ///
    /// Accepts the short codes (GK/DEF/MID/FWD), case-insensitively, plus the
    /// upstream provider's numeric element types ("1".."4").
    pub fn from_str_pos(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "GK" | "GKP" | "1" => Some(Position::Goalkeeper),
            "DEF" | "2" => Some(Position::Defender),
            "MID" | "3" => Some(Position::Midfielder),
            "FWD" | "4" => Some(Position::Forward),
            _ => None,
        }
    }

    /// Return the display string for this position.
    pub fn display_str(&self) -> &'static str {
        match self {
            Position::Goalkeeper => "GK",
            Position::Defender => "DEF",
            Position::Midfielder => "MID",
            Position::Forward => "FWD",
        }
    }

    /// Deterministic ordering index, goalkeeper first.
    pub fn sort_order(&self) -> u8 {
        match self {
            Position::Goalkeeper => 0,
            Position::Defender => 1,
            Position::Midfielder => 2,
            Position::Forward => 3,
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_str())
    }
}

// ---------------------------------------------------------------------------
// Availability status
// ---------------------------------------------------------------------------

/// Availability status, serialized with the provider's one-letter codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PlayerStatus {
    #[default]
    #[serde(rename = "a", alias = "available")]
    Available,
    #[serde(rename = "d", alias = "doubtful")]
    Doubtful,
    #[serde(rename = "i", alias = "injured")]
    Injured,
    #[serde(rename = "s", alias = "suspended")]
    Suspended,
}

impl PlayerStatus {
    /// Parse a status code ("a", "d", "i", "s") or its long form.
    pub fn from_code(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "a" | "available" => Some(PlayerStatus::Available),
            "d" | "doubtful" => Some(PlayerStatus::Doubtful),
            "i" | "injured" => Some(PlayerStatus::Injured),
            "s" | "suspended" => Some(PlayerStatus::Suspended),
            _ => None,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            PlayerStatus::Available => "a",
            PlayerStatus::Doubtful => "d",
            PlayerStatus::Injured => "i",
            PlayerStatus::Suspended => "s",
        }
    }

    pub fn is_available(&self) -> bool {
        *self == PlayerStatus::Available
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// A player record that breaks the input contract.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PlayerError {
    #[error("player {id}: invalid field `{field}`: {message}")]
    InvalidField {
        id: u32,
        field: &'static str,
        message: String,
    },

    #[error("player {id}: unknown position `{value}`")]
    UnknownPosition { id: u32, value: String },

    #[error("player {id}: unknown status code `{value}`")]
    UnknownStatus { id: u32, value: String },
}

// ---------------------------------------------------------------------------
// Player
// ---------------------------------------------------------------------------

/// Fixture difficulty assumed when a team has no upcoming fixtures.
pub const DEFAULT_NEXT3_DIFFICULTY: f64 = 3.0;

fn default_team_short() -> String {
    "UNK".to_string()
}

fn default_next3_ease() -> f64 {
    DEFAULT_NEXT3_DIFFICULTY
}

/// An enriched player record.
///
/// `next3_ease` holds the raw average fixture difficulty (1-5, lower is
/// easier); the scoring normaliser inverts it. `score` is never part of the
/// supplied record and is only attached by
/// [`normalize_scores`](crate::scoring::normalize_scores).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub id: u32,
    #[serde(default)]
    pub name: String,
    #[serde(default = "default_team_short")]
    pub team_short: String,
    pub pos: Position,
    pub price: f64,
    #[serde(default)]
    pub status: PlayerStatus,
    #[serde(default)]
    pub form: f64,
    #[serde(default)]
    pub xg90: f64,
    #[serde(default)]
    pub xa90: f64,
    #[serde(default)]
    pub exp_min: f64,
    #[serde(default = "default_next3_ease")]
    pub next3_ease: f64,
    #[serde(default)]
    pub avg_points: f64,
    #[serde(default)]
    pub value: f64,
    #[serde(default)]
    pub ownership: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
}

impl Player {
    /// Raw (un-normalised) value of a metric.
    pub fn metric(&self, metric: Metric) -> f64 {
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

    /// Check the input contract: a strictly positive, finite price and finite
    /// metrics. Returns the first violation found.
    pub fn validate(&self) -> Result<(), PlayerError> {
        if !self.price.is_finite() || self.price <= 0.0 {
            return Err(PlayerError::InvalidField {
                id: self.id,
                field: "price",
                message: format!("must be a positive number, got {}", self.price),
            });
        }
        for metric in Metric::ALL {
            let raw = self.metric(metric);
            if !raw.is_finite() {
                return Err(PlayerError::InvalidField {
                    id: self.id,
                    field: metric.key(),
                    message: format!("must be finite, got {raw}"),
                });
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Player {
        Player {
            id: 7,
            name: "Test Player".into(),
            team_short: "TST".into(),
            pos: Position::Midfielder,
            price: 8.0,
            status: PlayerStatus::Available,
            form: 5.0,
            xg90: 0.3,
            xa90: 0.2,
            exp_min: 80.0,
            next3_ease: 2.5,
            avg_points: 6.0,
            value: 0.75,
            ownership: 25.0,
            score: None,
        }
    }

    #[test]
    fn position_parsing() {
        assert_eq!(Position::from_str_pos("gk"), Some(Position::Goalkeeper));
        assert_eq!(Position::from_str_pos(" DEF "), Some(Position::Defender));
        assert_eq!(Position::from_str_pos("3"), Some(Position::Midfielder));
        assert_eq!(Position::from_str_pos("FWD"), Some(Position::Forward));
        assert_eq!(Position::from_str_pos("ST"), None);
    }

    #[test]
    fn position_display_round_trips_through_parse() {
        for pos in Position::ALL {
            assert_eq!(Position::from_str_pos(&pos.to_string()), Some(pos));
        }
    }

    #[test]
    fn status_codes() {
        assert_eq!(PlayerStatus::from_code("a"), Some(PlayerStatus::Available));
        assert_eq!(PlayerStatus::from_code("Injured"), Some(PlayerStatus::Injured));
        assert_eq!(PlayerStatus::from_code("u"), None);
        assert_eq!(PlayerStatus::Suspended.code(), "s");
        assert!(PlayerStatus::default().is_available());
    }

    #[test]
    fn deserialize_uses_camel_case_and_defaults() {
        let json = r#"{"id": 3, "pos": "DEF", "price": 4.5, "expMin": 90, "status": "d"}"#;
        let p: Player = serde_json::from_str(json).unwrap();
        assert_eq!(p.pos, Position::Defender);
        assert_eq!(p.status, PlayerStatus::Doubtful);
        assert_eq!(p.team_short, "UNK");
        assert!((p.exp_min - 90.0).abs() < f64::EPSILON);
        assert!((p.next3_ease - DEFAULT_NEXT3_DIFFICULTY).abs() < f64::EPSILON);
        assert!(p.score.is_none());
    }

    #[test]
    fn serialize_omits_missing_score() {
        let json = serde_json::to_value(sample()).unwrap();
        assert!(json.get("score").is_none());
        assert_eq!(json["pos"], "MID");
        assert_eq!(json["teamShort"], "TST");
        assert_eq!(json["next3Ease"], 2.5);
    }

    #[test]
    fn validate_accepts_well_formed_player() {
        assert!(sample().validate().is_ok());
    }

    #[test]
    fn validate_rejects_zero_price() {
        let p = Player { price: 0.0, ..sample() };
        match p.validate().unwrap_err() {
            PlayerError::InvalidField { id, field, .. } => {
                assert_eq!(id, 7);
                assert_eq!(field, "price");
            }
            other => panic!("expected InvalidField, got: {other}"),
        }
    }

    #[test]
    fn validate_rejects_non_finite_metric() {
        let p = Player { xa90: f64::NAN, ..sample() };
        match p.validate().unwrap_err() {
            PlayerError::InvalidField { field, .. } => assert_eq!(field, "xa90"),
            other => panic!("expected InvalidField, got: {other}"),
        }
    }
}
