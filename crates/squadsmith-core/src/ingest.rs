// Loading enriched player records and squads from JSON and CSV files.

use std::collections::HashSet;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;
use tracing::info;

use crate::player::{Player, PlayerError, PlayerStatus, Position, DEFAULT_NEXT3_DIFFICULTY};
use crate::squad::Squad;

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("failed to read file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("CSV error in {path}: {source}")]
    Csv { path: String, source: csv::Error },

    #[error("JSON error in {path}: {source}")]
    Json {
        path: String,
        source: serde_json::Error,
    },

    #[error("invalid player record in {path}: {source}")]
    InvalidPlayer { path: String, source: PlayerError },

    #[error("duplicate player id {id} in {path}")]
    DuplicateId { path: String, id: u32 },

    #[error("unsupported file format for {path}: expected .json or .csv")]
    UnsupportedFormat { path: String },
}

// ---------------------------------------------------------------------------
// Raw record (private)
// ---------------------------------------------------------------------------

/// One player as it appears in either file format. Everything except `id`
/// and `pos` may be absent; extra fields and columns are ignored.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawPlayerRow {
    id: u32,
    name: Option<String>,
    team_short: Option<String>,
    pos: String,
    price: Option<f64>,
    status: Option<String>,
    form: Option<f64>,
    xg90: Option<f64>,
    xa90: Option<f64>,
    exp_min: Option<f64>,
    next3_ease: Option<f64>,
    avg_points: Option<f64>,
    value: Option<f64>,
    ownership: Option<f64>,
}

impl RawPlayerRow {
    fn into_player(self) -> Result<Player, PlayerError> {
        let id = self.id;
        let pos = Position::from_str_pos(&self.pos).ok_or_else(|| PlayerError::UnknownPosition {
            id,
            value: self.pos.clone(),
        })?;
        let status = match self.status.as_deref().map(str::trim) {
            None | Some("") => PlayerStatus::Available,
            Some(code) => PlayerStatus::from_code(code).ok_or_else(|| PlayerError::UnknownStatus {
                id,
                value: code.to_string(),
            })?,
        };
        let price = self.price.ok_or_else(|| PlayerError::InvalidField {
            id,
            field: "price",
            message: "missing".into(),
        })?;
        let team_short = self
            .team_short
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| "UNK".to_string());

        let player = Player {
            id,
            name: self.name.unwrap_or_default().trim().to_string(),
            team_short,
            pos,
            price,
            status,
            form: self.form.unwrap_or(0.0),
            xg90: self.xg90.unwrap_or(0.0),
            xa90: self.xa90.unwrap_or(0.0),
            exp_min: self.exp_min.unwrap_or(0.0),
            next3_ease: self.next3_ease.unwrap_or(DEFAULT_NEXT3_DIFFICULTY),
            avg_points: self.avg_points.unwrap_or(0.0),
            value: self.value.unwrap_or(0.0),
            ownership: self.ownership.unwrap_or(0.0),
            score: None,
        };
        player.validate()?;
        Ok(player)
    }
}

// ---------------------------------------------------------------------------
// Reader-based loaders (private, enable testing without temp files)
// ---------------------------------------------------------------------------

fn rows_from_csv_reader<R: Read>(rdr: R) -> Result<Vec<RawPlayerRow>, csv::Error> {
    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(rdr);
    reader.deserialize::<RawPlayerRow>().collect()
}

fn rows_from_json_reader<R: Read>(rdr: R) -> Result<Vec<RawPlayerRow>, serde_json::Error> {
    serde_json::from_reader(rdr)
}

/// Convert rows in file order, stopping at the first bad record or repeated id.
fn into_players(rows: Vec<RawPlayerRow>, path: &str) -> Result<Vec<Player>, IngestError> {
    let mut seen = HashSet::with_capacity(rows.len());
    let mut players = Vec::with_capacity(rows.len());
    for row in rows {
        let player = row.into_player().map_err(|source| IngestError::InvalidPlayer {
            path: path.to_string(),
            source,
        })?;
        if !seen.insert(player.id) {
            return Err(IngestError::DuplicateId {
                path: path.to_string(),
                id: player.id,
            });
        }
        players.push(player);
    }
    Ok(players)
}

// ---------------------------------------------------------------------------
// Public path-based loaders
// ---------------------------------------------------------------------------

fn open(path: &Path) -> Result<std::fs::File, IngestError> {
    std::fs::File::open(path).map_err(|e| IngestError::Io {
        path: path.display().to_string(),
        source: e,
    })
}

/// Load players from a CSV file with a header row.
pub fn load_players_csv(path: &Path) -> Result<Vec<Player>, IngestError> {
    let display = path.display().to_string();
    let rows = rows_from_csv_reader(open(path)?).map_err(|e| IngestError::Csv {
        path: display.clone(),
        source: e,
    })?;
    into_players(rows, &display)
}

/// Load players from a JSON array of player objects.
pub fn load_players_json(path: &Path) -> Result<Vec<Player>, IngestError> {
    let display = path.display().to_string();
    let rows = rows_from_json_reader(open(path)?).map_err(|e| IngestError::Json {
        path: display.clone(),
        source: e,
    })?;
    into_players(rows, &display)
}

/// Load players, choosing the format from the file extension.
pub fn load_players(path: &Path) -> Result<Vec<Player>, IngestError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    let players = match ext.as_deref() {
        Some("json") => load_players_json(path)?,
        Some("csv") => load_players_csv(path)?,
        _ => {
            return Err(IngestError::UnsupportedFormat {
                path: path.display().to_string(),
            })
        }
    };
    info!("loaded {} players from {}", players.len(), path.display());
    Ok(players)
}

/// Load a squad from JSON (`startingXI`, `bench`, `bank`).
pub fn load_squad(path: &Path) -> Result<Squad, IngestError> {
    serde_json::from_reader(open(path)?).map_err(|e| IngestError::Json {
        path: path.display().to_string(),
        source: e,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
