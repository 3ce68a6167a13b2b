// Configuration loading and parsing (squad.toml, weights.toml).

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

use crate::generate::Strategy;
use crate::scoring::{WeightError, Weights};

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },

    #[error("failed to initialize config from defaults: {message}")]
    DefaultsCopyError { message: String },
}

pub const MIN_BUDGET: f64 = 80.0;
pub const MAX_BUDGET: f64 = 100.0;
pub const MAX_SUGGESTION_LIMIT: usize = 10;

// ---------------------------------------------------------------------------
// Top-level assembled Config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Config {
    pub generator: GeneratorConfig,
    pub suggestions: SuggestionConfig,
    pub data: DataConfig,
    pub weights: Weights,
    pub normalize_weights: bool,
}

impl Config {
    /// Weights used for scoring and analysis, normalised when configured.
    pub fn analysis_weights(&self) -> Weights {
        if self.normalize_weights {
            self.weights.normalized()
        } else {
            self.weights
        }
    }
}

// ---------------------------------------------------------------------------
// squad.toml structs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
struct SquadFile {
    generator: GeneratorConfig,
    suggestions: SuggestionConfig,
    data: DataConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeneratorConfig {
    pub budget: f64,
    pub strategy: String,
}

impl GeneratorConfig {
    /// The configured strategy; an unrecognised name falls back to balanced.
    pub fn strategy(&self) -> Strategy {
        Strategy::from_name(&self.strategy)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SuggestionConfig {
    pub limit: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DataConfig {
    pub players: String,
    pub cache_ttl_secs: i64,
}

impl DataConfig {
    /// Player file path, resolved against `base_dir` when relative.
    pub fn players_path(&self, base_dir: &Path) -> PathBuf {
        let path = Path::new(&self.players);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            base_dir.join(path)
        }
    }
}

// ---------------------------------------------------------------------------
// weights.toml structs
// ---------------------------------------------------------------------------

fn default_normalize() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize)]
struct WeightsFile {
    #[serde(default = "default_normalize")]
    normalize: bool,
    weights: Weights,
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

/// Load and validate configuration from `config/squad.toml` and
/// `config/weights.toml` relative to `base_dir`.
///
/// Does not copy defaults; see [`ensure_config_files`].
pub fn load_config_from(base_dir: &Path) -> Result<Config, ConfigError> {
    let config_dir = base_dir.join("config");

    let squad_path = config_dir.join("squad.toml");
    let squad_file: SquadFile = parse_file(&squad_path)?;

    let weights_path = config_dir.join("weights.toml");
    let weights_file: WeightsFile = parse_file(&weights_path)?;

    let config = Config {
        generator: squad_file.generator,
        suggestions: squad_file.suggestions,
        data: squad_file.data,
        weights: weights_file.weights,
        normalize_weights: weights_file.normalize,
    };

    validate(&config)?;

    Ok(config)
}

/// Files under `config/` that [`load_config_from`] reads.
pub const CONFIG_FILES: [&str; 2] = ["squad.toml", "weights.toml"];

/// Copy each of [`CONFIG_FILES`] missing from `config/` out of `defaults/`.
///
/// Returns the files that were copied, in [`CONFIG_FILES`] order. Existing
/// files are never overwritten and anything else in `defaults/` is ignored.
/// A file present in neither directory is reported as `FileNotFound`.
pub fn ensure_config_files(base_dir: &Path) -> Result<Vec<PathBuf>, ConfigError> {
    let defaults_dir = base_dir.join("defaults");
    let config_dir = base_dir.join("config");

    if !defaults_dir.is_dir() && !config_dir.is_dir() {
        return Err(ConfigError::DefaultsCopyError {
            message: format!(
                "neither defaults/ nor config/ directory found in {}",
                base_dir.display()
            ),
        });
    }

    let mut copied = Vec::new();
    for name in CONFIG_FILES {
        let target = config_dir.join(name);
        if target.is_file() {
            continue;
        }
        let source = defaults_dir.join(name);
        if !source.is_file() {
            return Err(ConfigError::FileNotFound { path: target });
        }

        std::fs::create_dir_all(&config_dir).map_err(|e| ConfigError::DefaultsCopyError {
            message: format!("failed to create config directory: {e}"),
        })?;
        let content = std::fs::read(&source).map_err(|e| ConfigError::DefaultsCopyError {
            message: format!("failed to read {}: {e}", source.display()),
        })?;

        // create_new so a file written concurrently is left alone.
        match std::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&target)
        {
            Ok(mut dest) => {
                std::io::Write::write_all(&mut dest, &content).map_err(|e| {
                    ConfigError::DefaultsCopyError {
                        message: format!("failed to write {}: {e}", target.display()),
                    }
                })?;
                info!("copied default {name} into {}", config_dir.display());
                copied.push(target);
            }
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {}
            Err(e) => {
                return Err(ConfigError::DefaultsCopyError {
                    message: format!("failed to create {}: {e}", target.display()),
                });
            }
        }
    }

    Ok(copied)
}

/// Load config relative to the current working directory, copying defaults
/// first.
pub fn load_config() -> Result<Config, ConfigError> {
    let cwd = std::env::current_dir().map_err(|_| ConfigError::FileNotFound {
        path: PathBuf::from("."),
    })?;
    ensure_config_files(&cwd)?;
    load_config_from(&cwd)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn parse_file<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<T, ConfigError> {
    let text = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
        path: path.to_path_buf(),
    })?;
    toml::from_str(&text).map_err(|e| ConfigError::ParseError {
        path: path.to_path_buf(),
        source: e,
    })
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate(config: &Config) -> Result<(), ConfigError> {
    let budget = config.generator.budget;
    if !(MIN_BUDGET..=MAX_BUDGET).contains(&budget) {
        return Err(ConfigError::ValidationError {
            field: "generator.budget".into(),
            message: format!("must be between {MIN_BUDGET} and {MAX_BUDGET} inclusive, got {budget}"),
        });
    }

    let limit = config.suggestions.limit;
    if !(1..=MAX_SUGGESTION_LIMIT).contains(&limit) {
        return Err(ConfigError::ValidationError {
            field: "suggestions.limit".into(),
            message: format!("must be between 1 and {MAX_SUGGESTION_LIMIT}, got {limit}"),
        });
    }

    if config.data.players.trim().is_empty() {
        return Err(ConfigError::ValidationError {
            field: "data.players".into(),
            message: "must not be empty".into(),
        });
    }

    if config.data.cache_ttl_secs <= 0 {
        return Err(ConfigError::ValidationError {
            field: "data.cache_ttl_secs".into(),
            message: format!("must be > 0, got {}", config.data.cache_ttl_secs),
        });
    }

    config.weights.validate().map_err(|e| match e {
        WeightError::Invalid { metric, value } => ConfigError::ValidationError {
            field: format!("weights.{}", metric.key()),
            message: format!("must be finite and >= 0, got {value}"),
        },
        WeightError::AllZero => ConfigError::ValidationError {
            field: "weights".into(),
            message: "at least one weight must be > 0".into(),
        },
    })
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
