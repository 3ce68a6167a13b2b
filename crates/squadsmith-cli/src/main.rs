// Squadsmith command-line entry point.
//
// Startup sequence:
// 1. Initialize tracing (stderr, so stdout stays JSON)
// 2. Copy default config files and load config
// 3. Load players through the TTL cache
// 4. Run one subcommand and print its result as JSON

use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use chrono::Utc;
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::info;

use squadsmith_core::cache::PlayerCache;
use squadsmith_core::config::{self, Config, MAX_BUDGET, MIN_BUDGET};
use squadsmith_core::generate::{generate, Strategy};
use squadsmith_core::ingest;
use squadsmith_core::player::{Player, Position};
use squadsmith_core::scoring::{label, PlayerLabel, Weights};
use squadsmith_core::search;
use squadsmith_core::squad::{analyze_squad, validate, validate_for_analysis, Squad, ValidationResult};
use squadsmith_core::suggest::{suggest, SuggestionRequest};

#[derive(Parser)]
#[command(name = "squadsmith")]
#[command(about = "Score players, build and analyse fantasy football squads", long_about = None)]
struct Cli {
    /// Directory holding config/ and defaults/ (defaults to the current directory)
    #[arg(long, global = true)]
    config_dir: Option<PathBuf>,

    /// Player data file, overriding [data] players in squad.toml
    #[arg(long, global = true)]
    players: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Highest scoring players
    Top {
        /// GK, DEF, MID or FWD
        #[arg(long, value_parser = parse_position)]
        position: Option<Position>,

        #[arg(long, default_value_t = 10)]
        limit: usize,
    },

    /// Generate a squad with a strategy
    Generate {
        /// Strategy name; defaults to [generator] strategy
        #[arg(long)]
        strategy: Option<String>,

        /// Budget in millions; defaults to [generator] budget
        #[arg(long)]
        budget: Option<f64>,
    },

    /// Check squad legality
    Validate {
        /// Squad JSON file
        squad: PathBuf,

        /// Skip the budget rule, as for an existing squad
        #[arg(long)]
        analysis: bool,
    },

    /// Score, label and suggest replacements for an existing squad
    Analyze {
        /// Squad JSON file
        squad: PathBuf,
    },

    /// Replacement candidates for one player
    Suggest {
        player_id: u32,

        #[arg(long)]
        max_price: f64,

        /// Comma-separated player ids to leave out
        #[arg(long, value_delimiter = ',')]
        exclude: Vec<u32>,

        /// Defaults to [suggestions] limit
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Find players by name
    Search {
        name: String,

        #[arg(long, default_value_t = search::DEFAULT_SEARCH_LIMIT)]
        limit: usize,
    },
}

fn parse_position(s: &str) -> Result<Position, String> {
    Position::from_str_pos(s).ok_or_else(|| format!("unknown position `{s}`; use GK, DEF, MID or FWD"))
}

// ---------------------------------------------------------------------------
// Session: config plus cached players
// ---------------------------------------------------------------------------

struct Session {
    config: Config,
    players_path: PathBuf,
    cache: PlayerCache,
}

impl Session {
    fn open(base_dir: &Path, players_override: Option<PathBuf>) -> anyhow::Result<Self> {
        config::ensure_config_files(base_dir).context("failed to initialize config files")?;
        let config = config::load_config_from(base_dir).context("failed to load configuration")?;
        info!(
            "config loaded: budget {}, strategy {}, {} suggestions",
            config.generator.budget, config.generator.strategy, config.suggestions.limit
        );

        let players_path = players_override.unwrap_or_else(|| config.data.players_path(base_dir));
        let cache = PlayerCache::with_ttl_secs(config.data.cache_ttl_secs);
        Ok(Session {
            config,
            players_path,
            cache,
        })
    }

    fn players(&mut self) -> anyhow::Result<&[Player]> {
        let path = &self.players_path;
        let players = self
            .cache
            .get_or_load(Utc::now(), || ingest::load_players(path))
            .with_context(|| format!("failed to load players from {}", path.display()))?;
        Ok(players.as_slice())
    }

    fn weights(&self) -> Weights {
        self.config.analysis_weights()
    }
}

// ---------------------------------------------------------------------------
// Output shapes
// ---------------------------------------------------------------------------

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RankedPlayer<'a> {
    #[serde(flatten)]
    player: &'a Player,
    label: PlayerLabel,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GeneratedSquad {
    strategy: Strategy,
    budget: f64,
    weights: Weights,
    squad: Squad,
    complete: bool,
    validation: ValidationResult,
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    let text = serde_json::to_string_pretty(value).context("failed to serialize output")?;
    println!("{text}");
    Ok(())
}

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

fn run(cli: Cli) -> anyhow::Result<()> {
    let base_dir = match cli.config_dir {
        Some(dir) => dir,
        None => std::env::current_dir().context("failed to read current directory")?,
    };
    let mut session = Session::open(&base_dir, cli.players)?;

    match cli.command {
        Commands::Top { position, limit } => {
            let weights = session.weights();
            let top = search::top_players(session.players()?, &weights, position, limit);
            let ranked: Vec<RankedPlayer> = top
                .iter()
                .map(|p| RankedPlayer {
                    player: p,
                    label: label(p.score.unwrap_or(0.0), p.status),
                })
                .collect();
            print_json(&ranked)
        }

        Commands::Generate { strategy, budget } => {
            let strategy = match strategy {
                Some(name) => Strategy::from_name(&name),
                None => session.config.generator.strategy(),
            };
            let budget = budget.unwrap_or(session.config.generator.budget);
            if !(MIN_BUDGET..=MAX_BUDGET).contains(&budget) {
                bail!("budget must be between {MIN_BUDGET} and {MAX_BUDGET}, got {budget}");
            }
            let weights = strategy.weights();
            let squad = generate(session.players()?, &weights, budget, strategy);
            let validation = validate(&squad);
            print_json(&GeneratedSquad {
                strategy,
                budget,
                weights,
                complete: squad.is_complete(),
                validation,
                squad,
            })
        }

        Commands::Validate { squad, analysis } => {
            let squad = ingest::load_squad(&squad)
                .with_context(|| format!("failed to load squad from {}", squad.display()))?;
            let result = if analysis {
                validate_for_analysis(&squad)
            } else {
                validate(&squad)
            };
            print_json(&result)
        }

        Commands::Analyze { squad } => {
            let squad = ingest::load_squad(&squad)
                .with_context(|| format!("failed to load squad from {}", squad.display()))?;
            let validation = validate_for_analysis(&squad);
            if !validation.valid {
                bail!("invalid squad: {}", validation.errors.join("; "));
            }
            let weights = session.weights();
            let limit = session.config.suggestions.limit;
            let analysis = analyze_squad(&squad, session.players()?, &weights, limit);
            print_json(&analysis)
        }

        Commands::Suggest {
            player_id,
            max_price,
            exclude,
            limit,
        } => {
            let weights = session.weights();
            let limit = limit.unwrap_or(session.config.suggestions.limit);
            let players = session.players()?;
            let Some(player) = search::find_by_id(players, player_id) else {
                bail!("player {player_id} not found");
            };
            let request = SuggestionRequest::new(max_price, limit).excluding(exclude);
            print_json(&suggest(player, &request, players, &weights))
        }

        Commands::Search { name, limit } => {
            let matches = search::search_by_name(session.players()?, &name, limit);
            print_json(&matches)
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing()?;
    run(cli)
}

fn init_tracing() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("squadsmith=info,squadsmith_core=info,warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}
