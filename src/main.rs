//! Command line host for the race-rank engine
//!
//! Reads a batch of races (and optionally ratings carried over from an earlier
//! period), runs one rating period, and prints the resulting ratings as JSON.
//!
//! Usage:
//!   race-rank --races races.json
//!   race-rank --races races.json --previous ratings.json --config rank.toml
//!   race-rank --races races.json --dry-run

use anyhow::{Context, Result};
use clap::Parser;
use race_rank::config::{validate_config, AppConfig};
use race_rank::{Period, Race, RatingParameters};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{error, info};

/// Race Rank - Glicko-2 ratings for multi-entrant races
#[derive(Parser)]
#[command(
    name = "race-rank",
    version,
    about = "Compute Glicko-2 ratings from multi-entrant race results",
    long_about = "Race Rank expands every race into the pairwise games implied by its finishing \
                 order, aggregates them over one rating period, and prints the updated rating, \
                 deviation and volatility of every competitor who took part."
)]
struct Args {
    /// Races to rate
    #[arg(
        short,
        long,
        value_name = "FILE",
        help = "JSON array of races, each an array of {competitor, hint} in finishing order"
    )]
    races: PathBuf,

    /// Ratings carried over from an earlier period
    #[arg(
        short,
        long,
        value_name = "FILE",
        help = "JSON object mapping competitor to {rating, deviation, volatility}"
    )]
    previous: Option<PathBuf>,

    /// Configuration file path
    #[arg(
        short,
        long,
        value_name = "FILE",
        help = "Path to configuration file (TOML format)"
    )]
    config: Option<PathBuf>,

    /// Log level override
    #[arg(
        short,
        long,
        value_name = "LEVEL",
        help = "Override log level (trace, debug, info, warn, error)"
    )]
    log_level: Option<String>,

    /// Dry run mode (validate races and exit)
    #[arg(long, help = "Validate the races and exit without ranking")]
    dry_run: bool,
}

/// Initialize structured logging with the configured level
///
/// Logs go to stderr so stdout carries only the JSON result.
fn init_logging(log_level: &str) -> Result<()> {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| log_level.into()),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    Ok(())
}

/// Load and merge configuration from file or environment and CLI arguments
fn load_config(args: &Args) -> Result<AppConfig> {
    let mut config = match &args.config {
        Some(path) => AppConfig::from_file(path)?,
        None => AppConfig::from_env()?,
    };

    if let Some(log_level) = &args.log_level {
        config.service.log_level = log_level.clone();
    }

    validate_config(&config)?;
    Ok(config)
}

fn read_races(path: &Path) -> Result<Vec<Race>> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read races from {}", path.display()))?;
    serde_json::from_str(&contents)
        .with_context(|| format!("Failed to parse races in {}", path.display()))
}

fn read_previous(path: &Path) -> Result<HashMap<String, RatingParameters>> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read previous ratings from {}", path.display()))?;
    serde_json::from_str(&contents)
        .with_context(|| format!("Failed to parse previous ratings in {}", path.display()))
}

fn run(args: &Args, config: AppConfig) -> Result<()> {
    let mut period = Period::with_config(config.rating)?;
    let constants = period.config();
    info!(
        "Rating with tau {} from {}/{}/{}",
        constants.tau,
        constants.initial_rating,
        constants.initial_deviation,
        constants.initial_volatility
    );

    if let Some(previous) = &args.previous {
        let players = read_previous(previous)?;
        info!("Loaded {} previous rating(s)", players.len());
        period.add_previous_players(players)?;
    }

    let races = read_races(&args.races)?;
    period
        .add_races(races)
        .context("Race batch was rejected")?;

    if args.dry_run {
        info!(
            "Dry run: {} race(s) with {} competitor(s) validated",
            period.race_count(),
            period.competitors().count()
        );
        return Ok(());
    }

    let snapshot = period.rank().context("Ranking failed")?;
    println!("{}", serde_json::to_string_pretty(&snapshot)?);

    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();

    let config = load_config(&args).unwrap_or_else(|e| {
        eprintln!("Configuration error: {:#}", e);
        std::process::exit(2);
    });

    if let Err(e) = init_logging(&config.service.log_level) {
        eprintln!("Failed to initialize logging: {}", e);
        std::process::exit(2);
    }

    info!("{} v{}", config.service.name, race_rank::VERSION);

    if let Err(e) = run(&args, config) {
        error!("{:#}", e);
        std::process::exit(1);
    }

    Ok(())
}
