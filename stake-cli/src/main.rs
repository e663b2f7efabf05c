mod commands;

use anyhow::Context;
use clap::{Parser, Subcommand};
use stake_core::{GameConfig, StakeError};
use stake_fair::{FairError, MAX_GRID_SIZE};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "stake-guesser")]
#[command(about = "Provably-fair HIGH/LOW and mine guessing games")]
#[command(version)]
struct Cli {
    /// Data directory for saves, leaderboard and exports
    #[arg(short, long, global = true)]
    data_dir: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start an interactive session
    Play(commands::PlayArgs),
    /// Recompute the outcome of a round from its seeds
    Verify(commands::VerifyArgs),
    /// Show the mine/gem layout for a round
    Overlay(commands::OverlayArgs),
    /// Show the leaderboard
    Leaderboard,
    /// Show the rounds of the saved session
    History,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(format!(
            "stake_guesser={},stake_core={},stake_fair={}",
            log_level, log_level, log_level
        )))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Get data directory
    let data_dir = cli.data_dir.unwrap_or_else(|| {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("stake-guesser")
    });

    // Ensure data directory exists
    std::fs::create_dir_all(&data_dir)
        .with_context(|| format!("creating data directory {}", data_dir.display()))?;

    let config = GameConfig::load_or_default(&data_dir)
        .with_context(|| format!("loading config from {}", data_dir.display()))?;
    tracing::debug!(
        "Data directory {} (save {}, leaderboard {})",
        data_dir.display(),
        config.save_file.display(),
        config.leaderboard_file.display()
    );

    // Execute command
    let result = match cli.command {
        Commands::Play(args) => commands::handle_play(args, &config),
        Commands::Verify(args) => commands::handle_verify(args, &config),
        Commands::Overlay(args) => commands::handle_overlay(args, &config),
        Commands::Leaderboard => commands::show_leaderboard(&config),
        Commands::History => commands::show_history(&config),
    };

    if let Err(e) = result {
        match e {
            StakeError::SessionNotFound { path } => {
                eprintln!("Error: No saved session at {}", path.display());
                eprintln!("Use 'save' inside 'stake-guesser play' to create one");
            }
            StakeError::Fair(e @ FairError::InvalidConfiguration { .. }) => {
                eprintln!("Error: {}", e);
                eprintln!(
                    "Mines plus gems must leave at least one empty cell, and the grid side is at most {}",
                    MAX_GRID_SIZE
                );
            }
            _ => {
                eprintln!("Error: {}", e);
            }
        }
        std::process::exit(1);
    }

    Ok(())
}
