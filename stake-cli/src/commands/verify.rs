use crate::commands::print_overlay;
use clap::Args;
use stake_core::{GameConfig, GridConfig, Mode, Result, RoundSeed};

#[derive(Args)]
pub struct VerifyArgs {
    /// Client seed of the round
    #[arg(long)]
    client_seed: String,
    /// Server hash of the round
    #[arg(long)]
    server_hash: String,
    /// Round index (starts at 1)
    #[arg(long, default_value_t = 1)]
    round: u64,
    /// Recompute a grid round instead of a number
    #[arg(long)]
    grid: bool,
    #[command(flatten)]
    layout: GridLayout,
}

#[derive(Args)]
pub struct OverlayArgs {
    #[arg(long)]
    client_seed: String,
    #[arg(long)]
    server_hash: String,
    #[arg(long, default_value_t = 1)]
    round: u64,
    #[command(flatten)]
    layout: GridLayout,
}

/// Grid overrides; anything omitted comes from the config file
#[derive(Args)]
struct GridLayout {
    #[arg(long)]
    grid_size: Option<usize>,
    #[arg(long)]
    mines: Option<usize>,
    #[arg(long)]
    gems: Option<usize>,
}

impl GridLayout {
    fn resolve(&self, config: &GameConfig) -> Result<GridConfig> {
        let grid = GridConfig::new(
            self.grid_size.unwrap_or(config.grid.grid_size),
            self.mines.unwrap_or(config.grid.mine_count),
            self.gems.unwrap_or(config.grid.gem_count),
        )?;
        Ok(grid)
    }
}

pub fn handle_verify(args: VerifyArgs, config: &GameConfig) -> Result<()> {
    let mode = if args.grid {
        Mode::Grid(args.layout.resolve(config)?)
    } else {
        Mode::Number
    };

    let seed = RoundSeed::new(args.client_seed, args.server_hash, args.round)?;
    let outcome = stake_fair::outcome::derive(&seed, &mode)?;

    println!("Message: {}", seed.message());
    println!("SHA-256: {}", seed.digest_hex());
    match outcome.as_grid() {
        None => println!("Outcome: {}", outcome),
        Some(grid) => {
            println!("Outcome: {}", outcome);
            print_overlay(grid);
        }
    }
    Ok(())
}

pub fn handle_overlay(args: OverlayArgs, config: &GameConfig) -> Result<()> {
    let grid = args.layout.resolve(config)?;
    let seed = RoundSeed::new(args.client_seed, args.server_hash, args.round)?;
    let outcome = stake_fair::outcome::derive(&seed, &Mode::Grid(grid))?;

    println!(
        "Round {} | Grid: {}x{} | Mines: {} | Gems: {}",
        seed.round_index(),
        grid.grid_size,
        grid.grid_size,
        grid.mine_count,
        grid.gem_count
    );
    if let Some(layout) = outcome.as_grid() {
        print_overlay(layout);
    }
    Ok(())
}
