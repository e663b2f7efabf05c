use crate::commands::{history_table, leaderboard_table, print_summary};
use stake_core::{GameConfig, LeaderboardStore, Result, SessionLedger};

pub fn show_leaderboard(config: &GameConfig) -> Result<()> {
    let store = LeaderboardStore::new(&config.leaderboard_file, config.leaderboard_size);
    let entries = store.load()?;

    if entries.is_empty() {
        println!("Leaderboard is empty.");
        return Ok(());
    }

    println!("Leaderboard (Top {}):", config.leaderboard_size);
    println!("{}", leaderboard_table(&entries));
    Ok(())
}

pub fn show_history(config: &GameConfig) -> Result<()> {
    let mut ledger = SessionLedger::new(config.clone(), None, None)?;
    ledger.load(&config.save_file)?;

    if ledger.history().is_empty() {
        println!("The saved session has no rounds yet.");
        return Ok(());
    }

    println!("{}", history_table(ledger.history()));
    print_summary(&ledger.summary());

    let unverified = ledger.unverified_rounds()?;
    if unverified.is_empty() {
        println!("All {} rounds verify against their seeds.", ledger.history().len());
    } else {
        println!("Rounds that do NOT verify: {:?}", unverified);
    }
    Ok(())
}
