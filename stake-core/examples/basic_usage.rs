use stake_core::{ExportFormat, GameConfig, Guess, Mode, SessionLedger};
use stake_fair::GridConfig;
use tempfile::tempdir;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    // Create temp dir
    let temp_dir = tempdir()?;
    println!("Using temporary directory: {:?}", temp_dir.path());

    let config = GameConfig::with_data_dir(temp_dir.path());
    let mut ledger = SessionLedger::new(config, Some("abc".into()), Some("xyz".into()))?;

    println!("Playing three HIGH rounds...");
    for _ in 0..3 {
        let record = ledger.play_round(Guess::High, &Mode::Number)?;
        println!("{}", record);
    }

    println!("\nOne grid round on the default layout");
    let record = ledger.play_round(
        Guess::Cell(stake_core::Cell::new(2, 2)),
        &Mode::Grid(GridConfig::default()),
    )?;
    println!("{}", record);

    let summary = ledger.summary();
    println!(
        "\nBalance: {:.2} | Win rate: {:.1}% | Net: {:+.2}",
        ledger.balance(),
        summary.win_rate,
        summary.net
    );

    // Every round re-derives from its own seeds
    println!("Unverified rounds: {:?}", ledger.unverified_rounds()?);

    let path = ledger.export_history(ExportFormat::Json)?;
    println!("History exported to {}", path.display());

    let board = ledger.record_leaderboard("example")?;
    println!("Leaderboard entries: {}", board.len());

    println!("\nExample completed successfully!");

    Ok(())
}
