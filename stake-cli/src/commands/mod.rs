pub mod history;
pub mod play;
pub mod verify;

pub use history::{show_history, show_leaderboard};
pub use play::{handle_play, PlayArgs};
pub use verify::{handle_overlay, handle_verify, OverlayArgs, VerifyArgs};

use comfy_table::{presets::UTF8_FULL, Table};
use stake_core::{LeaderboardEntry, RoundRecord, SessionSummary};
use stake_fair::GridOutcome;

pub(crate) fn print_overlay(grid: &GridOutcome) {
    println!();
    println!("Overlay:");
    for row in grid.rows() {
        println!("{}", row);
    }
    println!();
    println!("* mine   + gem   . empty");
}

pub(crate) fn leaderboard_table(entries: &[LeaderboardEntry]) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["#", "Name", "Balance", "Max Streak"]);

    for (i, entry) in entries.iter().enumerate() {
        table.add_row(vec![
            (i + 1).to_string(),
            entry.name.clone(),
            format!("${:.2}", entry.balance),
            entry.max_win_streak.to_string(),
        ]);
    }
    table
}

pub(crate) fn history_table(records: &[RoundRecord]) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec![
        "Round", "Guess", "Outcome", "Result", "Bet", "Balance", "Verified",
    ]);

    for record in records {
        let verified = match record.verify() {
            Ok(true) => "yes",
            Ok(false) => "NO",
            Err(_) => "error",
        };
        let outcome = match record.outcome.as_number() {
            Some(n) => n.to_string(),
            None => "grid".to_string(),
        };

        table.add_row(vec![
            record.round_index.to_string(),
            record.guess.to_string(),
            outcome,
            record.result.to_string(),
            format!("{:.2}", record.bet_amount),
            format!("{:.2}", record.balance_after),
            verified.to_string(),
        ]);
    }
    table
}

pub(crate) fn print_summary(summary: &SessionSummary) {
    if summary.games_played == 0 {
        println!("No stats yet.");
        return;
    }

    println!("Session summary:");
    println!("  Games played: {}", summary.games_played);
    println!(
        "  Wins: {} | Losses: {} | Win rate: {:.1}%",
        summary.wins, summary.losses, summary.win_rate
    );
    println!("  Longest win streak: {}", summary.max_win_streak);
    println!("  Longest loss streak: {}", summary.max_loss_streak);
    match summary.average_balance_after_win {
        Some(avg) => println!("  Average balance after a win: {:.2}", avg),
        None => println!("  No wins yet."),
    }
    match summary.average_balance_after_loss {
        Some(avg) => println!("  Average balance after a loss: {:.2}", avg),
        None => println!("  No losses yet."),
    }
    println!("  Net: {:+.2}", summary.net);
}
