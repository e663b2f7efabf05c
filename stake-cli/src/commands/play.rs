use crate::commands::{history_table, leaderboard_table, print_overlay, print_summary};
use chrono::Local;
use clap::Args;
use dialoguer::{Confirm, Input};
use stake_core::{
    Cell, ExportFormat, GameConfig, Guess, Mode, Result, SessionLedger, SessionStore, StakeError,
};
use stake_fair::daily_challenge_seeds;

#[derive(Args)]
pub struct PlayArgs {
    /// Active client seed (prompted when omitted, blank means random)
    #[arg(long)]
    client_seed: Option<String>,
    /// Server hash (prompted when omitted, blank means random)
    #[arg(long)]
    server_hash: Option<String>,
    /// Play the mine grid instead of HIGH/LOW
    #[arg(long)]
    grid: bool,
    /// Use today's daily challenge seeds
    #[arg(long)]
    daily: bool,
    /// Continue the saved session
    #[arg(long)]
    resume: bool,
}

#[derive(Debug, Clone, PartialEq)]
enum Command {
    Bet(Guess),
    Overlay,
    NextServerHash,
    ChangeBet,
    Reset,
    Export(ExportFormat),
    Summary,
    History,
    Daily,
    Save,
    Load,
    Leaderboard,
    Help,
    Quit,
}

fn parse_command(input: &str) -> Option<Command> {
    let command = match input.trim().to_lowercase().as_str() {
        "h" | "high" => Command::Bet(Guess::High),
        "l" | "low" => Command::Bet(Guess::Low),
        "o" => Command::Overlay,
        "n" => Command::NextServerHash,
        "b" => Command::ChangeBet,
        "r" => Command::Reset,
        "e" => Command::Export(ExportFormat::Text),
        "j" => Command::Export(ExportFormat::Json),
        "s" => Command::Summary,
        "v" => Command::History,
        "d" => Command::Daily,
        "save" => Command::Save,
        "load" => Command::Load,
        "lb" => Command::Leaderboard,
        "help" | "?" => Command::Help,
        "q" | "quit" => Command::Quit,
        other => Command::Bet(Guess::Cell(parse_cell(other)?)),
    };
    Some(command)
}

/// `row,col`, one-based as shown on the board
fn parse_cell(input: &str) -> Option<Cell> {
    let (row, col) = input.split_once(',')?;
    let row: usize = row.trim().parse().ok()?;
    let col: usize = col.trim().parse().ok()?;

    if row == 0 || col == 0 {
        return None;
    }
    Some(Cell::new(row - 1, col - 1))
}

fn prompt_text(prompt: &str) -> Result<String> {
    Input::<String>::new()
        .with_prompt(prompt)
        .allow_empty(true)
        .interact_text()
        .map_err(|e| StakeError::dialog(e.to_string()))
}

fn prompt_seeds() -> Result<(Option<String>, Option<String>)> {
    let client_seed = prompt_text("Paste your Active Client Seed (or leave blank for random)")?;
    let server_hash = prompt_text("Paste the Server Hash (or leave blank for random)")?;
    Ok((Some(client_seed), Some(server_hash)))
}

fn print_help(mode: &Mode) {
    println!();
    println!("=== Stake Guesser Help ===");
    match mode {
        Mode::Number => println!("h/l: Guess HIGH (51-100) / LOW (1-50)"),
        Mode::Grid(grid) => println!(
            "row,col: Pick a cell on the {}x{} grid (a mine loses)",
            grid.grid_size, grid.grid_size
        ),
    }
    println!("o: Show overlay for this round");
    println!("n: Paste next server hash");
    println!("b: Change bet amount");
    println!("r: Reset game");
    println!("e: Export history to text file | j: Export history to JSON file");
    println!("s: Show session summary | v: View full round history");
    println!("d: Daily challenge seeds");
    println!("save: Save session | load: Load session | lb: Leaderboard");
    println!("help/?: Show this help | q: Quit");
    println!();
}

fn print_status(ledger: &SessionLedger) {
    let state = ledger.state();

    println!();
    println!("Current balance: ${:.2}", state.balance());
    println!("Active Client Seed: {}", state.client_seed());
    println!("Server Hash: {}", state.server_hash());
    if let Some(next) = ledger.next_server_hash() {
        println!("Next Server Hash: {}", next);
    }
    println!("Current bet: ${:.2}", state.bet_amount());
    println!(
        "Win streak: {} | Loss streak: {}",
        state.win_streak(),
        state.loss_streak()
    );
    println!(
        "Max win streak: {} | Max loss streak: {}",
        state.max_win_streak(),
        state.max_loss_streak()
    );

    let summary = ledger.summary();
    if summary.games_played > 0 {
        println!(
            "Games played: {} | Win rate: {:.1}%",
            summary.games_played, summary.win_rate
        );
    }
}

fn report(error: StakeError) {
    match error {
        StakeError::InsufficientBalance { need, available } => {
            println!(
                "Not enough balance to bet! Need ${:.2}, have ${:.2}.",
                need, available
            );
            println!("Lower the bet with 'b' or start over with 'r'.");
        }
        StakeError::SessionNotFound { .. } => println!("No saved session found."),
        StakeError::InvalidBet(_) => println!("Bet must be at least $0.01."),
        other => println!("Error: {}", other),
    }
}

fn bet(ledger: &mut SessionLedger, guess: Guess, mode: &Mode) -> Result<()> {
    let record = ledger.play_round(guess, mode)?;

    match record.outcome.as_grid() {
        None => println!("The number is: {}", record.outcome),
        Some(grid) => {
            print_overlay(grid);
            if let Guess::Cell(cell) = guess {
                if grid.is_mine(&cell) {
                    println!("BOOM! You hit a mine at {}", cell);
                } else if grid.is_gem(&cell) {
                    println!("Congrats! You found a gem at {}", cell);
                } else {
                    println!("Safe. Nothing at {}", cell);
                }
            }
        }
    }

    if record.result.is_win() {
        println!("You WIN! Balance: ${:.2}", record.balance_after);
    } else {
        println!("You LOSE! Balance: ${:.2}", record.balance_after);
    }
    Ok(())
}

fn run_command(command: Command, ledger: &mut SessionLedger, mode: &Mode) -> Result<()> {
    match command {
        Command::Bet(guess) => bet(ledger, guess, mode)?,

        Command::Overlay => {
            let seed = ledger.current_seed()?;
            let grid_mode = Mode::Grid(ledger.config().grid);
            let outcome = stake_fair::outcome::derive(&seed, &grid_mode)?;
            if let Some(grid) = outcome.as_grid() {
                print_overlay(grid);
            }
        }

        Command::NextServerHash => {
            let next = prompt_text("Paste the NEXT Server Hash")?;
            ledger.queue_next_server_hash(next)?;
            println!("Next server hash queued for after this round.");
        }

        Command::ChangeBet => {
            let amount: f64 = Input::new()
                .with_prompt("Enter new bet amount")
                .interact_text()
                .map_err(|e| StakeError::dialog(e.to_string()))?;
            ledger.set_bet_amount(amount)?;
            println!("Bet amount set to ${:.2}", ledger.bet_amount());
        }

        Command::Reset => {
            let (client_seed, server_hash) = prompt_seeds()?;
            ledger.reset(client_seed, server_hash);
            println!("Reset! Using Client Seed: {}", ledger.state().client_seed());
            println!("Using Server Hash: {}", ledger.state().server_hash());
        }

        Command::Export(format) => {
            let path = ledger.export_history(format)?;
            println!("History exported to {}", path.display());
        }

        Command::Summary => print_summary(&ledger.summary()),

        Command::History => {
            if ledger.history().is_empty() {
                println!("No rounds played yet.");
            } else {
                println!("{}", history_table(ledger.history()));
            }
        }

        Command::Daily => {
            let (client_seed, server_hash) = daily_challenge_seeds(Local::now().date_naive());
            ledger.set_seeds(client_seed, server_hash)?;
            println!(
                "Daily Challenge! Client Seed: {}, Server Hash: {}",
                ledger.state().client_seed(),
                ledger.state().server_hash()
            );
        }

        Command::Save => {
            let path = ledger.config().save_file.clone();
            ledger.save(&path)?;
            println!("Session saved.");
        }

        Command::Load => {
            let path = ledger.config().save_file.clone();
            ledger.load(&path)?;
            println!("Session loaded.");
        }

        Command::Leaderboard => {
            let board = ledger.leaderboard()?;
            if board.is_empty() {
                println!("Leaderboard is empty.");
            } else {
                println!("Leaderboard (Top {}):", ledger.config().leaderboard_size);
                println!("{}", leaderboard_table(&board));
            }
        }

        Command::Help => print_help(mode),

        // handled by the loop
        Command::Quit => {}
    }

    Ok(())
}

fn ask_leaderboard_name() -> Result<Option<String>> {
    let add = Confirm::new()
        .with_prompt("Add this session to the leaderboard?")
        .default(true)
        .interact()
        .map_err(|e| StakeError::dialog(e.to_string()))?;

    if !add {
        return Ok(None);
    }
    prompt_text("Your name").map(Some)
}

/// Save the session, then add the leaderboard entry if one was asked for.
///
/// Only a failed save is returned; leaderboard trouble is reported and the
/// saved session stays intact.
fn close_session(ledger: &SessionLedger, leaderboard_name: Option<&str>) -> Result<()> {
    let path = ledger.config().save_file.clone();
    ledger.save(&path)?;
    println!("Session saved to {}", path.display());

    if let Some(name) = leaderboard_name {
        match ledger.record_leaderboard(name) {
            Ok(board) => println!("{}", leaderboard_table(&board)),
            Err(e) => report(e),
        }
    }
    Ok(())
}

fn finish(ledger: &SessionLedger) -> Result<()> {
    let name = if ledger.history().is_empty() {
        None
    } else {
        ask_leaderboard_name().unwrap_or_else(|e| {
            report(e);
            None
        })
    };

    close_session(ledger, name.as_deref())
}

pub fn handle_play(args: PlayArgs, config: &GameConfig) -> Result<()> {
    let mode = if args.grid {
        Mode::Grid(config.grid)
    } else {
        Mode::Number
    };
    mode.validate()?;

    println!("=== Stake Guesser ===");
    match &mode {
        Mode::Number => println!("Guess if the next number will be HIGH or LOW!"),
        Mode::Grid(grid) => println!(
            "Grid: {}x{} | Mines: {} | Gems: {}",
            grid.grid_size, grid.grid_size, grid.mine_count, grid.gem_count
        ),
    }

    let (client_seed, server_hash) = if args.daily {
        let (c, s) = daily_challenge_seeds(Local::now().date_naive());
        (Some(c), Some(s))
    } else if args.resume || (args.client_seed.is_some() && args.server_hash.is_some()) {
        (args.client_seed, args.server_hash)
    } else {
        prompt_seeds()?
    };

    let mut ledger = SessionLedger::new(config.clone(), client_seed, server_hash)?;

    if args.resume {
        if SessionStore::new(&config.save_file).exists() {
            match ledger.load(&config.save_file) {
                Ok(()) => println!("Session loaded."),
                Err(e) => report(e),
            }
        } else {
            println!("No saved session found, starting a new one.");
        }
    }

    println!("Using Client Seed: {}", ledger.state().client_seed());
    println!("Using Server Hash: {}", ledger.state().server_hash());
    print_help(&mode);

    loop {
        print_status(&ledger);

        let input = match prompt_text("Your move (help for commands)") {
            Ok(input) => input,
            Err(e) => {
                // terminal is gone, keep what was played
                close_session(&ledger, None)?;
                return Err(e);
            }
        };
        let Some(command) = parse_command(&input) else {
            println!("Invalid input. Type 'help' to see the commands.");
            continue;
        };

        if command == Command::Quit {
            finish(&ledger)?;
            println!("Thanks for playing!");
            break;
        }

        if let Err(e) = run_command(command, &mut ledger, &mode) {
            report(e);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_close_session_saves_despite_broken_leaderboard() {
        let temp_dir = tempdir().unwrap();
        let config = GameConfig::with_data_dir(temp_dir.path());
        std::fs::write(&config.leaderboard_file, "{ broken").unwrap();

        let mut ledger =
            SessionLedger::new(config.clone(), Some("abc".into()), Some("xyz".into())).unwrap();
        ledger.play_round(Guess::High, &Mode::Number).unwrap();

        close_session(&ledger, Some("tester")).unwrap();

        let saved = SessionStore::new(&config.save_file).load().unwrap();
        assert_eq!(saved.history().len(), 1);
        assert_eq!(saved.balance(), 105.0);
        // the broken board is left for the player to inspect
        assert_eq!(
            std::fs::read_to_string(&config.leaderboard_file).unwrap(),
            "{ broken"
        );
    }

    #[test]
    fn test_close_session_records_leaderboard_after_save() {
        let temp_dir = tempdir().unwrap();
        let config = GameConfig::with_data_dir(temp_dir.path());
        let ledger =
            SessionLedger::new(config.clone(), Some("abc".into()), Some("xyz".into())).unwrap();

        close_session(&ledger, Some("tester")).unwrap();

        assert!(config.save_file.exists());
        assert_eq!(ledger.leaderboard().unwrap()[0].name, "tester");
    }

    #[test]
    fn test_parse_letters() {
        assert_eq!(parse_command("h"), Some(Command::Bet(Guess::High)));
        assert_eq!(parse_command(" L "), Some(Command::Bet(Guess::Low)));
        assert_eq!(
            parse_command("j"),
            Some(Command::Export(ExportFormat::Json))
        );
        assert_eq!(parse_command("?"), Some(Command::Help));
        assert_eq!(parse_command("SAVE"), Some(Command::Save));
        assert_eq!(parse_command("q"), Some(Command::Quit));
        assert_eq!(parse_command("x"), None);
        assert_eq!(parse_command(""), None);
    }

    #[test]
    fn test_parse_cells() {
        assert_eq!(
            parse_command("2,3"),
            Some(Command::Bet(Guess::Cell(Cell::new(1, 2))))
        );
        assert_eq!(
            parse_command(" 1 , 5 "),
            Some(Command::Bet(Guess::Cell(Cell::new(0, 4))))
        );
        assert_eq!(parse_command("0,3"), None);
        assert_eq!(parse_command("2;3"), None);
        assert_eq!(parse_command("a,b"), None);
    }
}
