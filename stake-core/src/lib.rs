//! Stake Guesser core - session ledger for the provably-fair guessing games
//!
//! This library owns a player's session: balance, bet, round counter, streaks
//! and history. Outcomes come from `stake-fair`; the ledger settles them and
//! persists sessions, a cross-session leaderboard and history exports.

pub mod config;
pub mod error;
pub mod ledger;
pub mod storage;
pub mod types;

pub use config::GameConfig;
pub use error::{Result, StakeError};
pub use ledger::{SessionLedger, SessionState, SharedLedger};
pub use storage::{ExportFormat, LeaderboardStore, SessionStore};
pub use types::{Guess, LeaderboardEntry, RoundRecord, RoundResult, SessionSummary};

pub use stake_fair::{Cell, GridConfig, Mode, Outcome, RoundSeed};

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_session_lifecycle() {
        let temp_dir = tempdir().unwrap();
        let config = GameConfig::with_data_dir(temp_dir.path());
        let save_file = config.save_file.clone();

        let mut ledger =
            SessionLedger::new(config.clone(), Some("abc".into()), Some("xyz".into())).unwrap();
        let record = ledger.play_round(Guess::High, &Mode::Number).unwrap();
        assert_eq!(record.balance_after, 105.0);

        ledger.save(&save_file).unwrap();
        ledger.record_leaderboard("tester").unwrap();

        let mut resumed = SessionLedger::new(config, None, None).unwrap();
        resumed.load(&save_file).unwrap();
        assert_eq!(resumed.balance(), 105.0);
        assert_eq!(resumed.round_index(), 2);
        assert_eq!(resumed.leaderboard().unwrap()[0].name, "tester");
    }
}
