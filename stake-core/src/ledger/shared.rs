use crate::error::Result;
use crate::ledger::{SessionLedger, SessionState};
use crate::types::{Guess, RoundRecord};
use parking_lot::Mutex;
use stake_fair::{Mode, Outcome};
use std::sync::Arc;

/// Single-writer handle for hosts that serve more than one caller.
///
/// Each round is a read-modify-write of balance and streaks, so every
/// mutation runs under the lock.
#[derive(Clone)]
pub struct SharedLedger {
    inner: Arc<Mutex<SessionLedger>>,
}

impl SharedLedger {
    pub fn new(ledger: SessionLedger) -> Self {
        Self {
            inner: Arc::new(Mutex::new(ledger)),
        }
    }

    pub fn play_round(&self, guess: Guess, mode: &Mode) -> Result<RoundRecord> {
        self.inner.lock().play_round(guess, mode)
    }

    pub fn settle_round(&self, guess: Guess, outcome: Outcome) -> Result<RoundRecord> {
        self.inner.lock().settle_round(guess, outcome)
    }

    /// Run `f` with exclusive access to the ledger
    pub fn with<R>(&self, f: impl FnOnce(&mut SessionLedger) -> R) -> R {
        let mut ledger = self.inner.lock();
        f(&mut ledger)
    }

    pub fn snapshot(&self) -> SessionState {
        self.inner.lock().state().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::types::RoundResult;
    use tempfile::tempdir;

    #[test]
    fn test_concurrent_rounds_are_serialized() {
        let temp_dir = tempdir().unwrap();
        let ledger = SessionLedger::new(
            GameConfig::with_data_dir(temp_dir.path()),
            Some("abc".to_string()),
            Some("xyz".to_string()),
        )
        .unwrap();
        let shared = SharedLedger::new(ledger);
        shared.with(|l| l.set_bet_amount(1.0)).unwrap();

        let handles: Vec<_> = (0..4)
            .map(|i| {
                let shared = shared.clone();
                std::thread::spawn(move || {
                    let guess = if i % 2 == 0 { Guess::High } else { Guess::Low };
                    for _ in 0..10 {
                        shared.play_round(guess, &Mode::Number).unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let state = shared.snapshot();
        assert_eq!(state.history().len(), 40);
        assert_eq!(state.round_index(), 41);

        let wins = state
            .history()
            .iter()
            .filter(|r| r.result == RoundResult::Win)
            .count() as f64;
        assert_eq!(state.balance(), 100.0 + wins - (40.0 - wins));

        let rounds: Vec<u64> = state.history().iter().map(|r| r.round_index).collect();
        assert_eq!(rounds, (1..=40).collect::<Vec<_>>());
    }
}
