pub mod shared;

pub use shared::SharedLedger;

use crate::config::GameConfig;
use crate::error::{Result, StakeError};
use crate::storage::{export_history, ExportFormat, LeaderboardStore, SessionStore};
use crate::types::{Guess, LeaderboardEntry, RoundRecord, RoundResult, SessionSummary};
use serde::{Deserialize, Serialize};
use stake_fair::{random_seed, Mode, Outcome, RoundSeed};
use std::path::{Path, PathBuf};

const DEFAULT_PLAYER_NAME: &str = "Player";

/// Amounts are settled in whole cents so repeated bets never drift
fn to_cents(amount: f64) -> i64 {
    (amount * 100.0).round() as i64
}

fn from_cents(cents: i64) -> f64 {
    cents as f64 / 100.0
}

/// Everything a session file holds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionState {
    pub(crate) history: Vec<RoundRecord>,
    pub(crate) balance: f64,
    #[serde(rename = "round_num")]
    pub(crate) round_index: u64,
    pub(crate) win_streak: u32,
    pub(crate) loss_streak: u32,
    pub(crate) max_win_streak: u32,
    pub(crate) max_loss_streak: u32,
    pub(crate) client_seed: String,
    pub(crate) server_hash: String,
    pub(crate) bet_amount: f64,
}

impl SessionState {
    fn new(balance: f64, bet_amount: f64, client_seed: String, server_hash: String) -> Self {
        Self {
            history: Vec::new(),
            balance,
            round_index: 1,
            win_streak: 0,
            loss_streak: 0,
            max_win_streak: 0,
            max_loss_streak: 0,
            client_seed,
            server_hash,
            bet_amount,
        }
    }

    pub fn history(&self) -> &[RoundRecord] {
        &self.history
    }

    pub fn balance(&self) -> f64 {
        self.balance
    }

    pub fn round_index(&self) -> u64 {
        self.round_index
    }

    pub fn win_streak(&self) -> u32 {
        self.win_streak
    }

    pub fn loss_streak(&self) -> u32 {
        self.loss_streak
    }

    pub fn max_win_streak(&self) -> u32 {
        self.max_win_streak
    }

    pub fn max_loss_streak(&self) -> u32 {
        self.max_loss_streak
    }

    pub fn client_seed(&self) -> &str {
        &self.client_seed
    }

    pub fn server_hash(&self) -> &str {
        &self.server_hash
    }

    pub fn bet_amount(&self) -> f64 {
        self.bet_amount
    }

    /// Invariants a loaded session must satisfy before it replaces the live one
    pub(crate) fn check_consistency(&self) -> std::result::Result<(), String> {
        if self.round_index == 0 {
            return Err("round_num must start at 1".to_string());
        }

        if self.history.len() as u64 != self.round_index - 1 {
            return Err(format!(
                "history holds {} rounds but round_num is {}",
                self.history.len(),
                self.round_index
            ));
        }

        if let Some((i, record)) = self
            .history
            .iter()
            .enumerate()
            .find(|(i, record)| record.round_index != *i as u64 + 1)
        {
            return Err(format!(
                "history entry {} is numbered round {}",
                i + 1,
                record.round_index
            ));
        }

        if !self.balance.is_finite() {
            return Err("balance is not a finite number".to_string());
        }

        if !(self.bet_amount.is_finite() && self.bet_amount > 0.0) {
            return Err(format!("bet_amount {} is not positive", self.bet_amount));
        }

        if self.win_streak > self.max_win_streak || self.loss_streak > self.max_loss_streak {
            return Err("current streak exceeds its recorded maximum".to_string());
        }

        if self.win_streak > 0 && self.loss_streak > 0 {
            return Err("win and loss streaks are both running".to_string());
        }

        if self.client_seed.trim().is_empty() || self.server_hash.trim().is_empty() {
            return Err("client_seed and server_hash must be non-empty".to_string());
        }

        Ok(())
    }
}

/// Owns the session state; its methods are the only way to change it
#[derive(Debug)]
pub struct SessionLedger {
    config: GameConfig,
    state: SessionState,
    next_server_hash: Option<String>,
}

impl SessionLedger {
    /// Fresh session. Blank or missing seeds are replaced with random ones.
    pub fn new(
        config: GameConfig,
        client_seed: Option<String>,
        server_hash: Option<String>,
    ) -> Result<Self> {
        config.validate()?;

        let state = SessionState::new(
            from_cents(to_cents(config.starting_balance)),
            from_cents(to_cents(config.default_bet)),
            seed_or_random(client_seed),
            seed_or_random(server_hash),
        );

        tracing::info!(
            "Started session with balance {:.2}, client seed {}, server hash {}",
            state.balance,
            state.client_seed,
            state.server_hash
        );

        Ok(Self {
            config,
            state,
            next_server_hash: None,
        })
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn balance(&self) -> f64 {
        self.state.balance
    }

    pub fn bet_amount(&self) -> f64 {
        self.state.bet_amount
    }

    pub fn round_index(&self) -> u64 {
        self.state.round_index
    }

    pub fn history(&self) -> &[RoundRecord] {
        &self.state.history
    }

    pub fn next_server_hash(&self) -> Option<&str> {
        self.next_server_hash.as_deref()
    }

    pub fn can_bet(&self) -> bool {
        to_cents(self.state.balance) >= to_cents(self.state.bet_amount)
    }

    /// Seed triple for the round about to be played
    pub fn current_seed(&self) -> Result<RoundSeed> {
        Ok(RoundSeed::new(
            self.state.client_seed.clone(),
            self.state.server_hash.clone(),
            self.state.round_index,
        )?)
    }

    fn ensure_can_bet(&self) -> Result<()> {
        if !self.can_bet() {
            tracing::warn!(
                "Rejected bet of {:.2} with balance {:.2}",
                self.state.bet_amount,
                self.state.balance
            );
            return Err(StakeError::InsufficientBalance {
                need: self.state.bet_amount,
                available: self.state.balance,
            });
        }
        Ok(())
    }

    /// Derive the outcome for the current round and settle it
    pub fn play_round(&mut self, guess: Guess, mode: &Mode) -> Result<RoundRecord> {
        self.ensure_can_bet()?;

        let seed = self.current_seed()?;
        let outcome = stake_fair::outcome::derive(&seed, mode)?;
        self.settle_round(guess, outcome)
    }

    /// Apply a computed outcome to the session.
    ///
    /// Nothing changes unless the bet is covered and the guess fits the outcome.
    pub fn settle_round(&mut self, guess: Guess, outcome: Outcome) -> Result<RoundRecord> {
        self.ensure_can_bet()?;
        let result = guess.judge(&outcome)?;

        let state = &mut self.state;
        let balance = to_cents(state.balance);
        let bet = to_cents(state.bet_amount);
        match result {
            RoundResult::Win => {
                state.balance = from_cents(balance + bet);
                state.win_streak += 1;
                state.loss_streak = 0;
                state.max_win_streak = state.max_win_streak.max(state.win_streak);
            }
            RoundResult::Loss => {
                state.balance = from_cents(balance - bet);
                state.loss_streak += 1;
                state.win_streak = 0;
                state.max_loss_streak = state.max_loss_streak.max(state.loss_streak);
            }
        }

        let record = RoundRecord {
            round_index: state.round_index,
            guess,
            outcome,
            result,
            balance_after: state.balance,
            bet_amount: state.bet_amount,
            client_seed: state.client_seed.clone(),
            server_hash: state.server_hash.clone(),
        };
        state.history.push(record.clone());
        state.round_index += 1;

        tracing::info!(
            "Round {} settled: {} on {} -> {} (balance {:.2})",
            record.round_index,
            record.guess,
            record.outcome,
            record.result,
            record.balance_after
        );

        if let Some(next) = self.next_server_hash.take() {
            tracing::debug!("Rotating server hash to {}", next);
            self.state.server_hash = next;
        }

        Ok(record)
    }

    /// Bets are whole cents; anything that rounds to zero is rejected
    pub fn set_bet_amount(&mut self, amount: f64) -> Result<()> {
        if !amount.is_finite() || to_cents(amount) <= 0 {
            return Err(StakeError::InvalidBet(amount));
        }

        self.state.bet_amount = from_cents(to_cents(amount));
        tracing::info!("Bet amount set to {:.2}", amount);
        Ok(())
    }

    /// Server hash that replaces the active one once the next round settles
    pub fn queue_next_server_hash(&mut self, server_hash: impl Into<String>) -> Result<()> {
        let server_hash = server_hash.into().trim().to_string();
        if server_hash.is_empty() {
            return Err(stake_fair::FairError::invalid_seed("server hash cannot be empty").into());
        }

        tracing::debug!("Queued next server hash {}", server_hash);
        self.next_server_hash = Some(server_hash);
        Ok(())
    }

    /// Swap both seeds without touching balance or history
    pub fn set_seeds(
        &mut self,
        client_seed: impl Into<String>,
        server_hash: impl Into<String>,
    ) -> Result<()> {
        // validates both strings
        let seed = RoundSeed::new(client_seed, server_hash, self.state.round_index)?;

        self.state.client_seed = seed.client_seed().to_string();
        self.state.server_hash = seed.server_hash().to_string();
        self.next_server_hash = None;

        tracing::info!(
            "Seeds changed to client {} / server {}",
            self.state.client_seed,
            self.state.server_hash
        );
        Ok(())
    }

    /// Back to the starting stake at round 1 with fresh (or random) seeds
    pub fn reset(&mut self, client_seed: Option<String>, server_hash: Option<String>) {
        let bet_amount = self.state.bet_amount;
        self.state = SessionState::new(
            from_cents(to_cents(self.config.starting_balance)),
            bet_amount,
            seed_or_random(client_seed),
            seed_or_random(server_hash),
        );
        self.next_server_hash = None;

        tracing::info!(
            "Session reset: balance {:.2}, client seed {}, server hash {}",
            self.state.balance,
            self.state.client_seed,
            self.state.server_hash
        );
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        SessionStore::new(path).save(&self.state)
    }

    /// Replace the live session with a saved one; on any error the live
    /// session is left as it was
    pub fn load(&mut self, path: &Path) -> Result<()> {
        let state = SessionStore::new(path).load()?;
        self.state = state;
        self.next_server_hash = None;
        Ok(())
    }

    /// Merge this session into the persistent top list
    pub fn record_leaderboard(&self, name: &str) -> Result<Vec<LeaderboardEntry>> {
        let name = match name.trim() {
            "" => DEFAULT_PLAYER_NAME,
            trimmed => trimmed,
        };

        self.leaderboard_store().record(LeaderboardEntry {
            name: name.to_string(),
            balance: self.state.balance,
            max_win_streak: self.state.max_win_streak,
        })
    }

    pub fn leaderboard(&self) -> Result<Vec<LeaderboardEntry>> {
        self.leaderboard_store().load()
    }

    fn leaderboard_store(&self) -> LeaderboardStore {
        LeaderboardStore::new(&self.config.leaderboard_file, self.config.leaderboard_size)
    }

    pub fn export_history(&self, format: ExportFormat) -> Result<PathBuf> {
        export_history(&self.state.history, &self.config.export_dir, format)
    }

    /// Rounds whose outcome no longer matches their seeds
    pub fn unverified_rounds(&self) -> Result<Vec<u64>> {
        let mut failed = Vec::new();
        for record in &self.state.history {
            if !record.verify()? {
                failed.push(record.round_index);
            }
        }
        Ok(failed)
    }

    pub fn summary(&self) -> SessionSummary {
        let history = &self.state.history;
        let (wins, losses): (Vec<&RoundRecord>, Vec<&RoundRecord>) =
            history.iter().partition(|r| r.result.is_win());

        let average = |records: &[&RoundRecord]| {
            if records.is_empty() {
                None
            } else {
                Some(records.iter().map(|r| r.balance_after).sum::<f64>() / records.len() as f64)
            }
        };

        let win_rate = if history.is_empty() {
            0.0
        } else {
            wins.len() as f64 / history.len() as f64 * 100.0
        };

        SessionSummary {
            games_played: history.len(),
            wins: wins.len(),
            losses: losses.len(),
            win_rate,
            max_win_streak: self.state.max_win_streak,
            max_loss_streak: self.state.max_loss_streak,
            average_balance_after_win: average(&wins[..]),
            average_balance_after_loss: average(&losses[..]),
            net: history.iter().map(RoundRecord::delta).sum(),
        }
    }
}

fn seed_or_random(seed: Option<String>) -> String {
    match seed.map(|s| s.trim().to_string()) {
        Some(s) if !s.is_empty() => s,
        _ => random_seed(),
    }
}
