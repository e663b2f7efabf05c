use crate::error::{Result, StakeError};
use serde::{Deserialize, Serialize};
use stake_fair::{Cell, Outcome, RoundSeed, HIGH_THRESHOLD};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Guess {
    High,
    Low,
    Cell(Cell),
}

impl Guess {
    /// Decide the round. Fails when the guess kind does not fit the outcome.
    pub fn judge(&self, outcome: &Outcome) -> Result<RoundResult> {
        let won = match (self, outcome) {
            (Guess::High, Outcome::Number(n)) => *n > HIGH_THRESHOLD,
            (Guess::Low, Outcome::Number(n)) => *n <= HIGH_THRESHOLD,
            (Guess::Cell(cell), Outcome::Grid(grid)) => {
                if !cell.is_within(grid.grid_size) {
                    return Err(StakeError::mode_mismatch(format!(
                        "cell {} is outside the {}x{} grid",
                        cell, grid.grid_size, grid.grid_size
                    )));
                }
                !grid.is_mine(cell)
            }
            (Guess::Cell(_), Outcome::Number(_)) => {
                return Err(StakeError::mode_mismatch(
                    "cell guess against a number round",
                ))
            }
            (_, Outcome::Grid(_)) => {
                return Err(StakeError::mode_mismatch("HIGH/LOW guess against a grid round"))
            }
        };

        Ok(if won { RoundResult::Win } else { RoundResult::Loss })
    }
}

impl fmt::Display for Guess {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Guess::High => write!(f, "HIGH"),
            Guess::Low => write!(f, "LOW"),
            Guess::Cell(cell) => write!(f, "{}", cell),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RoundResult {
    Win,
    Loss,
}

impl RoundResult {
    pub fn is_win(&self) -> bool {
        matches!(self, RoundResult::Win)
    }
}

impl fmt::Display for RoundResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RoundResult::Win => write!(f, "WIN"),
            RoundResult::Loss => write!(f, "LOSS"),
        }
    }
}

/// One settled round, as stored in the session history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundRecord {
    #[serde(rename = "round")]
    pub round_index: u64,
    pub guess: Guess,
    pub outcome: Outcome,
    pub result: RoundResult,
    #[serde(rename = "balance")]
    pub balance_after: f64,
    #[serde(rename = "bet")]
    pub bet_amount: f64,
    pub client_seed: String,
    pub server_hash: String,
}

impl RoundRecord {
    /// Signed balance movement of this round
    pub fn delta(&self) -> f64 {
        if self.result.is_win() {
            self.bet_amount
        } else {
            -self.bet_amount
        }
    }

    /// Recompute the outcome from the record's own seeds and compare
    pub fn verify(&self) -> Result<bool> {
        let seed = RoundSeed::new(
            self.client_seed.clone(),
            self.server_hash.clone(),
            self.round_index,
        )?;
        Ok(stake_fair::verify(&seed, &self.outcome.mode(), &self.outcome)?)
    }
}

impl fmt::Display for RoundRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "round={} guess={} outcome={} result={} balance={:.2} bet={:.2} client_seed={} server_hash={}",
            self.round_index,
            self.guess,
            self.outcome,
            self.result,
            self.balance_after,
            self.bet_amount,
            self.client_seed,
            self.server_hash
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub name: String,
    pub balance: f64,
    pub max_win_streak: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub games_played: usize,
    pub wins: usize,
    pub losses: usize,
    pub win_rate: f64, // percent
    pub max_win_streak: u32,
    pub max_loss_streak: u32,
    pub average_balance_after_win: Option<f64>,
    pub average_balance_after_loss: Option<f64>,
    pub net: f64,
}
