use crate::error::{Result, StakeError};
use crate::storage::write_atomic;
use crate::types::LeaderboardEntry;
use std::cmp::Ordering;
use std::path::PathBuf;

/// Cross-session top list, kept in a single JSON file
pub struct LeaderboardStore {
    path: PathBuf,
    capacity: usize,
}

impl LeaderboardStore {
    pub fn new(path: impl Into<PathBuf>, capacity: usize) -> Self {
        Self {
            path: path.into(),
            capacity,
        }
    }

    /// Current board; an absent file is an empty board
    pub fn load(&self) -> Result<Vec<LeaderboardEntry>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let content = std::fs::read_to_string(&self.path)?;
        serde_json::from_str(&content).map_err(|e| {
            tracing::warn!("Rejected leaderboard {}: {}", self.path.display(), e);
            StakeError::malformed(&self.path, e.to_string())
        })
    }

    /// Merge an entry, keep the best `capacity` entries and rewrite the file
    pub fn record(&self, entry: LeaderboardEntry) -> Result<Vec<LeaderboardEntry>> {
        let mut board = self.load()?;
        board.push(entry);
        board.sort_by(rank);
        board.truncate(self.capacity);

        let content = serde_json::to_string_pretty(&board)?;
        write_atomic(&self.path, content.as_bytes())?;

        tracing::info!(
            "Leaderboard {} now holds {} entries",
            self.path.display(),
            board.len()
        );
        Ok(board)
    }
}

// balance desc, then max win streak desc; sort_by is stable so earlier entries win ties
fn rank(a: &LeaderboardEntry, b: &LeaderboardEntry) -> Ordering {
    b.balance
        .total_cmp(&a.balance)
        .then_with(|| b.max_win_streak.cmp(&a.max_win_streak))
}
