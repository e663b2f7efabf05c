use crate::error::{Result, StakeError};
use crate::ledger::SessionState;
use crate::storage::write_atomic;
use std::path::PathBuf;

/// Session save file on disk
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    pub fn save(&self, state: &SessionState) -> Result<()> {
        let content = serde_json::to_string_pretty(state)?;
        write_atomic(&self.path, content.as_bytes())?;

        tracing::info!(
            "Saved session at round {} to {}",
            state.round_index,
            self.path.display()
        );
        Ok(())
    }

    /// Read and check a saved session. Nothing is returned unless the file is
    /// present, parses, and describes a consistent session.
    pub fn load(&self) -> Result<SessionState> {
        if !self.exists() {
            return Err(StakeError::SessionNotFound {
                path: self.path.clone(),
            });
        }

        let content = std::fs::read_to_string(&self.path)?;
        let state: SessionState = serde_json::from_str(&content).map_err(|e| {
            tracing::warn!("Rejected save file {}: {}", self.path.display(), e);
            StakeError::malformed(&self.path, e.to_string())
        })?;

        state.check_consistency().map_err(|reason| {
            tracing::warn!("Rejected save file {}: {}", self.path.display(), reason);
            StakeError::malformed(&self.path, reason)
        })?;

        tracing::info!(
            "Loaded session at round {} from {}",
            state.round_index,
            self.path.display()
        );
        Ok(state)
    }
}
