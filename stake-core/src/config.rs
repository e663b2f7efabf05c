use crate::error::{Result, StakeError};
use serde::{Deserialize, Serialize};
use stake_fair::GridConfig;
use std::path::{Path, PathBuf};

pub const CONFIG_FILE: &str = "config.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub starting_balance: f64,
    pub default_bet: f64,
    pub grid: GridConfig,
    pub save_file: PathBuf,
    pub leaderboard_file: PathBuf,
    pub leaderboard_size: usize,
    pub export_dir: PathBuf,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            starting_balance: 100.0,
            default_bet: 5.0,
            grid: GridConfig::default(),
            save_file: PathBuf::from("stake_guesser_save.json"),
            leaderboard_file: PathBuf::from("stake_guesser_leaderboard.json"),
            leaderboard_size: 10,
            export_dir: PathBuf::from("."),
        }
    }
}

impl GameConfig {
    /// Defaults with every relative path placed under `data_dir`
    pub fn with_data_dir(data_dir: &Path) -> Self {
        Self::default().rebase(data_dir)
    }

    /// Read `config.json` from `data_dir`, falling back to defaults when absent
    pub fn load_or_default(data_dir: &Path) -> Result<Self> {
        let path = data_dir.join(CONFIG_FILE);
        if !path.exists() {
            return Ok(Self::with_data_dir(data_dir));
        }

        let content = std::fs::read_to_string(&path)?;
        let config: GameConfig = serde_json::from_str(&content)
            .map_err(|e| StakeError::config(format!("{}: {}", path.display(), e)))?;
        let config = config.rebase(data_dir);
        config.validate()?;

        tracing::debug!("Loaded game config from {}", path.display());
        Ok(config)
    }

    fn rebase(mut self, data_dir: &Path) -> Self {
        for path in [
            &mut self.save_file,
            &mut self.leaderboard_file,
            &mut self.export_dir,
        ] {
            if path.is_relative() {
                *path = data_dir.join(&*path);
            }
        }
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.starting_balance.is_finite() && self.starting_balance > 0.0) {
            return Err(StakeError::config("Starting balance must be greater than 0"));
        }

        if !(self.default_bet.is_finite() && (self.default_bet * 100.0).round() >= 1.0) {
            return Err(StakeError::config("Default bet must be at least one cent"));
        }

        if self.leaderboard_size == 0 {
            return Err(StakeError::config("Leaderboard size must be greater than 0"));
        }

        self.grid.validate()?;
        Ok(())
    }
}
