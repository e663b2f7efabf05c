use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, StakeError>;

#[derive(Error, Debug)]
pub enum StakeError {
    #[error("Outcome generator error: {0}")]
    Fair(#[from] stake_fair::FairError),

    #[error("Insufficient balance: need {need:.2}, have {available:.2}")]
    InsufficientBalance { need: f64, available: f64 },

    #[error("Invalid bet amount: {0}")]
    InvalidBet(f64),

    #[error("Guess does not match the round mode: {0}")]
    ModeMismatch(String),

    #[error("No saved session found at {}", .path.display())]
    SessionNotFound { path: PathBuf },

    #[error("Malformed save file {}: {reason}", .path.display())]
    MalformedSaveFile { path: PathBuf, reason: String },

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Dialog error: {0}")]
    Dialog(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl StakeError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    pub fn dialog(msg: impl Into<String>) -> Self {
        Self::Dialog(msg.into())
    }

    pub fn mode_mismatch(msg: impl Into<String>) -> Self {
        Self::ModeMismatch(msg.into())
    }

    pub fn malformed(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::MalformedSaveFile {
            path: path.into(),
            reason: reason.into(),
        }
    }
}
