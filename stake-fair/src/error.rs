use thiserror::Error;

pub type Result<T> = std::result::Result<T, FairError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FairError {
    #[error(
        "Invalid configuration: {mine_count} mines + {gem_count} gems do not fit a {grid_size}x{grid_size} grid"
    )]
    InvalidConfiguration {
        grid_size: usize,
        mine_count: usize,
        gem_count: usize,
    },

    #[error("Invalid seed: {0}")]
    InvalidSeed(String),
}

impl FairError {
    pub fn invalid_seed(msg: impl Into<String>) -> Self {
        Self::InvalidSeed(msg.into())
    }
}
