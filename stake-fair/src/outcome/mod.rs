pub mod grid;

pub use grid::{Cell, GridConfig, GridOutcome, MAX_GRID_SIZE};

use crate::{Result, RoundSeed};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Number outcomes above this value count as HIGH
pub const HIGH_THRESHOLD: u8 = 50;

/// Hex characters of the digest used for the number draw
const NUMBER_PREFIX_LEN: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    Number,
    Grid(GridConfig),
}

impl Mode {
    pub fn validate(&self) -> Result<()> {
        match self {
            Mode::Number => Ok(()),
            Mode::Grid(config) => config.validate(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Number(u8),
    Grid(GridOutcome),
}

impl Outcome {
    pub fn as_number(&self) -> Option<u8> {
        match self {
            Outcome::Number(n) => Some(*n),
            Outcome::Grid(_) => None,
        }
    }

    pub fn as_grid(&self) -> Option<&GridOutcome> {
        match self {
            Outcome::Number(_) => None,
            Outcome::Grid(grid) => Some(grid),
        }
    }

    /// Mode that produced this outcome
    pub fn mode(&self) -> Mode {
        match self {
            Outcome::Number(_) => Mode::Number,
            Outcome::Grid(grid) => Mode::Grid(GridConfig {
                grid_size: grid.grid_size,
                mine_count: grid.mines.len(),
                gem_count: grid.gems.len(),
            }),
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Number(n) => write!(f, "{}", n),
            Outcome::Grid(grid) => write!(
                f,
                "{}x{} grid, mines {}",
                grid.grid_size,
                grid.grid_size,
                grid.mines
                    .iter()
                    .map(Cell::to_string)
                    .collect::<Vec<_>>()
                    .join(" ")
            ),
        }
    }
}

/// Number in `[1, 100]` from the first 8 hex characters of the round digest
pub fn number(seed: &RoundSeed) -> u8 {
    let digest = seed.digest_hex();
    // sha256 hex is always 64 chars of [0-9a-f]
    let prefix = u32::from_str_radix(&digest[..NUMBER_PREFIX_LEN], 16).unwrap_or_default();
    (prefix % 100) as u8 + 1
}

/// Derive the outcome of one round
pub fn derive(seed: &RoundSeed, mode: &Mode) -> Result<Outcome> {
    let outcome = match mode {
        Mode::Number => Outcome::Number(number(seed)),
        Mode::Grid(config) => Outcome::Grid(grid::draw(seed, config)?),
    };

    tracing::debug!(
        "Derived outcome for {} (digest {}): {}",
        seed.message(),
        seed.digest_hex(),
        outcome
    );
    Ok(outcome)
}

/// Recompute a round and compare it with a recorded outcome
pub fn verify(seed: &RoundSeed, mode: &Mode, expected: &Outcome) -> Result<bool> {
    Ok(derive(seed, mode)? == *expected)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_number_known_vectors() {
        let cases = [(1, 84u8), (2, 38), (3, 25)];
        for (round, expected) in cases {
            let seed = RoundSeed::new("abc", "xyz", round).unwrap();
            assert_eq!(number(&seed), expected, "round {}", round);
        }

        let seed = RoundSeed::new("server", "client", 1).unwrap();
        assert_eq!(number(&seed), 8);
    }

    #[test]
    fn test_number_range() {
        for round in 1..=500 {
            let seed = RoundSeed::new("range", "check", round).unwrap();
            let n = number(&seed);
            assert!((1..=100).contains(&n));
        }
    }

    #[test]
    fn test_verify() {
        let seed = RoundSeed::new("abc", "xyz", 1).unwrap();
        let mode = Mode::Grid(GridConfig::default());
        let outcome = derive(&seed, &mode).unwrap();

        assert!(verify(&seed, &mode, &outcome).unwrap());
        assert!(!verify(&seed, &Mode::Number, &outcome).unwrap());
        assert!(verify(&seed, &Mode::Number, &Outcome::Number(84)).unwrap());
        assert_eq!(outcome.mode(), mode);
    }

    #[test]
    fn test_outcome_serde_shape() {
        let json = serde_json::to_string(&Outcome::Number(42)).unwrap();
        assert_eq!(json, r#"{"number":42}"#);
    }
}
