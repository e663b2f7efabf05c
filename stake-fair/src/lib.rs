//! Provably-fair outcome generator
//!
//! Every round is derived from a client seed, a server hash and a round index.
//! The triple is hashed with SHA-256 and the digest decides either a number in
//! `[1, 100]` or a mine/gem layout on a square grid, so anyone holding the
//! three values can recompute a round and audit it.

pub mod error;
pub mod outcome;
pub mod seed;

pub use error::{FairError, Result};
pub use outcome::{
    verify, Cell, GridConfig, GridOutcome, Mode, Outcome, HIGH_THRESHOLD, MAX_GRID_SIZE,
};
pub use seed::{daily_challenge_seeds, random_seed, RoundSeed};

/// Derive the outcome for `client_seed:server_hash:round_index` in the given mode
pub fn generate(
    client_seed: &str,
    server_hash: &str,
    round_index: u64,
    mode: &Mode,
) -> Result<Outcome> {
    let seed = RoundSeed::new(client_seed, server_hash, round_index)?;
    outcome::derive(&seed, mode)
}
