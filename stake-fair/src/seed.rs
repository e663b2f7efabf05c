use crate::{FairError, Result};
use chrono::NaiveDate;
use rand::Rng;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Upper bound for seeds generated when the player leaves one blank
pub const RANDOM_SEED_MAX: u64 = 1_000_000_000;

/// The `(client_seed, server_hash, round_index)` triple a round is derived from
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RoundSeed {
    client_seed: String,
    server_hash: String,
    round_index: u64,
}

impl RoundSeed {
    pub fn new(
        client_seed: impl Into<String>,
        server_hash: impl Into<String>,
        round_index: u64,
    ) -> Result<Self> {
        let client_seed = client_seed.into();
        let server_hash = server_hash.into();

        if client_seed.trim().is_empty() {
            return Err(FairError::invalid_seed("client seed cannot be empty"));
        }

        if server_hash.trim().is_empty() {
            return Err(FairError::invalid_seed("server hash cannot be empty"));
        }

        if round_index == 0 {
            return Err(FairError::invalid_seed("round index starts at 1"));
        }

        Ok(Self {
            client_seed,
            server_hash,
            round_index,
        })
    }

    pub fn client_seed(&self) -> &str {
        &self.client_seed
    }

    pub fn server_hash(&self) -> &str {
        &self.server_hash
    }

    pub fn round_index(&self) -> u64 {
        self.round_index
    }

    /// `seed:hash:round`, the exact bytes fed to the digest
    pub fn message(&self) -> String {
        format!(
            "{}:{}:{}",
            self.client_seed, self.server_hash, self.round_index
        )
    }

    pub fn digest(&self) -> [u8; 32] {
        let mut hasher = Sha256::new();
        hasher.update(self.message().as_bytes());
        hasher.finalize().into()
    }

    pub fn digest_hex(&self) -> String {
        hex::encode(self.digest())
    }
}

/// Random numeric seed used when the player does not paste one
pub fn random_seed() -> String {
    rand::thread_rng()
        .gen_range(1..=RANDOM_SEED_MAX)
        .to_string()
}

/// Seeds shared by everyone playing on the same calendar day.
///
/// The client seed is the first 16 hex characters of `SHA-256("YYYY-MM-DD")`
/// and the server hash is that string reversed.
pub fn daily_challenge_seeds(date: NaiveDate) -> (String, String) {
    let mut hasher = Sha256::new();
    hasher.update(date.format("%Y-%m-%d").to_string().as_bytes());
    let digest = hex::encode(hasher.finalize());

    let client_seed = digest[..16].to_string();
    let server_hash = client_seed.chars().rev().collect();
    (client_seed, server_hash)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_format() {
        let seed = RoundSeed::new("abc", "xyz", 1).unwrap();
        assert_eq!(seed.message(), "abc:xyz:1");
        assert!(seed.digest_hex().starts_with("7fbb2e2b"));
    }

    #[test]
    fn test_rejects_empty_inputs() {
        assert!(matches!(
            RoundSeed::new("", "xyz", 1),
            Err(FairError::InvalidSeed(_))
        ));
        assert!(matches!(
            RoundSeed::new("abc", "   ", 1),
            Err(FairError::InvalidSeed(_))
        ));
        assert!(matches!(
            RoundSeed::new("abc", "xyz", 0),
            Err(FairError::InvalidSeed(_))
        ));
    }

    #[test]
    fn test_random_seed_is_numeric() {
        for _ in 0..32 {
            let seed: u64 = random_seed().parse().unwrap();
            assert!((1..=RANDOM_SEED_MAX).contains(&seed));
        }
    }

    #[test]
    fn test_daily_challenge_seeds() {
        let date = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
        let (client_seed, server_hash) = daily_challenge_seeds(date);

        assert_eq!(client_seed, "0612bf54f17f599c");
        assert_eq!(server_hash, "c995f71f45fb2160");
        assert_eq!(daily_challenge_seeds(date).0, client_seed);
    }
}
