//! Seeds for the ranking RNG.
//!
//! A feed must look the same on every refresh during one day and change the next day, so the
//! seed is derived from the calendar date and a stable user or device identifier.

use std::fmt;

use chrono::NaiveDate;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RankSeed(pub u64);

impl RankSeed {
    pub fn daily(date: NaiveDate, identifier: &str) -> Self {
        Self(daily_seed(date, identifier))
    }

    pub fn value(&self) -> u64 {
        self.0
    }

    /// ChaCha8 output is fixed across `rand` releases.
    pub(crate) fn rng(&self) -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(self.0)
    }
}

impl From<u64> for RankSeed {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl fmt::Display for RankSeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// BLAKE3 over `YYYY-MM-DD:identifier`, first eight bytes read little-endian.
pub fn daily_seed(date: NaiveDate, identifier: &str) -> u64 {
    let mut hasher = blake3::Hasher::new();
    hasher.update(date.format("%Y-%m-%d").to_string().as_bytes());
    hasher.update(b":");
    hasher.update(identifier.trim().as_bytes());
    let digest = hasher.finalize();

    let mut prefix = [0_u8; 8];
    prefix.copy_from_slice(&digest.as_bytes()[..8]);
    u64::from_le_bytes(prefix)
}
