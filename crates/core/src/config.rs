//! Game configuration
//!
//! Defaults come from the constants in `columns-types`; every field can be
//! overridden from the environment:
//!
//! - `COLUMNS_SEED`: piece RNG seed (default: 1)
//! - `COLUMNS_BASE_DESCENT_MS`: descent interval at round 0 (default: 700)
//! - `COLUMNS_MIN_DESCENT_MS`: descent interval floor (default: 100)
//! - `COLUMNS_LOCK_SETTLE_MS`: delay from lock to first match pass (default: 200)
//! - `COLUMNS_SETTLE_PASS_MS`: delay between match passes (default: 300)
//! - `COLUMNS_PIECES_PER_ROUND`: locked pieces per round (default: 10)

use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::types::{
    BASE_DESCENT_MS, LOCK_SETTLE_MS, MIN_DESCENT_MS, PIECES_PER_ROUND, SETTLE_PASS_MS,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameConfig {
    pub seed: u32,
    pub base_descent: Duration,
    pub min_descent: Duration,
    pub lock_settle_delay: Duration,
    pub settle_pass_delay: Duration,
    pub pieces_per_round: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            seed: 1,
            base_descent: Duration::from_millis(BASE_DESCENT_MS as u64),
            min_descent: Duration::from_millis(MIN_DESCENT_MS as u64),
            lock_settle_delay: Duration::from_millis(LOCK_SETTLE_MS as u64),
            settle_pass_delay: Duration::from_millis(SETTLE_PASS_MS as u64),
            pieces_per_round: PIECES_PER_ROUND,
        }
    }
}

fn env_parse<T: FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|s| s.trim().parse().ok())
}

fn env_millis(key: &str, default: Duration) -> Duration {
    env_parse::<u64>(key)
        .map(Duration::from_millis)
        .unwrap_or(default)
}

impl GameConfig {
    /// Create from environment variables, falling back to defaults
    pub fn from_env() -> Self {
        let d = Self::default();
        Self {
            seed: env_parse("COLUMNS_SEED").unwrap_or(d.seed),
            base_descent: env_millis("COLUMNS_BASE_DESCENT_MS", d.base_descent),
            min_descent: env_millis("COLUMNS_MIN_DESCENT_MS", d.min_descent),
            lock_settle_delay: env_millis("COLUMNS_LOCK_SETTLE_MS", d.lock_settle_delay),
            settle_pass_delay: env_millis("COLUMNS_SETTLE_PASS_MS", d.settle_pass_delay),
            pieces_per_round: env_parse::<u32>("COLUMNS_PIECES_PER_ROUND")
                .filter(|&n| n > 0)
                .unwrap_or(d.pieces_per_round),
        }
    }

    pub fn with_seed(mut self, seed: u32) -> Self {
        self.seed = seed;
        self
    }
}
