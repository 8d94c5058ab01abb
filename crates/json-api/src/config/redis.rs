//! Revocation Store Config

use std::time::Duration;

use clap::Args;

/// Redis settings for the token revocation list.
#[derive(Debug, Args)]
pub struct RedisConfig {
    /// Redis connection string. Revocations stay in process memory when unset.
    #[arg(long, env = "REDIS_URL")]
    pub redis_url: Option<String>,

    /// Upper bound for a single revocation lookup, in milliseconds
    #[arg(
        long,
        env = "REDIS_TIMEOUT_MS",
        default_value_t = 500_u64,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub redis_timeout_ms: u64,
}

impl RedisConfig {
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.redis_timeout_ms)
    }
}
