use std::time::Duration;

use clap::Args;
use courses_app::auth::{RedisRevocationStore, RevocationStore};
use jiff::SignedDuration;

#[derive(Debug, Args)]
pub(crate) struct RevokeTokenArgs {
    /// Session token to revoke
    #[arg(long)]
    token: String,

    /// How long the revocation is kept; at least the token's remaining lifetime
    #[arg(long, default_value_t = 3600)]
    ttl_secs: i64,

    /// Redis connection string
    #[arg(long, env = "REDIS_URL", hide_env_values = true)]
    redis_url: String,

    /// Redis call timeout in milliseconds
    #[arg(
        long,
        env = "REDIS_TIMEOUT_MS",
        default_value_t = 500,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    redis_timeout_ms: u64,
}

pub(crate) async fn run(args: RevokeTokenArgs) -> Result<(), String> {
    if args.ttl_secs <= 0 {
        return Err("ttl must be positive".to_string());
    }

    let store = RedisRevocationStore::connect(
        &args.redis_url,
        Duration::from_millis(args.redis_timeout_ms),
    )
    .await
    .map_err(|error| format!("failed to connect to redis: {error}"))?;

    store
        .revoke(&args.token, SignedDuration::from_secs(args.ttl_secs))
        .await
        .map_err(|error| format!("failed to revoke token: {error}"))?;

    println!("revoked token for {}s", args.ttl_secs);

    Ok(())
}
