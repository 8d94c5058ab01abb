//! Auth Config

use clap::{Args, builder::NonEmptyStringValueParser};
use jiff::SignedDuration;

use courses_app::auth::{DEFAULT_TOKEN_ISSUER, SigningSecret, TokenError};

/// Session token settings.
#[derive(Debug, Args)]
pub struct AuthConfig {
    /// HMAC secret session tokens are signed with
    #[arg(
        long,
        env = "JWT_SECRET",
        hide_env_values = true,
        value_parser = NonEmptyStringValueParser::new()
    )]
    pub jwt_secret: String,

    /// Issuer written into and required from session tokens
    #[arg(long, env = "JWT_ISSUER", default_value = DEFAULT_TOKEN_ISSUER)]
    pub jwt_issuer: String,

    /// Session token lifetime in seconds
    #[arg(
        long,
        env = "TOKEN_TTL_SECS",
        default_value_t = 3_600_i64,
        value_parser = clap::value_parser!(i64).range(1..)
    )]
    pub token_ttl_secs: i64,
}

impl AuthConfig {
    pub fn signing_secret(&self) -> Result<SigningSecret, TokenError> {
        SigningSecret::new(self.jwt_secret.as_bytes())
    }

    #[must_use]
    pub fn token_ttl(&self) -> SignedDuration {
        SignedDuration::from_secs(self.token_ttl_secs)
    }
}
