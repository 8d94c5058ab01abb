//! Server configuration module

use clap::Parser;

use courses_app::{auth::TokenError, context::AppSettings};

use crate::config::{
    auth::AuthConfig, db::DatabaseConfig, logging::LoggingConfig, redis::RedisConfig,
    server::ServerRuntimeConfig,
};

pub(crate) mod auth;
pub(crate) mod db;
pub(crate) mod logging;
pub(crate) mod redis;
pub(crate) mod server;

/// Course enrollment JSON API server configuration
#[derive(Debug, Parser)]
#[command(name = "courses-json", about = "Course enrollment JSON API server", long_about = None)]
pub struct ServerConfig {
    /// Server network settings.
    #[command(flatten)]
    pub server: ServerRuntimeConfig,

    /// Logging output settings.
    #[command(flatten)]
    pub logging: LoggingConfig,

    /// Application database settings.
    #[command(flatten)]
    pub database: DatabaseConfig,

    /// Token revocation store settings.
    #[command(flatten)]
    pub redis: RedisConfig,

    /// Session token settings.
    #[command(flatten)]
    pub auth: AuthConfig,
}

impl ServerConfig {
    /// Load configuration from environment and CLI arguments
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be parsed
    pub fn load() -> Result<Self, clap::Error> {
        // Load .env file if present (ignore if missing)
        _ = dotenvy::dotenv();

        Self::try_parse()
    }

    /// Get the socket address for binding
    #[must_use]
    pub fn socket_addr(&self) -> String {
        self.server.socket_addr()
    }

    /// Split off the settings the application services are built from.
    ///
    /// # Errors
    ///
    /// Returns an error if the signing secret is blank.
    pub fn into_app_settings(self) -> Result<AppSettings, TokenError> {
        let redis_timeout = self.redis.timeout();
        let signing_secret = self.auth.signing_secret()?;
        let token_ttl = self.auth.token_ttl();

        Ok(AppSettings {
            database_url: self.database.database_url,
            redis_url: self.redis.redis_url,
            redis_timeout,
            signing_secret,
            token_issuer: self.auth.jwt_issuer,
            token_ttl,
        })
    }
}
