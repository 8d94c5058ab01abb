//! Revoked session token store.

use std::{
    fmt,
    future::Future,
    sync::{Arc, Mutex, PoisonError},
    time::Duration,
};

use async_trait::async_trait;
use bb8_redis::{
    RedisConnectionManager,
    bb8::{Pool, RunError},
    redis::{RedisError, cmd},
};
use jiff::{SignedDuration, Timestamp};
use mockall::automock;
use rustc_hash::FxHashMap;
use sha2::{Digest, Sha256};
use thiserror::Error;
use tokio::time;

use crate::clock::Clock;

/// Prefix for revocation keys in the shared store.
pub const REVOCATION_KEY_PREFIX: &str = "revoked";

/// Failures reaching the revocation store. Never a stand-in for "not revoked".
#[derive(Debug, Error)]
pub enum RevocationError {
    #[error("revocation store connection failed")]
    Pool(#[source] RunError<RedisError>),

    #[error("revocation store command failed")]
    Redis(#[from] RedisError),

    #[error("revocation store did not answer within {0:?}")]
    Timeout(Duration),
}

#[automock]
#[async_trait]
pub trait RevocationStore: Send + Sync {
    /// Mark `token` as revoked for at least `ttl`. Revoking twice is harmless.
    async fn revoke(&self, token: &str, ttl: SignedDuration) -> Result<(), RevocationError>;

    /// Whether `token` has been revoked and the mark has not yet lapsed.
    async fn is_revoked(&self, token: &str) -> Result<bool, RevocationError>;
}

/// Store key for a token: the token itself never leaves the process.
#[must_use]
pub fn revocation_key(token: &str) -> String {
    format!(
        "{REVOCATION_KEY_PREFIX}:{}",
        hex::encode(Sha256::digest(token.as_bytes()))
    )
}

/// Whole seconds covering `ttl`, rounded up and at least one.
fn ttl_seconds(ttl: SignedDuration) -> u64 {
    let mut seconds = ttl.as_secs();

    if ttl.subsec_nanos() > 0 {
        seconds = seconds.saturating_add(1);
    }

    u64::try_from(seconds).unwrap_or(0).max(1)
}

/// Redis-backed store shared by every server instance.
#[derive(Clone)]
pub struct RedisRevocationStore {
    pool: Pool<RedisConnectionManager>,
    timeout: Duration,
}

impl fmt::Debug for RedisRevocationStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RedisRevocationStore")
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl RedisRevocationStore {
    /// Build a connection pool for `url`; every store call is bounded by
    /// `timeout`.
    ///
    /// # Errors
    ///
    /// Returns an error when the URL is invalid or no connection can be made.
    pub async fn connect(url: &str, timeout: Duration) -> Result<Self, RevocationError> {
        let manager = RedisConnectionManager::new(url)?;

        let pool = Pool::builder()
            .connection_timeout(timeout)
            .build(manager)
            .await?;

        Ok(Self { pool, timeout })
    }

    async fn bounded<T>(
        &self,
        operation: impl Future<Output = Result<T, RevocationError>>,
    ) -> Result<T, RevocationError> {
        time::timeout(self.timeout, operation)
            .await
            .map_err(|_elapsed| RevocationError::Timeout(self.timeout))?
    }
}

#[async_trait]
impl RevocationStore for RedisRevocationStore {
    async fn revoke(&self, token: &str, ttl: SignedDuration) -> Result<(), RevocationError> {
        let key = revocation_key(token);

        self.bounded(async {
            let mut conn = self.pool.get().await.map_err(RevocationError::Pool)?;

            let (): () = cmd("SET")
                .arg(&key)
                .arg(1_u8)
                .arg("EX")
                .arg(ttl_seconds(ttl))
                .query_async(&mut *conn)
                .await?;

            Ok(())
        })
        .await
    }

    async fn is_revoked(&self, token: &str) -> Result<bool, RevocationError> {
        let key = revocation_key(token);

        self.bounded(async {
            let mut conn = self.pool.get().await.map_err(RevocationError::Pool)?;

            let exists: bool = cmd("EXISTS").arg(&key).query_async(&mut *conn).await?;

            Ok(exists)
        })
        .await
    }
}

/// In-process store for tests and single-node development.
pub struct MemoryRevocationStore {
    entries: Mutex<FxHashMap<String, Timestamp>>,
    clock: Arc<dyn Clock>,
}

impl fmt::Debug for MemoryRevocationStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let entries = self
            .entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len();

        f.debug_struct("MemoryRevocationStore")
            .field("entries", &entries)
            .finish_non_exhaustive()
    }
}

impl MemoryRevocationStore {
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: Mutex::new(FxHashMap::default()),
            clock,
        }
    }
}

#[async_trait]
impl RevocationStore for MemoryRevocationStore {
    async fn revoke(&self, token: &str, ttl: SignedDuration) -> Result<(), RevocationError> {
        let now = self.clock.now();
        let ttl = SignedDuration::from_secs(i64::try_from(ttl_seconds(ttl)).unwrap_or(i64::MAX));
        let until = now.saturating_add(ttl).unwrap_or(Timestamp::MAX);

        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);

        entries.retain(|_, expires| *expires > now);

        let expires = entries.entry(revocation_key(token)).or_insert(until);

        if *expires < until {
            *expires = until;
        }

        Ok(())
    }

    async fn is_revoked(&self, token: &str) -> Result<bool, RevocationError> {
        let now = self.clock.now();

        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);

        Ok(entries
            .get(&revocation_key(token))
            .is_some_and(|expires| *expires > now))
    }
}
