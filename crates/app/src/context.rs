//! App Context

use std::{fmt, sync::Arc, time::Duration};

use jiff::SignedDuration;
use thiserror::Error;
use tracing::{info, warn};

use crate::{
    auth::{
        AccessControl, AccessGate, AccountsService, MemoryRevocationStore, PgAccountsService,
        RedisRevocationStore, RevocationError, RevocationStore, SigningSecret, TokenCodec,
    },
    clock::{Clock, SystemClock},
    database::{self, Db},
    domain::{
        enrollments::{EnrollmentsService, PgEnrollmentsService},
        offerings::{OfferingsService, PgOfferingsService},
    },
};

#[derive(Debug, Error)]
pub enum AppInitError {
    #[error("failed to connect to database")]
    Database(#[source] sqlx::Error),

    #[error("failed to connect to revocation store")]
    Revocation(#[source] RevocationError),
}

/// Everything needed to wire the services together.
#[derive(Debug)]
pub struct AppSettings {
    pub database_url: String,

    /// Without a redis URL revoked tokens are kept in process memory.
    pub redis_url: Option<String>,
    pub redis_timeout: Duration,

    pub signing_secret: SigningSecret,
    pub token_issuer: String,
    pub token_ttl: SignedDuration,
}

#[derive(Clone)]
pub struct AppContext {
    pub access: Arc<dyn AccessGate>,
    pub accounts: Arc<dyn AccountsService>,
    pub offerings: Arc<dyn OfferingsService>,
    pub enrollments: Arc<dyn EnrollmentsService>,
}

impl fmt::Debug for AppContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppContext").finish_non_exhaustive()
    }
}

impl AppContext {
    /// Connect to storage and the revocation store and build the services.
    ///
    /// # Errors
    ///
    /// Returns an error when either backend cannot be reached.
    pub async fn connect(settings: AppSettings) -> Result<Self, AppInitError> {
        let pool = database::connect(&settings.database_url)
            .await
            .map_err(AppInitError::Database)?;

        let db = Db::new(pool);
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);

        let revocations: Arc<dyn RevocationStore> = match settings.redis_url.as_deref() {
            Some(url) => {
                let store = RedisRevocationStore::connect(url, settings.redis_timeout)
                    .await
                    .map_err(AppInitError::Revocation)?;

                info!(timeout = ?settings.redis_timeout, "using redis revocation store");

                Arc::new(store)
            }
            None => {
                warn!("no redis configured, revoked tokens are kept in memory");

                Arc::new(MemoryRevocationStore::new(clock.clone()))
            }
        };

        let codec = Arc::new(TokenCodec::new(
            settings.signing_secret,
            settings.token_issuer,
            clock.clone(),
        ));

        Ok(Self {
            access: Arc::new(AccessControl::new(codec.clone(), revocations.clone())),
            accounts: Arc::new(PgAccountsService::new(
                db.clone(),
                codec,
                revocations,
                settings.token_ttl,
            )),
            offerings: Arc::new(PgOfferingsService::new(db.clone())),
            enrollments: Arc::new(PgEnrollmentsService::new(db, clock)),
        })
    }
}
