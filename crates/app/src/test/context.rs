//! Test context for service-level integration tests.

use std::sync::Arc;

use jiff::Timestamp;

use crate::{
    auth::{
        AccessControl, DEFAULT_TOKEN_ISSUER, DEFAULT_TOKEN_TTL, MemoryRevocationStore,
        PgAccountsService, SigningSecret, TokenCodec,
    },
    clock::FixedClock,
    database::Db,
    domain::{enrollments::PgEnrollmentsService, offerings::PgOfferingsService},
};

use super::db::TestDb;

pub struct TestContext {
    pub db: TestDb,
    pub clock: Arc<FixedClock>,
    pub codec: Arc<TokenCodec>,
    pub revocations: Arc<MemoryRevocationStore>,
    pub access: AccessControl,
    pub accounts: PgAccountsService,
    pub offerings: PgOfferingsService,
    pub enrollments: PgEnrollmentsService,
}

impl TestContext {
    pub async fn new() -> Self {
        let test_db = TestDb::new().await;
        let db = Db::new(test_db.pool().clone());

        // Postgres keeps microseconds, so start on a whole second.
        let start = Timestamp::from_second(Timestamp::now().as_second())
            .expect("Failed to truncate current time");

        let clock = Arc::new(FixedClock::new(start));

        let codec = Arc::new(TokenCodec::new(
            SigningSecret::new("test-signing-secret").expect("secret is not empty"),
            DEFAULT_TOKEN_ISSUER,
            clock.clone(),
        ));

        let revocations = Arc::new(MemoryRevocationStore::new(clock.clone()));

        Self {
            access: AccessControl::new(codec.clone(), revocations.clone()),
            accounts: PgAccountsService::new(
                db.clone(),
                codec.clone(),
                revocations.clone(),
                DEFAULT_TOKEN_TTL,
            ),
            offerings: PgOfferingsService::new(db.clone()),
            enrollments: PgEnrollmentsService::new(db, clock.clone()),
            db: test_db,
            clock,
            codec,
            revocations,
        }
    }
}
