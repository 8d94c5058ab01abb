//! Accounts service: registration, login and logout.

use std::{fmt, sync::Arc};

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use async_trait::async_trait;
use jiff::SignedDuration;
use mockall::automock;
use tracing::info;

use crate::{
    auth::{
        AccountsServiceError, IssuedToken, NewUser, RevocationStore, Role, TokenCodec, User,
        UserUuid, repository::PgUsersRepository,
    },
    database::Db,
};

/// Default session lifetime.
pub const DEFAULT_TOKEN_TTL: SignedDuration = SignedDuration::from_secs(60 * 60);

/// Argon2id PHC string for `password`, salted with fresh random bytes.
///
/// # Errors
///
/// Returns an error if the hasher rejects the input.
pub fn hash_password(password: &str) -> Result<String, AccountsServiceError> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(AccountsServiceError::Hashing)
}

/// Check `password` against a stored PHC string. Unparseable hashes never match.
#[must_use]
pub fn password_matches(password: &str, stored: &str) -> bool {
    PasswordHash::new(stored).is_ok_and(|hash| {
        Argon2::default()
            .verify_password(password.as_bytes(), &hash)
            .is_ok()
    })
}

#[derive(Clone)]
pub struct PgAccountsService {
    db: Db,
    users: PgUsersRepository,
    codec: Arc<TokenCodec>,
    revocations: Arc<dyn RevocationStore>,
    token_ttl: SignedDuration,
}

impl fmt::Debug for PgAccountsService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PgAccountsService")
            .field("db", &self.db)
            .field("codec", &self.codec)
            .field("token_ttl", &self.token_ttl)
            .finish_non_exhaustive()
    }
}

impl PgAccountsService {
    #[must_use]
    pub fn new(
        db: Db,
        codec: Arc<TokenCodec>,
        revocations: Arc<dyn RevocationStore>,
        token_ttl: SignedDuration,
    ) -> Self {
        Self {
            db,
            users: PgUsersRepository::new(),
            codec,
            revocations,
            token_ttl,
        }
    }

    /// Create an account holding any role. Public registration goes through
    /// [`AccountsService::register`], which always grants [`Role::User`].
    pub async fn create_user(
        &self,
        name: &str,
        password: &str,
        role: Role,
    ) -> Result<User, AccountsServiceError> {
        create_account(&self.db, name, password, role).await
    }
}

/// Store a new account. Used by registration and the admin CLI.
///
/// # Errors
///
/// Returns an error for empty input, a taken name or a storage failure.
pub async fn create_account(
    db: &Db,
    name: &str,
    password: &str,
    role: Role,
) -> Result<User, AccountsServiceError> {
    let name = name.trim();

    if name.is_empty() || password.is_empty() {
        return Err(AccountsServiceError::InvalidData);
    }

    let mut tx = db.begin().await?;

    let user = PgUsersRepository::new()
        .create_user(
            &mut tx,
            &NewUser {
                uuid: UserUuid::new(),
                name: name.to_string(),
                role,
                credential_hash: hash_password(password)?,
            },
        )
        .await?;

    tx.commit().await?;

    info!(user_uuid = %user.uuid, role = %user.role, "created user");

    Ok(user)
}

#[async_trait]
impl AccountsService for PgAccountsService {
    async fn register(&self, name: &str, password: &str) -> Result<User, AccountsServiceError> {
        self.create_user(name, password, Role::User).await
    }

    async fn login(&self, name: &str, password: &str) -> Result<IssuedToken, AccountsServiceError> {
        let name = name.trim();

        let mut tx = self.db.begin().await?;

        let user = self.users.find_user_by_name(&mut tx, name).await?;

        tx.commit().await?;

        let user = user
            .filter(|user| password_matches(password, &user.credential_hash))
            .ok_or(AccountsServiceError::Unauthenticated)?;

        let issued = self.codec.issue(user.uuid, user.role, self.token_ttl)?;

        info!(user_uuid = %user.uuid, role = %user.role, "issued session token");

        Ok(issued)
    }

    async fn logout(&self, token: &str) -> Result<(), AccountsServiceError> {
        let claims = self
            .codec
            .decode(token)
            .map_err(|_rejected| AccountsServiceError::Unauthenticated)?;

        self.revocations
            .revoke(token, self.codec.remaining_lifetime(&claims))
            .await?;

        info!(user_uuid = %claims.sub, "revoked session token");

        Ok(())
    }
}

#[automock]
#[async_trait]
pub trait AccountsService: Send + Sync {
    /// Register a new account with the `user` role.
    async fn register(&self, name: &str, password: &str) -> Result<User, AccountsServiceError>;

    /// Check credentials and issue a session token.
    async fn login(&self, name: &str, password: &str) -> Result<IssuedToken, AccountsServiceError>;

    /// Revoke a session token for the rest of its lifetime.
    async fn logout(&self, token: &str) -> Result<(), AccountsServiceError>;
}
