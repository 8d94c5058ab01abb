//! Route admission: credential extraction, revocation, verification and role
//! checks.

use std::{fmt, sync::Arc};

use async_trait::async_trait;
use mockall::automock;
use thiserror::Error;

use crate::auth::{
    AllowList, Identity, RevocationError, RevocationStore, Role, TokenCodec, TokenError,
};

/// Cookie the login flow stores the session token in.
pub const TOKEN_COOKIE: &str = "courses-api-token";

const BEARER_SCHEME: &str = "bearer";

/// Raw credential material lifted off a request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    authorization: Option<String>,
    cookie: Option<String>,
}

impl Credentials {
    #[must_use]
    pub fn new(authorization: Option<String>, cookie: Option<String>) -> Self {
        Self {
            authorization,
            cookie,
        }
    }

    #[must_use]
    pub fn from_authorization(value: impl Into<String>) -> Self {
        Self::new(Some(value.into()), None)
    }

    #[must_use]
    pub fn from_cookie(value: impl Into<String>) -> Self {
        Self::new(None, Some(value.into()))
    }

    /// The bearer token, taken from the `Authorization` header or, when that
    /// header is absent, from the session cookie.
    ///
    /// # Errors
    ///
    /// A header or cookie that is present but does not hold a bearer token is
    /// malformed.
    pub fn bearer(&self) -> Result<Option<&str>, AccessError> {
        if let Some(header) = self.authorization.as_deref() {
            return parse_bearer(header)
                .map(Some)
                .ok_or(AccessError::MalformedCredential);
        }

        let Some(cookie) = self.cookie.as_deref() else {
            return Ok(None);
        };

        // The login handler stores "Bearer <token>"; a bare token is accepted too.
        let token = parse_bearer(cookie).unwrap_or_else(|| cookie.trim());

        if token.is_empty() || token.contains(char::is_whitespace) {
            return Err(AccessError::MalformedCredential);
        }

        Ok(Some(token))
    }
}

fn parse_bearer(value: &str) -> Option<&str> {
    let (scheme, token) = value.trim().split_once(' ')?;
    let token = token.trim();

    if !scheme.eq_ignore_ascii_case(BEARER_SCHEME) || token.is_empty() {
        return None;
    }

    Some(token)
}

#[derive(Debug, Error)]
pub enum AccessError {
    #[error("missing credential")]
    MissingCredential,

    #[error("malformed credential")]
    MalformedCredential,

    #[error("credential has been revoked")]
    Revoked,

    #[error("credential failed verification")]
    InvalidToken(#[source] TokenError),

    #[error("role {0} is not allowed on this route")]
    RoleNotAllowed(Role),

    #[error("could not check credential revocation")]
    RevocationUnavailable(#[source] RevocationError),
}

impl AccessError {
    /// Everything except store outages is a plain refusal.
    #[must_use]
    pub const fn is_forbidden(&self) -> bool {
        !matches!(self, Self::RevocationUnavailable(_))
    }
}

#[automock]
#[async_trait]
pub trait AccessGate: Send + Sync {
    /// Admit or refuse a caller for a route guarded by `allow`.
    ///
    /// `Ok(None)` means an anonymous caller on a public route.
    async fn authorize(
        &self,
        credentials: &Credentials,
        allow: &AllowList,
    ) -> Result<Option<Identity>, AccessError>;
}

/// Gate backed by the token codec and the revocation store.
#[derive(Clone)]
pub struct AccessControl {
    codec: Arc<TokenCodec>,
    revocations: Arc<dyn RevocationStore>,
}

impl fmt::Debug for AccessControl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessControl")
            .field("codec", &self.codec)
            .finish_non_exhaustive()
    }
}

impl AccessControl {
    #[must_use]
    pub fn new(codec: Arc<TokenCodec>, revocations: Arc<dyn RevocationStore>) -> Self {
        Self { codec, revocations }
    }
}

#[async_trait]
impl AccessGate for AccessControl {
    async fn authorize(
        &self,
        credentials: &Credentials,
        allow: &AllowList,
    ) -> Result<Option<Identity>, AccessError> {
        let Some(token) = credentials.bearer()? else {
            if allow.is_public() {
                return Ok(None);
            }

            return Err(AccessError::MissingCredential);
        };

        // Cheap lookup first; the signature is only checked for live tokens.
        if self
            .revocations
            .is_revoked(token)
            .await
            .map_err(AccessError::RevocationUnavailable)?
        {
            return Err(AccessError::Revoked);
        }

        let identity = self.codec.verify(token).map_err(AccessError::InvalidToken)?;

        if !allow.admits(identity.role) {
            return Err(AccessError::RoleNotAllowed(identity.role));
        }

        Ok(Some(identity))
    }
}
