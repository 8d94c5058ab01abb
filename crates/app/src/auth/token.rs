//! Session token signing and verification.

use std::{fmt, sync::Arc};

use jiff::{SignedDuration, Timestamp};
use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::ErrorKind,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;
use zeroize::Zeroize;

use crate::{
    auth::{Identity, Role, UserUuid},
    clock::Clock,
};

/// Issuer written into, and required from, every session token.
pub const DEFAULT_TOKEN_ISSUER: &str = "courses";

const TOKEN_ALGORITHM: Algorithm = Algorithm::HS256;

/// HMAC key used to sign session tokens.
#[derive(Clone)]
pub struct SigningSecret {
    bytes: Vec<u8>,
}

impl SigningSecret {
    /// Wrap the signing key.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::EmptySecret`] for an empty or blank key, which
    /// would let anyone sign tokens.
    pub fn new(bytes: impl Into<Vec<u8>>) -> Result<Self, TokenError> {
        let secret = Self {
            bytes: bytes.into(),
        };

        if secret.bytes.iter().all(u8::is_ascii_whitespace) {
            return Err(TokenError::EmptySecret);
        }

        Ok(secret)
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}

impl fmt::Debug for SigningSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SigningSecret(**redacted**)")
    }
}

impl Drop for SigningSecret {
    fn drop(&mut self) {
        self.bytes.zeroize();
    }
}

/// Claims carried by a session token.
///
/// The role is a snapshot taken at login; it is never re-read from storage
/// while the token is alive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    pub sub: UserUuid,
    pub role: Role,
    pub iat: i64,
    pub exp: i64,
    pub iss: String,
    pub jti: Uuid,
}

impl SessionClaims {
    #[must_use]
    pub const fn identity(&self) -> Identity {
        Identity::new(self.sub, self.role)
    }
}

/// A freshly signed token together with the claims it encodes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedToken {
    pub token: String,
    pub claims: SessionClaims,
}

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("session token is malformed")]
    Malformed,

    #[error("session token is invalid")]
    Invalid,

    #[error("session token has expired")]
    Expired,

    #[error("session token lifetime must be positive")]
    InvalidLifetime,

    #[error("failed to sign session token")]
    Signing(#[source] jsonwebtoken::errors::Error),

    #[error("signing secret must not be empty")]
    EmptySecret,
}

impl From<jsonwebtoken::errors::Error> for TokenError {
    fn from(error: jsonwebtoken::errors::Error) -> Self {
        match error.kind() {
            ErrorKind::InvalidToken
            | ErrorKind::Base64(_)
            | ErrorKind::Json(_)
            | ErrorKind::Utf8(_) => Self::Malformed,
            ErrorKind::ExpiredSignature => Self::Expired,
            _ => Self::Invalid,
        }
    }
}

/// Signs and verifies HS256 session tokens.
///
/// Expiry is judged against the injected [`Clock`] rather than the library's
/// wall clock, so tests can move time.
pub struct TokenCodec {
    secret: SigningSecret,
    issuer: String,
    clock: Arc<dyn Clock>,
}

impl fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenCodec")
            .field("secret", &self.secret)
            .field("issuer", &self.issuer)
            .finish_non_exhaustive()
    }
}

impl TokenCodec {
    #[must_use]
    pub fn new(secret: SigningSecret, issuer: impl Into<String>, clock: Arc<dyn Clock>) -> Self {
        Self {
            secret,
            issuer: issuer.into(),
            clock,
        }
    }

    #[must_use]
    pub fn issuer(&self) -> &str {
        &self.issuer
    }

    /// Sign a token for `user` holding `role`, valid for `ttl` from now.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::InvalidLifetime`] for a non-positive `ttl`, or a
    /// signing error from the JWT library.
    pub fn issue(
        &self,
        user: UserUuid,
        role: Role,
        ttl: SignedDuration,
    ) -> Result<IssuedToken, TokenError> {
        if !ttl.is_positive() {
            return Err(TokenError::InvalidLifetime);
        }

        let issued_at = self.clock.now().as_second();
        let expires_at = issued_at
            .checked_add(ttl.as_secs().max(1))
            .ok_or(TokenError::InvalidLifetime)?;

        let claims = SessionClaims {
            sub: user,
            role,
            iat: issued_at,
            exp: expires_at,
            iss: self.issuer.clone(),
            jti: Uuid::now_v7(),
        };

        let token = encode(
            &Header::new(TOKEN_ALGORITHM),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(TokenError::Signing)?;

        Ok(IssuedToken { token, claims })
    }

    /// Check signature, issuer and expiry, returning the embedded claims.
    ///
    /// # Errors
    ///
    /// Fails closed: any decoding or validation problem is an error.
    pub fn decode(&self, token: &str) -> Result<SessionClaims, TokenError> {
        let claims = decode::<SessionClaims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &self.validation(),
        )?
        .claims;

        if self.clock.now().as_second() >= claims.exp {
            return Err(TokenError::Expired);
        }

        Ok(claims)
    }

    /// Verify a token and return the identity it vouches for.
    ///
    /// # Errors
    ///
    /// See [`TokenCodec::decode`].
    pub fn verify(&self, token: &str) -> Result<Identity, TokenError> {
        self.decode(token).map(|claims| claims.identity())
    }

    /// Time left before `claims` expire, never negative.
    #[must_use]
    pub fn remaining_lifetime(&self, claims: &SessionClaims) -> SignedDuration {
        let remaining = claims.exp.saturating_sub(self.clock.now().as_second());

        SignedDuration::from_secs(remaining.max(0))
    }

    /// Expiry of `claims` as a timestamp.
    #[must_use]
    pub fn expires_at(claims: &SessionClaims) -> Timestamp {
        Timestamp::from_second(claims.exp).unwrap_or(Timestamp::MAX)
    }

    fn validation(&self) -> Validation {
        let mut validation = Validation::new(TOKEN_ALGORITHM);

        validation.validate_exp = false;
        validation.leeway = 0;
        validation.set_issuer(&[self.issuer.as_str()]);
        validation.set_required_spec_claims(&["exp", "iss", "sub"]);

        validation
    }
}
