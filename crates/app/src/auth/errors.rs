//! Accounts service errors.

use sqlx::{
    Error,
    error::{DatabaseError, ErrorKind},
};
use thiserror::Error;

use crate::auth::{RevocationError, TokenError};

#[derive(Debug, Error)]
pub enum AccountsServiceError {
    #[error("user already exists")]
    AlreadyExists,

    #[error("user not found")]
    NotFound,

    #[error("name and password must not be empty")]
    InvalidData,

    #[error("invalid credentials")]
    Unauthenticated,

    #[error("storage error")]
    Sql(#[source] Error),

    #[error("token processing error")]
    Token(#[source] TokenError),

    #[error("revocation store error")]
    Revocation(#[from] RevocationError),

    #[error("failed to hash password")]
    Hashing(#[source] argon2::password_hash::Error),
}

impl From<Error> for AccountsServiceError {
    fn from(error: Error) -> Self {
        if matches!(error, Error::RowNotFound) {
            return Self::NotFound;
        }

        match error.as_database_error().map(DatabaseError::kind) {
            Some(ErrorKind::UniqueViolation) => Self::AlreadyExists,
            Some(ErrorKind::NotNullViolation | ErrorKind::CheckViolation) => Self::InvalidData,
            Some(ErrorKind::ForeignKeyViolation | ErrorKind::Other | _) | None => Self::Sql(error),
        }
    }
}

impl From<TokenError> for AccountsServiceError {
    fn from(error: TokenError) -> Self {
        Self::Token(error)
    }
}
