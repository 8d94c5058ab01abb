//! Accounts Errors

use salvo::http::StatusError;
use tracing::error;

use courses_app::auth::AccountsServiceError;

pub(crate) fn into_status_error(error: AccountsServiceError) -> StatusError {
    match error {
        AccountsServiceError::AlreadyExists => {
            StatusError::conflict().brief("User already exists")
        }
        AccountsServiceError::InvalidData => {
            StatusError::bad_request().brief("Name and password are required")
        }
        AccountsServiceError::Unauthenticated => {
            StatusError::unauthorized().brief("Invalid credentials")
        }
        AccountsServiceError::NotFound => StatusError::not_found(),
        AccountsServiceError::Sql(source) => {
            error!("accounts storage error: {source}");

            StatusError::internal_server_error()
        }
        AccountsServiceError::Token(source) => {
            error!("failed to issue session token: {source}");

            StatusError::internal_server_error()
        }
        AccountsServiceError::Hashing(source) => {
            error!("failed to hash password: {source}");

            StatusError::internal_server_error()
        }
        AccountsServiceError::Revocation(source) => {
            error!("failed to revoke session token: {source}");

            StatusError::internal_server_error()
        }
    }
}
