//! Enrollments service errors.

use sqlx::{
    Error,
    error::{DatabaseError, ErrorKind},
};
use thiserror::Error;

use crate::domain::enrollments::workflow::WorkflowError;

#[derive(Debug, Error)]
pub enum EnrollmentsServiceError {
    #[error("enrollment not found")]
    NotFound,

    #[error("offering {0:?} not found")]
    OfferingNotFound(String),

    #[error("offering is not linked to this enrollment")]
    LinkNotFound,

    #[error("enrollment was changed concurrently")]
    Conflict,

    #[error(transparent)]
    Workflow(#[from] WorkflowError),

    #[error("storage error")]
    Sql(#[source] Error),
}

impl From<Error> for EnrollmentsServiceError {
    fn from(error: Error) -> Self {
        if matches!(error, Error::RowNotFound) {
            return Self::NotFound;
        }

        match error.as_database_error().map(DatabaseError::kind) {
            Some(ErrorKind::UniqueViolation) => Self::Conflict,
            Some(ErrorKind::ForeignKeyViolation) => Self::NotFound,
            Some(ErrorKind::NotNullViolation | ErrorKind::CheckViolation | ErrorKind::Other | _)
            | None => Self::Sql(error),
        }
    }
}
