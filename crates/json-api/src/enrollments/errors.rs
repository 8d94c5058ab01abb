//! Enrollment Errors

use salvo::http::StatusError;
use tracing::{error, warn};

use courses_app::domain::enrollments::EnrollmentsServiceError;

pub(crate) fn into_status_error(error: EnrollmentsServiceError) -> StatusError {
    match error {
        EnrollmentsServiceError::NotFound => {
            StatusError::not_found().brief("Enrollment not found")
        }
        EnrollmentsServiceError::OfferingNotFound(title) => {
            StatusError::not_found().brief(format!("Offering {title:?} not found"))
        }
        EnrollmentsServiceError::LinkNotFound => {
            StatusError::not_found().brief("Offering is not part of this enrollment")
        }
        EnrollmentsServiceError::Conflict => {
            StatusError::conflict().brief("Enrollment was changed concurrently, retry")
        }
        EnrollmentsServiceError::Workflow(refusal) if refusal.is_forbidden() => {
            warn!("refused enrollment request: {refusal}");

            StatusError::forbidden().brief(refusal.to_string())
        }
        EnrollmentsServiceError::Workflow(clash) => StatusError::conflict().brief(clash.to_string()),
        EnrollmentsServiceError::Sql(source) => {
            error!("enrollments storage error: {source}");

            StatusError::internal_server_error()
        }
    }
}
