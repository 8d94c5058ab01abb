//! Offering Errors

use salvo::http::StatusError;
use tracing::error;

use courses_app::domain::offerings::OfferingsServiceError;

pub(crate) fn into_status_error(error: OfferingsServiceError) -> StatusError {
    match error {
        OfferingsServiceError::AlreadyExists => {
            StatusError::conflict().brief("An offering with this title already exists")
        }
        OfferingsServiceError::MissingRequiredData | OfferingsServiceError::InvalidData => {
            StatusError::bad_request().brief("Invalid offering payload")
        }
        OfferingsServiceError::NotFound => StatusError::not_found().brief("Offering not found"),
        OfferingsServiceError::Sql(source) => {
            error!("offerings storage error: {source}");

            StatusError::internal_server_error()
        }
        OfferingsServiceError::InvalidCount(source) => {
            error!("stored offering head count out of range: {source}");

            StatusError::internal_server_error()
        }
    }
}
