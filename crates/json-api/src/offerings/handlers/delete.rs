//! Delete Offering Handler

use std::sync::Arc;

use salvo::{oapi::extract::PathParam, prelude::*};
use uuid::Uuid;

use crate::{
    extensions::*, offerings::errors::into_status_error, offerings::get::OfferingResponse,
    state::State,
};

/// Delete Offering Handler
///
/// Offerings are deactivated rather than removed, so existing enrollments
/// keep their links.
#[endpoint(
    tags("offerings"),
    summary = "Deactivate Offering",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Offering deactivated"),
        (status_code = StatusCode::NOT_FOUND, description = "Offering not found"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    offering: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<OfferingResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let offering = state
        .app
        .offerings
        .deactivate_offering(offering.into_inner().into())
        .await
        .map_err(into_status_error)?;

    Ok(Json(offering.into()))
}
