//! Create Enrollment Handler

use std::sync::Arc;

use salvo::{
    http::header::LOCATION,
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};

use crate::{
    enrollments::{errors::into_status_error, get::EnrollmentDetailsResponse},
    extensions::*,
    state::State,
};

/// Offerings Request
///
/// Offerings are named by title.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct OfferingsRequest {
    pub offerings: Vec<String>,
}

/// Create Enrollment Handler
///
/// Puts the offerings on the caller's draft enrollment, starting a new draft
/// when there is none.
#[endpoint(
    tags("enrollments"),
    summary = "Enroll",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Draft enrollment updated"),
        (status_code = StatusCode::NOT_FOUND, description = "Offering not found"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
#[tracing::instrument(
    name = "enrollments.create",
    skip(json, depot, res),
    fields(user_uuid = tracing::field::Empty, offerings_count = tracing::field::Empty),
    err
)]
pub(crate) async fn handler(
    json: JsonBody<OfferingsRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<EnrollmentDetailsResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let actor = depot.identity_or_401()?;
    let request = json.into_inner();

    let span = tracing::Span::current();

    span.record("user_uuid", tracing::field::display(actor.user));
    span.record("offerings_count", request.offerings.len());

    let details = state
        .app
        .enrollments
        .enroll(actor, request.offerings)
        .await
        .map_err(into_status_error)?;

    res.add_header(
        LOCATION,
        format!("/enrollments/{}", details.enrollment.uuid),
        true,
    )
    .or_500("failed to set location header")?;

    Ok(Json(details.into()))
}
