//! Change Enrollment Status Handler

use std::sync::Arc;

use salvo::{
    oapi::{
        ToSchema,
        extract::{JsonBody, PathParam},
    },
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use courses_app::domain::enrollments::records::EnrollmentStatus;

use crate::{
    enrollments::{errors::into_status_error, get::EnrollmentResponse},
    extensions::*,
    state::State,
};

/// Status Change Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct StatusRequest {
    /// Target status
    pub status: String,
}

/// Change Enrollment Status Handler
///
/// Users may only delete their own draft or formed enrollments; moderators
/// and admins may move enrollments anywhere.
#[endpoint(
    tags("enrollments"),
    summary = "Change Enrollment Status",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Status changed"),
        (status_code = StatusCode::BAD_REQUEST, description = "Unknown status"),
        (status_code = StatusCode::FORBIDDEN, description = "Change not permitted"),
        (status_code = StatusCode::NOT_FOUND, description = "Enrollment not found"),
        (status_code = StatusCode::CONFLICT, description = "Invalid or concurrent change"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
#[tracing::instrument(
    name = "enrollments.status",
    skip(enrollment, json, depot),
    fields(
        enrollment_uuid = tracing::field::Empty,
        actor_uuid = tracing::field::Empty,
        status = tracing::field::Empty
    ),
    err
)]
pub(crate) async fn handler(
    enrollment: PathParam<Uuid>,
    json: JsonBody<StatusRequest>,
    depot: &mut Depot,
) -> Result<Json<EnrollmentResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let actor = depot.identity_or_401()?;
    let enrollment = enrollment.into_inner();

    let status = json
        .into_inner()
        .status
        .parse::<EnrollmentStatus>()
        .or_400("unknown enrollment status")?;

    let span = tracing::Span::current();

    span.record("enrollment_uuid", tracing::field::display(enrollment));
    span.record("actor_uuid", tracing::field::display(actor.user));
    span.record("status", status.as_str());

    let updated = state
        .app
        .enrollments
        .change_status(actor, enrollment.into(), status)
        .await
        .map_err(into_status_error)?;

    Ok(Json(updated.into()))
}
