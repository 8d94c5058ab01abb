//! Moderator Decision Handler

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

use crate::{
    enrollments::{errors::into_status_error, get::EnrollmentResponse},
    extensions::*,
    state::State,
};

/// Decision Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct DecisionRequest {
    /// `true` completes the enrollment, `false` rejects it
    pub approve: bool,
}

/// Moderator Decision Handler
#[endpoint(
    tags("enrollments"),
    summary = "Complete or Reject Enrollment",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Decision recorded"),
        (status_code = StatusCode::NOT_FOUND, description = "Enrollment not found"),
        (status_code = StatusCode::CONFLICT, description = "Invalid or concurrent change"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    enrollment: PathParam<Uuid>,
    json: JsonBody<DecisionRequest>,
    depot: &mut Depot,
) -> Result<Json<EnrollmentResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let actor = depot.identity_or_401()?;

    let enrollment = state
        .app
        .enrollments
        .moderator_decision(actor, enrollment.into_inner().into(), json.into_inner().approve)
        .await
        .map_err(into_status_error)?;

    Ok(Json(enrollment.into()))
}
