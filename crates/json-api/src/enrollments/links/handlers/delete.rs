//! Remove Enrollment Offering Handler

use std::sync::Arc;

use salvo::{oapi::extract::PathParam, prelude::*};
use uuid::Uuid;

use crate::{
    enrollments::{errors::into_status_error, links::update::LinkChangesResponse},
    extensions::*,
    state::State,
};

/// Remove Enrollment Offering Handler
#[endpoint(
    tags("enrollments"),
    summary = "Remove Offering from Enrollment",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Offering detached"),
        (status_code = StatusCode::NOT_FOUND, description = "Enrollment or link not found"),
        (status_code = StatusCode::FORBIDDEN, description = "Not the owner"),
        (status_code = StatusCode::CONFLICT, description = "Enrollment no longer editable"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    enrollment: PathParam<Uuid>,
    offering: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<LinkChangesResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let actor = depot.identity_or_401()?;

    let changes = state
        .app
        .enrollments
        .remove_offering(
            actor,
            enrollment.into_inner().into(),
            offering.into_inner().into(),
        )
        .await
        .map_err(into_status_error)?;

    Ok(Json(changes.into()))
}
