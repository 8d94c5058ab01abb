//! Enrollment Index Handler

use std::sync::Arc;

use jiff::Timestamp;
use salvo::{
    oapi::{ToSchema, extract::QueryParam},
    prelude::*,
};
use serde::{Deserialize, Serialize};

use courses_app::domain::enrollments::{data::EnrollmentFilter, records::EnrollmentStatus};

use crate::{
    enrollments::{errors::into_status_error, get::EnrollmentResponse},
    extensions::*,
    state::State,
};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct EnrollmentsResponse {
    /// Newest first
    pub enrollments: Vec<EnrollmentResponse>,
}

fn parse_timestamp(value: Option<String>, name: &str) -> Result<Option<Timestamp>, StatusError> {
    value
        .map(|value| value.parse::<Timestamp>())
        .transpose()
        .or_400(&format!("could not parse \"{name}\" query parameter"))
}

/// Enrollment Index Handler
///
/// Users see their own enrollments; moderators and admins see everyone's.
/// Deleted enrollments only show up when asked for by status.
#[endpoint(
    tags("enrollments"),
    summary = "List Enrollments",
    security(("bearer_auth" = []))
)]
pub(crate) async fn handler(
    status: QueryParam<String, false>,
    created_from: QueryParam<String, false>,
    created_to: QueryParam<String, false>,
    depot: &mut Depot,
) -> Result<Json<EnrollmentsResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let actor = depot.identity_or_401()?;

    let filter = EnrollmentFilter {
        status: status
            .into_inner()
            .map(|status| status.parse::<EnrollmentStatus>())
            .transpose()
            .or_400("could not parse \"status\" query parameter")?,
        created_from: parse_timestamp(created_from.into_inner(), "created_from")?,
        created_to: parse_timestamp(created_to.into_inner(), "created_to")?,
    };

    let enrollments = state
        .app
        .enrollments
        .list_enrollments(actor, filter)
        .await
        .map_err(into_status_error)?;

    Ok(Json(EnrollmentsResponse {
        enrollments: enrollments.into_iter().map(Into::into).collect(),
    }))
}
