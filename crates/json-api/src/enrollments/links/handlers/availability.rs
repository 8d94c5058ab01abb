//! Set Offering Availability Handler

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
    enrollments::{errors::into_status_error, get::LinkResponse},
    extensions::*,
    state::State,
};

/// Availability Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct AvailabilityRequest {
    /// `null` clears a previous verdict
    pub availability: Option<bool>,
}

/// Set Offering Availability Handler
///
/// Records whether an attached offering can take the enrollee.
#[endpoint(
    tags("enrollments"),
    summary = "Set Offering Availability",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Availability recorded"),
        (status_code = StatusCode::NOT_FOUND, description = "Enrollment or link not found"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    enrollment: PathParam<Uuid>,
    offering: PathParam<Uuid>,
    json: JsonBody<AvailabilityRequest>,
    depot: &mut Depot,
) -> Result<Json<LinkResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let actor = depot.identity_or_401()?;

    let link = state
        .app
        .enrollments
        .set_link_availability(
            actor,
            enrollment.into_inner().into(),
            offering.into_inner().into(),
            json.into_inner().availability,
        )
        .await
        .map_err(into_status_error)?;

    Ok(Json(link.into()))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::json;
    use testresult::TestResult;

    use courses_app::domain::{
        enrollments::{
            EnrollmentsServiceError, MockEnrollmentsService,
            records::{EnrollmentLinkRecord, EnrollmentUuid},
        },
        offerings::records::OfferingUuid,
    };

    use crate::test_helpers::{TEST_MODERATOR, enrollments_service};

    use super::*;

    fn make_service(enrollments: MockEnrollmentsService) -> Service {
        enrollments_service(
            enrollments,
            TEST_MODERATOR,
            Router::with_path("enrollments/{enrollment}/offerings/{offering}/availability")
                .put(handler),
        )
    }

    #[tokio::test]
    async fn test_availability_is_recorded() -> TestResult {
        let uuid = EnrollmentUuid::new();
        let chess = OfferingUuid::new();

        let mut enrollments = MockEnrollmentsService::new();

        enrollments
            .expect_set_link_availability()
            .once()
            .withf(move |actor, candidate, offering, availability| {
                *actor == TEST_MODERATOR
                    && *candidate == uuid
                    && *offering == chess
                    && *availability == Some(false)
            })
            .return_once(move |_, _, _, _| {
                Ok(EnrollmentLinkRecord {
                    offering: chess,
                    title: "Chess".to_string(),
                    availability: Some(false),
                })
            });

        let mut res = TestClient::put(format!(
            "http://example.com/enrollments/{uuid}/offerings/{chess}/availability"
        ))
        .json(&json!({ "availability": false }))
        .send(&make_service(enrollments))
        .await;

        let body: LinkResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(body.offering_uuid, chess.into_uuid());
        assert_eq!(body.availability, Some(false));

        Ok(())
    }

    #[tokio::test]
    async fn test_availability_for_unlinked_offering_returns_404() -> TestResult {
        let mut enrollments = MockEnrollmentsService::new();

        enrollments
            .expect_set_link_availability()
            .once()
            .return_once(|_, _, _, _| Err(EnrollmentsServiceError::LinkNotFound));

        let res = TestClient::put(format!(
            "http://example.com/enrollments/{}/offerings/{}/availability",
            EnrollmentUuid::new(),
            OfferingUuid::new()
        ))
        .json(&json!({ "availability": null }))
        .send(&make_service(enrollments))
        .await;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));

        Ok(())
    }
}
