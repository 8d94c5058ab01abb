//! Get Enrollment Handler

use std::{string::ToString, sync::Arc};

use salvo::{
    oapi::{ToSchema, extract::PathParam},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use courses_app::domain::enrollments::records::{
    EnrollmentDetails, EnrollmentLinkRecord, EnrollmentRecord,
};

use crate::{enrollments::errors::into_status_error, extensions::*, state::State};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct EnrollmentResponse {
    /// The unique identifier of the enrollment
    pub uuid: Uuid,

    /// The user who filed the enrollment
    pub user_uuid: Uuid,

    /// The moderator who first processed it
    pub moderator_uuid: Option<Uuid>,

    /// `draft`, `formed`, `completed`, `rejected` or `deleted`
    pub status: String,

    /// Concurrency token, bumped by every status change
    pub version: i64,

    pub created_at: String,
    pub processed_at: Option<String>,
    pub finished_at: Option<String>,
}

impl From<EnrollmentRecord> for EnrollmentResponse {
    fn from(enrollment: EnrollmentRecord) -> Self {
        EnrollmentResponse {
            uuid: enrollment.uuid.into(),
            user_uuid: enrollment.user.into(),
            moderator_uuid: enrollment.moderator.map(Into::into),
            status: enrollment.status.to_string(),
            version: enrollment.version,
            created_at: enrollment.created_at.to_string(),
            processed_at: enrollment.processed_at.as_ref().map(ToString::to_string),
            finished_at: enrollment.finished_at.as_ref().map(ToString::to_string),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct LinkResponse {
    pub offering_uuid: Uuid,
    pub title: String,

    /// Whether the offering can take the enrollee; unset until reviewed
    pub availability: Option<bool>,
}

impl From<EnrollmentLinkRecord> for LinkResponse {
    fn from(link: EnrollmentLinkRecord) -> Self {
        LinkResponse {
            offering_uuid: link.offering.into(),
            title: link.title,
            availability: link.availability,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct EnrollmentDetailsResponse {
    pub enrollment: EnrollmentResponse,
    pub offerings: Vec<LinkResponse>,
}

impl From<EnrollmentDetails> for EnrollmentDetailsResponse {
    fn from(details: EnrollmentDetails) -> Self {
        EnrollmentDetailsResponse {
            enrollment: details.enrollment.into(),
            offerings: details.links.into_iter().map(Into::into).collect(),
        }
    }
}

/// Get Enrollment Handler
///
/// Owners and staff only.
#[endpoint(
    tags("enrollments"),
    summary = "Get Enrollment",
    security(("bearer_auth" = []))
)]
pub(crate) async fn handler(
    enrollment: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<EnrollmentDetailsResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let actor = depot.identity_or_401()?;

    let details = state
        .app
        .enrollments
        .get_enrollment(actor, enrollment.into_inner().into())
        .await
        .map_err(into_status_error)?;

    Ok(Json(details.into()))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use courses_app::domain::enrollments::{
        EnrollmentsServiceError, MockEnrollmentsService, records::EnrollmentUuid,
        workflow::WorkflowError,
    };

    use crate::test_helpers::{TEST_USER, TEST_USER_UUID, enrollments_service};

    use super::{super::tests::make_details, *};

    fn make_service(enrollments: MockEnrollmentsService) -> Service {
        enrollments_service(
            enrollments,
            TEST_USER,
            Router::with_path("enrollments/{enrollment}").get(handler),
        )
    }

    #[tokio::test]
    async fn test_get_enrollment_with_offerings() -> TestResult {
        let uuid = EnrollmentUuid::new();

        let mut enrollments = MockEnrollmentsService::new();

        enrollments
            .expect_get_enrollment()
            .once()
            .withf(move |actor, candidate| *actor == TEST_USER && *candidate == uuid)
            .return_once(move |_, _| Ok(make_details(uuid, &["Chess", "Tennis"])));

        let mut res = TestClient::get(format!("http://example.com/enrollments/{uuid}"))
            .send(&make_service(enrollments))
            .await;

        let body: EnrollmentDetailsResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(body.enrollment.uuid, uuid.into_uuid());
        assert_eq!(body.enrollment.user_uuid, TEST_USER_UUID.into_uuid());
        assert_eq!(body.enrollment.status, "draft");
        assert_eq!(body.offerings.len(), 2, "expected both offerings");
        assert_eq!(body.offerings[0].title, "Chess");

        Ok(())
    }

    #[tokio::test]
    async fn test_get_foreign_enrollment_returns_403() -> TestResult {
        let mut enrollments = MockEnrollmentsService::new();

        enrollments
            .expect_get_enrollment()
            .once()
            .return_once(|_, _| Err(WorkflowError::NotOwner.into()));

        let res = TestClient::get(format!(
            "http://example.com/enrollments/{}",
            EnrollmentUuid::new()
        ))
        .send(&make_service(enrollments))
        .await;

        assert_eq!(res.status_code, Some(StatusCode::FORBIDDEN));

        Ok(())
    }

    #[tokio::test]
    async fn test_get_unknown_enrollment_returns_404() -> TestResult {
        let mut enrollments = MockEnrollmentsService::new();

        enrollments
            .expect_get_enrollment()
            .once()
            .return_once(|_, _| Err(EnrollmentsServiceError::NotFound));

        let res = TestClient::get(format!(
            "http://example.com/enrollments/{}",
            EnrollmentUuid::new()
        ))
        .send(&make_service(enrollments))
        .await;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));

        Ok(())
    }
}
