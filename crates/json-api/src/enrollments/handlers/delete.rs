//! Delete Enrollment Handler

use std::sync::Arc;

use salvo::{oapi::extract::PathParam, prelude::*};
use uuid::Uuid;

use crate::{
    enrollments::{errors::into_status_error, get::EnrollmentResponse},
    extensions::*,
    state::State,
};

/// Delete Enrollment Handler
///
/// Moves the enrollment to `deleted`; the record is kept.
#[endpoint(
    tags("enrollments"),
    summary = "Delete Enrollment",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Enrollment deleted"),
        (status_code = StatusCode::NOT_FOUND, description = "Enrollment not found"),
        (status_code = StatusCode::FORBIDDEN, description = "Not the owner"),
        (status_code = StatusCode::CONFLICT, description = "Enrollment already finished"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    enrollment: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<EnrollmentResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let actor = depot.identity_or_401()?;

    let enrollment = state
        .app
        .enrollments
        .delete_enrollment(actor, enrollment.into_inner().into())
        .await
        .map_err(into_status_error)?;

    Ok(Json(enrollment.into()))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use courses_app::domain::enrollments::{
        MockEnrollmentsService,
        records::{EnrollmentStatus, EnrollmentUuid},
        workflow::WorkflowError,
    };

    use crate::test_helpers::{TEST_USER, enrollments_service};

    use super::{super::tests::make_enrollment, *};

    fn make_service(enrollments: MockEnrollmentsService) -> Service {
        enrollments_service(
            enrollments,
            TEST_USER,
            Router::with_path("enrollments/{enrollment}").delete(handler),
        )
    }

    #[tokio::test]
    async fn test_delete_own_draft() -> TestResult {
        let uuid = EnrollmentUuid::new();

        let mut enrollments = MockEnrollmentsService::new();

        enrollments
            .expect_delete_enrollment()
            .once()
            .withf(move |actor, candidate| *actor == TEST_USER && *candidate == uuid)
            .return_once(move |_, _| Ok(make_enrollment(uuid, EnrollmentStatus::Deleted)));

        let mut res = TestClient::delete(format!("http://example.com/enrollments/{uuid}"))
            .send(&make_service(enrollments))
            .await;

        let body: EnrollmentResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(body.status, "deleted");

        Ok(())
    }

    #[tokio::test]
    async fn test_delete_completed_enrollment_returns_409() -> TestResult {
        let mut enrollments = MockEnrollmentsService::new();

        enrollments
            .expect_delete_enrollment()
            .once()
            .return_once(|_, _| {
                Err(WorkflowError::InvalidTransition {
                    from: EnrollmentStatus::Completed,
                    to: EnrollmentStatus::Deleted,
                }
                .into())
            });

        let res = TestClient::delete(format!(
            "http://example.com/enrollments/{}",
            EnrollmentUuid::new()
        ))
        .send(&make_service(enrollments))
        .await;

        assert_eq!(res.status_code, Some(StatusCode::CONFLICT));

        Ok(())
    }
}
