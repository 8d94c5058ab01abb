//! Replace Enrollment Offerings Handler

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

use courses_app::domain::enrollments::reconcile::LinkChanges;

use crate::{
    enrollments::{create::OfferingsRequest, errors::into_status_error},
    extensions::*,
    state::State,
};

/// What a reconciliation wrote
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct LinkChangesResponse {
    /// Offerings newly attached
    pub inserted: Vec<Uuid>,

    /// Offerings detached
    pub deleted: Vec<Uuid>,
}

impl From<LinkChanges> for LinkChangesResponse {
    fn from(changes: LinkChanges) -> Self {
        LinkChangesResponse {
            inserted: changes.inserted.into_iter().map(Into::into).collect(),
            deleted: changes.deleted.into_iter().map(Into::into).collect(),
        }
    }
}

/// Replace Enrollment Offerings Handler
///
/// Makes the attached offerings match the given titles exactly, touching only
/// the links that differ.
#[endpoint(
    tags("enrollments"),
    summary = "Replace Enrollment Offerings",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Offerings reconciled"),
        (status_code = StatusCode::NOT_FOUND, description = "Enrollment or offering not found"),
        (status_code = StatusCode::FORBIDDEN, description = "Not the owner"),
        (status_code = StatusCode::CONFLICT, description = "Enrollment no longer editable"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    enrollment: PathParam<Uuid>,
    json: JsonBody<OfferingsRequest>,
    depot: &mut Depot,
) -> Result<Json<LinkChangesResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let actor = depot.identity_or_401()?;

    let changes = state
        .app
        .enrollments
        .set_offerings(
            actor,
            enrollment.into_inner().into(),
            json.into_inner().offerings,
        )
        .await
        .map_err(into_status_error)?;

    Ok(Json(changes.into()))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::json;
    use testresult::TestResult;

    use courses_app::domain::{
        enrollments::{
            EnrollmentsServiceError, MockEnrollmentsService,
            records::{EnrollmentStatus, EnrollmentUuid},
            workflow::WorkflowError,
        },
        offerings::records::OfferingUuid,
    };

    use crate::test_helpers::{TEST_USER, enrollments_service};

    use super::*;

    fn make_service(enrollments: MockEnrollmentsService) -> Service {
        enrollments_service(
            enrollments,
            TEST_USER,
            Router::with_path("enrollments/{enrollment}/offerings").put(handler),
        )
    }

    #[tokio::test]
    async fn test_replace_reports_the_diff() -> TestResult {
        let uuid = EnrollmentUuid::new();
        let football = OfferingUuid::new();
        let tennis = OfferingUuid::new();

        let mut enrollments = MockEnrollmentsService::new();

        enrollments
            .expect_set_offerings()
            .once()
            .withf(move |actor, candidate, titles| {
                *actor == TEST_USER && *candidate == uuid && *titles == ["Football", "Chess"]
            })
            .return_once(move |_, _, _| {
                Ok(LinkChanges {
                    inserted: vec![football],
                    deleted: vec![tennis],
                })
            });

        let mut res = TestClient::put(format!("http://example.com/enrollments/{uuid}/offerings"))
            .json(&json!({ "offerings": ["Football", "Chess"] }))
            .send(&make_service(enrollments))
            .await;

        let body: LinkChangesResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(body.inserted, vec![football.into_uuid()]);
        assert_eq!(body.deleted, vec![tennis.into_uuid()]);

        Ok(())
    }

    #[tokio::test]
    async fn test_replace_on_formed_enrollment_returns_409() -> TestResult {
        let mut enrollments = MockEnrollmentsService::new();

        enrollments
            .expect_set_offerings()
            .once()
            .return_once(|_, _, _| Err(WorkflowError::LinksLocked(EnrollmentStatus::Formed).into()));

        let res = TestClient::put(format!(
            "http://example.com/enrollments/{}/offerings",
            EnrollmentUuid::new()
        ))
        .json(&json!({ "offerings": [] }))
        .send(&make_service(enrollments))
        .await;

        assert_eq!(res.status_code, Some(StatusCode::CONFLICT));

        Ok(())
    }

    #[tokio::test]
    async fn test_replace_with_unknown_title_returns_404() -> TestResult {
        let mut enrollments = MockEnrollmentsService::new();

        enrollments
            .expect_set_offerings()
            .once()
            .return_once(|_, _, _| {
                Err(EnrollmentsServiceError::OfferingNotFound("Curling".to_string()))
            });

        let res = TestClient::put(format!(
            "http://example.com/enrollments/{}/offerings",
            EnrollmentUuid::new()
        ))
        .json(&json!({ "offerings": ["Curling"] }))
        .send(&make_service(enrollments))
        .await;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));

        Ok(())
    }
}
