//! Add Offering Handler

use std::sync::Arc;

use salvo::{http::header::LOCATION, oapi::extract::PathParam, prelude::*};
use uuid::Uuid;

use crate::{
    enrollments::{errors::into_status_error, get::EnrollmentDetailsResponse},
    extensions::*,
    state::State,
};

/// Add Offering Handler
///
/// Adds one offering to the caller's draft enrollment, keeping the offerings
/// already on it. A draft is opened when the caller has none.
#[endpoint(
    tags("enrollments"),
    summary = "Add Offering To Draft",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Draft enrollment updated"),
        (status_code = StatusCode::NOT_FOUND, description = "Offering not found"),
        (status_code = StatusCode::FORBIDDEN, description = "Role may not enroll"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
#[tracing::instrument(
    name = "enrollments.add_offering",
    skip(offering, depot, res),
    fields(user_uuid = tracing::field::Empty, offering_uuid = tracing::field::Empty),
    err
)]
pub(crate) async fn handler(
    offering: PathParam<Uuid>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<EnrollmentDetailsResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let actor = depot.identity_or_401()?;
    let offering = offering.into_inner();

    let span = tracing::Span::current();

    span.record("user_uuid", tracing::field::display(actor.user));
    span.record("offering_uuid", tracing::field::display(offering));

    let details = state
        .app
        .enrollments
        .add_offering(actor, offering.into())
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

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use courses_app::{
        auth::{Identity, Role, UserUuid},
        domain::{
            enrollments::{
                EnrollmentsServiceError, MockEnrollmentsService, records::EnrollmentUuid,
                workflow::WorkflowError,
            },
            offerings::records::OfferingUuid,
        },
    };

    use crate::test_helpers::{TEST_USER, enrollments_service};

    use super::{super::tests::make_details, *};

    fn make_service(enrollments: MockEnrollmentsService, actor: Identity) -> Service {
        enrollments_service(
            enrollments,
            actor,
            Router::with_path("offerings/{offering}/enroll").post(handler),
        )
    }

    #[tokio::test]
    async fn test_add_offering_returns_the_draft() -> TestResult {
        let uuid = EnrollmentUuid::new();
        let offering = OfferingUuid::new();

        let mut enrollments = MockEnrollmentsService::new();

        enrollments
            .expect_add_offering()
            .once()
            .withf(move |actor, added| *actor == TEST_USER && *added == offering)
            .return_once(move |_, _| Ok(make_details(uuid, &["Chess", "Tennis"])));

        let mut res = TestClient::post(format!(
            "http://example.com/offerings/{offering}/enroll"
        ))
        .send(&make_service(enrollments, TEST_USER))
        .await;

        let body: EnrollmentDetailsResponse = res.take_json().await?;
        let location = res.headers().get("location").and_then(|v| v.to_str().ok());

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(location, Some(format!("/enrollments/{uuid}").as_str()));
        assert_eq!(body.offerings.len(), 2, "expected the kept and added offering");

        Ok(())
    }

    #[tokio::test]
    async fn test_add_unknown_offering_returns_404() -> TestResult {
        let offering = OfferingUuid::new();

        let mut enrollments = MockEnrollmentsService::new();

        enrollments
            .expect_add_offering()
            .once()
            .return_once(move |_, _| {
                Err(EnrollmentsServiceError::OfferingNotFound(
                    offering.to_string(),
                ))
            });

        let res = TestClient::post(format!(
            "http://example.com/offerings/{offering}/enroll"
        ))
        .send(&make_service(enrollments, TEST_USER))
        .await;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));

        Ok(())
    }

    #[tokio::test]
    async fn test_add_offering_as_undefined_role_returns_403() -> TestResult {
        let actor = Identity::new(UserUuid::new(), Role::Undefined);

        let mut enrollments = MockEnrollmentsService::new();

        enrollments
            .expect_add_offering()
            .once()
            .return_once(|actor, _| Err(WorkflowError::RoleNotPermitted(actor.role).into()));

        let res = TestClient::post(format!(
            "http://example.com/offerings/{}/enroll",
            OfferingUuid::new()
        ))
        .send(&make_service(enrollments, actor))
        .await;

        assert_eq!(res.status_code, Some(StatusCode::FORBIDDEN));

        Ok(())
    }
}
