//! Enrollment Offerings Index Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::PathParam},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    enrollments::{errors::into_status_error, get::LinkResponse},
    extensions::*,
    state::State,
};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct LinksResponse {
    /// Attached offerings, ordered by title
    pub offerings: Vec<LinkResponse>,
}

/// Enrollment Offerings Index Handler
#[endpoint(
    tags("enrollments"),
    summary = "List Enrollment Offerings",
    security(("bearer_auth" = []))
)]
pub(crate) async fn handler(
    enrollment: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<LinksResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let actor = depot.identity_or_401()?;

    let links = state
        .app
        .enrollments
        .list_links(actor, enrollment.into_inner().into())
        .await
        .map_err(into_status_error)?;

    Ok(Json(LinksResponse {
        offerings: links.into_iter().map(Into::into).collect(),
    }))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use courses_app::domain::enrollments::{MockEnrollmentsService, records::EnrollmentUuid};

    use crate::{
        enrollments::tests::make_link,
        test_helpers::{TEST_USER, enrollments_service},
    };

    use super::*;

    #[tokio::test]
    async fn test_lists_linked_offerings() -> TestResult {
        let uuid = EnrollmentUuid::new();
        let mut chess = make_link("Chess");

        chess.availability = Some(true);

        let mut enrollments = MockEnrollmentsService::new();

        enrollments
            .expect_list_links()
            .once()
            .withf(move |actor, candidate| *actor == TEST_USER && *candidate == uuid)
            .return_once(move |_, _| Ok(vec![chess]));

        let service = enrollments_service(
            enrollments,
            TEST_USER,
            Router::with_path("enrollments/{enrollment}/offerings").get(handler),
        );

        let response: LinksResponse =
            TestClient::get(format!("http://example.com/enrollments/{uuid}/offerings"))
                .send(&service)
                .await
                .take_json()
                .await?;

        assert_eq!(response.offerings.len(), 1, "expected one offering");
        assert_eq!(response.offerings[0].title, "Chess");
        assert_eq!(response.offerings[0].availability, Some(true));

        Ok(())
    }
}
