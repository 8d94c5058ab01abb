//! Toggle Offering Status Handler

use std::sync::Arc;

use salvo::{oapi::extract::PathParam, prelude::*};
use tracing::info;
use uuid::Uuid;

use crate::{
    extensions::*, offerings::errors::into_status_error, offerings::get::OfferingResponse,
    state::State,
};

/// Toggle Offering Status Handler
///
/// Flips the offering between `active` and `inactive`.
#[endpoint(
    tags("offerings"),
    summary = "Toggle Offering Status",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Status toggled"),
        (status_code = StatusCode::NOT_FOUND, description = "Offering not found"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    offering: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<OfferingResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let actor = depot.identity_or_401()?;

    let offering = state
        .app
        .offerings
        .toggle_offering_status(offering.into_inner().into())
        .await
        .map_err(into_status_error)?;

    info!(
        offering_uuid = %offering.uuid,
        status = %offering.status,
        moderator_uuid = %actor.user,
        "offering status changed over http"
    );

    Ok(Json(offering.into()))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use courses_app::domain::offerings::{
        MockOfferingsService,
        records::{OfferingStatus, OfferingUuid},
    };

    use crate::test_helpers::{TEST_MODERATOR, offerings_service};

    use super::{super::tests::make_offering, *};

    #[tokio::test]
    async fn test_status_toggle_returns_new_status() -> TestResult {
        let uuid = OfferingUuid::new();
        let mut offering = make_offering(uuid, "Chess");

        offering.status = OfferingStatus::Inactive;

        let mut offerings = MockOfferingsService::new();

        offerings
            .expect_toggle_offering_status()
            .once()
            .withf(move |candidate| *candidate == uuid)
            .return_once(move |_| Ok(offering));

        let service = offerings_service(
            offerings,
            Some(TEST_MODERATOR),
            Router::with_path("offerings/{offering}/status").put(handler),
        );

        let mut res = TestClient::put(format!("http://example.com/offerings/{uuid}/status"))
            .send(&service)
            .await;

        let body: OfferingResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(body.status, "inactive");

        Ok(())
    }

    #[tokio::test]
    async fn test_status_toggle_without_identity_returns_401() -> TestResult {
        let mut offerings = MockOfferingsService::new();

        offerings.expect_toggle_offering_status().never();

        let service = offerings_service(
            offerings,
            None,
            Router::with_path("offerings/{offering}/status").put(handler),
        );

        let res = TestClient::put(format!(
            "http://example.com/offerings/{}/status",
            Uuid::now_v7()
        ))
        .send(&service)
        .await;

        assert_eq!(res.status_code, Some(StatusCode::UNAUTHORIZED));

        Ok(())
    }
}
