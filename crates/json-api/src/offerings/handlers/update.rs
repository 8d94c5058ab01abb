//! Update Offering Handler

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

use courses_app::domain::offerings::data::{OfferingDetails, OfferingUpdate};

use crate::{
    extensions::*, offerings::errors::into_status_error, offerings::get::OfferingResponse,
    state::State,
};

/// Update Offering Request
///
/// Replaces every descriptive field of the offering.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct UpdateOfferingRequest {
    pub title: String,
    pub location: String,
    pub capacity: u32,

    /// Seats already taken; may not exceed the capacity
    #[serde(default)]
    pub enrolled: u32,

    #[serde(default)]
    pub course: String,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub schedule: String,

    #[serde(default)]
    pub coach_name: String,

    #[serde(default)]
    pub coach_phone: String,

    #[serde(default)]
    pub coach_email: String,
}

impl From<UpdateOfferingRequest> for OfferingUpdate {
    fn from(request: UpdateOfferingRequest) -> Self {
        OfferingUpdate {
            details: OfferingDetails {
                title: request.title,
                course: request.course,
                location: request.location,
                capacity: request.capacity,
                description: request.description,
                schedule: request.schedule,
                coach_name: request.coach_name,
                coach_phone: request.coach_phone,
                coach_email: request.coach_email,
            },
            enrolled: request.enrolled,
        }
    }
}

/// Update Offering Handler
#[endpoint(
    tags("offerings"),
    summary = "Update Offering",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Offering updated"),
        (status_code = StatusCode::NOT_FOUND, description = "Offering not found"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
#[tracing::instrument(
    name = "offerings.update",
    skip(offering, json, depot),
    fields(
        offering_uuid = tracing::field::Empty,
        capacity = tracing::field::Empty,
        enrolled = tracing::field::Empty
    ),
    err
)]
pub(crate) async fn handler(
    offering: PathParam<Uuid>,
    json: JsonBody<UpdateOfferingRequest>,
    depot: &mut Depot,
) -> Result<Json<OfferingResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let request = json.into_inner();
    let offering = offering.into_inner();

    let span = tracing::Span::current();

    span.record("offering_uuid", tracing::field::display(offering));
    span.record("capacity", request.capacity);
    span.record("enrolled", request.enrolled);

    let updated = state
        .app
        .offerings
        .update_offering(offering.into(), request.into())
        .await
        .map_err(into_status_error)?;

    Ok(Json(updated.into()))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::json;
    use testresult::TestResult;

    use courses_app::domain::offerings::{
        MockOfferingsService, OfferingsServiceError, records::OfferingUuid,
    };

    use crate::test_helpers::{TEST_MODERATOR, offerings_service};

    use super::{super::tests::make_offering, *};

    fn make_service(offerings: MockOfferingsService) -> Service {
        offerings_service(
            offerings,
            Some(TEST_MODERATOR),
            Router::with_path("offerings/{offering}").put(handler),
        )
    }

    #[tokio::test]
    async fn test_update_offering_success() -> TestResult {
        let uuid = OfferingUuid::new();

        let mut updated = make_offering(uuid, "Chess Club");

        updated.enrolled = 5;

        let mut offerings = MockOfferingsService::new();

        offerings
            .expect_update_offering()
            .once()
            .withf(move |candidate, update| {
                *candidate == uuid
                    && update.enrolled == 5
                    && update.details.title == "Chess Club"
                    && update.details.capacity == 12
            })
            .return_once(move |_, _| Ok(updated));

        let mut res = TestClient::put(format!("http://example.com/offerings/{uuid}"))
            .json(&json!({
                "title": "Chess Club",
                "location": "Main Hall",
                "capacity": 12,
                "enrolled": 5,
            }))
            .send(&make_service(offerings))
            .await;

        let body: OfferingResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(body.title, "Chess Club");
        assert_eq!(body.enrolled, 5);

        Ok(())
    }

    #[tokio::test]
    async fn test_update_over_capacity_returns_400() -> TestResult {
        let uuid = OfferingUuid::new();

        let mut offerings = MockOfferingsService::new();

        offerings
            .expect_update_offering()
            .once()
            .return_once(|_, _| Err(OfferingsServiceError::InvalidData));

        let res = TestClient::put(format!("http://example.com/offerings/{uuid}"))
            .json(&json!({
                "title": "Chess",
                "location": "Main Hall",
                "capacity": 2,
                "enrolled": 5,
            }))
            .send(&make_service(offerings))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }

    #[tokio::test]
    async fn test_update_unknown_offering_returns_404() -> TestResult {
        let uuid = OfferingUuid::new();

        let mut offerings = MockOfferingsService::new();

        offerings
            .expect_update_offering()
            .once()
            .return_once(|_, _| Err(OfferingsServiceError::NotFound));

        let res = TestClient::put(format!("http://example.com/offerings/{uuid}"))
            .json(&json!({ "title": "Chess", "location": "Main Hall", "capacity": 2 }))
            .send(&make_service(offerings))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));

        Ok(())
    }
}
