//! Create Offering Handler

use std::sync::Arc;

use salvo::{
    http::header::LOCATION,
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};

use courses_app::domain::offerings::{
    data::{NewOffering, OfferingDetails},
    records::OfferingUuid,
};

use crate::{
    extensions::*, offerings::errors::into_status_error, offerings::get::OfferingResponse,
    state::State,
};

/// Offering Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct OfferingRequest {
    pub title: String,
    pub location: String,
    pub capacity: u32,

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

impl From<OfferingRequest> for OfferingDetails {
    fn from(request: OfferingRequest) -> Self {
        OfferingDetails {
            title: request.title,
            course: request.course,
            location: request.location,
            capacity: request.capacity,
            description: request.description,
            schedule: request.schedule,
            coach_name: request.coach_name,
            coach_phone: request.coach_phone,
            coach_email: request.coach_email,
        }
    }
}

/// Create Offering Handler
#[endpoint(
    tags("offerings"),
    summary = "Create Offering",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::CREATED, description = "Offering created"),
        (status_code = StatusCode::CONFLICT, description = "Title already taken"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<OfferingRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<OfferingResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let offering = state
        .app
        .offerings
        .create_offering(NewOffering {
            uuid: OfferingUuid::new(),
            details: json.into_inner().into(),
        })
        .await
        .map_err(into_status_error)?;

    res.add_header(LOCATION, format!("/offerings/{}", offering.uuid), true)
        .or_500("failed to set location header")?
        .status_code(StatusCode::CREATED);

    Ok(Json(offering.into()))
}
