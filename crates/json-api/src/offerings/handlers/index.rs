//! Offering Index Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::QueryParam},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use courses_app::domain::offerings::{data::OfferingFilter, records::OfferingStatus};

use crate::{
    extensions::*, offerings::errors::into_status_error, offerings::get::OfferingResponse,
    state::State,
};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct OfferingsResponse {
    /// The matching offerings, ordered by title
    pub offerings: Vec<OfferingResponse>,

    /// The signed-in caller's open draft enrollment, if any
    pub draft_enrollment: Option<Uuid>,
}

/// Offering Index Handler
///
/// Lists the catalog. Only moderators and admins may ask for inactive
/// offerings; everyone else always sees the active ones. Signed-in callers
/// also get the uuid of their draft enrollment.
#[endpoint(tags("offerings"), summary = "List Offerings")]
pub(crate) async fn handler(
    title: QueryParam<String, false>,
    location: QueryParam<String, false>,
    status: QueryParam<String, false>,
    depot: &mut Depot,
) -> Result<Json<OfferingsResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let identity = depot.identity();
    let is_staff = identity.is_some_and(|identity| identity.role.is_staff());

    let status = status
        .into_inner()
        .map(|status| status.parse::<OfferingStatus>())
        .transpose()
        .or_400("could not parse \"status\" query parameter")?
        .filter(|_| is_staff);

    let filter = OfferingFilter {
        title: title.into_inner(),
        location: location.into_inner(),
        status,
    };

    let offerings = state
        .app
        .offerings
        .list_offerings(filter)
        .await
        .map_err(into_status_error)?;

    let draft_enrollment = match identity {
        Some(identity) => state
            .app
            .enrollments
            .draft_enrollment(identity)
            .await
            .or_500("failed to look up draft enrollment")?
            .map(|draft| draft.uuid.into()),
        None => None,
    };

    Ok(Json(OfferingsResponse {
        offerings: offerings.into_iter().map(Into::into).collect(),
        draft_enrollment,
    }))
}
