//! Get Offering Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::PathParam},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use courses_app::domain::offerings::records::{OfferingRecord, OfferingStatus};

use crate::{extensions::*, offerings::errors::into_status_error, state::State};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct OfferingResponse {
    /// The unique identifier of the offering
    pub uuid: Uuid,

    pub title: String,
    pub course: String,
    pub location: String,

    /// Catalog visibility (`active` or `inactive`)
    pub status: String,

    /// Seats available in total
    pub capacity: u32,

    /// Seats already taken
    pub enrolled: u32,

    pub description: String,
    pub schedule: String,
    pub coach_name: String,
    pub coach_phone: String,
    pub coach_email: String,

    /// The date and time the offering was created
    pub created_at: String,

    /// The date and time the offering was last updated
    pub updated_at: String,
}

impl From<OfferingRecord> for OfferingResponse {
    fn from(offering: OfferingRecord) -> Self {
        OfferingResponse {
            uuid: offering.uuid.into(),
            title: offering.title,
            course: offering.course,
            location: offering.location,
            status: offering.status.to_string(),
            capacity: offering.capacity,
            enrolled: offering.enrolled,
            description: offering.description,
            schedule: offering.schedule,
            coach_name: offering.coach_name,
            coach_phone: offering.coach_phone,
            coach_email: offering.coach_email,
            created_at: offering.created_at.to_string(),
            updated_at: offering.updated_at.to_string(),
        }
    }
}

/// Get Offering Handler
///
/// Inactive offerings are only visible to moderators and admins.
#[endpoint(tags("offerings"), summary = "Get Offering")]
pub(crate) async fn handler(
    offering: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<OfferingResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let is_staff = depot.identity().is_some_and(|identity| identity.role.is_staff());

    let offering = state
        .app
        .offerings
        .get_offering(offering.into_inner().into())
        .await
        .map_err(into_status_error)?;

    if offering.status == OfferingStatus::Inactive && !is_staff {
        return Err(StatusError::not_found().brief("Offering not found"));
    }

    Ok(Json(offering.into()))
}
