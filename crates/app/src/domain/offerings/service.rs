//! Offerings service.

use async_trait::async_trait;
use mockall::automock;
use tracing::info;

use crate::{
    database::Db,
    domain::offerings::{
        data::{NewOffering, OfferingFilter, OfferingUpdate},
        errors::OfferingsServiceError,
        records::{OfferingRecord, OfferingStatus, OfferingUuid},
        repository::PgOfferingsRepository,
    },
};

#[derive(Debug, Clone)]
pub struct PgOfferingsService {
    db: Db,
    repository: PgOfferingsRepository,
}

impl PgOfferingsService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgOfferingsRepository::new(),
        }
    }
}

#[async_trait]
impl OfferingsService for PgOfferingsService {
    async fn list_offerings(
        &self,
        filter: OfferingFilter,
    ) -> Result<Vec<OfferingRecord>, OfferingsServiceError> {
        let mut tx = self.db.begin().await?;

        let offerings = self.repository.list_offerings(&mut tx, &filter).await?;

        tx.commit().await?;

        Ok(offerings)
    }

    async fn get_offering(
        &self,
        offering: OfferingUuid,
    ) -> Result<OfferingRecord, OfferingsServiceError> {
        let mut tx = self.db.begin().await?;

        let offering = self.repository.get_offering(&mut tx, offering).await?;

        tx.commit().await?;

        Ok(offering)
    }

    async fn create_offering(
        &self,
        offering: NewOffering,
    ) -> Result<OfferingRecord, OfferingsServiceError> {
        if !offering.details.is_valid() {
            return Err(OfferingsServiceError::InvalidData);
        }

        let capacity = i32::try_from(offering.details.capacity)?;

        let mut tx = self.db.begin().await?;

        let created = self
            .repository
            .create_offering(&mut tx, offering.uuid, &offering.details, capacity)
            .await?;

        tx.commit().await?;

        info!(offering_uuid = %created.uuid, title = %created.title, "created offering");

        Ok(created)
    }

    async fn update_offering(
        &self,
        offering: OfferingUuid,
        update: OfferingUpdate,
    ) -> Result<OfferingRecord, OfferingsServiceError> {
        if !update.details.is_valid() {
            return Err(OfferingsServiceError::InvalidData);
        }

        let capacity = i32::try_from(update.details.capacity)?;
        let enrolled = i32::try_from(update.enrolled)?;

        let mut tx = self.db.begin().await?;

        let updated = self
            .repository
            .update_offering(&mut tx, offering, &update.details, capacity, enrolled)
            .await?;

        tx.commit().await?;

        info!(offering_uuid = %updated.uuid, "updated offering");

        Ok(updated)
    }

    async fn deactivate_offering(
        &self,
        offering: OfferingUuid,
    ) -> Result<OfferingRecord, OfferingsServiceError> {
        let mut tx = self.db.begin().await?;

        let updated = self
            .repository
            .set_offering_status(&mut tx, offering, OfferingStatus::Inactive)
            .await?;

        tx.commit().await?;

        info!(offering_uuid = %updated.uuid, "deactivated offering");

        Ok(updated)
    }

    async fn toggle_offering_status(
        &self,
        offering: OfferingUuid,
    ) -> Result<OfferingRecord, OfferingsServiceError> {
        let mut tx = self.db.begin().await?;

        let updated = self
            .repository
            .toggle_offering_status(&mut tx, offering)
            .await?;

        tx.commit().await?;

        info!(offering_uuid = %updated.uuid, status = %updated.status, "toggled offering status");

        Ok(updated)
    }
}

#[automock]
#[async_trait]
pub trait OfferingsService: Send + Sync {
    /// Lists offerings matching the filter, ordered by title.
    async fn list_offerings(
        &self,
        filter: OfferingFilter,
    ) -> Result<Vec<OfferingRecord>, OfferingsServiceError>;

    /// Retrieve a single offering regardless of its status.
    async fn get_offering(
        &self,
        offering: OfferingUuid,
    ) -> Result<OfferingRecord, OfferingsServiceError>;

    /// Creates a new, active offering.
    async fn create_offering(
        &self,
        offering: NewOffering,
    ) -> Result<OfferingRecord, OfferingsServiceError>;

    /// Replaces the descriptive fields of an offering.
    async fn update_offering(
        &self,
        offering: OfferingUuid,
        update: OfferingUpdate,
    ) -> Result<OfferingRecord, OfferingsServiceError>;

    /// Hides an offering from the catalog. Offerings are never removed.
    async fn deactivate_offering(
        &self,
        offering: OfferingUuid,
    ) -> Result<OfferingRecord, OfferingsServiceError>;

    /// Flips an offering between active and inactive.
    async fn toggle_offering_status(
        &self,
        offering: OfferingUuid,
    ) -> Result<OfferingRecord, OfferingsServiceError>;
}
