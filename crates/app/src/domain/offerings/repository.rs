//! Offerings Repository

use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query_as, query_scalar};
use uuid::Uuid;

use crate::{
    database::{try_get_parsed, try_get_timestamp},
    domain::offerings::{
        data::{OfferingDetails, OfferingFilter},
        records::{OfferingRecord, OfferingStatus, OfferingUuid},
    },
};

const LIST_OFFERINGS_SQL: &str = include_str!("sql/list_offerings.sql");
const GET_OFFERING_SQL: &str = include_str!("sql/get_offering.sql");
const CREATE_OFFERING_SQL: &str = include_str!("sql/create_offering.sql");
const UPDATE_OFFERING_SQL: &str = include_str!("sql/update_offering.sql");
const SET_OFFERING_STATUS_SQL: &str = include_str!("sql/set_offering_status.sql");
const TOGGLE_OFFERING_STATUS_SQL: &str = include_str!("sql/toggle_offering_status.sql");
const FIND_OFFERING_ID_BY_TITLE_SQL: &str = include_str!("sql/find_offering_id_by_title.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgOfferingsRepository;

impl PgOfferingsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn list_offerings(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        filter: &OfferingFilter,
    ) -> Result<Vec<OfferingRecord>, sqlx::Error> {
        query_as::<Postgres, OfferingRecord>(LIST_OFFERINGS_SQL)
            .bind(filter.status().as_str())
            .bind(filter.title_pattern())
            .bind(filter.location.as_deref())
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn get_offering(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        offering: OfferingUuid,
    ) -> Result<OfferingRecord, sqlx::Error> {
        query_as::<Postgres, OfferingRecord>(GET_OFFERING_SQL)
            .bind(offering.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn create_offering(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        offering: OfferingUuid,
        details: &OfferingDetails,
        capacity: i32,
    ) -> Result<OfferingRecord, sqlx::Error> {
        query_as::<Postgres, OfferingRecord>(CREATE_OFFERING_SQL)
            .bind(offering.into_uuid())
            .bind(details.title.trim())
            .bind(&details.course)
            .bind(details.location.trim())
            .bind(capacity)
            .bind(&details.description)
            .bind(&details.schedule)
            .bind(&details.coach_name)
            .bind(&details.coach_phone)
            .bind(&details.coach_email)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn update_offering(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        offering: OfferingUuid,
        details: &OfferingDetails,
        capacity: i32,
        enrolled: i32,
    ) -> Result<OfferingRecord, sqlx::Error> {
        query_as::<Postgres, OfferingRecord>(UPDATE_OFFERING_SQL)
            .bind(offering.into_uuid())
            .bind(details.title.trim())
            .bind(&details.course)
            .bind(details.location.trim())
            .bind(capacity)
            .bind(&details.description)
            .bind(&details.schedule)
            .bind(&details.coach_name)
            .bind(&details.coach_phone)
            .bind(&details.coach_email)
            .bind(enrolled)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn set_offering_status(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        offering: OfferingUuid,
        status: OfferingStatus,
    ) -> Result<OfferingRecord, sqlx::Error> {
        query_as::<Postgres, OfferingRecord>(SET_OFFERING_STATUS_SQL)
            .bind(offering.into_uuid())
            .bind(status.as_str())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn toggle_offering_status(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        offering: OfferingUuid,
    ) -> Result<OfferingRecord, sqlx::Error> {
        query_as::<Postgres, OfferingRecord>(TOGGLE_OFFERING_STATUS_SQL)
            .bind(offering.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn find_offering_id_by_title(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        title: &str,
    ) -> Result<Option<OfferingUuid>, sqlx::Error> {
        let uuid: Option<Uuid> = query_scalar(FIND_OFFERING_ID_BY_TITLE_SQL)
            .bind(title)
            .fetch_optional(&mut **tx)
            .await?;

        Ok(uuid.map(OfferingUuid::from_uuid))
    }
}

fn try_get_count(row: &PgRow, col: &str) -> Result<u32, sqlx::Error> {
    let count: i32 = row.try_get(col)?;

    u32::try_from(count).map_err(|e| sqlx::Error::ColumnDecode {
        index: col.to_string(),
        source: Box::new(e),
    })
}

impl<'r> FromRow<'r, PgRow> for OfferingRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: OfferingUuid::from_uuid(row.try_get("uuid")?),
            title: row.try_get("title")?,
            course: row.try_get("course")?,
            location: row.try_get("location")?,
            status: try_get_parsed(row, "status")?,
            capacity: try_get_count(row, "capacity")?,
            enrolled: try_get_count(row, "enrolled")?,
            description: row.try_get("description")?,
            schedule: row.try_get("schedule")?,
            coach_name: row.try_get("coach_name")?,
            coach_phone: row.try_get("coach_phone")?,
            coach_email: row.try_get("coach_email")?,
            created_at: try_get_timestamp(row, "created_at")?,
            updated_at: try_get_timestamp(row, "updated_at")?,
        })
    }
}
