//! Enrollment Links Repository

use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as};

use crate::domain::{
    enrollments::records::{EnrollmentLinkRecord, EnrollmentUuid},
    offerings::records::OfferingUuid,
};

const LIST_LINKS_SQL: &str = include_str!("../sql/list_links.sql");
const INSERT_LINK_SQL: &str = include_str!("../sql/insert_link.sql");
const DELETE_LINK_SQL: &str = include_str!("../sql/delete_link.sql");
const SET_LINK_AVAILABILITY_SQL: &str = include_str!("../sql/set_link_availability.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgEnrollmentLinksRepository;

impl PgEnrollmentLinksRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn list_links(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        enrollment: EnrollmentUuid,
    ) -> Result<Vec<EnrollmentLinkRecord>, sqlx::Error> {
        query_as::<Postgres, EnrollmentLinkRecord>(LIST_LINKS_SQL)
            .bind(enrollment.into_uuid())
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn insert_link(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        enrollment: EnrollmentUuid,
        offering: OfferingUuid,
    ) -> Result<(), sqlx::Error> {
        query(INSERT_LINK_SQL)
            .bind(enrollment.into_uuid())
            .bind(offering.into_uuid())
            .execute(&mut **tx)
            .await?;

        Ok(())
    }

    pub(crate) async fn delete_link(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        enrollment: EnrollmentUuid,
        offering: OfferingUuid,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(DELETE_LINK_SQL)
            .bind(enrollment.into_uuid())
            .bind(offering.into_uuid())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }

    pub(crate) async fn set_link_availability(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        enrollment: EnrollmentUuid,
        offering: OfferingUuid,
        availability: Option<bool>,
    ) -> Result<Option<EnrollmentLinkRecord>, sqlx::Error> {
        query_as::<Postgres, EnrollmentLinkRecord>(SET_LINK_AVAILABILITY_SQL)
            .bind(enrollment.into_uuid())
            .bind(offering.into_uuid())
            .bind(availability)
            .fetch_optional(&mut **tx)
            .await
    }
}

impl<'r> FromRow<'r, PgRow> for EnrollmentLinkRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            offering: OfferingUuid::from_uuid(row.try_get("offering_uuid")?),
            title: row.try_get("title")?,
            availability: row.try_get("availability")?,
        })
    }
}
