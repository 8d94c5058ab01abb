//! Enrollments Repository

use jiff::Timestamp;
use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query_as};
use uuid::Uuid;

use crate::{
    auth::UserUuid,
    database::{try_get_optional_timestamp, try_get_parsed, try_get_timestamp},
    domain::enrollments::{
        data::EnrollmentFilter,
        records::{EnrollmentRecord, EnrollmentStatus, EnrollmentUuid},
        workflow::StatusChange,
    },
};

const CREATE_ENROLLMENT_SQL: &str = include_str!("../sql/create_enrollment.sql");
const FIND_ENROLLMENT_SQL: &str = include_str!("../sql/find_enrollment.sql");
const LOCK_ENROLLMENT_SQL: &str = include_str!("../sql/lock_enrollment.sql");
const FIND_DRAFT_FOR_USER_SQL: &str = include_str!("../sql/find_draft_for_user.sql");
const LIST_ENROLLMENTS_SQL: &str = include_str!("../sql/list_enrollments.sql");
const UPDATE_ENROLLMENT_STATUS_SQL: &str = include_str!("../sql/update_enrollment_status.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgEnrollmentsRepository;

impl PgEnrollmentsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn create_enrollment(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        enrollment: EnrollmentUuid,
        user: UserUuid,
        created_at: Timestamp,
    ) -> Result<EnrollmentRecord, sqlx::Error> {
        query_as::<Postgres, EnrollmentRecord>(CREATE_ENROLLMENT_SQL)
            .bind(enrollment.into_uuid())
            .bind(user.into_uuid())
            .bind(SqlxTimestamp::from(created_at))
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn find_enrollment(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        enrollment: EnrollmentUuid,
    ) -> Result<EnrollmentRecord, sqlx::Error> {
        query_as::<Postgres, EnrollmentRecord>(FIND_ENROLLMENT_SQL)
            .bind(enrollment.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    /// Load the enrollment and hold its row lock until the transaction ends.
    pub(crate) async fn lock_enrollment(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        enrollment: EnrollmentUuid,
    ) -> Result<EnrollmentRecord, sqlx::Error> {
        query_as::<Postgres, EnrollmentRecord>(LOCK_ENROLLMENT_SQL)
            .bind(enrollment.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn find_draft_for_user(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
    ) -> Result<Option<EnrollmentRecord>, sqlx::Error> {
        query_as::<Postgres, EnrollmentRecord>(FIND_DRAFT_FOR_USER_SQL)
            .bind(user.into_uuid())
            .fetch_optional(&mut **tx)
            .await
    }

    pub(crate) async fn list_enrollments(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        owner: Option<UserUuid>,
        filter: EnrollmentFilter,
    ) -> Result<Vec<EnrollmentRecord>, sqlx::Error> {
        query_as::<Postgres, EnrollmentRecord>(LIST_ENROLLMENTS_SQL)
            .bind(owner.map(UserUuid::into_uuid))
            .bind(filter.status.map(EnrollmentStatus::as_str))
            .bind(filter.created_from.map(SqlxTimestamp::from))
            .bind(filter.created_to.map(SqlxTimestamp::from))
            .fetch_all(&mut **tx)
            .await
    }

    /// Write `change` if the row is still at `version`. `None` means another
    /// writer got there first.
    pub(crate) async fn update_enrollment_status(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        enrollment: EnrollmentUuid,
        version: i64,
        change: &StatusChange,
    ) -> Result<Option<EnrollmentRecord>, sqlx::Error> {
        query_as::<Postgres, EnrollmentRecord>(UPDATE_ENROLLMENT_STATUS_SQL)
            .bind(enrollment.into_uuid())
            .bind(version)
            .bind(change.status.as_str())
            .bind(change.moderator.map(UserUuid::into_uuid))
            .bind(change.processed_at.map(SqlxTimestamp::from))
            .bind(change.finished_at.map(SqlxTimestamp::from))
            .fetch_optional(&mut **tx)
            .await
    }
}

impl<'r> FromRow<'r, PgRow> for EnrollmentRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: EnrollmentUuid::from_uuid(row.try_get("uuid")?),
            user: UserUuid::from_uuid(row.try_get("user_uuid")?),
            moderator: row
                .try_get::<Option<Uuid>, _>("moderator_uuid")?
                .map(UserUuid::from_uuid),
            status: try_get_parsed(row, "status")?,
            version: row.try_get("version")?,
            created_at: try_get_timestamp(row, "created_at")?,
            processed_at: try_get_optional_timestamp(row, "processed_at")?,
            finished_at: try_get_optional_timestamp(row, "finished_at")?,
        })
    }
}
