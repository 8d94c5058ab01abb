//! Users repository.

use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query_as};
use uuid::Uuid;

use crate::{
    auth::{NewUser, User, UserUuid},
    database::{try_get_parsed, try_get_timestamp},
};

const CREATE_USER_SQL: &str = include_str!("sql/create_user.sql");
const FIND_USER_BY_NAME_SQL: &str = include_str!("sql/find_user_by_name.sql");

#[derive(Debug, Clone, Default)]
pub struct PgUsersRepository;

impl PgUsersRepository {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    pub async fn create_user(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: &NewUser,
    ) -> Result<User, sqlx::Error> {
        query_as::<Postgres, User>(CREATE_USER_SQL)
            .bind(user.uuid.into_uuid())
            .bind(&user.name)
            .bind(user.role.as_str())
            .bind(&user.credential_hash)
            .fetch_one(&mut **tx)
            .await
    }

    pub async fn find_user_by_name(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        name: &str,
    ) -> Result<Option<User>, sqlx::Error> {
        query_as::<Postgres, User>(FIND_USER_BY_NAME_SQL)
            .bind(name)
            .fetch_optional(&mut **tx)
            .await
    }
}

impl<'r> FromRow<'r, PgRow> for User {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: UserUuid::from_uuid(row.try_get::<Uuid, _>("uuid")?),
            name: row.try_get("name")?,
            role: try_get_parsed(row, "role")?,
            credential_hash: row.try_get("credential_hash")?,
            created_at: try_get_timestamp(row, "created_at")?,
        })
    }
}
