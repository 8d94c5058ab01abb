//! Auth data models.

use jiff::Timestamp;
use serde::Serialize;

use crate::{auth::Role, uuids::TypedUuid};

/// User UUID
pub type UserUuid = TypedUuid<User>;

/// A registered account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
    pub uuid: UserUuid,
    pub name: String,
    pub role: Role,

    #[serde(skip)]
    pub credential_hash: String,

    pub created_at: Timestamp,
}

/// New user persistence payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub uuid: UserUuid,
    pub name: String,
    pub role: Role,
    pub credential_hash: String,
}

/// The caller a request acts on behalf of, as vouched for by a verified
/// session token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Identity {
    pub user: UserUuid,
    pub role: Role,
}

impl Identity {
    #[must_use]
    pub const fn new(user: UserUuid, role: Role) -> Self {
        Self { user, role }
    }
}
