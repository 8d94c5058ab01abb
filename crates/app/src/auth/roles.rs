//! Roles and per-route allow-lists.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::database::UnknownValue;

/// Closed set of roles a user can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Undefined,
    User,
    Moderator,
    Admin,
}

impl Role {
    pub const ALL: [Self; 4] = [Self::Undefined, Self::User, Self::Moderator, Self::Admin];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Undefined => "undefined",
            Self::User => "user",
            Self::Moderator => "moderator",
            Self::Admin => "admin",
        }
    }

    /// Moderators and admins review enrollments and manage the catalog.
    #[must_use]
    pub const fn is_staff(self) -> bool {
        matches!(self, Self::Moderator | Self::Admin)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = UnknownValue;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "undefined" => Ok(Self::Undefined),
            "user" => Ok(Self::User),
            "moderator" => Ok(Self::Moderator),
            "admin" => Ok(Self::Admin),
            other => Err(UnknownValue(other.to_string())),
        }
    }
}

/// Roles admitted to a route, optionally with the public marker that lets
/// anonymous callers through.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllowList {
    public: bool,
    roles: SmallVec<[Role; 4]>,
}

impl AllowList {
    /// Any caller, with or without a credential.
    #[must_use]
    pub fn public() -> Self {
        Self {
            public: true,
            roles: SmallVec::from_slice(&Role::ALL),
        }
    }

    /// Only callers holding one of `roles`.
    #[must_use]
    pub fn roles(roles: &[Role]) -> Self {
        Self {
            public: false,
            roles: SmallVec::from_slice(roles),
        }
    }

    /// Any authenticated caller, whatever their role.
    #[must_use]
    pub fn authenticated() -> Self {
        Self::roles(&Role::ALL)
    }

    /// Registered users and staff.
    #[must_use]
    pub fn members() -> Self {
        Self::roles(&[Role::User, Role::Moderator, Role::Admin])
    }

    /// Moderators and admins.
    #[must_use]
    pub fn staff() -> Self {
        Self::roles(&[Role::Moderator, Role::Admin])
    }

    #[must_use]
    pub const fn is_public(&self) -> bool {
        self.public
    }

    #[must_use]
    pub fn admits(&self, role: Role) -> bool {
        self.public || self.roles.contains(&role)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_round_trips_through_its_text_form() {
        for role in Role::ALL {
            assert_eq!(role.as_str().parse::<Role>().ok(), Some(role));
        }

        assert!("root".parse::<Role>().is_err());
    }

    #[test]
    fn staff_list_rejects_users() {
        let allow = AllowList::staff();

        assert!(allow.admits(Role::Moderator));
        assert!(allow.admits(Role::Admin));
        assert!(!allow.admits(Role::User));
        assert!(!allow.admits(Role::Undefined));
        assert!(!allow.is_public());
    }

    #[test]
    fn public_list_admits_every_role() {
        let allow = AllowList::public();

        assert!(allow.is_public());
        assert!(Role::ALL.into_iter().all(|role| allow.admits(role)));
    }
}
