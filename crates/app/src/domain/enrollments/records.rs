//! Enrollment Records

use std::{fmt, str::FromStr};

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use crate::{
    auth::UserUuid,
    database::UnknownValue,
    domain::offerings::records::OfferingUuid,
    uuids::TypedUuid,
};

/// Enrollment UUID
pub type EnrollmentUuid = TypedUuid<EnrollmentRecord>;

/// Lifecycle of an enrollment request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnrollmentStatus {
    #[default]
    Draft,
    Formed,
    Completed,
    Rejected,
    Deleted,
}

impl EnrollmentStatus {
    pub const ALL: [Self; 5] = [
        Self::Draft,
        Self::Formed,
        Self::Completed,
        Self::Rejected,
        Self::Deleted,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Formed => "formed",
            Self::Completed => "completed",
            Self::Rejected => "rejected",
            Self::Deleted => "deleted",
        }
    }

    /// No further change is expected once an enrollment reaches one of these.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Rejected | Self::Deleted)
    }

    /// Whether reaching this status closes the request with a decision.
    #[must_use]
    pub const fn is_decision(self) -> bool {
        matches!(self, Self::Completed | Self::Rejected)
    }
}

impl fmt::Display for EnrollmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EnrollmentStatus {
    type Err = UnknownValue;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == value)
            .ok_or_else(|| UnknownValue(value.to_string()))
    }
}

/// Enrollment Record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnrollmentRecord {
    pub uuid: EnrollmentUuid,
    pub user: UserUuid,
    pub moderator: Option<UserUuid>,
    pub status: EnrollmentStatus,
    /// Bumped by every status write.
    pub version: i64,
    pub created_at: Timestamp,
    pub processed_at: Option<Timestamp>,
    pub finished_at: Option<Timestamp>,
}

/// An offering attached to an enrollment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnrollmentLinkRecord {
    pub offering: OfferingUuid,
    pub title: String,
    pub availability: Option<bool>,
}

/// An enrollment together with its attached offerings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnrollmentDetails {
    pub enrollment: EnrollmentRecord,
    pub links: Vec<EnrollmentLinkRecord>,
}
