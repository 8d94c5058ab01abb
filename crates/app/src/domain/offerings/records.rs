//! Offering Records

use std::{fmt, str::FromStr};

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use crate::{database::UnknownValue, uuids::TypedUuid};

/// Offering UUID
pub type OfferingUuid = TypedUuid<OfferingRecord>;

/// Catalog visibility of an offering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OfferingStatus {
    #[default]
    Active,
    Inactive,
}

impl OfferingStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
        }
    }

    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Active => Self::Inactive,
            Self::Inactive => Self::Active,
        }
    }
}

impl fmt::Display for OfferingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OfferingStatus {
    type Err = UnknownValue;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "active" => Ok(Self::Active),
            "inactive" => Ok(Self::Inactive),
            other => Err(UnknownValue(other.to_string())),
        }
    }
}

/// Offering Record
///
/// A course or training group users can enroll into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OfferingRecord {
    pub uuid: OfferingUuid,
    pub title: String,
    pub course: String,
    pub location: String,
    pub status: OfferingStatus,
    pub capacity: u32,
    pub enrolled: u32,
    pub description: String,
    pub schedule: String,
    pub coach_name: String,
    pub coach_phone: String,
    pub coach_email: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
