//! Offerings Data

use crate::domain::offerings::records::{OfferingStatus, OfferingUuid};

/// New Offering Data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOffering {
    pub uuid: OfferingUuid,
    pub details: OfferingDetails,
}

/// Offering Update Data
///
/// Replaces every descriptive field; status is managed separately.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OfferingUpdate {
    pub details: OfferingDetails,
    pub enrolled: u32,
}

/// Descriptive fields shared by creation and update.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct OfferingDetails {
    pub title: String,
    pub course: String,
    pub location: String,
    pub capacity: u32,
    pub description: String,
    pub schedule: String,
    pub coach_name: String,
    pub coach_phone: String,
    pub coach_email: String,
}

impl OfferingDetails {
    /// Title and location are required.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        !self.title.trim().is_empty() && !self.location.trim().is_empty()
    }
}

/// Catalog listing filter. Without an explicit status only active offerings
/// are returned.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct OfferingFilter {
    /// Case-insensitive substring of the title.
    pub title: Option<String>,
    pub location: Option<String>,
    pub status: Option<OfferingStatus>,
}

impl OfferingFilter {
    #[must_use]
    pub fn status(&self) -> OfferingStatus {
        self.status.unwrap_or_default()
    }

    /// `ILIKE` pattern for the title search, with wildcards escaped.
    #[must_use]
    pub fn title_pattern(&self) -> Option<String> {
        self.title
            .as_deref()
            .map(str::trim)
            .filter(|title| !title.is_empty())
            .map(|title| {
                let escaped = title
                    .replace('\\', "\\\\")
                    .replace('%', "\\%")
                    .replace('_', "\\_");

                format!("%{escaped}%")
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter_defaults_to_active() {
        assert_eq!(OfferingFilter::default().status(), OfferingStatus::Active);

        let filter = OfferingFilter {
            status: Some(OfferingStatus::Inactive),
            ..OfferingFilter::default()
        };

        assert_eq!(filter.status(), OfferingStatus::Inactive);
    }

    #[test]
    fn title_pattern_escapes_wildcards() {
        let filter = OfferingFilter {
            title: Some(" 100%_fit ".to_string()),
            ..OfferingFilter::default()
        };

        assert_eq!(filter.title_pattern().as_deref(), Some("%100\\%\\_fit%"));
    }

    #[test]
    fn blank_title_matches_everything() {
        let filter = OfferingFilter {
            title: Some("   ".to_string()),
            ..OfferingFilter::default()
        };

        assert_eq!(filter.title_pattern(), None);
    }

    #[test]
    fn details_require_title_and_location() {
        let details = OfferingDetails {
            title: "Chess".to_string(),
            location: "Hall 2".to_string(),
            ..OfferingDetails::default()
        };

        assert!(details.is_valid());

        assert!(
            !OfferingDetails {
                location: " ".to_string(),
                ..details.clone()
            }
            .is_valid()
        );

        assert!(
            !OfferingDetails {
                title: String::new(),
                ..details
            }
            .is_valid()
        );
    }
}
