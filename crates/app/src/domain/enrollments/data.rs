//! Enrollments Data

use jiff::Timestamp;

use crate::domain::enrollments::records::EnrollmentStatus;

/// Enrollment listing filter.
///
/// Without an explicit status, deleted enrollments are left out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EnrollmentFilter {
    pub status: Option<EnrollmentStatus>,
    pub created_from: Option<Timestamp>,
    pub created_to: Option<Timestamp>,
}
