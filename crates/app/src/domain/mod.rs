//! Course Enrollment Domain

pub mod enrollments;
pub mod offerings;
