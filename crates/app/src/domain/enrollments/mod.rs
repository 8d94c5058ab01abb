//! Enrollments

pub mod data;
pub mod errors;
pub mod reconcile;
pub mod records;
mod repositories;
pub mod service;
pub mod workflow;

pub use errors::EnrollmentsServiceError;
pub use service::*;
