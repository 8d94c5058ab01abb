//! Enrollments

mod errors;
mod handlers;
pub(crate) mod links;

pub(crate) use handlers::*;
