//! Enrollment Offering Handlers

pub(crate) mod availability;
pub(crate) mod delete;
pub(crate) mod index;
pub(crate) mod update;
