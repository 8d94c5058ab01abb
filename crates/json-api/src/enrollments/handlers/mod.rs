//! Enrollment Handlers

pub(crate) mod add_offering;
pub(crate) mod create;
pub(crate) mod decision;
pub(crate) mod delete;
pub(crate) mod get;
pub(crate) mod index;
pub(crate) mod status;
