//! Course enrollment domain, access control and persistence.

pub mod auth;
pub mod clock;
pub mod context;
pub mod database;
pub mod domain;

#[cfg(test)]
mod test;

mod uuids;

pub use uuids::TypedUuid;
