//! Authentication and route admission

mod access;
mod errors;
mod models;
mod repository;
mod revocation;
mod roles;
mod service;
mod token;

pub use access::*;
pub use errors::*;
pub use models::*;
pub use repository::PgUsersRepository;
pub use revocation::*;
pub use roles::*;
pub use service::*;
pub use token::*;
