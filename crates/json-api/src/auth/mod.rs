//! Accounts and route admission

mod errors;
mod handlers;
pub(crate) mod middleware;

pub(crate) use handlers::*;
pub(crate) use middleware::Gate;
