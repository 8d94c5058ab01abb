//! Offerings attached to an enrollment

mod handlers;

pub(crate) use handlers::*;
