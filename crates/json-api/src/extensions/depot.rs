//! Depot helper extensions.

use std::any::Any;

use salvo::prelude::{Depot, StatusError};

use courses_app::auth::Identity;

/// Helpers for mapping depot extraction failures to HTTP errors.
pub(crate) trait DepotExt {
    fn obtain_or_500<T: Any + Send + Sync>(&self) -> Result<&T, StatusError>;

    /// Record the caller admitted by the access gate.
    fn insert_identity(&mut self, identity: Identity);

    /// The admitted caller, if the gate let one through.
    fn identity(&self) -> Option<Identity>;

    fn identity_or_401(&self) -> Result<Identity, StatusError>;
}

impl DepotExt for Depot {
    fn obtain_or_500<T: Any + Send + Sync>(&self) -> Result<&T, StatusError> {
        self.obtain::<T>()
            .map_err(|_ignored| StatusError::internal_server_error())
    }

    fn insert_identity(&mut self, identity: Identity) {
        self.inject(identity);
    }

    fn identity(&self) -> Option<Identity> {
        self.obtain::<Identity>().ok().copied()
    }

    fn identity_or_401(&self) -> Result<Identity, StatusError> {
        self.identity()
            .ok_or_else(|| StatusError::unauthorized().brief("Missing identity"))
    }
}
