//! Access gate middleware.
//!
//! Lifts the bearer credential off the request and defers every decision to
//! the application's [`AccessGate`](courses_app::auth::AccessGate). Admitted
//! callers are recorded in the depot for the handlers behind the gate.

use std::sync::Arc;

use salvo::{http::header::AUTHORIZATION, prelude::*};
use tracing::{error, warn};

use courses_app::auth::{AllowList, Credentials, TOKEN_COOKIE};

use crate::{extensions::*, state::State};

/// Route guard admitting the roles of one allow-list.
#[derive(Debug, Clone)]
pub(crate) struct Gate {
    allow: AllowList,
}

impl Gate {
    #[must_use]
    pub(crate) fn new(allow: AllowList) -> Self {
        Self { allow }
    }

    /// Anyone, with or without a session.
    #[must_use]
    pub(crate) fn public() -> Self {
        Self::new(AllowList::public())
    }

    /// Any signed-in caller, whatever their role.
    #[must_use]
    pub(crate) fn authenticated() -> Self {
        Self::new(AllowList::authenticated())
    }

    /// Users, moderators and admins.
    #[must_use]
    pub(crate) fn members() -> Self {
        Self::new(AllowList::members())
    }

    /// Moderators and admins.
    #[must_use]
    pub(crate) fn staff() -> Self {
        Self::new(AllowList::staff())
    }
}

#[handler]
impl Gate {
    async fn handle(
        &self,
        req: &mut Request,
        depot: &mut Depot,
        res: &mut Response,
        ctrl: &mut FlowCtrl,
    ) {
        let Ok(state) = depot.obtain_or_500::<Arc<State>>().map(Arc::clone) else {
            res.render(StatusError::internal_server_error());
            ctrl.skip_rest();

            return;
        };

        let credentials = credentials(req);

        match state.app.access.authorize(&credentials, &self.allow).await {
            Ok(Some(identity)) => depot.insert_identity(identity),
            Ok(None) => {}
            Err(refusal) if refusal.is_forbidden() => {
                warn!(path = %req.uri().path(), "refused request: {refusal}");

                res.render(StatusError::forbidden().brief("Access denied"));
                ctrl.skip_rest();

                return;
            }
            Err(failure) => {
                error!(path = %req.uri().path(), "failed to check credential: {failure}");

                res.render(StatusError::internal_server_error());
                ctrl.skip_rest();

                return;
            }
        }

        ctrl.call_next(req, depot, res).await;
    }
}

/// The `Authorization` header and session cookie, as sent.
pub(crate) fn credentials(req: &Request) -> Credentials {
    let authorization = req
        .headers()
        .get(AUTHORIZATION)
        .map(|value| String::from_utf8_lossy(value.as_bytes()).into_owned());

    let cookie = req
        .cookie(TOKEN_COOKIE)
        .map(|cookie| cookie.value().to_string());

    Credentials::new(authorization, cookie)
}
