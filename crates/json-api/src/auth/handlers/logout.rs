//! Logout Handler

use std::sync::Arc;

use salvo::prelude::*;

use courses_app::auth::TOKEN_COOKIE;

use crate::{
    auth::{errors::into_status_error, middleware::credentials},
    extensions::*,
    state::State,
};

/// Logout Handler
///
/// Revokes the presented session token for the rest of its lifetime.
#[endpoint(
    tags("auth"),
    summary = "Logout",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Session revoked"),
        (status_code = StatusCode::UNAUTHORIZED, description = "No usable session token"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
#[tracing::instrument(
    name = "auth.logout",
    skip(req, depot, res),
    fields(user_uuid = tracing::field::Empty, role = tracing::field::Empty),
    err
)]
pub(crate) async fn handler(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<StatusCode, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let credentials = credentials(req);

    if let Some(identity) = depot.identity() {
        let span = tracing::Span::current();

        span.record("user_uuid", tracing::field::display(identity.user));
        span.record("role", identity.role.as_str());
    }

    let Ok(Some(token)) = credentials.bearer() else {
        return Err(StatusError::unauthorized().brief("Missing session token"));
    };

    state
        .app
        .accounts
        .logout(token)
        .await
        .map_err(into_status_error)?;

    res.remove_cookie(TOKEN_COOKIE);

    Ok(StatusCode::OK)
}
