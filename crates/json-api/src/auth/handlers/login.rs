//! Login Handler

use std::sync::Arc;

use jiff::Timestamp;
use salvo::{
    http::cookie::{Cookie, SameSite},
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use courses_app::auth::TOKEN_COOKIE;

use crate::{auth::errors::into_status_error, extensions::*, state::State};

/// Login Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct LoginRequest {
    pub name: String,
    pub password: String,
}

/// Session Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct LoginResponse {
    /// Bearer token for the `Authorization` header
    pub token: String,

    pub user_uuid: Uuid,

    /// Role captured in the token
    pub role: String,

    /// When the token stops being accepted
    pub expires_at: String,
}

/// Login Handler
///
/// Issues a session token and stores it in the session cookie as well.
#[endpoint(
    tags("auth"),
    summary = "Login",
    responses(
        (status_code = StatusCode::OK, description = "Session started"),
        (status_code = StatusCode::UNAUTHORIZED, description = "Invalid credentials"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
#[tracing::instrument(
    name = "auth.login",
    skip(json, depot, res),
    fields(user_uuid = tracing::field::Empty),
    err
)]
pub(crate) async fn handler(
    json: JsonBody<LoginRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<LoginResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let request = json.into_inner();

    let issued = state
        .app
        .accounts
        .login(&request.name, &request.password)
        .await
        .map_err(into_status_error)?;

    tracing::Span::current().record("user_uuid", tracing::field::display(issued.claims.sub));

    res.add_cookie(
        Cookie::build((TOKEN_COOKIE, format!("Bearer {}", issued.token)))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Strict)
            .build(),
    );

    let expires_at = Timestamp::from_second(issued.claims.exp)
        .or_500("session token expiry out of range")?;

    Ok(Json(LoginResponse {
        token: issued.token,
        user_uuid: issued.claims.sub.into(),
        role: issued.claims.role.to_string(),
        expires_at: expires_at.to_string(),
    }))
}
