use axum::{
    extract::Extension,
    http::{header::AUTHORIZATION, HeaderMap},
    Json,
};
use std::sync::Arc;
use tracing::{debug, instrument};

use crate::auth::{AuthError, AuthState, LoginRequest, LoginResponse};

#[utoipa::path(
    post,
    path = "/login",
    request_body = LoginRequest,
    params(
        ("Authorization" = Option<String>, Header, description = "`Bearer <bootstrap secret>`, only needed to provision a new user")
    ),
    responses(
        (status = 200, description = "Login successful", body = LoginResponse, content_type = "application/json"),
        (status = 400, description = "Malformed request", body = String),
        (status = 401, description = "Unauthorized", body = String),
        (status = 500, description = "Internal server error", body = String)
    ),
    tag = "auth"
)]
// axum handler for login
#[instrument(skip(headers, auth_state, payload))]
pub async fn login(
    headers: HeaderMap,
    auth_state: Extension<Arc<AuthState>>,
    payload: Option<Json<LoginRequest>>,
) -> Result<Json<LoginResponse>, AuthError> {
    let request: LoginRequest = match payload {
        Some(Json(payload)) => payload,
        None => return Err(AuthError::MalformedRequest("Missing payload".to_string())),
    };

    debug!("login: {:?}", request);

    let result = auth_state
        .authenticator()
        .authenticate(&request, bootstrap_secret(&headers))
        .await?;

    let token = auth_state.issuer().issue(&result.user)?;

    Ok(Json(LoginResponse {
        token,
        msg: result.message().to_string(),
    }))
}

/// Second token of a two-token `Authorization` header, e.g. `Bearer <secret>`.
pub(crate) fn bootstrap_secret(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let mut parts = value.split_whitespace();
    let (_scheme, secret) = (parts.next()?, parts.next()?);
    if parts.next().is_some() {
        return None;
    }
    Some(secret)
}
