// handlers/public/auth.rs - POST /login, POST /logout

use axum::{
    extract::{rejection::JsonRejection, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::json;
use tracing::{info, warn};

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::session::{expired_session_cookie, session_cookie};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: Option<String>,
    /// SHA-256 hex of the password, as computed by the dashboard.
    #[serde(alias = "password")]
    pub password_hash: Option<String>,
}

/// POST /login - exchange admin credentials for a token
///
/// The stored hash is compared with `crypt()` in the database. An unknown
/// email and a wrong password produce the same 401. On success the token is
/// returned in the body and also set as the session cookie.
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(body) = payload?;

    let email = body.email.as_deref().map(str::trim).unwrap_or_default();
    let password_hash = body.password_hash.as_deref().unwrap_or_default();
    if email.is_empty() || password_hash.is_empty() {
        return Err(ApiError::bad_request("Email and password are required"));
    }

    let Some(account) = state.repo.find_account(email, password_hash).await? else {
        warn!("Failed cockpit login for {}", email);
        return Err(ApiError::unauthorized("Invalid credentials"));
    };

    let token = state.tokens.issue(&account.email)?;

    if let Err(e) = state.repo.touch_last_login(&account.email).await {
        warn!("Failed to update last_login for {}: {}", account.email, e);
    }
    info!("Cockpit login for {}", account.email);

    let security = &state.config.security;
    let cookie = session_cookie(
        &security.session_cookie_name,
        &token,
        security.jwt_expiry_hours * 3600,
        security.cookie_secure,
    );

    Ok((
        [(header::SET_COOKIE, cookie)],
        Json(json!({ "success": true, "token": token })),
    )
        .into_response())
}

/// POST /logout - clear the session cookie
pub async fn logout(State(state): State<AppState>) -> Response {
    let security = &state.config.security;
    let cookie = expired_session_cookie(&security.session_cookie_name, security.cookie_secure);
    ([(header::SET_COOKIE, cookie)], Json(json!({ "success": true }))).into_response()
}
