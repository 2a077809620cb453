use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use tracing::{debug, warn};

use crate::app::AppState;
use crate::auth::Claims;
use crate::error::{ApiError, INVALID_AUTH_HEADER};

/// Raw bearer token of the current request, forwarded to the SQL service.
#[derive(Clone, Debug)]
pub struct BearerToken(pub String);

/// Authenticated admin extracted from a verified token
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub email: String,
    pub role: String,
}

impl From<Claims> for AuthUser {
    fn from(claims: Claims) -> Self {
        Self {
            email: claims.sub,
            role: claims.role,
        }
    }
}

/// Bearer gate for the API routes.
///
/// A missing or malformed header is rejected before the handler runs. When
/// token verification is enabled the signature and expiry are checked too;
/// every failure produces the same 401 body. The handler's own response is
/// returned untouched.
pub async fn bearer_auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_bearer_token(request.headers()).map_err(|reason| {
        debug!("Rejected request to {}: {}", request.uri().path(), reason);
        ApiError::unauthorized(INVALID_AUTH_HEADER)
    })?;

    if state.config.security.verify_tokens {
        let claims = state.tokens.verify(&token).map_err(|e| {
            warn!("Rejected bearer token for {}: {}", request.uri().path(), e);
            ApiError::unauthorized(INVALID_AUTH_HEADER)
        })?;
        request.extensions_mut().insert(AuthUser::from(claims));
    }

    request.extensions_mut().insert(BearerToken(token));
    Ok(next.run(request).await)
}

/// Extract the token from `Authorization: Bearer <token>`
pub fn extract_bearer_token(headers: &HeaderMap) -> Result<String, &'static str> {
    let auth_header = headers
        .get(axum::http::header::AUTHORIZATION)
        .ok_or("missing Authorization header")?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| "Authorization header is not valid ASCII")?;

    match auth_str.strip_prefix("Bearer ") {
        Some(token) if !token.trim().is_empty() => Ok(token.trim().to_string()),
        Some(_) => Err("empty bearer token"),
        None => Err("Authorization header must use Bearer token format"),
    }
}
