use axum::{
    extract::{Request, State},
    http::{header, HeaderValue, Method},
    middleware::Next,
    response::Response,
};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing::warn;

use crate::app::AppState;
use crate::error::ApiError;

/// Reject any request whose `Origin` is outside the allow-list, before
/// authentication or CORS handling. Requests without an `Origin` pass.
pub async fn origin_guard_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    if let Some(origin) = request.headers().get(header::ORIGIN) {
        let allowed = origin
            .to_str()
            .map(|o| state.config.security.cors_origins.iter().any(|a| a == o))
            .unwrap_or(false);
        if !allowed {
            warn!("Rejected request from origin {:?} to {}", origin, request.uri().path());
            return Err(ApiError::forbidden("Origin not allowed"));
        }
    }
    Ok(next.run(request).await)
}

/// CORS headers for the allowed origins; preflights are answered here.
pub fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| match HeaderValue::from_str(o) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin {:?}", o);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_credentials(true)
}
