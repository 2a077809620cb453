use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use tracing::debug;

use super::auth::{AuthUser, BearerToken};
use crate::app::AppState;

/// Cookie gate for server-rendered pages: a missing or invalid session
/// cookie redirects (303) to the login page instead of returning 401.
pub async fn session_cookie_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let security = &state.config.security;

    let Some(token) = cookie_value(request.headers(), &security.session_cookie_name) else {
        debug!("No session cookie on {}, redirecting", request.uri().path());
        return Redirect::to(&security.login_path).into_response();
    };

    match state.tokens.verify(&token) {
        Ok(claims) => {
            request.extensions_mut().insert(AuthUser::from(claims));
            request.extensions_mut().insert(BearerToken(token));
            next.run(request).await
        }
        Err(e) => {
            debug!("Invalid session cookie on {}: {}", request.uri().path(), e);
            Redirect::to(&security.login_path).into_response()
        }
    }
}

/// Value of the named cookie, if present and non-empty.
pub fn cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// `Set-Cookie` value carrying a fresh session token.
pub fn session_cookie(name: &str, token: &str, max_age_secs: u64, secure: bool) -> String {
    let mut cookie = format!("{}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}", name, token, max_age_secs);
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

/// `Set-Cookie` value that clears the session.
pub fn expired_session_cookie(name: &str, secure: bool) -> String {
    session_cookie(name, "", 0, secure)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn finds_named_cookie() {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_static("theme=dark; auth_token=abc.def; other=1"));
        assert_eq!(cookie_value(&headers, "auth_token").as_deref(), Some("abc.def"));
        assert_eq!(cookie_value(&headers, "missing"), None);
    }

    #[test]
    fn empty_cookie_counts_as_missing() {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_static("auth_token="));
        assert_eq!(cookie_value(&headers, "auth_token"), None);
    }

    #[test]
    fn builds_session_cookies() {
        assert_eq!(
            session_cookie("auth_token", "t", 3600, true),
            "auth_token=t; Path=/; HttpOnly; SameSite=Lax; Max-Age=3600; Secure"
        );
        assert_eq!(
            expired_session_cookie("auth_token", false),
            "auth_token=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0"
        );
    }
}
