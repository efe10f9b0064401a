use axum::{
    extract::{Request, State},
    http::{HeaderMap, HeaderValue, header::AUTHORIZATION},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::CookieJar;

use crate::session::jwt::SessionTokenConfig;

/// Promote a stored session cookie into a bearer `Authorization` header.
///
/// Pure and synchronous: an explicit bearer credential always wins, and a
/// request without a session cookie passes through untouched.
pub fn promote_session_token(headers: &mut HeaderMap, cookie_name: &str) {
    if headers.contains_key(AUTHORIZATION) {
        return;
    }

    let jar = CookieJar::from_headers(headers);
    let Some(cookie) = jar.get(cookie_name) else {
        return;
    };

    if let Ok(value) = HeaderValue::from_str(&format!("Bearer {}", cookie.value())) {
        headers.insert(AUTHORIZATION, value);
    }
}

/// Request-level adapter run before the authorization layers: downstream
/// handlers only ever look at the bearer header.
pub async fn session_token_bridge(
    State(config): State<SessionTokenConfig>,
    mut request: Request,
    next: Next,
) -> Response {
    promote_session_token(request.headers_mut(), &config.cookie_name);
    next.run(request).await
}
