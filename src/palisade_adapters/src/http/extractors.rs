use axum::http::{HeaderMap, header::AUTHORIZATION};

use palisade_core::{AuthenticatedSession, RevokedSessionStore};

use crate::http::error::ApiError;
use crate::session::jwt::{SessionTokenConfig, validate_session_token};

pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

/// Resolve the request's session or reject with 401.
///
/// Reads only the bearer header; the session-token bridge has already
/// promoted a stored cookie into it where applicable.
pub async fn require_session(
    headers: &HeaderMap,
    config: &SessionTokenConfig,
    revoked_sessions: &dyn RevokedSessionStore,
) -> Result<AuthenticatedSession, ApiError> {
    let token =
        bearer_token(headers).ok_or_else(|| ApiError::unauthorized("Missing authentication token."))?;

    validate_session_token(token, revoked_sessions, config)
        .await
        .map_err(|_| ApiError::unauthorized("Invalid authentication token."))
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    #[test]
    fn bearer_token_requires_the_scheme_prefix() {
        let mut headers = HeaderMap::new();
        assert_eq!(bearer_token(&headers), None);

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Basic dXNlcg=="));
        assert_eq!(bearer_token(&headers), None);

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer abc.def"));
        assert_eq!(bearer_token(&headers), Some("abc.def"));
    }
}
