use axum_extra::extract::cookie::{Cookie, SameSite};
use chrono::{DateTime, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Validation, decode, encode};
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize, ser::SerializeStruct};
use thiserror::Error;

use palisade_core::{
    AuthType, AuthenticatedSession, Email, RevokedSessionStore, SessionIssueError, SessionIssuer,
    SessionToken, UserId, UserRecord,
};

#[derive(Clone)]
pub struct SessionTokenConfig {
    pub cookie_name: String,
    pub secret: Secret<String>,
    pub ttl_seconds: i64,
}

impl SessionTokenConfig {
    fn secret_bytes(&self) -> &[u8] {
        self.secret.expose_secret().as_bytes()
    }
}

#[derive(Debug, Error)]
pub enum SessionTokenError {
    #[error("Missing token")]
    MissingToken,
    #[error("Invalid token")]
    InvalidToken,
    #[error("Token error: {0}")]
    TokenError(jsonwebtoken::errors::Error),
    #[error("Session has been disavowed")]
    Disavowed,
    #[error("Unexpected error: {0}")]
    UnexpectedError(String),
}

/// Claims carried by a session token.
///
/// `issued_at` is a full-precision timestamp used for the disavowal
/// watermark check; `exp` is the registered claim the JWT library validates.
#[derive(Debug, Deserialize, Clone)]
pub struct SessionClaims {
    pub sub: String,
    pub email: Secret<String>,
    pub auth_type: AuthType,
    pub issued_at: DateTime<Utc>,
    pub exp: usize,
}

impl Serialize for SessionClaims {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut state = serializer.serialize_struct("SessionClaims", 5)?;
        state.serialize_field("sub", &self.sub)?;
        state.serialize_field("email", &self.email.expose_secret())?;
        state.serialize_field("auth_type", &self.auth_type)?;
        state.serialize_field("issued_at", &self.issued_at)?;
        state.serialize_field("exp", &self.exp)?;
        state.end()
    }
}

/// Issues session tokens for the login use case.
#[derive(Clone)]
pub struct JwtSessionIssuer {
    config: SessionTokenConfig,
}

impl JwtSessionIssuer {
    pub fn new(config: SessionTokenConfig) -> Self {
        Self { config }
    }
}

impl SessionIssuer for JwtSessionIssuer {
    fn issue(&self, user: &UserRecord) -> Result<SessionToken, SessionIssueError> {
        generate_session_token(user, &self.config)
            .map_err(|e| SessionIssueError::TokenError(e.to_string()))
    }
}

// Create a session token bound to the account, auth type `local`
pub fn generate_session_token(
    user: &UserRecord,
    config: &SessionTokenConfig,
) -> Result<SessionToken, SessionTokenError> {
    let ttl = chrono::Duration::try_seconds(config.ttl_seconds).ok_or(
        SessionTokenError::UnexpectedError("Failed to create session ttl duration".to_string()),
    )?;

    let issued_at = Utc::now();
    let exp = issued_at
        .checked_add_signed(ttl)
        .ok_or(SessionTokenError::UnexpectedError(
            "Duration out of range".to_string(),
        ))?
        .timestamp();

    let exp: usize = exp.try_into().map_err(|_| {
        SessionTokenError::UnexpectedError("Failed to cast i64 to usize".to_string())
    })?;

    let claims = SessionClaims {
        sub: user.id.to_string(),
        email: user.email.as_ref().clone(),
        auth_type: AuthType::Local,
        issued_at,
        exp,
    };

    let token = encode(
        &jsonwebtoken::Header::default(),
        &claims,
        &EncodingKey::from_secret(config.secret_bytes()),
    )
    .map_err(SessionTokenError::TokenError)?;

    Ok(SessionToken::new(token))
}

// Check the signature and expiry, then the per-account disavowal watermark
pub async fn validate_session_token(
    token: &str,
    revoked_sessions: &dyn RevokedSessionStore,
    config: &SessionTokenConfig,
) -> Result<AuthenticatedSession, SessionTokenError> {
    let claims = decode::<SessionClaims>(
        token,
        &DecodingKey::from_secret(config.secret_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(SessionTokenError::TokenError)?;

    let user_id = UserId::parse(&claims.sub).map_err(|_| SessionTokenError::InvalidToken)?;

    let disavowed = revoked_sessions
        .is_disavowed(user_id, claims.issued_at)
        .await
        .map_err(|e| SessionTokenError::UnexpectedError(e.to_string()))?;
    if disavowed {
        return Err(SessionTokenError::Disavowed);
    }

    let email = Email::parse(claims.email).map_err(|_| SessionTokenError::InvalidToken)?;

    Ok(AuthenticatedSession {
        user_id,
        email,
        auth_type: claims.auth_type,
    })
}

// Create cookie and set the value to the passed-in token string
pub fn create_session_cookie(token: String, cookie_name: &str) -> Cookie<'_> {
    Cookie::build((cookie_name, token))
        .path("/") // apply cookie to all URLs on the server
        .http_only(true) // prevent JavaScript from accessing the cookie
        .secure(true)
        .same_site(SameSite::Lax) // send cookie with "same-site" requests, and with "cross-site" top-level navigations.
        .build()
}

pub fn create_removal_cookie(cookie_name: &str) -> Cookie<'_> {
    let mut cookie = create_session_cookie(String::new(), cookie_name);
    cookie.make_removal();
    cookie
}
