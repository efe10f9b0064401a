use axum::{Json, extract::State, http::HeaderMap, response::IntoResponse};
use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;

use palisade_application::RegisterUseCase;
use palisade_core::{PasswordHasher, RevokedSessionStore, UserStore};

use crate::http::error::ApiError;
use crate::http::extractors::require_session;
use crate::session::jwt::SessionTokenConfig;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: Option<Secret<String>>,
    pub password: Option<Secret<String>>,
}

/// POST /register - create an account on behalf of an operator.
///
/// Requires a valid session; the create-users permission itself is enforced
/// by the downstream authorization layer fed by the session-token bridge.
#[tracing::instrument(name = "Register", skip_all)]
pub async fn register<U, H, R>(
    State((user_store, password_hasher, revoked_sessions, session_config)): State<(
        U,
        H,
        R,
        SessionTokenConfig,
    )>,
    headers: HeaderMap,
    Json(request): Json<RegisterRequest>,
) -> Result<impl IntoResponse, ApiError>
where
    U: UserStore + Clone + Send + Sync + 'static,
    H: PasswordHasher + Clone + Send + Sync + 'static,
    R: RevokedSessionStore + Clone + Send + Sync + 'static,
{
    require_session(&headers, &session_config, &revoked_sessions).await?;

    let (Some(email), Some(password)) = (request.email, request.password) else {
        return Err(ApiError::bad_request("Email and password are required."));
    };

    let use_case = RegisterUseCase::new(user_store, password_hasher);
    let user = use_case.execute(email, password).await?;

    Ok(Json(serde_json::json!({
        "id": user.id.to_string(),
        "email": user.email.as_ref().expose_secret(),
    })))
}
