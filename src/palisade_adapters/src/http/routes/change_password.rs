use axum::{Json, extract::State, http::HeaderMap, http::StatusCode, response::IntoResponse};
use secrecy::Secret;
use serde::Deserialize;

use palisade_application::ChangePasswordUseCase;
use palisade_core::{EmailClient, PasswordHasher, ResetTokenStore, RevokedSessionStore, UserStore};

use crate::http::error::ApiError;
use crate::http::extractors::require_session;
use crate::session::jwt::SessionTokenConfig;

#[derive(Debug, Deserialize)]
pub struct ChangePasswordRequest {
    pub password: Option<Secret<String>>,
}

/// POST /change-password - authenticated change of the session's own account.
#[tracing::instrument(name = "Change password", skip_all)]
pub async fn change_password<U, H, T, R, E>(
    State((user_store, password_hasher, reset_tokens, revoked_sessions, email_client, session_config)): State<(
        U,
        H,
        T,
        R,
        E,
        SessionTokenConfig,
    )>,
    headers: HeaderMap,
    Json(request): Json<ChangePasswordRequest>,
) -> Result<impl IntoResponse, ApiError>
where
    U: UserStore + Clone + Send + Sync + 'static,
    H: PasswordHasher + Clone + Send + Sync + 'static,
    T: ResetTokenStore + Clone + Send + Sync + 'static,
    R: RevokedSessionStore + Clone + Send + Sync + 'static,
    E: EmailClient + Clone + Send + Sync + 'static,
{
    let session = require_session(&headers, &session_config, &revoked_sessions).await?;

    let password = request
        .password
        .ok_or_else(|| ApiError::bad_request("A new password is required."))?;

    let use_case = ChangePasswordUseCase::new(
        user_store,
        password_hasher,
        reset_tokens,
        revoked_sessions,
        email_client,
    );
    use_case.change_authenticated(&session, password).await?;

    Ok(StatusCode::NO_CONTENT)
}
