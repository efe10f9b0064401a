use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use secrecy::Secret;
use serde::Deserialize;

use palisade_application::ChangePasswordUseCase;
use palisade_core::{EmailClient, PasswordHasher, ResetTokenStore, RevokedSessionStore, UserStore};

use crate::http::error::ApiError;

#[derive(Debug, Deserialize)]
pub struct ResetPasswordRequest {
    pub email: Option<Secret<String>>,
    pub code: Option<String>,
    pub password: Option<Secret<String>>,
}

/// POST /reset-password - unauthenticated change authorized by a reset code.
#[tracing::instrument(name = "Reset password", skip_all)]
pub async fn reset_password<U, H, T, R, E>(
    State((user_store, password_hasher, reset_tokens, revoked_sessions, email_client)): State<(
        U,
        H,
        T,
        R,
        E,
    )>,
    Json(request): Json<ResetPasswordRequest>,
) -> Result<impl IntoResponse, ApiError>
where
    U: UserStore + Clone + Send + Sync + 'static,
    H: PasswordHasher + Clone + Send + Sync + 'static,
    T: ResetTokenStore + Clone + Send + Sync + 'static,
    R: RevokedSessionStore + Clone + Send + Sync + 'static,
    E: EmailClient + Clone + Send + Sync + 'static,
{
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
    use_case
        .reset_with_token(request.email, request.code, password)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
