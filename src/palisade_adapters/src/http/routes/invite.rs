use axum::{Json, extract::State, http::HeaderMap, http::StatusCode, response::IntoResponse};
use secrecy::Secret;
use serde::Deserialize;

use palisade_application::InviteUseCase;
use palisade_core::{EmailClient, PasswordHasher, ResetTokenStore, RevokedSessionStore, UserStore};

use crate::http::error::ApiError;
use crate::http::extractors::require_session;
use crate::session::jwt::SessionTokenConfig;

#[derive(Debug, Deserialize)]
pub struct InviteRequest {
    pub email: Option<Secret<String>>,
}

/// POST /invite - provision an account and mail the invitee a reset code.
///
/// Responds 204 no matter what happened beyond authentication; the side
/// effect is best-effort and its failures are only logged.
#[tracing::instrument(name = "Invite", skip_all)]
pub async fn invite<U, H, T, R, E>(
    State((user_store, password_hasher, reset_tokens, revoked_sessions, email_client, session_config)): State<(
        U,
        H,
        T,
        R,
        E,
        SessionTokenConfig,
    )>,
    headers: HeaderMap,
    Json(request): Json<InviteRequest>,
) -> Result<impl IntoResponse, ApiError>
where
    U: UserStore + Clone + Send + Sync + 'static,
    H: PasswordHasher + Clone + Send + Sync + 'static,
    T: ResetTokenStore + Clone + Send + Sync + 'static,
    R: RevokedSessionStore + Clone + Send + Sync + 'static,
    E: EmailClient + Clone + Send + Sync + 'static,
{
    require_session(&headers, &session_config, &revoked_sessions).await?;

    let use_case = InviteUseCase::new(user_store, password_hasher, reset_tokens, email_client);
    use_case.execute(request.email).await;

    Ok(StatusCode::NO_CONTENT)
}
