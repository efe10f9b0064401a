use axum::{Json, extract::State, response::IntoResponse};
use secrecy::Secret;
use serde::Deserialize;

use palisade_application::ForgotPasswordUseCase;
use palisade_core::{EmailClient, ResetTokenStore, UserStore};

/// The one body every forgot-password request gets back, match or no match.
pub const FORGOT_PASSWORD_RESPONSE: &str =
    "If that email address is in our system, we have sent a password reset code.";

#[derive(Debug, Deserialize)]
pub struct ForgotPasswordRequest {
    pub email: Option<Secret<String>>,
}

/// POST /forgot-password - best-effort reset-code delivery.
#[tracing::instrument(name = "Forgot password", skip_all)]
pub async fn forgot_password<U, T, E>(
    State((user_store, reset_tokens, email_client)): State<(U, T, E)>,
    Json(request): Json<ForgotPasswordRequest>,
) -> impl IntoResponse
where
    U: UserStore + Clone + Send + Sync + 'static,
    T: ResetTokenStore + Clone + Send + Sync + 'static,
    E: EmailClient + Clone + Send + Sync + 'static,
{
    let use_case = ForgotPasswordUseCase::new(user_store, reset_tokens, email_client);
    use_case.execute(request.email).await;

    Json(serde_json::json!({ "message": FORGOT_PASSWORD_RESPONSE }))
}
