use axum::{
    Json,
    extract::State,
    http::{StatusCode, header::SET_COOKIE},
    response::IntoResponse,
};
use secrecy::Secret;
use serde::Deserialize;

use palisade_application::LoginUseCase;
use palisade_core::{LockoutPolicy, PasswordHasher, UserStore};

use crate::http::error::ApiError;
use crate::session::jwt::{JwtSessionIssuer, SessionTokenConfig, create_session_cookie};

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: Option<Secret<String>>,
    pub password: Option<Secret<String>>,
}

/// POST /login - verify credentials and set the session cookie.
///
/// Both fields are optional at the wire level; the use case owns the
/// missing-field rejection so that the message is uniform.
#[tracing::instrument(name = "Login", skip_all)]
pub async fn login<U, H>(
    State((user_store, password_hasher, policy, session_config)): State<(
        U,
        H,
        LockoutPolicy,
        SessionTokenConfig,
    )>,
    Json(request): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError>
where
    U: UserStore + Clone + Send + Sync + 'static,
    H: PasswordHasher + Clone + Send + Sync + 'static,
{
    let use_case = LoginUseCase::new(
        user_store,
        password_hasher,
        JwtSessionIssuer::new(session_config.clone()),
        policy,
    );

    let token = use_case.execute(request.email, request.password).await?;

    let cookie = create_session_cookie(token.into_string(), &session_config.cookie_name);
    Ok((
        StatusCode::OK,
        [(SET_COOKIE, cookie.to_string())],
        Json(serde_json::json!({
            "status": "success",
            "message": "Login successful"
        })),
    ))
}
