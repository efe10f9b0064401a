use axum::{
    Router,
    http::{HeaderValue, Method, request},
    middleware,
    routing::post,
};
use tokio::net::TcpListener;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use palisade_adapters::{
    config::AllowedOrigins,
    http::routes::{
        change_password, forgot_password, invite, login, register, reset_password,
    },
    session::bridge::session_token_bridge,
    session::jwt::SessionTokenConfig,
};
use palisade_core::{
    EmailClient, LockoutPolicy, PasswordHasher, ResetTokenStore, RevokedSessionStore, UserStore,
};

use crate::tracing::{make_span_with_request_id, on_request, on_response};

/// Main authentication service that provides all auth-related routes
pub struct AuthService {
    router: Router,
}

impl AuthService {
    /// Create a new AuthService with the provided stores and clients
    ///
    /// # Arguments
    /// * `user_store` - Store for account credential records (must be Clone)
    /// * `password_hasher` - One-way credential hasher (must be Clone)
    /// * `reset_tokens` - Store for password-reset tokens (must be Clone)
    /// * `revoked_sessions` - Per-account session disavowal store (must be Clone)
    /// * `email_client` - Client for sending emails (must be Clone)
    /// * `policy` - Lockout thresholds and temporary-lock duration
    /// * `session_config` - Session token signing and cookie settings
    ///
    /// # Note on Architecture
    /// Stores implement Clone via internal Arc for thread-safe sharing.
    /// Each route is given its specific state requirements, avoiding
    /// unnecessary cloning.
    pub fn new<U, H, T, R, E>(
        user_store: U,
        password_hasher: H,
        reset_tokens: T,
        revoked_sessions: R,
        email_client: E,
        policy: LockoutPolicy,
        session_config: SessionTokenConfig,
    ) -> Self
    where
        U: UserStore + Clone + 'static,
        H: PasswordHasher + Clone + 'static,
        T: ResetTokenStore + Clone + 'static,
        R: RevokedSessionStore + Clone + 'static,
        E: EmailClient + Clone + 'static,
    {
        let router = Router::new()
            // Login needs the user store, the hasher and the session issuer
            .route("/login", post(login::<U, H>))
            .with_state((
                user_store.clone(),
                password_hasher.clone(),
                policy.clone(),
                session_config.clone(),
            ))
            // Register needs a validated session on top of the stores
            .route("/register", post(register::<U, H, R>))
            .with_state((
                user_store.clone(),
                password_hasher.clone(),
                revoked_sessions.clone(),
                session_config.clone(),
            ))
            // Invite provisions an account and mails a reset code
            .route("/invite", post(invite::<U, H, T, R, E>))
            .with_state((
                user_store.clone(),
                password_hasher.clone(),
                reset_tokens.clone(),
                revoked_sessions.clone(),
                email_client.clone(),
                session_config.clone(),
            ))
            // Forgot password is unauthenticated and best-effort
            .route("/forgot-password", post(forgot_password::<U, T, E>))
            .with_state((
                user_store.clone(),
                reset_tokens.clone(),
                email_client.clone(),
            ))
            // Change password runs against the session's own account
            .route("/change-password", post(change_password::<U, H, T, R, E>))
            .with_state((
                user_store.clone(),
                password_hasher.clone(),
                reset_tokens.clone(),
                revoked_sessions.clone(),
                email_client.clone(),
                session_config.clone(),
            ))
            // Reset password is authorized by the reset token in the body
            .route("/reset-password", post(reset_password::<U, H, T, R, E>))
            .with_state((
                user_store,
                password_hasher,
                reset_tokens,
                revoked_sessions,
                email_client,
            ))
            // Promote stored session cookies into bearer credentials before
            // anything downstream looks at the request
            .layer(middleware::from_fn_with_state(
                session_config,
                session_token_bridge,
            ));

        Self { router }
    }

    fn with_trace_layer(mut self) -> Self {
        self.router = self.router.layer(
            TraceLayer::new_for_http()
                .make_span_with(make_span_with_request_id)
                .on_request(on_request)
                .on_response(on_response),
        );
        self
    }

    /// Convert the AuthService into a nested router that can be mounted on
    /// another router
    ///
    /// # Arguments
    /// * `allowed_origins` - Optional list of allowed CORS origins
    pub fn as_nested_router(mut self, allowed_origins: Option<AllowedOrigins>) -> Router {
        if let Some(allowed_origins) = allowed_origins {
            let cors = CorsLayer::new()
                .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
                .allow_credentials(true)
                .allow_origin(AllowOrigin::predicate(
                    move |origin: &HeaderValue, _request_parts: &request::Parts| {
                        allowed_origins.contains(origin)
                    },
                ));

            self.router = self.router.layer(cors);
        }
        self.with_trace_layer().router
    }

    /// Run the auth service as a standalone server
    ///
    /// # Arguments
    /// * `listener` - TCP listener to bind the server to
    /// * `allowed_origins` - Optional list of allowed CORS origins
    pub async fn run_standalone(
        self,
        listener: TcpListener,
        allowed_origins: Option<AllowedOrigins>,
    ) -> Result<(), std::io::Error> {
        let router = self.as_nested_router(allowed_origins);

        tracing::info!("Auth service listening on {}", listener.local_addr()?);

        axum::serve(listener, router.into_make_service()).await
    }
}
