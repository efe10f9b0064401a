use chrono::Utc;
use secrecy::{ExposeSecret, Secret};

use palisade_core::{
    AuthFlowError, Email, Gate, LockoutPolicy, PasswordHasher, SessionIssuer, SessionToken,
    UserRecord, UserSelector, UserStore, UserUpdate,
    lockout::GENERIC_CREDENTIALS_MESSAGE,
};

pub const MISSING_CREDENTIALS_MESSAGE: &str = "Please provide your login details.";

/// Login use case - verifies credentials behind the lockout gate and issues
/// a session token.
///
/// Every rejection is an `AuthenticationFailure` whose message never reveals
/// whether the account exists: an unknown email, a malformed email and a
/// wrong password all read identically.
pub struct LoginUseCase<U, H, S>
where
    U: UserStore,
    H: PasswordHasher,
    S: SessionIssuer,
{
    user_store: U,
    password_hasher: H,
    session_issuer: S,
    policy: LockoutPolicy,
}

impl<U, H, S> LoginUseCase<U, H, S>
where
    U: UserStore,
    H: PasswordHasher,
    S: SessionIssuer,
{
    pub fn new(user_store: U, password_hasher: H, session_issuer: S, policy: LockoutPolicy) -> Self {
        Self {
            user_store,
            password_hasher,
            session_issuer,
            policy,
        }
    }

    /// Execute the login use case
    ///
    /// # Arguments
    /// * `email` - Raw email field, if the request carried one
    /// * `password` - Raw password field, if the request carried one
    ///
    /// # Returns
    /// A session token bound to the account with auth type `local`, or an
    /// `AuthenticationFailure` with a displayable reason.
    #[tracing::instrument(name = "LoginUseCase::execute", skip_all)]
    pub async fn execute(
        &self,
        email: Option<Secret<String>>,
        password: Option<Secret<String>>,
    ) -> Result<SessionToken, AuthFlowError> {
        let (Some(email), Some(password)) = (email, password) else {
            return Err(AuthFlowError::authentication(MISSING_CREDENTIALS_MESSAGE));
        };

        // A malformed email reads the same as a wrong password.
        let Ok(email) = Email::parse(email) else {
            return Err(AuthFlowError::authentication(GENERIC_CREDENTIALS_MESSAGE));
        };

        let record = self
            .user_store
            .find_by_email(&email)
            .await
            .map_err(|e| AuthFlowError::operation(e.to_string()))?;
        let Some(mut user) = record else {
            return Err(AuthFlowError::authentication(GENERIC_CREDENTIALS_MESSAGE));
        };

        let now = Utc::now();
        match self.policy.check(&mut user.lockout, now) {
            Gate::Rejected(rejection) => {
                return Err(AuthFlowError::authentication(rejection.message()));
            }
            Gate::Proceed {
                cleared_temporary_lock: true,
            } => {
                user = self.persist_lockout(&user).await?;
            }
            Gate::Proceed {
                cleared_temporary_lock: false,
            } => {}
        }

        match self
            .password_hasher
            .verify(&user.password_hash, &password)
            .await
        {
            Ok(()) => {
                self.policy.record_success(&mut user.lockout);
                self.persist_lockout(&user).await?;
                self.session_issuer
                    .issue(&user)
                    .map_err(|e| AuthFlowError::operation(e.to_string()))
            }
            Err(_) => {
                // The updated failure state must hit the store before the
                // error is raised.
                let message = self.policy.record_failure(&mut user.lockout, now);
                self.persist_lockout(&user).await?;
                tracing::warn!(
                    account = %user.email.as_ref().expose_secret(),
                    "Failed login attempt"
                );
                Err(AuthFlowError::authentication(message))
            }
        }
    }

    async fn persist_lockout(&self, user: &UserRecord) -> Result<UserRecord, AuthFlowError> {
        self.user_store
            .update(
                UserSelector::ById(user.id),
                UserUpdate::lockout(user.lockout.clone()),
            )
            .await
            .map_err(|e| AuthFlowError::operation(e.to_string()))
    }
}
