use chrono::Utc;
use secrecy::{ExposeSecret, Secret};

use palisade_core::{
    AuthFlowError, AuthType, AuthenticatedSession, Email, EmailClient, Password, PasswordHasher,
    ResetTokenStore, RevokedSessionStore, UserRecord, UserSelector, UserStore,
};

pub const CHANGE_PASSWORD_FAILED_MESSAGE: &str = "Unable to change password.";

const NOTICE_SUBJECT: &str = "Your password was changed";

/// Password change workflow.
///
/// Two entry modes: an authenticated change against the session's own
/// account, and an unauthenticated reset authorized by a single-use token.
/// Either mode hashes and persists the new password, then disavows every
/// session issued for the account up to that moment. The owner is notified
/// by email on a best-effort basis.
pub struct ChangePasswordUseCase<U, H, T, R, E>
where
    U: UserStore,
    H: PasswordHasher,
    T: ResetTokenStore,
    R: RevokedSessionStore,
    E: EmailClient,
{
    user_store: U,
    password_hasher: H,
    reset_tokens: T,
    revoked_sessions: R,
    email_client: E,
}

impl<U, H, T, R, E> ChangePasswordUseCase<U, H, T, R, E>
where
    U: UserStore,
    H: PasswordHasher,
    T: ResetTokenStore,
    R: RevokedSessionStore,
    E: EmailClient,
{
    pub fn new(
        user_store: U,
        password_hasher: H,
        reset_tokens: T,
        revoked_sessions: R,
        email_client: E,
    ) -> Self {
        Self {
            user_store,
            password_hasher,
            reset_tokens,
            revoked_sessions,
            email_client,
        }
    }

    /// Change the password of the session's own account. The session must
    /// have been authenticated locally; any other auth type is rejected
    /// before the record is touched.
    #[tracing::instrument(name = "ChangePasswordUseCase::change_authenticated", skip_all)]
    pub async fn change_authenticated(
        &self,
        session: &AuthenticatedSession,
        new_password: Secret<String>,
    ) -> Result<(), AuthFlowError> {
        if session.auth_type != AuthType::Local {
            return Err(AuthFlowError::authentication(
                CHANGE_PASSWORD_FAILED_MESSAGE,
            ));
        }

        let user = self.find_account(&session.email).await?;
        self.apply(user, new_password).await
    }

    /// Change a password with a reset token instead of a session.
    ///
    /// The token is deleted unconditionally as soon as it validates, before
    /// the update is applied; a spent or expired token fails even when the
    /// new password is acceptable.
    #[tracing::instrument(name = "ChangePasswordUseCase::reset_with_token", skip_all)]
    pub async fn reset_with_token(
        &self,
        email: Option<Secret<String>>,
        token: Option<String>,
        new_password: Secret<String>,
    ) -> Result<(), AuthFlowError> {
        let (Some(email), Some(token)) = (email, token) else {
            return Err(AuthFlowError::authentication(
                CHANGE_PASSWORD_FAILED_MESSAGE,
            ));
        };
        let Ok(email) = Email::parse(email) else {
            return Err(AuthFlowError::authentication(
                CHANGE_PASSWORD_FAILED_MESSAGE,
            ));
        };

        self.reset_tokens
            .validate(&email, &token)
            .await
            .map_err(|_| AuthFlowError::authentication(CHANGE_PASSWORD_FAILED_MESSAGE))?;
        self.reset_tokens
            .delete(&token)
            .await
            .map_err(|e| AuthFlowError::operation(e.to_string()))?;

        let user = self.find_account(&email).await?;
        self.apply(user, new_password).await
    }

    async fn find_account(&self, email: &Email) -> Result<UserRecord, AuthFlowError> {
        self.user_store
            .find_by_email(email)
            .await
            .map_err(|e| AuthFlowError::operation(e.to_string()))?
            .ok_or_else(|| AuthFlowError::authentication(CHANGE_PASSWORD_FAILED_MESSAGE))
    }

    async fn apply(
        &self,
        user: UserRecord,
        new_password: Secret<String>,
    ) -> Result<(), AuthFlowError> {
        let new_password = Password::parse(new_password)
            .map_err(|e| AuthFlowError::validation(e.to_string()))?;
        let hash = self
            .password_hasher
            .hash(new_password)
            .await
            .map_err(|e| AuthFlowError::operation(e.to_string()))?;

        self.user_store
            .set_password_hash(UserSelector::ById(user.id), hash)
            .await
            .map_err(|e| AuthFlowError::operation(e.to_string()))?;

        self.revoked_sessions
            .disavow(user.id, Utc::now())
            .await
            .map_err(|e| AuthFlowError::operation(e.to_string()))?;

        let text = "Your password was just changed. If this was not you, \
                    contact your administrator immediately."
            .to_string();
        let html = format!("<p>{text}</p>");
        if let Err(reason) = self
            .email_client
            .send_email(&user.email, NOTICE_SUBJECT, &text, &html)
            .await
        {
            tracing::warn!(
                account = %user.email.as_ref().expose_secret(),
                error = %reason,
                "Failed to send password-change notice"
            );
        }

        Ok(())
    }
}
