use chrono::Utc;
use secrecy::{ExposeSecret, Secret};

use palisade_core::{Email, EmailClient, ResetTokenStore, UserStore};

const RESET_SUBJECT: &str = "Reset your password";

/// Forgot-password use case - best-effort reset-token delivery.
///
/// The operation never fails from the caller's point of view: whether the
/// email matches an account, the mail bounces, or the token store is down,
/// the outcome is identical and the cause is only logged. That keeps the
/// entry point useless for probing which addresses have accounts.
pub struct ForgotPasswordUseCase<U, T, E>
where
    U: UserStore,
    T: ResetTokenStore,
    E: EmailClient,
{
    user_store: U,
    reset_tokens: T,
    email_client: E,
}

impl<U, T, E> ForgotPasswordUseCase<U, T, E>
where
    U: UserStore,
    T: ResetTokenStore,
    E: EmailClient,
{
    pub fn new(user_store: U, reset_tokens: T, email_client: E) -> Self {
        Self {
            user_store,
            reset_tokens,
            email_client,
        }
    }

    #[tracing::instrument(name = "ForgotPasswordUseCase::execute", skip_all)]
    pub async fn execute(&self, email: Option<Secret<String>>) {
        if let Err(reason) = self.try_execute(email).await {
            tracing::warn!(error = %reason, "Password reset request not completed");
        }
    }

    async fn try_execute(&self, email: Option<Secret<String>>) -> Result<(), String> {
        let raw = email.ok_or("no email supplied")?;
        let email = Email::parse(raw).map_err(|e| e.to_string())?;

        let user = self
            .user_store
            .find_by_email(&email)
            .await
            .map_err(|e| e.to_string())?
            .ok_or("no account for the supplied email")?;

        let token = self
            .reset_tokens
            .create(&user.email)
            .await
            .map_err(|e| e.to_string())?;

        let minutes = (token.expires_at() - Utc::now()).num_minutes().max(1);
        let text = format!(
            "Your password reset code is {}. It expires in about {minutes} minutes.",
            token.token()
        );
        let html = format!(
            "<p>Your password reset code is <strong>{}</strong>. \
             It expires in about {minutes} minutes.</p>",
            token.token()
        );

        self.email_client
            .send_email(&user.email, RESET_SUBJECT, &text, &html)
            .await?;

        tracing::info!(
            account = %user.email.as_ref().expose_secret(),
            "Password reset code sent"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Arc;

    use chrono::Duration;
    use tokio::sync::RwLock;

    use palisade_core::{
        LockState, NewUser, ResetToken, ResetTokenStoreError, StoredPasswordHash, UserId,
        UserRecord, UserSelector, UserStoreError, UserUpdate,
    };

    use super::*;

    #[derive(Clone, Default)]
    struct MockUserStore {
        users: Arc<RwLock<HashMap<String, UserRecord>>>,
    }

    impl MockUserStore {
        async fn insert(&self, email: &str) {
            let email = Email::parse(Secret::from(email.to_string())).unwrap();
            let user = UserRecord {
                id: UserId::new(),
                email: email.clone(),
                password_hash: StoredPasswordHash::new(Secret::from("hash".to_string())),
                lockout: LockState::default(),
            };
            self.users
                .write()
                .await
                .insert(email.as_ref().expose_secret().clone(), user);
        }
    }

    #[async_trait::async_trait]
    impl UserStore for MockUserStore {
        async fn add_user(&self, _user: NewUser) -> Result<UserRecord, UserStoreError> {
            unimplemented!()
        }

        async fn find_by_email(
            &self,
            email: &Email,
        ) -> Result<Option<UserRecord>, UserStoreError> {
            Ok(self
                .users
                .read()
                .await
                .get(email.as_ref().expose_secret())
                .cloned())
        }

        async fn update(
            &self,
            _selector: UserSelector,
            _update: UserUpdate,
        ) -> Result<UserRecord, UserStoreError> {
            unimplemented!()
        }

        async fn set_password_hash(
            &self,
            _selector: UserSelector,
            _hash: StoredPasswordHash,
        ) -> Result<(), UserStoreError> {
            unimplemented!()
        }
    }

    #[derive(Clone, Default)]
    struct MockResetTokenStore {
        created_for: Arc<RwLock<Vec<String>>>,
    }

    #[async_trait::async_trait]
    impl ResetTokenStore for MockResetTokenStore {
        async fn create(&self, email: &Email) -> Result<ResetToken, ResetTokenStoreError> {
            self.created_for
                .write()
                .await
                .push(email.as_ref().expose_secret().clone());
            Ok(ResetToken::mint(email.clone(), Duration::minutes(15)))
        }

        async fn validate(
            &self,
            _email: &Email,
            _token: &str,
        ) -> Result<(), ResetTokenStoreError> {
            unimplemented!()
        }

        async fn delete(&self, _token: &str) -> Result<(), ResetTokenStoreError> {
            unimplemented!()
        }
    }

    #[derive(Clone, Default)]
    struct MockEmailClient {
        sent: Arc<RwLock<Vec<(String, String, String)>>>,
    }

    #[async_trait::async_trait]
    impl EmailClient for MockEmailClient {
        async fn send_email(
            &self,
            recipient: &Email,
            subject: &str,
            text_body: &str,
            _html_body: &str,
        ) -> Result<(), String> {
            self.sent.write().await.push((
                recipient.as_ref().expose_secret().clone(),
                subject.to_string(),
                text_body.to_string(),
            ));
            Ok(())
        }
    }

    #[tokio::test]
    async fn known_account_receives_a_reset_code() {
        let store = MockUserStore::default();
        store.insert("user@example.com").await;
        let tokens = MockResetTokenStore::default();
        let emails = MockEmailClient::default();
        let use_case = ForgotPasswordUseCase::new(store, tokens.clone(), emails.clone());

        use_case
            .execute(Some(Secret::from("user@example.com".to_string())))
            .await;

        assert_eq!(
            tokens.created_for.read().await.as_slice(),
            ["user@example.com"]
        );
        let sent = emails.sent.read().await;
        assert_eq!(sent.len(), 1);
        assert!(sent[0].2.contains("password reset code"));
    }

    #[tokio::test]
    async fn unknown_account_completes_silently() {
        let use_case = ForgotPasswordUseCase::new(
            MockUserStore::default(),
            MockResetTokenStore::default(),
            MockEmailClient::default(),
        );

        // No panic, no error: the outcome is indistinguishable from success.
        use_case
            .execute(Some(Secret::from("ghost@example.com".to_string())))
            .await;
    }

    #[tokio::test]
    async fn missing_and_malformed_emails_complete_silently() {
        let emails = MockEmailClient::default();
        let use_case = ForgotPasswordUseCase::new(
            MockUserStore::default(),
            MockResetTokenStore::default(),
            emails.clone(),
        );

        use_case.execute(None).await;
        use_case
            .execute(Some(Secret::from("not-an-email".to_string())))
            .await;

        assert!(emails.sent.read().await.is_empty());
    }
}
