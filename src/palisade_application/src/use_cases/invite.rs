use secrecy::{ExposeSecret, Secret};

use palisade_core::{Email, EmailClient, NewUser, Password, PasswordHasher, ResetTokenStore, UserStore};

const INVITE_SUBJECT: &str = "You have been invited";

/// Invite use case - best-effort account provisioning.
///
/// Creates the account with a random password the invitee never learns, then
/// mails them a reset code to set their own. Like the forgot-password flow,
/// the caller always sees success; duplicate accounts, store failures and
/// mail failures are only logged.
pub struct InviteUseCase<U, H, T, E>
where
    U: UserStore,
    H: PasswordHasher,
    T: ResetTokenStore,
    E: EmailClient,
{
    user_store: U,
    password_hasher: H,
    reset_tokens: T,
    email_client: E,
}

impl<U, H, T, E> InviteUseCase<U, H, T, E>
where
    U: UserStore,
    H: PasswordHasher,
    T: ResetTokenStore,
    E: EmailClient,
{
    pub fn new(user_store: U, password_hasher: H, reset_tokens: T, email_client: E) -> Self {
        Self {
            user_store,
            password_hasher,
            reset_tokens,
            email_client,
        }
    }

    #[tracing::instrument(name = "InviteUseCase::execute", skip_all)]
    pub async fn execute(&self, email: Option<Secret<String>>) {
        if let Err(reason) = self.try_execute(email).await {
            tracing::warn!(error = %reason, "Invitation not completed");
        }
    }

    async fn try_execute(&self, email: Option<Secret<String>>) -> Result<(), String> {
        let raw = email.ok_or("no email supplied")?;
        let email = Email::parse(raw).map_err(|e| e.to_string())?;

        let placeholder = Password::generate();
        let password_hash = self
            .password_hasher
            .hash(placeholder)
            .await
            .map_err(|e| e.to_string())?;

        let user = self
            .user_store
            .add_user(NewUser {
                email,
                password_hash,
            })
            .await
            .map_err(|e| e.to_string())?;

        let token = self
            .reset_tokens
            .create(&user.email)
            .await
            .map_err(|e| e.to_string())?;

        let text = format!(
            "An account has been created for you. Use this code to set your password: {}.",
            token.token()
        );
        let html = format!(
            "<p>An account has been created for you. Use this code to set your password: \
             <strong>{}</strong>.</p>",
            token.token()
        );

        self.email_client
            .send_email(&user.email, INVITE_SUBJECT, &text, &html)
            .await?;

        tracing::info!(
            account = %user.email.as_ref().expose_secret(),
            "Invitation sent"
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
        LockState, PasswordHashError, ResetToken, ResetTokenStoreError, StoredPasswordHash,
        UserId, UserRecord, UserSelector, UserStoreError, UserUpdate,
    };

    use super::*;

    #[derive(Clone, Default)]
    struct MockUserStore {
        users: Arc<RwLock<HashMap<String, UserRecord>>>,
    }

    #[async_trait::async_trait]
    impl UserStore for MockUserStore {
        async fn add_user(&self, user: NewUser) -> Result<UserRecord, UserStoreError> {
            let key = user.email.as_ref().expose_secret().clone();
            let mut users = self.users.write().await;
            if users.contains_key(&key) {
                return Err(UserStoreError::UserAlreadyExists);
            }
            let record = UserRecord {
                id: UserId::new(),
                email: user.email,
                password_hash: user.password_hash,
                lockout: LockState::default(),
            };
            users.insert(key, record.clone());
            Ok(record)
        }

        async fn find_by_email(
            &self,
            _email: &Email,
        ) -> Result<Option<UserRecord>, UserStoreError> {
            unimplemented!()
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
    struct MockHasher;

    #[async_trait::async_trait]
    impl PasswordHasher for MockHasher {
        async fn hash(&self, password: Password) -> Result<StoredPasswordHash, PasswordHashError> {
            Ok(StoredPasswordHash::new(Secret::from(format!(
                "mock${}",
                password.as_ref().expose_secret()
            ))))
        }

        async fn verify(
            &self,
            _expected: &StoredPasswordHash,
            _candidate: &Secret<String>,
        ) -> Result<(), PasswordHashError> {
            unimplemented!()
        }
    }

    #[derive(Clone, Default)]
    struct MockResetTokenStore;

    #[async_trait::async_trait]
    impl ResetTokenStore for MockResetTokenStore {
        async fn create(&self, email: &Email) -> Result<ResetToken, ResetTokenStoreError> {
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
        sent: Arc<RwLock<Vec<(String, String)>>>,
    }

    #[async_trait::async_trait]
    impl EmailClient for MockEmailClient {
        async fn send_email(
            &self,
            recipient: &Email,
            subject: &str,
            _text_body: &str,
            _html_body: &str,
        ) -> Result<(), String> {
            self.sent.write().await.push((
                recipient.as_ref().expose_secret().clone(),
                subject.to_string(),
            ));
            Ok(())
        }
    }

    #[tokio::test]
    async fn invitation_creates_the_account_and_mails_a_code() {
        let store = MockUserStore::default();
        let emails = MockEmailClient::default();
        let use_case = InviteUseCase::new(
            store.clone(),
            MockHasher,
            MockResetTokenStore,
            emails.clone(),
        );

        use_case
            .execute(Some(Secret::from("invitee@example.com".to_string())))
            .await;

        assert!(store.users.read().await.contains_key("invitee@example.com"));
        let sent = emails.sent.read().await;
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].0, "invitee@example.com");
    }

    #[tokio::test]
    async fn duplicate_invitation_completes_silently_without_a_second_email() {
        let store = MockUserStore::default();
        let emails = MockEmailClient::default();
        let use_case = InviteUseCase::new(
            store.clone(),
            MockHasher,
            MockResetTokenStore,
            emails.clone(),
        );

        use_case
            .execute(Some(Secret::from("invitee@example.com".to_string())))
            .await;
        use_case
            .execute(Some(Secret::from("invitee@example.com".to_string())))
            .await;

        assert_eq!(emails.sent.read().await.len(), 1);
    }

    #[tokio::test]
    async fn missing_email_completes_silently() {
        let emails = MockEmailClient::default();
        let use_case = InviteUseCase::new(
            MockUserStore::default(),
            MockHasher,
            MockResetTokenStore,
            emails.clone(),
        );

        use_case.execute(None).await;
        assert!(emails.sent.read().await.is_empty());
    }
}
