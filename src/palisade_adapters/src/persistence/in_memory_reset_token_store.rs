use std::sync::Arc;

use chrono::{Duration, Utc};
use dashmap::DashMap;

use palisade_core::{Email, ResetToken, ResetTokenStore, ResetTokenStoreError};

/// In-memory reset-token store keyed by the token string.
///
/// Tokens expire a fixed window after creation. An expired token is removed
/// the first time it is looked up and from then on behaves exactly like a
/// consumed one.
#[derive(Clone)]
pub struct InMemoryResetTokenStore {
    tokens: Arc<DashMap<String, ResetToken>>,
    ttl: Duration,
}

impl InMemoryResetTokenStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            tokens: Arc::new(DashMap::new()),
            ttl,
        }
    }
}

#[async_trait::async_trait]
impl ResetTokenStore for InMemoryResetTokenStore {
    async fn create(&self, email: &Email) -> Result<ResetToken, ResetTokenStoreError> {
        let token = ResetToken::mint(email.clone(), self.ttl);
        self.tokens.insert(token.token().to_string(), token.clone());
        Ok(token)
    }

    async fn validate(&self, email: &Email, token: &str) -> Result<(), ResetTokenStoreError> {
        // The guard must be dropped before any removal; DashMap deadlocks on
        // same-shard reentry.
        let (email_matches, expired) = match self.tokens.get(token) {
            None => return Err(ResetTokenStoreError::InvalidToken),
            Some(entry) => (entry.email() == email, entry.is_expired(Utc::now())),
        };

        if expired {
            self.tokens.remove(token);
            return Err(ResetTokenStoreError::InvalidToken);
        }
        if !email_matches {
            return Err(ResetTokenStoreError::InvalidToken);
        }
        Ok(())
    }

    async fn delete(&self, token: &str) -> Result<(), ResetTokenStoreError> {
        self.tokens.remove(token);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use secrecy::Secret;

    use super::*;

    fn email(raw: &str) -> Email {
        Email::parse(Secret::from(raw.to_string())).unwrap()
    }

    fn store() -> InMemoryResetTokenStore {
        InMemoryResetTokenStore::new(Duration::minutes(15))
    }

    #[tokio::test]
    async fn created_token_validates_for_its_email() {
        let store = store();
        let token = store.create(&email("user@example.com")).await.unwrap();

        store
            .validate(&email("user@example.com"), token.token())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn unknown_token_is_invalid() {
        let store = store();
        let result = store.validate(&email("user@example.com"), "no-such-token").await;
        assert_eq!(result.unwrap_err(), ResetTokenStoreError::InvalidToken);
    }

    #[tokio::test]
    async fn token_bound_to_another_email_is_invalid() {
        let store = store();
        let token = store.create(&email("user@example.com")).await.unwrap();

        let result = store.validate(&email("other@example.com"), token.token()).await;
        assert_eq!(result.unwrap_err(), ResetTokenStoreError::InvalidToken);
    }

    #[tokio::test]
    async fn expired_token_is_treated_as_consumed() {
        let store = InMemoryResetTokenStore::new(Duration::zero());
        let token = store.create(&email("user@example.com")).await.unwrap();

        let result = store.validate(&email("user@example.com"), token.token()).await;
        assert_eq!(result.unwrap_err(), ResetTokenStoreError::InvalidToken);
        assert!(store.tokens.is_empty());
    }

    #[tokio::test]
    async fn validate_after_delete_fails_and_delete_is_idempotent() {
        let store = store();
        let token = store.create(&email("user@example.com")).await.unwrap();

        store.delete(token.token()).await.unwrap();
        let result = store.validate(&email("user@example.com"), token.token()).await;
        assert_eq!(result.unwrap_err(), ResetTokenStoreError::InvalidToken);

        // Deleting twice is not an error.
        store.delete(token.token()).await.unwrap();
    }
}
