use chrono::{DateTime, Duration, Utc};
use rand::{Rng, distr::Alphanumeric};

use crate::domain::email::Email;

const RESET_TOKEN_LENGTH: usize = 48;

/// A single-use, time-limited credential authorizing one password change for
/// the account it was minted for.
#[derive(Debug, Clone)]
pub struct ResetToken {
    token: String,
    email: Email,
    expires_at: DateTime<Utc>,
}

impl ResetToken {
    /// Mint a fresh token for `email` that expires `ttl` from now.
    pub fn mint(email: Email, ttl: Duration) -> Self {
        let token: String = rand::rng()
            .sample_iter(Alphanumeric)
            .take(RESET_TOKEN_LENGTH)
            .map(char::from)
            .collect();

        Self {
            token,
            email,
            expires_at: Utc::now() + ttl,
        }
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn email(&self) -> &Email {
        &self.email
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

#[cfg(test)]
mod tests {
    use secrecy::Secret;

    use super::*;

    fn email() -> Email {
        Email::parse(Secret::from("user@example.com".to_string())).unwrap()
    }

    #[test]
    fn minted_tokens_are_unguessable_length_and_distinct() {
        let a = ResetToken::mint(email(), Duration::minutes(15));
        let b = ResetToken::mint(email(), Duration::minutes(15));
        assert_eq!(a.token().len(), RESET_TOKEN_LENGTH);
        assert_ne!(a.token(), b.token());
    }

    #[test]
    fn token_expires_after_ttl() {
        let token = ResetToken::mint(email(), Duration::minutes(15));
        assert!(!token.is_expired(Utc::now()));
        assert!(token.is_expired(Utc::now() + Duration::minutes(16)));
    }

    #[test]
    fn zero_ttl_token_is_immediately_expired() {
        let token = ResetToken::mint(email(), Duration::zero());
        assert!(token.is_expired(Utc::now()));
    }
}
