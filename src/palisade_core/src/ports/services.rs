use async_trait::async_trait;
use secrecy::Secret;
use thiserror::Error;

use crate::domain::{
    email::Email,
    password::{Password, StoredPasswordHash},
    session::SessionToken,
    user::UserRecord,
};

// PasswordHasher port trait and errors
#[derive(Debug, Error)]
pub enum PasswordHashError {
    #[error("Password mismatch")]
    Mismatch,
    #[error("Failed to process password hash: {0}")]
    HashError(String),
}

/// One-way hashing and constant-time verification of credentials.
#[async_trait]
pub trait PasswordHasher: Send + Sync {
    async fn hash(&self, password: Password) -> Result<StoredPasswordHash, PasswordHashError>;
    /// `candidate` is the raw secret presented at login; it is compared in
    /// constant time against the stored hash and never re-validated against
    /// the strength rules.
    async fn verify(
        &self,
        expected: &StoredPasswordHash,
        candidate: &Secret<String>,
    ) -> Result<(), PasswordHashError>;
}

// SessionIssuer port trait and errors
#[derive(Debug, Error)]
pub enum SessionIssueError {
    #[error("Failed to issue session token: {0}")]
    TokenError(String),
}

/// Issues an opaque session token for an authenticated account.
pub trait SessionIssuer: Send + Sync {
    fn issue(&self, user: &UserRecord) -> Result<SessionToken, SessionIssueError>;
}

/// Outbound mail. Delivery failures are reported as plain strings; the flows
/// that send mail log them and never surface them to the caller.
#[async_trait]
pub trait EmailClient: Send + Sync {
    async fn send_email(
        &self,
        recipient: &Email,
        subject: &str,
        text_body: &str,
        html_body: &str,
    ) -> Result<(), String>;
}
