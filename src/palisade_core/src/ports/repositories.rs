use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::domain::{
    email::Email,
    password::StoredPasswordHash,
    reset_token::ResetToken,
    user::{NewUser, UserId, UserRecord, UserSelector, UserUpdate},
};

// UserStore port trait and errors
#[derive(Debug, Error)]
pub enum UserStoreError {
    #[error("User already exists")]
    UserAlreadyExists,
    #[error("User not found")]
    UserNotFound,
    #[error("Unexpected error {0}")]
    UnexpectedError(String),
}

impl PartialEq for UserStoreError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::UserAlreadyExists, Self::UserAlreadyExists) => true,
            (Self::UserNotFound, Self::UserNotFound) => true,
            (Self::UnexpectedError(_), Self::UnexpectedError(_)) => true,
            _ => false,
        }
    }
}

/// The external account store.
///
/// Implementations must serialize updates per record (atomic row update,
/// optimistic versioning, a per-record write lock): two concurrent failed
/// logins against one account must not lose an increment.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn add_user(&self, user: NewUser) -> Result<UserRecord, UserStoreError>;
    async fn find_by_email(&self, email: &Email) -> Result<Option<UserRecord>, UserStoreError>;
    /// Generic field update. `UserUpdate` carries no password field by
    /// construction; see `set_password_hash`.
    async fn update(
        &self,
        selector: UserSelector,
        update: UserUpdate,
    ) -> Result<UserRecord, UserStoreError>;
    /// The only write path for password hashes.
    async fn set_password_hash(
        &self,
        selector: UserSelector,
        hash: StoredPasswordHash,
    ) -> Result<(), UserStoreError>;
}

// ResetTokenStore port trait and errors
#[derive(Debug, Error)]
pub enum ResetTokenStoreError {
    /// Unknown token, expired token, or token bound to a different email.
    /// A single variant on purpose; callers learn nothing about which.
    #[error("Invalid reset token")]
    InvalidToken,
    #[error("Unexpected error {0}")]
    UnexpectedError(String),
}

impl PartialEq for ResetTokenStoreError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::InvalidToken, Self::InvalidToken) => true,
            (Self::UnexpectedError(_), Self::UnexpectedError(_)) => true,
            _ => false,
        }
    }
}

#[async_trait]
pub trait ResetTokenStore: Send + Sync {
    /// Mint and store a token for `email` with the store's configured expiry
    /// window.
    async fn create(&self, email: &Email) -> Result<ResetToken, ResetTokenStoreError>;
    /// Fails for an unknown token, an expired token, or a token bound to a
    /// different email.
    async fn validate(&self, email: &Email, token: &str) -> Result<(), ResetTokenStoreError>;
    /// Idempotent; deleting an absent token is not an error.
    async fn delete(&self, token: &str) -> Result<(), ResetTokenStoreError>;
}

// RevokedSessionStore port trait and errors
#[derive(Debug, Error)]
pub enum RevokedSessionStoreError {
    #[error("Database error: {0}")]
    DatabaseError(String),
}

/// Bulk session revocation, keyed by account.
///
/// Disavowing records a watermark; any session token issued at or before the
/// watermark is dead. Tokens issued afterwards are unaffected.
#[async_trait]
pub trait RevokedSessionStore: Send + Sync {
    async fn disavow(
        &self,
        user_id: UserId,
        at: DateTime<Utc>,
    ) -> Result<(), RevokedSessionStoreError>;
    async fn is_disavowed(
        &self,
        user_id: UserId,
        issued_at: DateTime<Utc>,
    ) -> Result<bool, RevokedSessionStoreError>;
}
