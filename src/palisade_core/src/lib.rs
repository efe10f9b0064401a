pub mod domain;
pub mod error;
pub mod lockout;
pub mod ports;

// Re-export commonly used types for convenience
pub use domain::{
    email::{Email, EmailError},
    password::{Password, PasswordError, StoredPasswordHash},
    reset_token::ResetToken,
    session::{AuthType, AuthenticatedSession, SessionToken},
    user::{NewUser, UserId, UserRecord, UserSelector, UserUpdate},
};

pub use ports::{
    repositories::{
        ResetTokenStore, ResetTokenStoreError, RevokedSessionStore, RevokedSessionStoreError,
        UserStore, UserStoreError,
    },
    services::{
        EmailClient, PasswordHashError, PasswordHasher, SessionIssueError, SessionIssuer,
    },
};

pub use error::AuthFlowError;
pub use lockout::{Gate, LockRejection, LockState, LockoutPolicy};
