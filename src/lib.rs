//! # Palisade - Local Authentication Service Library
//!
//! This is a facade crate that re-exports all public APIs from the palisade
//! service components. Use this crate to get access to the whole local
//! (email/password) authentication stack in one place.
//!
//! ## Structure
//!
//! - **Core domain types**: `Email`, `Password`, `UserRecord`, `ResetToken`, etc.
//! - **Lockout state machine**: `LockoutPolicy`, `LockState`
//! - **Repository traits**: `UserStore`, `ResetTokenStore`, `RevokedSessionStore`
//! - **Use cases**: `LoginUseCase`, `ChangePasswordUseCase`, etc.
//! - **Adapters**: `Argon2PasswordHasher`, `PostgresUserStore`, `PostmarkEmailClient`, etc.
//! - **Service**: `AuthService` - The main entry point for the auth service

// ============================================================================
// Core Domain Types
// ============================================================================

/// Core domain types and value objects
pub mod core {
    pub use palisade_core::*;
}

// Re-export most commonly used core types at the root level
pub use palisade_core::{
    AuthFlowError, AuthType, AuthenticatedSession, Email, LockState, LockoutPolicy, NewUser,
    Password, ResetToken, SessionToken, StoredPasswordHash, UserId, UserRecord, UserSelector,
    UserUpdate,
};

// ============================================================================
// Repository and Service Traits (Ports)
// ============================================================================

/// Port trait definitions
pub mod ports {
    pub use palisade_core::ports::repositories::{
        ResetTokenStore, ResetTokenStoreError, RevokedSessionStore, RevokedSessionStoreError,
        UserStore, UserStoreError,
    };
    pub use palisade_core::ports::services::{
        EmailClient, PasswordHashError, PasswordHasher, SessionIssueError, SessionIssuer,
    };
}

// Re-export port traits at root level
pub use palisade_core::{
    EmailClient, PasswordHasher, ResetTokenStore, ResetTokenStoreError, RevokedSessionStore,
    RevokedSessionStoreError, SessionIssuer, UserStore, UserStoreError,
};

// ============================================================================
// Use Cases (Application Layer)
// ============================================================================

/// Application use cases
pub mod use_cases {
    pub use palisade_application::*;
}

// Re-export use cases at root level
pub use palisade_application::{
    ChangePasswordUseCase, ForgotPasswordUseCase, InviteUseCase, LoginUseCase, RegisterUseCase,
};

// ============================================================================
// Adapters (Infrastructure)
// ============================================================================

/// Infrastructure adapters
pub mod adapters {
    /// HTTP route handlers and error mapping
    pub mod http {
        pub use palisade_adapters::http::*;
    }

    /// Persistence implementations
    pub mod persistence {
        pub use palisade_adapters::persistence::*;
    }

    /// Email client implementations
    pub mod email {
        pub use palisade_adapters::email::*;
    }

    /// Session token issuing, validation and the request bridge
    pub mod session {
        pub use palisade_adapters::session::*;
    }

    /// Password hashing
    pub mod crypto {
        pub use palisade_adapters::crypto::*;
    }

    /// Configuration
    pub mod config {
        pub use palisade_adapters::config::*;
    }
}

// Re-export commonly used adapters at root level
pub use palisade_adapters::{
    Argon2PasswordHasher, HashMapUserStore, InMemoryResetTokenStore, InMemoryRevokedSessionStore,
    JwtSessionIssuer, MockEmailClient, PostgresUserStore, PostmarkEmailClient,
    RedisRevokedSessionStore, SessionTokenConfig, Settings,
};

// ============================================================================
// Auth Service (Main Entry Point)
// ============================================================================

/// Main auth service
pub use palisade_auth_service::{
    AuthService, configure_postgresql, configure_redis, get_redis_client, init_tracing,
};

// ============================================================================
// Re-export common external dependencies
// ============================================================================

/// Re-export async-trait for implementing port traits
pub use async_trait::async_trait;

/// Re-export secrecy for working with secrets
pub use secrecy::{ExposeSecret, Secret};

/// Re-export the web framework and runtime the service surface is built on
pub use axum;
pub use tokio;
