pub mod config;
pub mod crypto;
pub mod email;
pub mod http;
pub mod persistence;
pub mod session;

// Re-export commonly used adapters for convenience
pub use config::{AllowedOrigins, Settings};
pub use crypto::argon2_hasher::Argon2PasswordHasher;
pub use email::{mock_email_client::MockEmailClient, postmark_email_client::PostmarkEmailClient};
pub use persistence::{
    hashmap_user_store::HashMapUserStore,
    in_memory_reset_token_store::InMemoryResetTokenStore,
    in_memory_revoked_session_store::InMemoryRevokedSessionStore,
    postgres_user_store::PostgresUserStore,
    redis_revoked_session_store::RedisRevokedSessionStore,
};
pub use session::jwt::{JwtSessionIssuer, SessionTokenConfig};
