use argon2::{
    Algorithm, Argon2, Params, PasswordHash, PasswordVerifier, Version,
    password_hash::{PasswordHasher as _, SaltString, rand_core},
};
use async_trait::async_trait;
use secrecy::{ExposeSecret, Secret};

use palisade_core::{Password, PasswordHashError, PasswordHasher, StoredPasswordHash};

/// Argon2id hasher behind the `PasswordHasher` port.
///
/// Hashing and verification run on the blocking pool; verification is the
/// library's constant-time comparison.
#[derive(Debug, Clone, Copy, Default)]
pub struct Argon2PasswordHasher;

impl Argon2PasswordHasher {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl PasswordHasher for Argon2PasswordHasher {
    #[tracing::instrument(name = "Computing password hash", skip_all)]
    async fn hash(&self, password: Password) -> Result<StoredPasswordHash, PasswordHashError> {
        let current_span: tracing::Span = tracing::Span::current();
        tokio::task::spawn_blocking(move || {
            current_span.in_scope(move || {
                let salt: SaltString = SaltString::generate(rand_core::OsRng);
                hasher()?
                    .hash_password(password.as_ref().expose_secret().as_bytes(), &salt)
                    .map(|hash| StoredPasswordHash::new(Secret::from(hash.to_string())))
                    .map_err(|e| PasswordHashError::HashError(e.to_string()))
            })
        })
        .await
        .map_err(|e| PasswordHashError::HashError(e.to_string()))?
    }

    #[tracing::instrument(name = "Verify password hash", skip_all)]
    async fn verify(
        &self,
        expected: &StoredPasswordHash,
        candidate: &Secret<String>,
    ) -> Result<(), PasswordHashError> {
        let expected = expected.as_ref().clone();
        let candidate = candidate.clone();
        let current_span: tracing::Span = tracing::Span::current();
        tokio::task::spawn_blocking(move || {
            current_span.in_scope(|| {
                let expected_hash = PasswordHash::new(expected.expose_secret())
                    .map_err(|e| PasswordHashError::HashError(e.to_string()))?;

                hasher()?
                    .verify_password(candidate.expose_secret().as_bytes(), &expected_hash)
                    .map_err(|e| match e {
                        argon2::password_hash::Error::Password => PasswordHashError::Mismatch,
                        other => PasswordHashError::HashError(other.to_string()),
                    })
            })
        })
        .await
        .map_err(|e| PasswordHashError::HashError(e.to_string()))?
    }
}

fn hasher() -> Result<Argon2<'static>, PasswordHashError> {
    Ok(Argon2::new(
        Algorithm::Argon2id,
        Version::V0x13,
        Params::new(15000, 2, 1, None).map_err(|e| PasswordHashError::HashError(e.to_string()))?,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secret(s: &str) -> Secret<String> {
        Secret::from(s.to_string())
    }

    #[tokio::test]
    async fn hash_then_verify_roundtrip() {
        let hasher = Argon2PasswordHasher::new();
        let password = Password::parse(secret("password123")).unwrap();

        let stored = hasher.hash(password).await.unwrap();
        assert!(stored.as_ref().expose_secret().starts_with("$argon2id$"));

        hasher
            .verify(&stored, &secret("password123"))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn wrong_password_is_a_mismatch() {
        let hasher = Argon2PasswordHasher::new();
        let password = Password::parse(secret("password123")).unwrap();
        let stored = hasher.hash(password).await.unwrap();

        let result = hasher.verify(&stored, &secret("not-the-password")).await;
        assert!(matches!(result, Err(PasswordHashError::Mismatch)));
    }

    #[tokio::test]
    async fn malformed_stored_hash_is_a_hash_error() {
        let hasher = Argon2PasswordHasher::new();
        let stored = StoredPasswordHash::new(secret("not-a-phc-string"));

        let result = hasher.verify(&stored, &secret("password123")).await;
        assert!(matches!(result, Err(PasswordHashError::HashError(_))));
    }

    #[tokio::test]
    async fn same_password_hashes_differently_each_time() {
        let hasher = Argon2PasswordHasher::new();
        let a = hasher
            .hash(Password::parse(secret("password123")).unwrap())
            .await
            .unwrap();
        let b = hasher
            .hash(Password::parse(secret("password123")).unwrap())
            .await
            .unwrap();
        assert_ne!(a.as_ref().expose_secret(), b.as_ref().expose_secret());
    }
}
