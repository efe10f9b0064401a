use rand::{Rng, distr::Alphanumeric};
use secrecy::{ExposeSecret, Secret};
use thiserror::Error;

const MIN_PASSWORD_LENGTH: usize = 8;
const GENERATED_PASSWORD_LENGTH: usize = 32;

#[derive(Debug, Error)]
pub enum PasswordError {
    #[error("Password must be at least {MIN_PASSWORD_LENGTH} characters long")]
    TooShort,
}

/// A new password that satisfies the strength rules.
///
/// Only validated passwords can be hashed and stored; candidate passwords
/// presented at login are compared as raw secrets so that pre-policy accounts
/// keep working.
#[derive(Debug, Clone)]
pub struct Password(Secret<String>);

impl Password {
    pub fn parse(raw: Secret<String>) -> Result<Self, PasswordError> {
        if raw.expose_secret().chars().count() < MIN_PASSWORD_LENGTH {
            return Err(PasswordError::TooShort);
        }
        Ok(Self(raw))
    }

    /// A random password for accounts created by invitation. The invitee never
    /// learns it; they set their own through the reset-token flow.
    pub fn generate() -> Self {
        let raw: String = rand::rng()
            .sample_iter(Alphanumeric)
            .take(GENERATED_PASSWORD_LENGTH)
            .map(char::from)
            .collect();
        Self(Secret::from(raw))
    }

    pub fn as_ref(&self) -> &Secret<String> {
        &self.0
    }
}

impl TryFrom<Secret<String>> for Password {
    type Error = PasswordError;

    fn try_from(raw: Secret<String>) -> Result<Self, Self::Error> {
        Self::parse(raw)
    }
}

/// An opaque password hash in PHC string format.
///
/// Never serialized into responses and never settable through the generic
/// account-update path; `UserStore::set_password_hash` is the only write path.
#[derive(Debug, Clone)]
pub struct StoredPasswordHash(Secret<String>);

impl StoredPasswordHash {
    pub fn new(phc: Secret<String>) -> Self {
        Self(phc)
    }

    pub fn as_ref(&self) -> &Secret<String> {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_password_is_rejected() {
        let result = Password::parse(Secret::from("hunter2".to_string()));
        assert!(matches!(result, Err(PasswordError::TooShort)));
    }

    #[test]
    fn long_enough_password_is_accepted() {
        assert!(Password::parse(Secret::from("correct horse battery".to_string())).is_ok());
    }

    #[test]
    fn generated_passwords_are_long_and_distinct() {
        let a = Password::generate();
        let b = Password::generate();
        assert!(a.as_ref().expose_secret().len() >= MIN_PASSWORD_LENGTH);
        assert_ne!(a.as_ref().expose_secret(), b.as_ref().expose_secret());
    }
}
