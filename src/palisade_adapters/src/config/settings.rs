use axum::http::HeaderValue;
use chrono::Duration;
use config::{Config, ConfigError, Environment};
use secrecy::Secret;
use serde::Deserialize;

use palisade_core::LockoutPolicy;

use crate::session::jwt::SessionTokenConfig;

/// Service configuration, sourced from the environment (prefix `PALISADE`,
/// `__` as the section separator, e.g. `PALISADE__SESSION__SECRET`).
#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub application: ApplicationSettings,
    pub lockout: LockoutSettings,
    pub session: SessionSettings,
    pub reset_token: ResetTokenSettings,
    pub email: EmailSettings,
}

impl Settings {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        Config::builder()
            .set_default("application.address", "0.0.0.0:3000")?
            .set_default("lockout.fails_until_temporary_lock", 3_i64)?
            .set_default("lockout.fails_until_permanent_lock", 10_i64)?
            .set_default("lockout.temporary_lock_duration_seconds", 1800_i64)?
            .set_default("session.cookie_name", "palisade_session")?
            .set_default("session.ttl_seconds", 600_i64)?
            .set_default("reset_token.ttl_minutes", 15_i64)?
            .set_default("email.base_url", "https://api.postmarkapp.com/")?
            .set_default("email.timeout_milliseconds", 10_000_i64)?
            .add_source(Environment::with_prefix("PALISADE").separator("__"))
            .build()?
            .try_deserialize()
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ApplicationSettings {
    pub address: String,
    pub allowed_origins: Option<String>,
    pub database_url: Option<Secret<String>>,
    pub redis_host: Option<String>,
}

impl ApplicationSettings {
    pub fn allowed_origins(&self) -> Option<AllowedOrigins> {
        self.allowed_origins
            .as_deref()
            .map(AllowedOrigins::parse)
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct LockoutSettings {
    pub fails_until_temporary_lock: u32,
    pub fails_until_permanent_lock: u32,
    pub temporary_lock_duration_seconds: i64,
}

impl LockoutSettings {
    pub fn policy(&self) -> LockoutPolicy {
        LockoutPolicy::new(
            self.fails_until_temporary_lock,
            self.fails_until_permanent_lock,
            Duration::seconds(self.temporary_lock_duration_seconds),
        )
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct SessionSettings {
    pub cookie_name: String,
    pub secret: Secret<String>,
    pub ttl_seconds: i64,
}

impl SessionSettings {
    pub fn token_config(&self) -> SessionTokenConfig {
        SessionTokenConfig {
            cookie_name: self.cookie_name.clone(),
            secret: self.secret.clone(),
            ttl_seconds: self.ttl_seconds,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ResetTokenSettings {
    pub ttl_minutes: i64,
}

impl ResetTokenSettings {
    pub fn ttl(&self) -> Duration {
        Duration::minutes(self.ttl_minutes)
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct EmailSettings {
    pub base_url: String,
    pub sender: Option<String>,
    pub authorization_token: Option<Secret<String>>,
    pub timeout_milliseconds: u64,
}

impl EmailSettings {
    pub fn timeout(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.timeout_milliseconds)
    }
}

/// CORS origin allowlist parsed from a comma-separated string.
#[derive(Debug, Clone, Default)]
pub struct AllowedOrigins(Vec<HeaderValue>);

impl AllowedOrigins {
    pub fn parse(raw: &str) -> Self {
        Self(
            raw.split(',')
                .filter_map(|origin| HeaderValue::from_str(origin.trim()).ok())
                .collect(),
        )
    }

    pub fn contains(&self, origin: &HeaderValue) -> bool {
        self.0.contains(origin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allowed_origins_parse_and_match() {
        let origins = AllowedOrigins::parse("https://app.example.com, https://admin.example.com");

        assert!(origins.contains(&HeaderValue::from_static("https://app.example.com")));
        assert!(origins.contains(&HeaderValue::from_static("https://admin.example.com")));
        assert!(!origins.contains(&HeaderValue::from_static("https://evil.example.com")));
    }

    #[test]
    fn lockout_settings_build_the_policy() {
        let settings = LockoutSettings {
            fails_until_temporary_lock: 3,
            fails_until_permanent_lock: 10,
            temporary_lock_duration_seconds: 1800,
        };

        let policy = settings.policy();
        assert_eq!(policy.temporary_lock_duration(), Duration::minutes(30));
    }
}
