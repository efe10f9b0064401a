use serde::{Deserialize, Serialize};

use crate::domain::email::Email;
use crate::domain::user::UserId;

/// How the holder of a session originally authenticated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthType {
    Local,
    OAuth2,
}

/// The identity carried by a validated session token.
#[derive(Debug, Clone)]
pub struct AuthenticatedSession {
    pub user_id: UserId,
    pub email: Email,
    pub auth_type: AuthType,
}

/// Opaque bearer credential issued on successful authentication.
#[derive(Debug, Clone)]
pub struct SessionToken(String);

impl SessionToken {
    pub fn new(token: String) -> Self {
        Self(token)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl From<String> for SessionToken {
    fn from(token: String) -> Self {
        Self(token)
    }
}
