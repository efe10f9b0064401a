use std::fmt;

use uuid::Uuid;

use crate::domain::email::Email;
use crate::domain::password::StoredPasswordHash;
use crate::lockout::LockState;

/// Opaque account identifier assigned by the user store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UserId(Uuid);

impl UserId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn parse(raw: &str) -> Result<Self, uuid::Error> {
        Ok(Self(Uuid::parse_str(raw)?))
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for UserId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// An account's credential record as held by the user store.
///
/// The password hash is opaque here; only the hasher port interprets it, and
/// it never leaves the service in a response.
#[derive(Debug, Clone)]
pub struct UserRecord {
    pub id: UserId,
    pub email: Email,
    pub password_hash: StoredPasswordHash,
    pub lockout: LockState,
}

/// Input for account creation. New accounts start unlocked.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: Email,
    pub password_hash: StoredPasswordHash,
}

/// Selects the account an operation targets: either an already-resolved
/// identifier, or a lookup by the unique email key.
#[derive(Debug, Clone)]
pub enum UserSelector {
    ById(UserId),
    ByEmail(Email),
}

/// Fields writable through the generic update path.
///
/// There is deliberately no password field; password hashes can only be
/// written through `UserStore::set_password_hash`.
#[derive(Debug, Clone, Default)]
pub struct UserUpdate {
    pub email: Option<Email>,
    pub lockout: Option<LockState>,
}

impl UserUpdate {
    pub fn lockout(state: LockState) -> Self {
        Self {
            email: None,
            lockout: Some(state),
        }
    }
}
