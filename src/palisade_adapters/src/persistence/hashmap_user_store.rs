use std::collections::HashMap;
use std::sync::Arc;

use secrecy::ExposeSecret;
use tokio::sync::RwLock;

use palisade_core::{
    Email, LockState, NewUser, StoredPasswordHash, UserId, UserRecord, UserSelector, UserStore,
    UserStoreError, UserUpdate,
};

/// In-memory user store keyed by the normalized email.
///
/// The single `RwLock` serializes writes, which gives the per-record
/// read-modify-write consistency the lockout counter relies on.
#[derive(Default, Clone)]
pub struct HashMapUserStore {
    users: Arc<RwLock<HashMap<String, UserRecord>>>,
}

impl HashMapUserStore {
    pub fn new() -> Self {
        Self {
            users: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

fn key_of(email: &Email) -> String {
    email.as_ref().expose_secret().clone()
}

fn find_key_by_id(users: &HashMap<String, UserRecord>, id: UserId) -> Option<String> {
    users
        .iter()
        .find(|(_, user)| user.id == id)
        .map(|(key, _)| key.clone())
}

fn resolve_key(
    users: &HashMap<String, UserRecord>,
    selector: &UserSelector,
) -> Result<String, UserStoreError> {
    let key = match selector {
        UserSelector::ById(id) => find_key_by_id(users, *id),
        UserSelector::ByEmail(email) => {
            let key = key_of(email);
            users.contains_key(&key).then_some(key)
        }
    };
    key.ok_or(UserStoreError::UserNotFound)
}

#[async_trait::async_trait]
impl UserStore for HashMapUserStore {
    async fn add_user(&self, user: NewUser) -> Result<UserRecord, UserStoreError> {
        let mut users = self.users.write().await;
        let key = key_of(&user.email);
        if users.contains_key(&key) {
            return Err(UserStoreError::UserAlreadyExists);
        }

        let record = UserRecord {
            id: UserId::new(),
            email: user.email,
            password_hash: user.password_hash,
            lockout: LockState::default(),
        };
        users.insert(key, record.clone());
        Ok(record)
    }

    async fn find_by_email(&self, email: &Email) -> Result<Option<UserRecord>, UserStoreError> {
        let users = self.users.read().await;
        Ok(users.get(&key_of(email)).cloned())
    }

    async fn update(
        &self,
        selector: UserSelector,
        update: UserUpdate,
    ) -> Result<UserRecord, UserStoreError> {
        let mut users = self.users.write().await;
        let key = resolve_key(&users, &selector)?;

        if let Some(new_email) = update.email {
            let new_key = key_of(&new_email);
            if new_key != key && users.contains_key(&new_key) {
                return Err(UserStoreError::UserAlreadyExists);
            }
            let mut user = users.remove(&key).ok_or(UserStoreError::UserNotFound)?;
            user.email = new_email;
            if let Some(lockout) = update.lockout {
                user.lockout = lockout;
            }
            users.insert(new_key, user.clone());
            return Ok(user);
        }

        let user = users.get_mut(&key).ok_or(UserStoreError::UserNotFound)?;
        if let Some(lockout) = update.lockout {
            user.lockout = lockout;
        }
        Ok(user.clone())
    }

    async fn set_password_hash(
        &self,
        selector: UserSelector,
        hash: StoredPasswordHash,
    ) -> Result<(), UserStoreError> {
        let mut users = self.users.write().await;
        let key = resolve_key(&users, &selector)?;
        let user = users.get_mut(&key).ok_or(UserStoreError::UserNotFound)?;
        user.password_hash = hash;
        Ok(())
    }
}
