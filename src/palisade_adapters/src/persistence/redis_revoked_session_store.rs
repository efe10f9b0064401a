use std::sync::Arc;

use chrono::{DateTime, Utc};
use redis::{Commands, Connection};
use tokio::sync::RwLock;

use palisade_core::{RevokedSessionStore, RevokedSessionStoreError, UserId};

/// Redis-backed disavowal watermarks, stored as microsecond timestamps.
///
/// `retention_seconds` must be at least the session token ttl: once a
/// watermark expires, every token it covered must already be expired too.
#[derive(Clone)]
pub struct RedisRevokedSessionStore {
    conn: Arc<RwLock<Connection>>,
    retention_seconds: u64,
}

impl RedisRevokedSessionStore {
    pub fn new(conn: Arc<RwLock<Connection>>, retention_seconds: u64) -> Self {
        Self {
            conn,
            retention_seconds,
        }
    }
}

#[async_trait::async_trait]
impl RevokedSessionStore for RedisRevokedSessionStore {
    async fn disavow(
        &self,
        user_id: UserId,
        at: DateTime<Utc>,
    ) -> Result<(), RevokedSessionStoreError> {
        let key = get_key(user_id);

        let mut conn = self.conn.write().await;
        conn.set_ex(key, at.timestamp_micros(), self.retention_seconds)
            .map_err(|e| RevokedSessionStoreError::DatabaseError(e.to_string()))
    }

    async fn is_disavowed(
        &self,
        user_id: UserId,
        issued_at: DateTime<Utc>,
    ) -> Result<bool, RevokedSessionStoreError> {
        let key = get_key(user_id);

        let mut conn = self.conn.write().await;
        let watermark: Option<i64> = conn
            .get(&key)
            .map_err(|e| RevokedSessionStoreError::DatabaseError(e.to_string()))?;

        Ok(watermark.is_some_and(|mark| issued_at.timestamp_micros() <= mark))
    }
}

// We are using a key prefix to prevent collisions and organize data!
const DISAVOWED_KEY_PREFIX: &str = "disavowed_sessions:";

fn get_key(user_id: UserId) -> String {
    format!("{}{}", DISAVOWED_KEY_PREFIX, user_id)
}
