use std::sync::Arc;

use chrono::{DateTime, Utc};
use dashmap::DashMap;

use palisade_core::{RevokedSessionStore, RevokedSessionStoreError, UserId};

/// In-memory disavowal watermarks, one per account.
#[derive(Default, Clone)]
pub struct InMemoryRevokedSessionStore {
    watermarks: Arc<DashMap<UserId, DateTime<Utc>>>,
}

impl InMemoryRevokedSessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl RevokedSessionStore for InMemoryRevokedSessionStore {
    async fn disavow(
        &self,
        user_id: UserId,
        at: DateTime<Utc>,
    ) -> Result<(), RevokedSessionStoreError> {
        // A watermark never moves backwards.
        self.watermarks
            .entry(user_id)
            .and_modify(|mark| *mark = (*mark).max(at))
            .or_insert(at);
        Ok(())
    }

    async fn is_disavowed(
        &self,
        user_id: UserId,
        issued_at: DateTime<Utc>,
    ) -> Result<bool, RevokedSessionStoreError> {
        Ok(self
            .watermarks
            .get(&user_id)
            .is_some_and(|mark| issued_at <= *mark))
    }
}
