//! Mock implementation of TokenRepository for testing

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::entities::token::{RefreshTokenRecord, RefreshTokenState};
use crate::errors::DomainError;

use super::r#trait::TokenRepository;

/// In-memory token store for tests
///
/// The single write lock gives the same revoke atomicity a real store
/// provides with a conditional update.
pub struct MockTokenRepository {
    records: Arc<RwLock<HashMap<Uuid, RefreshTokenRecord>>>,
}

impl MockTokenRepository {
    pub fn new() -> Self {
        Self {
            records: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// All records for a user, in no particular order.
    pub async fn records_for_user(&self, user_id: Uuid) -> Vec<RefreshTokenRecord> {
        let records = self.records.read().await;
        records
            .values()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect()
    }

    /// Records for a user that are still usable.
    pub async fn live_records_for_user(&self, user_id: Uuid) -> Vec<RefreshTokenRecord> {
        self.records_for_user(user_id)
            .await
            .into_iter()
            .filter(|r| r.state() == RefreshTokenState::Live)
            .collect()
    }

    /// Rewrite a record's revocation timestamp, to simulate revocations that
    /// happened further in the past than the test has been running.
    pub async fn backdate_revocation(&self, id: Uuid, revoked_at: DateTime<Utc>) {
        let mut records = self.records.write().await;
        if let Some(record) = records.get_mut(&id) {
            record.revoked = true;
            record.revoked_at = Some(revoked_at);
        }
    }
}

impl Default for MockTokenRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TokenRepository for MockTokenRepository {
    async fn save(&self, record: RefreshTokenRecord) -> Result<RefreshTokenRecord, DomainError> {
        let mut records = self.records.write().await;

        // the hash column is unique in any real backing store
        if records.values().any(|r| r.token_hash == record.token_hash) {
            return Err(DomainError::Validation {
                message: "token hash already exists".to_string(),
            });
        }

        records.insert(record.id, record.clone());
        Ok(record)
    }

    async fn find_by_hash(
        &self,
        token_hash: &str,
    ) -> Result<Option<RefreshTokenRecord>, DomainError> {
        let records = self.records.read().await;
        Ok(records.values().find(|r| r.token_hash == token_hash).cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<RefreshTokenRecord>, DomainError> {
        let records = self.records.read().await;
        Ok(records.get(&id).cloned())
    }

    async fn find_child(
        &self,
        parent_id: Uuid,
    ) -> Result<Option<RefreshTokenRecord>, DomainError> {
        let records = self.records.read().await;
        Ok(records
            .values()
            .find(|r| r.rotated_from == Some(parent_id))
            .cloned())
    }

    async fn revoke(&self, id: Uuid, revoked_at: DateTime<Utc>) -> Result<bool, DomainError> {
        let mut records = self.records.write().await;

        match records.get_mut(&id) {
            Some(record) if !record.revoked => {
                record.revoked = true;
                record.revoked_at = Some(revoked_at);
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn revoke_all_for_user(&self, user_id: Uuid) -> Result<usize, DomainError> {
        let mut records = self.records.write().await;
        let now = Utc::now();
        let mut count = 0;

        for record in records.values_mut() {
            if record.user_id == user_id && !record.revoked {
                record.revoked = true;
                record.revoked_at = Some(now);
                count += 1;
            }
        }

        Ok(count)
    }

    async fn delete_expired(&self) -> Result<usize, DomainError> {
        let mut records = self.records.write().await;
        let initial_count = records.len();

        records.retain(|_, record| !record.is_expired());

        Ok(initial_count - records.len())
    }
}
