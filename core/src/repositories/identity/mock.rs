//! Mock implementation of IdentityStore for testing

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::entities::identity::Identity;
use crate::errors::DomainError;

use super::r#trait::IdentityStore;

/// In-memory identity store for tests
pub struct MockIdentityStore {
    identities: Arc<RwLock<HashMap<Uuid, Identity>>>,
}

impl MockIdentityStore {
    pub fn new() -> Self {
        Self {
            identities: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Insert or replace an identity, keyed by id.
    pub async fn upsert(&self, identity: Identity) {
        let mut identities = self.identities.write().await;
        identities.insert(identity.id, identity);
    }
}

impl Default for MockIdentityStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl IdentityStore for MockIdentityStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<Identity>, DomainError> {
        let identities = self.identities.read().await;
        Ok(identities
            .values()
            .find(|i| i.email.to_lowercase() == email.to_lowercase())
            .cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Identity>, DomainError> {
        let identities = self.identities.read().await;
        Ok(identities.get(&id).cloned())
    }
}
