//! Refresh-token rotation ledger
//!
//! Persisted bookkeeping for refresh-token chains. Raw secrets exist only in
//! the return values of `create` and `rotate`; the ledger stores, looks up
//! and logs nothing but sha256 hashes and record ids.

use std::sync::Arc;

use chrono::Utc;
use rand::distributions::Alphanumeric;
use rand::Rng;
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::domain::entities::token::RefreshTokenRecord;
use crate::errors::DomainError;
use crate::repositories::TokenRepository;

use super::config::TokenServiceConfig;

/// Number of characters in a raw refresh secret
const SECRET_LEN: usize = 48;

/// Upper bound on chain traversal; guards the iterative walks against
/// pathological or cyclic ledger data
pub(crate) const MAX_CHAIN_WALK: usize = 128;

/// A freshly persisted ledger record together with its raw secret
#[derive(Debug, Clone)]
pub struct IssuedRefreshToken {
    pub record: RefreshTokenRecord,

    /// Raw secret, handed to the client exactly once and never persisted
    pub secret: String,
}

/// Rotation-chain bookkeeping on top of the backing token store
pub struct RefreshTokenLedger<R: TokenRepository> {
    repository: Arc<R>,
    config: TokenServiceConfig,
}

impl<R: TokenRepository> RefreshTokenLedger<R> {
    pub fn new(repository: Arc<R>, config: TokenServiceConfig) -> Self {
        Self { repository, config }
    }

    /// Creates the root record of a new rotation chain.
    pub async fn create(
        &self,
        user_id: Uuid,
        device_label: Option<String>,
    ) -> Result<IssuedRefreshToken, DomainError> {
        let secret = generate_secret();
        let record = RefreshTokenRecord::new(
            user_id,
            device_label,
            hash_secret(&secret),
            self.config.refresh_ttl(),
        );

        let record = self.repository.save(record).await?;
        Ok(IssuedRefreshToken { record, secret })
    }

    /// Finds the record a raw secret belongs to, if any.
    pub async fn lookup_by_secret(
        &self,
        raw: &str,
    ) -> Result<Option<RefreshTokenRecord>, DomainError> {
        self.repository.find_by_hash(&hash_secret(raw)).await
    }

    /// Revokes `old` and creates its successor in the chain.
    ///
    /// Returns `Ok(None)` when another rotation revoked `old` first; the
    /// caller re-resolves the chain tip in that case. The revoke-then-create
    /// order means the chain never holds two live records, even transiently.
    pub async fn rotate(
        &self,
        old: &RefreshTokenRecord,
    ) -> Result<Option<IssuedRefreshToken>, DomainError> {
        if !self.repository.revoke(old.id, Utc::now()).await? {
            return Ok(None);
        }

        let secret = generate_secret();
        let record = RefreshTokenRecord::rotation_of(
            old,
            hash_secret(&secret),
            self.config.refresh_ttl(),
        );

        let record = self.repository.save(record).await?;
        Ok(Some(IssuedRefreshToken { record, secret }))
    }

    /// Finds the record rotation produced from `record_id`, if any.
    pub async fn child_of(
        &self,
        record_id: Uuid,
    ) -> Result<Option<RefreshTokenRecord>, DomainError> {
        self.repository.find_child(record_id).await
    }

    /// Follows the rotation chain from `record` to its newest descendant.
    pub async fn tip_of(
        &self,
        record: &RefreshTokenRecord,
    ) -> Result<RefreshTokenRecord, DomainError> {
        let mut current = record.clone();
        for _ in 0..MAX_CHAIN_WALK {
            match self.repository.find_child(current.id).await? {
                Some(child) => current = child,
                None => return Ok(current),
            }
        }

        Err(chain_too_long(record.id))
    }

    /// Revokes `from_record_id` and every descendant in its chain.
    ///
    /// Iterative and idempotent; a second call over an already-revoked chain
    /// flips nothing and still terminates. Returns how many records this
    /// call revoked.
    pub async fn revoke_chain(&self, from_record_id: Uuid) -> Result<usize, DomainError> {
        let mut revoked = 0;
        let mut current = from_record_id;

        for _ in 0..MAX_CHAIN_WALK {
            if self.repository.revoke(current, Utc::now()).await? {
                revoked += 1;
            }
            match self.repository.find_child(current).await? {
                Some(child) => current = child.id,
                None => return Ok(revoked),
            }
        }

        Err(chain_too_long(from_record_id))
    }

    /// Revokes every record for a user, regardless of chain position.
    pub async fn revoke_all_for_user(&self, user_id: Uuid) -> Result<usize, DomainError> {
        self.repository.revoke_all_for_user(user_id).await
    }

    /// Revokes the record a raw secret belongs to. No chain walk; returns
    /// whether anything was actually revoked.
    pub async fn revoke_by_secret(&self, raw: &str) -> Result<bool, DomainError> {
        match self.repository.find_by_hash(&hash_secret(raw)).await? {
            Some(record) => self.repository.revoke(record.id, Utc::now()).await,
            None => Ok(false),
        }
    }

    /// Deletes records already past their expiry. Maintenance hook for an
    /// external scheduler; expired records are terminal either way.
    pub async fn purge_expired(&self) -> Result<usize, DomainError> {
        self.repository.delete_expired().await
    }
}

/// sha256 hex of a raw secret.
pub(crate) fn hash_secret(raw: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(raw.as_bytes());
    hex::encode(hasher.finalize())
}

fn generate_secret() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(SECRET_LEN)
        .map(char::from)
        .collect()
}

fn chain_too_long(record_id: Uuid) -> DomainError {
    DomainError::Internal {
        message: format!("rotation chain from {record_id} exceeds {MAX_CHAIN_WALK} records"),
    }
}
