//! Refresh-token store trait backing the rotation ledger.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::entities::token::RefreshTokenRecord;
use crate::errors::DomainError;

/// Persistence contract for refresh-token records
///
/// Records form rotation chains via `rotated_from`; the store is the sole
/// coordination point between concurrently running service instances, so
/// `revoke` must be atomic in the backing store.
///
/// # Security Considerations
/// - Only secret hashes are ever stored
/// - Revocation is logical; records stay queryable for chain walks
#[async_trait]
pub trait TokenRepository: Send + Sync {
    /// Persist a new refresh-token record
    ///
    /// # Returns
    /// * `Ok(RefreshTokenRecord)` - The saved record
    /// * `Err(DomainError)` - Save failed (e.g. duplicate hash)
    async fn save(&self, record: RefreshTokenRecord) -> Result<RefreshTokenRecord, DomainError>;

    /// Find a record by the hash of its raw secret
    async fn find_by_hash(
        &self,
        token_hash: &str,
    ) -> Result<Option<RefreshTokenRecord>, DomainError>;

    /// Find a record by its id
    async fn find_by_id(&self, id: Uuid) -> Result<Option<RefreshTokenRecord>, DomainError>;

    /// Find the record that rotation produced from `parent_id`, if any
    async fn find_child(
        &self,
        parent_id: Uuid,
    ) -> Result<Option<RefreshTokenRecord>, DomainError>;

    /// Mark a record revoked
    ///
    /// Must be a compare-and-set in the backing store: `Ok(true)` only when
    /// this call flipped the flag, `Ok(false)` when the record was already
    /// revoked or does not exist. Concurrent rotations race on this flag and
    /// exactly one of them may win.
    async fn revoke(&self, id: Uuid, revoked_at: DateTime<Utc>) -> Result<bool, DomainError>;

    /// Revoke every record belonging to a user, regardless of chain position
    ///
    /// # Returns
    /// * `Ok(usize)` - Number of records this call revoked
    async fn revoke_all_for_user(&self, user_id: Uuid) -> Result<usize, DomainError>;

    /// Delete records past their expiry
    ///
    /// Called by an external maintenance scheduler, never from request
    /// handling.
    ///
    /// # Returns
    /// * `Ok(usize)` - Number of records deleted
    async fn delete_expired(&self) -> Result<usize, DomainError>;
}
