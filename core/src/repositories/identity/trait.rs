//! Identity store trait defining read access to platform identities.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::entities::identity::Identity;
use crate::errors::DomainError;

/// Read-only store of platform identities
///
/// Accounts are owned by the administration services; this core only loads
/// them to verify credentials at login and to re-check status during
/// refresh. Implementations must surface infrastructure failures as
/// `DomainError::Unavailable`, never as an absent identity.
#[async_trait]
pub trait IdentityStore: Send + Sync {
    /// Find an identity by email address
    ///
    /// Lookup is case-insensitive; callers pass an already-normalized
    /// (trimmed, lowercased) address.
    ///
    /// # Returns
    /// * `Ok(Some(Identity))` - Identity found
    /// * `Ok(None)` - No identity with this email
    /// * `Err(DomainError)` - Store unreachable or query failed
    async fn find_by_email(&self, email: &str) -> Result<Option<Identity>, DomainError>;

    /// Find an identity by its unique identifier
    ///
    /// # Returns
    /// * `Ok(Some(Identity))` - Identity found
    /// * `Ok(None)` - No identity with this id
    /// * `Err(DomainError)` - Store unreachable or query failed
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Identity>, DomainError>;
}
