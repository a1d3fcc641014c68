//! Identity entity representing a platform user and their brand memberships.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Account status of an identity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdentityStatus {
    Active,
    Suspended,
    Deleted,
}

/// Platform role of an identity
///
/// Authors operate the platform itself and bypass brand-membership checks;
/// viewers only reach brands where they hold an active membership.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Author,
    Viewer,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Author => "author",
            Role::Viewer => "viewer",
        }
    }
}

/// Status of a single brand membership
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MembershipStatus {
    Active,
    Suspended,
}

/// Membership linking an identity to one brand
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrandMembership {
    pub brand_id: String,

    pub status: MembershipStatus,

    /// Brand-scoped permission strings, interpreted by the dashboards
    pub permissions: Vec<String>,
}

impl BrandMembership {
    pub fn is_active(&self) -> bool {
        self.status == MembershipStatus::Active
    }
}

/// Identity entity owned by the external identity store
///
/// This core only reads identities. Passwords, statuses and memberships are
/// managed by the account-administration services.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// Unique identifier for the identity
    pub id: Uuid,

    /// Email address, unique case-insensitively
    pub email: String,

    /// bcrypt hash of the password
    pub password_hash: String,

    pub status: IdentityStatus,

    pub role: Role,

    /// Brand shown by default when no explicit context is requested
    pub primary_brand_id: String,

    /// Ordered brand memberships
    pub memberships: Vec<BrandMembership>,
}

impl Identity {
    /// Checks that the account itself is usable.
    pub fn is_active(&self) -> bool {
        self.status == IdentityStatus::Active
    }

    pub fn is_author(&self) -> bool {
        self.role == Role::Author
    }

    /// Brand ids with an active membership, in membership order.
    pub fn active_brand_ids(&self) -> Vec<String> {
        self.memberships
            .iter()
            .filter(|m| m.is_active())
            .map(|m| m.brand_id.clone())
            .collect()
    }

    /// Whether this identity can reach at least one brand: authors always
    /// can, everyone else needs an active membership.
    pub fn has_brand_access(&self) -> bool {
        self.is_author() || self.memberships.iter().any(|m| m.is_active())
    }
}
