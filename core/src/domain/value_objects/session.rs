//! Session value objects returned by the session service.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::entities::identity::Identity;

/// Summary of an authenticated identity, safe to hand to clients
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentitySummary {
    pub id: Uuid,
    pub email: String,
    pub role: String,
    pub primary_brand_id: String,
    /// Brands with an active membership
    pub brand_ids: Vec<String>,
}

impl From<&Identity> for IdentitySummary {
    fn from(identity: &Identity) -> Self {
        Self {
            id: identity.id,
            email: identity.email.clone(),
            role: identity.role.as_str().to_string(),
            primary_brand_id: identity.primary_brand_id.clone(),
            brand_ids: identity.active_brand_ids(),
        }
    }
}

/// Result of a successful login
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthenticatedSession {
    /// Signed access token
    pub access_token: String,

    /// Raw refresh secret; this is the only copy that will ever exist
    pub refresh_token: String,

    /// Access token expiry in seconds
    pub expires_in: i64,

    pub identity: IdentitySummary,
}

/// Result of a successful refresh rotation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshedSession {
    pub access_token: String,

    /// Raw secret of the new chain tip; the presented secret is now dead
    pub refresh_token: String,

    /// Access token expiry in seconds
    pub expires_in: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::identity::{
        BrandMembership, IdentityStatus, MembershipStatus, Role,
    };

    #[test]
    fn test_summary_from_identity() {
        let identity = Identity {
            id: Uuid::new_v4(),
            email: "lee@example.com".to_string(),
            password_hash: "$2b$04$placeholderplaceholderplace".to_string(),
            status: IdentityStatus::Active,
            role: Role::Author,
            primary_brand_id: "acme".to_string(),
            memberships: vec![BrandMembership {
                brand_id: "acme".to_string(),
                status: MembershipStatus::Suspended,
                permissions: vec![],
            }],
        };

        let summary = IdentitySummary::from(&identity);
        assert_eq!(summary.id, identity.id);
        assert_eq!(summary.role, "author");
        assert!(summary.brand_ids.is_empty());
    }
}
