//! Token entities: access-token claims and refresh-token ledger records.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::identity::Identity;

/// Claim set embedded in signed access tokens
///
/// The shape is load-bearing: downstream services verify tokens on their own
/// against the published key set, so field names and types must stay stable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessClaims {
    /// Subject (identity id)
    pub sub: String,

    pub email: String,

    /// Brands where the membership is currently active
    pub brand_ids: Vec<String>,

    /// Effective primary brand for this session
    pub primary_brand_id: String,

    pub role: String,

    /// Expiration timestamp (seconds since epoch)
    pub exp: i64,

    /// Issued at timestamp (seconds since epoch)
    pub iat: i64,
}

impl AccessClaims {
    /// Builds the claim set for an identity.
    ///
    /// An explicit `context_brand_id` overrides the identity's stored
    /// primary brand.
    pub fn for_identity(identity: &Identity, context_brand_id: Option<&str>, ttl: Duration) -> Self {
        let now = Utc::now();
        Self {
            sub: identity.id.to_string(),
            email: identity.email.clone(),
            brand_ids: identity.active_brand_ids(),
            primary_brand_id: context_brand_id
                .map(str::to_owned)
                .unwrap_or_else(|| identity.primary_brand_id.clone()),
            role: identity.role.as_str().to_string(),
            exp: (now + ttl).timestamp(),
            iat: now.timestamp(),
        }
    }

    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() >= self.exp
    }

    /// Parses the subject back into an identity id.
    pub fn identity_id(&self) -> Result<Uuid, uuid::Error> {
        Uuid::parse_str(&self.sub)
    }
}

/// Lifecycle state of a refresh-token record
///
/// Only `Live` is usable. A revoked record was superseded by rotation,
/// closed by logout, or swept up in a chain revocation after reuse was
/// detected further down its chain; which of those happened is visible from
/// the surrounding chain (`rotated_from` links and siblings), not from the
/// record alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshTokenState {
    Live,
    Expired,
    Revoked,
}

/// Refresh token record persisted in the ledger
///
/// Successive rotations link records into a chain via `rotated_from`; at
/// most one non-revoked record exists per chain (the tip). Records are
/// mutated only to flip `revoked`/`revoked_at`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshTokenRecord {
    /// Unique identifier for the record
    pub id: Uuid,

    /// Identity this token belongs to
    pub user_id: Uuid,

    /// Opaque device label captured at login (e.g. a user-agent string)
    pub device_label: Option<String>,

    /// sha256 hex of the raw secret; the secret itself is never stored
    pub token_hash: String,

    pub created_at: DateTime<Utc>,

    pub expires_at: DateTime<Utc>,

    pub revoked: bool,

    pub revoked_at: Option<DateTime<Utc>>,

    /// Record this one replaced during rotation
    pub rotated_from: Option<Uuid>,
}

impl RefreshTokenRecord {
    /// Creates the root record of a new rotation chain.
    pub fn new(
        user_id: Uuid,
        device_label: Option<String>,
        token_hash: String,
        ttl: Duration,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user_id,
            device_label,
            token_hash,
            created_at: now,
            expires_at: now + ttl,
            revoked: false,
            revoked_at: None,
            rotated_from: None,
        }
    }

    /// Creates the successor of `parent` in its rotation chain, carrying the
    /// device label forward.
    pub fn rotation_of(parent: &RefreshTokenRecord, token_hash: String, ttl: Duration) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user_id: parent.user_id,
            device_label: parent.device_label.clone(),
            token_hash,
            created_at: now,
            expires_at: now + ttl,
            revoked: false,
            revoked_at: None,
            rotated_from: Some(parent.id),
        }
    }

    pub fn is_expired(&self) -> bool {
        Utc::now() > self.expires_at
    }

    pub fn state(&self) -> RefreshTokenState {
        if self.revoked {
            RefreshTokenState::Revoked
        } else if self.is_expired() {
            RefreshTokenState::Expired
        } else {
            RefreshTokenState::Live
        }
    }

    /// Marks the record revoked.
    pub fn revoke(&mut self) {
        self.revoked = true;
        self.revoked_at = Some(Utc::now());
    }

    /// Whether the record was revoked less than `window` ago. Records
    /// revoked without a timestamp never fall inside the window.
    pub fn revoked_within(&self, window: Duration) -> bool {
        match self.revoked_at {
            Some(at) if self.revoked => Utc::now() - at < window,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::identity::{
        BrandMembership, IdentityStatus, MembershipStatus, Role,
    };

    fn test_identity() -> Identity {
        Identity {
            id: Uuid::new_v4(),
            email: "maria@example.com".to_string(),
            password_hash: "$2b$04$placeholderplaceholderplace".to_string(),
            status: IdentityStatus::Active,
            role: Role::Viewer,
            primary_brand_id: "acme".to_string(),
            memberships: vec![
                BrandMembership {
                    brand_id: "acme".to_string(),
                    status: MembershipStatus::Active,
                    permissions: vec![],
                },
                BrandMembership {
                    brand_id: "globex".to_string(),
                    status: MembershipStatus::Suspended,
                    permissions: vec![],
                },
            ],
        }
    }

    #[test]
    fn test_claims_for_identity() {
        let identity = test_identity();
        let claims = AccessClaims::for_identity(&identity, None, Duration::minutes(15));

        assert_eq!(claims.sub, identity.id.to_string());
        assert_eq!(claims.email, "maria@example.com");
        assert_eq!(claims.brand_ids, vec!["acme"]);
        assert_eq!(claims.primary_brand_id, "acme");
        assert_eq!(claims.role, "viewer");
        assert!(!claims.is_expired());
        assert_eq!(claims.identity_id().unwrap(), identity.id);
    }

    #[test]
    fn test_claims_context_brand_override() {
        let identity = test_identity();
        let claims = AccessClaims::for_identity(&identity, Some("globex"), Duration::minutes(15));

        assert_eq!(claims.primary_brand_id, "globex");
        // the membership list is unaffected by the override
        assert_eq!(claims.brand_ids, vec!["acme"]);
    }

    #[test]
    fn test_claims_expiry() {
        let identity = test_identity();
        let mut claims = AccessClaims::for_identity(&identity, None, Duration::minutes(15));

        claims.exp = Utc::now().timestamp() - 1;
        assert!(claims.is_expired());
    }

    #[test]
    fn test_new_record_is_live() {
        let record = RefreshTokenRecord::new(
            Uuid::new_v4(),
            Some("Mozilla/5.0".to_string()),
            "hash".to_string(),
            Duration::days(7),
        );

        assert_eq!(record.state(), RefreshTokenState::Live);
        assert!(!record.revoked);
        assert!(record.revoked_at.is_none());
        assert!(record.rotated_from.is_none());
    }

    #[test]
    fn test_rotation_links_and_carries_device_label() {
        let parent = RefreshTokenRecord::new(
            Uuid::new_v4(),
            Some("tablet".to_string()),
            "hash-a".to_string(),
            Duration::days(7),
        );
        let child = RefreshTokenRecord::rotation_of(&parent, "hash-b".to_string(), Duration::days(7));

        assert_eq!(child.rotated_from, Some(parent.id));
        assert_eq!(child.user_id, parent.user_id);
        assert_eq!(child.device_label, Some("tablet".to_string()));
        assert_ne!(child.id, parent.id);
    }

    #[test]
    fn test_revoke_sets_timestamp() {
        let mut record =
            RefreshTokenRecord::new(Uuid::new_v4(), None, "hash".to_string(), Duration::days(7));

        record.revoke();

        assert_eq!(record.state(), RefreshTokenState::Revoked);
        assert!(record.revoked_at.is_some());
    }

    #[test]
    fn test_expired_state() {
        let mut record =
            RefreshTokenRecord::new(Uuid::new_v4(), None, "hash".to_string(), Duration::days(7));
        record.expires_at = Utc::now() - Duration::days(1);

        assert_eq!(record.state(), RefreshTokenState::Expired);
    }

    #[test]
    fn test_revoked_wins_over_expired() {
        let mut record =
            RefreshTokenRecord::new(Uuid::new_v4(), None, "hash".to_string(), Duration::days(7));
        record.expires_at = Utc::now() - Duration::days(1);
        record.revoke();

        assert_eq!(record.state(), RefreshTokenState::Revoked);
    }

    #[test]
    fn test_revoked_within_window() {
        let mut record =
            RefreshTokenRecord::new(Uuid::new_v4(), None, "hash".to_string(), Duration::days(7));

        assert!(!record.revoked_within(Duration::seconds(30)));

        record.revoke();
        assert!(record.revoked_within(Duration::seconds(30)));

        record.revoked_at = Some(Utc::now() - Duration::seconds(60));
        assert!(!record.revoked_within(Duration::seconds(30)));
    }

    #[test]
    fn test_revoked_without_timestamp_is_outside_window() {
        let mut record =
            RefreshTokenRecord::new(Uuid::new_v4(), None, "hash".to_string(), Duration::days(7));
        record.revoked = true;
        record.revoked_at = None;

        assert!(!record.revoked_within(Duration::seconds(30)));
    }
}
