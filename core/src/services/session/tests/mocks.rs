//! Fixtures and harness for session service tests

use std::sync::Arc;

use uuid::Uuid;

use crate::domain::entities::identity::{
    BrandMembership, Identity, IdentityStatus, MembershipStatus, Role,
};
use crate::repositories::identity::MockIdentityStore;
use crate::repositories::token::MockTokenRepository;
use crate::services::session::{SessionService, SessionServiceConfig};
use crate::services::token::test_keys::test_registry;
use crate::services::token::{AccessTokenCodec, RefreshTokenLedger, TokenServiceConfig};

pub(crate) const PASSWORD: &str = "correct horse battery staple";

pub(crate) fn password_hash() -> String {
    // minimum cost keeps the suite fast
    bcrypt::hash(PASSWORD, 4).expect("bcrypt hash")
}

pub(crate) fn membership(brand_id: &str, status: MembershipStatus) -> BrandMembership {
    BrandMembership {
        brand_id: brand_id.to_string(),
        status,
        permissions: vec!["reports:read".to_string()],
    }
}

pub(crate) fn identity_with(
    email: &str,
    role: Role,
    status: IdentityStatus,
    memberships: Vec<BrandMembership>,
) -> Identity {
    Identity {
        id: Uuid::new_v4(),
        email: email.to_string(),
        password_hash: password_hash(),
        status,
        role,
        primary_brand_id: memberships
            .first()
            .map(|m| m.brand_id.clone())
            .unwrap_or_else(|| "acme".to_string()),
        memberships,
    }
}

/// Active viewer with one active membership.
pub(crate) fn active_viewer(email: &str) -> Identity {
    identity_with(
        email,
        Role::Viewer,
        IdentityStatus::Active,
        vec![membership("acme", MembershipStatus::Active)],
    )
}

pub(crate) struct TestHarness {
    pub service: SessionService<MockIdentityStore, MockTokenRepository>,
    pub identity_store: Arc<MockIdentityStore>,
    pub repository: Arc<MockTokenRepository>,
}

pub(crate) async fn harness_with(identities: Vec<Identity>) -> TestHarness {
    harness_with_config(identities, SessionServiceConfig::default()).await
}

pub(crate) async fn harness_with_config(
    identities: Vec<Identity>,
    config: SessionServiceConfig,
) -> TestHarness {
    let identity_store = Arc::new(MockIdentityStore::new());
    for identity in identities {
        identity_store.upsert(identity).await;
    }

    let repository = Arc::new(MockTokenRepository::new());
    let registry = Arc::new(test_registry());
    let token_config = TokenServiceConfig::default();
    let codec = Arc::new(AccessTokenCodec::new(registry, token_config.clone()));
    let ledger = Arc::new(RefreshTokenLedger::new(repository.clone(), token_config));

    TestHarness {
        service: SessionService::new(identity_store.clone(), codec, ledger, config),
        identity_store,
        repository,
    }
}
