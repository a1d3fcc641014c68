//! Main session service implementation

use std::sync::Arc;

use bp_shared::utils::validation::{is_valid_email, mask_email, normalize_email};
use uuid::Uuid;

use crate::domain::entities::token::{AccessClaims, RefreshTokenRecord, RefreshTokenState};
use crate::domain::value_objects::session::{
    AuthenticatedSession, IdentitySummary, RefreshedSession,
};
use crate::errors::{AuthError, DomainError, DomainResult, TokenError};
use crate::repositories::{IdentityStore, TokenRepository};
use crate::services::token::{AccessTokenCodec, IssuedRefreshToken, RefreshTokenLedger};

use super::config::SessionServiceConfig;

/// Orchestrates the session lifecycle: login, refresh rotation, logout, and
/// mass revocation
///
/// Holds no session state of its own; the identity store and the token
/// ledger are the only sources of truth, which lets any number of service
/// instances run concurrently.
pub struct SessionService<I, R>
where
    I: IdentityStore,
    R: TokenRepository,
{
    identity_store: Arc<I>,
    codec: Arc<AccessTokenCodec>,
    ledger: Arc<RefreshTokenLedger<R>>,
    config: SessionServiceConfig,
}

impl<I, R> SessionService<I, R>
where
    I: IdentityStore,
    R: TokenRepository,
{
    pub fn new(
        identity_store: Arc<I>,
        codec: Arc<AccessTokenCodec>,
        ledger: Arc<RefreshTokenLedger<R>>,
        config: SessionServiceConfig,
    ) -> Self {
        Self {
            identity_store,
            codec,
            ledger,
            config,
        }
    }

    /// Verifies credentials and opens a new session.
    ///
    /// An unknown email and a wrong password fail with the identical
    /// `InvalidCredentials`, so callers cannot enumerate accounts. The
    /// account must be active and reach at least one brand (authors always
    /// do) before any token is issued.
    pub async fn login(
        &self,
        email: &str,
        password: &str,
        device_label: Option<String>,
    ) -> DomainResult<AuthenticatedSession> {
        if email.trim().is_empty() {
            return Err(DomainError::Validation {
                message: "email is required".to_string(),
            });
        }
        if password.is_empty() {
            return Err(DomainError::Validation {
                message: "password is required".to_string(),
            });
        }

        let email = normalize_email(email);
        if !is_valid_email(&email) {
            return Err(DomainError::Validation {
                message: "email is malformed".to_string(),
            });
        }

        let identity = match self.identity_store.find_by_email(&email).await? {
            Some(identity) => identity,
            None => {
                tracing::debug!(email = %mask_email(&email), "login attempt for unknown email");
                return Err(AuthError::InvalidCredentials.into());
            }
        };

        let password_ok = bcrypt::verify(password, &identity.password_hash).map_err(|e| {
            DomainError::Internal {
                message: format!("password hash verification failed: {e}"),
            }
        })?;
        if !password_ok {
            tracing::debug!(user_id = %identity.id, "login attempt with wrong password");
            return Err(AuthError::InvalidCredentials.into());
        }

        if !identity.is_active() {
            return Err(AuthError::UserSuspended.into());
        }
        if !identity.has_brand_access() {
            return Err(AuthError::NoActiveBrand.into());
        }

        let access_token = self.codec.issue(&identity, None)?;
        let issued = self.ledger.create(identity.id, device_label).await?;

        tracing::info!(user_id = %identity.id, record_id = %issued.record.id, "session opened");

        Ok(AuthenticatedSession {
            access_token,
            refresh_token: issued.secret,
            expires_in: self.codec.access_expires_in(),
            identity: IdentitySummary::from(&identity),
        })
    }

    /// Rotates a refresh token and issues a fresh access token.
    ///
    /// A live record rotates normally. A revoked record presented within the
    /// grace window is a concurrent-refresh race (two tabs refreshing with
    /// the same now-superseded token): the service resolves the chain's
    /// current live tip and rotates that, so the caller still receives a
    /// fresh secret and the chain keeps a single live record. A revoked
    /// record presented at or beyond the window is a replay: the whole
    /// downstream chain is revoked and the caller gets `TokenReused`.
    pub async fn refresh(&self, raw_secret: &str) -> DomainResult<RefreshedSession> {
        if raw_secret.trim().is_empty() {
            return Err(DomainError::Validation {
                message: "refresh token is required".to_string(),
            });
        }

        let presented = self
            .ledger
            .lookup_by_secret(raw_secret)
            .await?
            .ok_or(TokenError::InvalidToken)?;

        let record = if presented.revoked {
            if presented.revoked_within(self.config.grace_window()) {
                let tip = self.ledger.tip_of(&presented).await?;
                if tip.state() != RefreshTokenState::Live {
                    return Err(TokenError::InvalidToken.into());
                }
                tip
            } else {
                let revoked = self.ledger.revoke_chain(presented.id).await?;
                tracing::warn!(
                    user_id = %presented.user_id,
                    record_id = %presented.id,
                    descendants_revoked = revoked,
                    "refresh token replayed outside grace window, chain revoked"
                );
                return Err(TokenError::TokenReused.into());
            }
        } else {
            presented
        };

        if record.is_expired() {
            return Err(TokenError::TokenExpired.into());
        }

        let identity = self
            .identity_store
            .find_by_id(record.user_id)
            .await?
            .ok_or(AuthError::UserOrMembershipSuspended)?;
        if !identity.is_active() || !identity.has_brand_access() {
            return Err(AuthError::UserOrMembershipSuspended.into());
        }

        let issued = self.rotate_at_tip(record).await?;
        let access_token = self.codec.issue(&identity, None)?;

        tracing::debug!(user_id = %identity.id, record_id = %issued.record.id, "refresh token rotated");

        Ok(RefreshedSession {
            access_token,
            refresh_token: issued.secret,
            expires_in: self.codec.access_expires_in(),
        })
    }

    /// Revokes the record behind a raw secret.
    ///
    /// Idempotent: unknown, already-revoked, or blank secrets all succeed
    /// silently. No chain walk happens here.
    pub async fn logout(&self, raw_secret: &str) -> DomainResult<()> {
        if raw_secret.trim().is_empty() {
            return Ok(());
        }

        if self.ledger.revoke_by_secret(raw_secret).await? {
            tracing::debug!("session closed");
        }

        Ok(())
    }

    /// Revokes every refresh token the user holds, across all devices and
    /// chains. Serves the self-service "log out everywhere" action and
    /// forced administrative revocation alike.
    pub async fn revoke_all_for_user(&self, user_id: Uuid) -> DomainResult<usize> {
        let revoked = self.ledger.revoke_all_for_user(user_id).await?;
        tracing::info!(user_id = %user_id, revoked, "all sessions revoked for user");
        Ok(revoked)
    }

    /// Verifies an access token and returns its claims.
    pub fn verify_access_token(&self, token: &str) -> DomainResult<AccessClaims> {
        self.codec.verify(token)
    }

    /// Rotates `record`, re-resolving the chain tip whenever a concurrent
    /// rotation wins the compare-and-set on the revoked flag first.
    async fn rotate_at_tip(&self, record: RefreshTokenRecord) -> DomainResult<IssuedRefreshToken> {
        let mut current = record;

        for _ in 0..self.config.max_rotate_attempts {
            if let Some(issued) = self.ledger.rotate(&current).await? {
                return Ok(issued);
            }

            let tip = self.ledger.tip_of(&current).await?;
            if tip.state() != RefreshTokenState::Live {
                return Err(TokenError::InvalidToken.into());
            }
            current = tip;
        }

        Err(DomainError::Unavailable {
            message: "rotation kept losing to concurrent refreshes".to_string(),
        })
    }
}
