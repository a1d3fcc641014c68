//! Access-token encode/verify on top of the key registry

use std::sync::Arc;

use jsonwebtoken::{decode, decode_header, encode, Header, Validation};

use crate::domain::entities::identity::Identity;
use crate::domain::entities::token::AccessClaims;
use crate::errors::{DomainError, TokenError};

use super::config::TokenServiceConfig;
use super::key_registry::KeyRegistry;

/// Issues and verifies short-lived signed access tokens
///
/// Stateless: every call is a pure function of the token and the registry.
pub struct AccessTokenCodec {
    registry: Arc<KeyRegistry>,
    config: TokenServiceConfig,
}

impl AccessTokenCodec {
    pub fn new(registry: Arc<KeyRegistry>, config: TokenServiceConfig) -> Self {
        Self { registry, config }
    }

    /// Signs a claim set for `identity` under the registry's active key,
    /// embedding that key's kid in the token header.
    ///
    /// An explicit `context_brand_id` overrides the identity's stored
    /// primary brand in the claims.
    pub fn issue(
        &self,
        identity: &Identity,
        context_brand_id: Option<&str>,
    ) -> Result<String, DomainError> {
        let claims = AccessClaims::for_identity(identity, context_brand_id, self.config.access_ttl());

        let key = self.registry.active_key();
        let mut header = Header::new(self.registry.algorithm());
        header.kid = Some(key.kid().to_string());

        encode(&header, &claims, key.encoding_key()).map_err(|e| {
            tracing::error!(error = %e, "access token signing failed");
            DomainError::Token(TokenError::TokenGenerationFailed)
        })
    }

    /// Verifies a token and returns its claims.
    ///
    /// The header's kid selects the verification key; the expected algorithm
    /// is pinned, so a token signed any other way (including `none` or a
    /// symmetric scheme) never verifies. Every failure collapses to the same
    /// `InvalidToken` so callers cannot probe which check failed; the
    /// underlying reason is logged at debug level only.
    pub fn verify(&self, token: &str) -> Result<AccessClaims, DomainError> {
        self.verify_inner(token).map_err(|reason| {
            tracing::debug!(reason, "access token rejected");
            DomainError::Token(TokenError::InvalidToken)
        })
    }

    /// Access-token lifetime in seconds, as advertised to clients.
    pub fn access_expires_in(&self) -> i64 {
        self.config.access_token_expiry_minutes * 60
    }

    fn verify_inner(&self, token: &str) -> Result<AccessClaims, &'static str> {
        let header = decode_header(token).map_err(|_| "malformed header")?;
        if header.alg != self.registry.algorithm() {
            return Err("unexpected algorithm");
        }

        let kid = header.kid.as_deref().ok_or("missing kid")?;
        let key = self.registry.key_for(kid).ok_or("unknown kid")?;

        let mut validation = Validation::new(self.registry.algorithm());
        validation.validate_exp = true;

        let data = decode::<AccessClaims>(token, key.decoding_key(), &validation)
            .map_err(|_| "signature or expiry check failed")?;

        Ok(data.claims)
    }
}
