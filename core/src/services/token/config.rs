//! Configuration for the token services

use chrono::Duration;
use jsonwebtoken::Algorithm;

use crate::errors::{DomainError, TokenError};

/// Configuration for access-token issuance and refresh-token lifetimes
#[derive(Debug, Clone)]
pub struct TokenServiceConfig {
    /// JWT signing algorithm; verification rejects any other
    pub algorithm: Algorithm,
    /// Access token expiry in minutes
    pub access_token_expiry_minutes: i64,
    /// Refresh token expiry in days
    pub refresh_token_expiry_days: i64,
}

impl Default for TokenServiceConfig {
    fn default() -> Self {
        Self {
            algorithm: Algorithm::RS256,
            access_token_expiry_minutes: 15,
            refresh_token_expiry_days: 7,
        }
    }
}

impl TokenServiceConfig {
    /// Builds the service config from the deployment-level auth settings.
    ///
    /// Only asymmetric RSA algorithms are accepted; anything else is a
    /// startup error.
    pub fn from_auth_config(config: &bp_shared::config::AuthConfig) -> Result<Self, DomainError> {
        let algorithm = match config.algorithm.as_str() {
            "RS256" => Algorithm::RS256,
            "RS384" => Algorithm::RS384,
            "RS512" => Algorithm::RS512,
            other => {
                return Err(DomainError::Token(TokenError::KeyLoad {
                    message: format!("unsupported signing algorithm: {other}"),
                }))
            }
        };

        Ok(Self {
            algorithm,
            access_token_expiry_minutes: config.access_token_expiry / 60,
            refresh_token_expiry_days: config.refresh_token_expiry / 86_400,
        })
    }

    pub fn access_ttl(&self) -> Duration {
        Duration::minutes(self.access_token_expiry_minutes)
    }

    pub fn refresh_ttl(&self) -> Duration {
        Duration::days(self.refresh_token_expiry_days)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bp_shared::config::AuthConfig;

    #[test]
    fn test_default_config() {
        let config = TokenServiceConfig::default();
        assert_eq!(config.algorithm, Algorithm::RS256);
        assert_eq!(config.access_ttl(), Duration::minutes(15));
        assert_eq!(config.refresh_ttl(), Duration::days(7));
    }

    #[test]
    fn test_from_auth_config() {
        let auth = AuthConfig::new("k1")
            .with_access_expiry_minutes(5)
            .with_refresh_expiry_days(30);
        let config = TokenServiceConfig::from_auth_config(&auth).unwrap();

        assert_eq!(config.access_token_expiry_minutes, 5);
        assert_eq!(config.refresh_token_expiry_days, 30);
    }

    #[test]
    fn test_symmetric_algorithm_rejected() {
        let mut auth = AuthConfig::new("k1");
        auth.algorithm = "HS256".to_string();

        let result = TokenServiceConfig::from_auth_config(&auth);
        assert!(matches!(
            result,
            Err(DomainError::Token(TokenError::KeyLoad { .. }))
        ));
    }
}
