//! Authentication and token lifetime configuration

use serde::{Deserialize, Serialize};

/// Token issuance and refresh-lifecycle configuration
///
/// Loaded once at startup from the deployment environment and handed to the
/// core services; nothing here changes at runtime.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuthConfig {
    /// Signing algorithm for access tokens (default: RS256)
    #[serde(default = "default_algorithm")]
    pub algorithm: String,

    /// Identifier of the signing key used for new tokens
    pub active_kid: String,

    /// Access token expiry time in seconds
    pub access_token_expiry: i64,

    /// Refresh token expiry time in seconds
    pub refresh_token_expiry: i64,

    /// Reuse grace window in seconds
    ///
    /// A revoked refresh token presented again within this window is treated
    /// as a concurrent-refresh race rather than a replay.
    pub reuse_grace_window: i64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            algorithm: default_algorithm(),
            active_kid: String::new(),
            access_token_expiry: 900,      // 15 minutes
            refresh_token_expiry: 604_800, // 7 days
            reuse_grace_window: 30,
        }
    }
}

impl AuthConfig {
    /// Create a configuration signing under the given key
    pub fn new(active_kid: impl Into<String>) -> Self {
        Self {
            active_kid: active_kid.into(),
            ..Default::default()
        }
    }

    /// Set access token expiry in minutes
    pub fn with_access_expiry_minutes(mut self, minutes: i64) -> Self {
        self.access_token_expiry = minutes * 60;
        self
    }

    /// Set refresh token expiry in days
    pub fn with_refresh_expiry_days(mut self, days: i64) -> Self {
        self.refresh_token_expiry = days * 86_400;
        self
    }

    /// Set the reuse grace window in seconds
    pub fn with_grace_window_seconds(mut self, seconds: i64) -> Self {
        self.reuse_grace_window = seconds;
        self
    }
}

fn default_algorithm() -> String {
    "RS256".to_string()
}
