//! Configuration for the session service

use chrono::Duration;

/// Configuration for the session service
#[derive(Debug, Clone)]
pub struct SessionServiceConfig {
    /// Seconds after revocation during which reuse of a refresh token is
    /// treated as a concurrent-refresh race instead of a replay
    pub reuse_grace_window_seconds: i64,

    /// Attempts at re-resolving the chain tip when a rotation loses its
    /// compare-and-set race to a concurrent caller
    pub max_rotate_attempts: usize,
}

impl Default for SessionServiceConfig {
    fn default() -> Self {
        Self {
            reuse_grace_window_seconds: 30,
            max_rotate_attempts: 3,
        }
    }
}

impl SessionServiceConfig {
    pub fn from_auth_config(config: &bp_shared::config::AuthConfig) -> Self {
        Self {
            reuse_grace_window_seconds: config.reuse_grace_window,
            ..Default::default()
        }
    }

    pub fn grace_window(&self) -> Duration {
        Duration::seconds(self.reuse_grace_window_seconds)
    }
}
