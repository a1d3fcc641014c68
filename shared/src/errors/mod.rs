//! Shared error response structure and stable error codes

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Standard error response structure used across all API endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error code for client identification
    pub error: String,

    /// Human-readable error message
    pub message: String,

    /// Additional error details (field errors, etc.)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<HashMap<String, serde_json::Value>>,

    /// Timestamp when the error occurred
    pub timestamp: DateTime<Utc>,
}

impl ErrorResponse {
    /// Create a new error response
    pub fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
            details: None,
            timestamp: Utc::now(),
        }
    }

    /// Add a detail field to the error response
    pub fn add_detail(mut self, key: impl Into<String>, value: impl Serialize) -> Self {
        let details = self.details.get_or_insert_with(HashMap::new);
        if let Ok(json_value) = serde_json::to_value(value) {
            details.insert(key.into(), json_value);
        }
        self
    }
}

/// Common error codes used across the identity service
///
/// The transport layer maps these 1:1 to HTTP statuses; downstream clients
/// switch on them, so they are part of the public contract.
pub mod error_codes {
    pub const INVALID_CREDENTIALS: &str = "INVALID_CREDENTIALS";
    pub const USER_SUSPENDED: &str = "USER_SUSPENDED";
    pub const NO_ACTIVE_BRAND: &str = "NO_ACTIVE_BRAND";
    pub const MEMBERSHIP_SUSPENDED: &str = "MEMBERSHIP_SUSPENDED";
    pub const TOKEN_INVALID: &str = "TOKEN_INVALID";
    pub const TOKEN_EXPIRED: &str = "TOKEN_EXPIRED";
    pub const TOKEN_REUSED: &str = "TOKEN_REUSED";
    pub const VALIDATION_ERROR: &str = "VALIDATION_ERROR";
    pub const SERVICE_UNAVAILABLE: &str = "SERVICE_UNAVAILABLE";
    pub const INTERNAL_ERROR: &str = "INTERNAL_ERROR";
}

/// Trait for converting errors to ErrorResponse
pub trait IntoErrorResponse {
    fn to_error_response(&self) -> ErrorResponse;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_response_serialization() {
        let response = ErrorResponse::new(error_codes::TOKEN_REUSED, "refresh token reuse detected")
            .add_detail("sessions_revoked", true);

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["error"], "TOKEN_REUSED");
        assert_eq!(json["details"]["sessions_revoked"], true);
    }

    #[test]
    fn test_details_omitted_when_absent() {
        let response = ErrorResponse::new(error_codes::TOKEN_INVALID, "invalid token");
        let json = serde_json::to_string(&response).unwrap();
        assert!(!json.contains("details"));
    }
}
