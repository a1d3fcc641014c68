//! Domain-specific error types for authentication and token operations
//!
//! Closed enumerations the transport layer switches on exhaustively to pick
//! status codes; no caller should ever need to match on message strings.

use bp_shared::errors::{error_codes, ErrorResponse};
use thiserror::Error;

/// Authentication failures surfaced by login and refresh
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthError {
    /// Unknown email or wrong password; the two are deliberately
    /// indistinguishable to callers
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Account suspended")]
    UserSuspended,

    /// The identity is not an author and holds no active brand membership
    #[error("No active brand membership")]
    NoActiveBrand,

    /// The identity or its memberships were suspended after the session
    /// started; surfaced on refresh
    #[error("User or membership suspended")]
    UserOrMembershipSuspended,
}

/// Token validation and lifecycle failures
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    /// Normalized verification failure; the underlying cause (malformed,
    /// unknown kid, bad signature, expired) is never surfaced
    #[error("Invalid token")]
    InvalidToken,

    #[error("Token expired")]
    TokenExpired,

    /// A revoked refresh token was replayed outside the grace window. The
    /// whole rotation chain has already been revoked by the time this is
    /// returned.
    #[error("Refresh token reuse detected")]
    TokenReused,

    #[error("Token generation failed")]
    TokenGenerationFailed,

    /// Signing-key material failed to load or parse; fatal at startup
    #[error("Signing key error: {message}")]
    KeyLoad { message: String },
}

impl From<AuthError> for ErrorResponse {
    fn from(err: AuthError) -> Self {
        let code = match err {
            AuthError::InvalidCredentials => error_codes::INVALID_CREDENTIALS,
            AuthError::UserSuspended => error_codes::USER_SUSPENDED,
            AuthError::NoActiveBrand => error_codes::NO_ACTIVE_BRAND,
            AuthError::UserOrMembershipSuspended => error_codes::MEMBERSHIP_SUSPENDED,
        };

        ErrorResponse::new(code, err.to_string())
    }
}

impl From<TokenError> for ErrorResponse {
    fn from(err: TokenError) -> Self {
        let code = match &err {
            TokenError::InvalidToken => error_codes::TOKEN_INVALID,
            TokenError::TokenExpired => error_codes::TOKEN_EXPIRED,
            TokenError::TokenReused => error_codes::TOKEN_REUSED,
            TokenError::TokenGenerationFailed | TokenError::KeyLoad { .. } => {
                error_codes::INTERNAL_ERROR
            }
        };

        ErrorResponse::new(code, err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_error_codes() {
        let response: ErrorResponse = AuthError::InvalidCredentials.into();
        assert_eq!(response.error, "INVALID_CREDENTIALS");

        let response: ErrorResponse = AuthError::UserOrMembershipSuspended.into();
        assert_eq!(response.error, "MEMBERSHIP_SUSPENDED");
    }

    #[test]
    fn test_token_error_codes() {
        let response: ErrorResponse = TokenError::TokenReused.into();
        assert_eq!(response.error, "TOKEN_REUSED");
        assert!(response.message.contains("reuse"));

        let response: ErrorResponse = TokenError::InvalidToken.into();
        assert_eq!(response.error, "TOKEN_INVALID");
    }

    #[test]
    fn test_key_load_maps_to_internal() {
        let err = TokenError::KeyLoad {
            message: "bad pem".to_string(),
        };
        let response: ErrorResponse = err.into();
        assert_eq!(response.error, "INTERNAL_ERROR");
    }
}
