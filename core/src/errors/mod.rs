//! Domain-specific error types and error handling.

mod types;

pub use types::{AuthError, TokenError};

use bp_shared::errors::{error_codes, ErrorResponse, IntoErrorResponse};
use thiserror::Error;

/// Core domain errors (general purpose)
#[derive(Error, Debug)]
pub enum DomainError {
    /// Malformed caller input, rejected before any store access
    #[error("Validation error: {message}")]
    Validation { message: String },

    /// Identity store or token ledger unreachable; the request fails but the
    /// caller's credentials were never judged
    #[error("Dependency unavailable: {message}")]
    Unavailable { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },

    // Bridge to specific error types
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Token(#[from] TokenError),
}

pub type DomainResult<T> = Result<T, DomainError>;

impl IntoErrorResponse for DomainError {
    fn to_error_response(&self) -> ErrorResponse {
        match self {
            DomainError::Validation { message } => {
                ErrorResponse::new(error_codes::VALIDATION_ERROR, message)
            }
            // dependency and internal details stay out of client responses
            DomainError::Unavailable { .. } => ErrorResponse::new(
                error_codes::SERVICE_UNAVAILABLE,
                "service temporarily unavailable",
            ),
            DomainError::Internal { .. } => {
                ErrorResponse::new(error_codes::INTERNAL_ERROR, "internal error")
            }
            DomainError::Auth(err) => (*err).into(),
            DomainError::Token(err) => err.clone().into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unavailable_hides_detail() {
        let err = DomainError::Unavailable {
            message: "ledger timeout after 2s".to_string(),
        };
        let response = err.to_error_response();

        assert_eq!(response.error, "SERVICE_UNAVAILABLE");
        assert!(!response.message.contains("ledger"));
    }

    #[test]
    fn test_bridged_errors_keep_their_codes() {
        let err: DomainError = TokenError::TokenExpired.into();
        assert_eq!(err.to_error_response().error, "TOKEN_EXPIRED");

        let err: DomainError = AuthError::NoActiveBrand.into();
        assert_eq!(err.to_error_response().error, "NO_ACTIVE_BRAND");
    }
}
