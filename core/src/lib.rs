//! # BrandPulse Identity Core
//!
//! Core business logic and domain layer for the BrandPulse identity server.
//! This crate contains the domain entities, repository interfaces, error
//! types, and the services behind the platform's authentication endpoints:
//! credential verification, signed access-token issuance under a multi-key
//! registry, and the refresh-token rotation lifecycle.

pub mod domain;
pub mod errors;
pub mod repositories;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::*;
pub use errors::*;
pub use repositories::*;
pub use services::*;
