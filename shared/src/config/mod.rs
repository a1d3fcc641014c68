//! Configuration types shared across the identity service.

pub mod auth;

pub use auth::AuthConfig;
