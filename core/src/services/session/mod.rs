//! Session service module
//!
//! Orchestrates login, refresh rotation, logout, and mass revocation on top
//! of the identity store, the access-token codec, and the refresh-token
//! ledger.

mod config;
mod service;

#[cfg(test)]
mod tests;

pub use config::SessionServiceConfig;
pub use service::SessionService;
