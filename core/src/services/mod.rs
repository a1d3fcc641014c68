//! Business services containing the session and token logic.

pub mod session;
pub mod token;

// Re-export commonly used types
pub use session::{SessionService, SessionServiceConfig};
pub use token::{
    AccessTokenCodec, IssuedRefreshToken, JwkSet, KeyRegistry, PublicJwk, RefreshTokenLedger,
    SigningKey, SigningKeyDef, TokenServiceConfig,
};
