//! Token services: the signing-key registry, the access-token codec, and
//! the refresh-token rotation ledger.

mod codec;
mod config;
mod key_registry;
mod ledger;

#[cfg(test)]
pub(crate) mod test_keys;

#[cfg(test)]
mod tests;

pub use codec::AccessTokenCodec;
pub use config::TokenServiceConfig;
pub use key_registry::{JwkSet, KeyRegistry, PublicJwk, SigningKey, SigningKeyDef};
pub use ledger::{IssuedRefreshToken, RefreshTokenLedger};

#[cfg(test)]
pub(crate) use ledger::hash_secret;
