//! Signing-key registry for access-token issuance and JWKS publication
//!
//! Keys are loaded and validated once at startup and the registry is
//! immutable afterwards; services receive it by `Arc` rather than through
//! any process-global state. Multiple keys may be loaded so a deployment can
//! roll its signing key without invalidating tokens issued under the
//! previous one; new tokens always use the single active key.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey};
use rsa::pkcs8::DecodePublicKey;
use rsa::traits::PublicKeyParts;
use rsa::RsaPublicKey;
use serde::{Deserialize, Serialize};

use crate::errors::{DomainError, TokenError};

/// PEM key material for one signing key, as supplied by the environment
#[derive(Debug, Clone)]
pub struct SigningKeyDef {
    pub kid: String,
    pub private_key_pem: String,
    pub public_key_pem: String,
}

/// Public half of a signing key in JWK form
///
/// Every field is populated explicitly at load time so JWKS consumers never
/// depend on library defaults or version-specific inference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicJwk {
    pub kty: String,

    #[serde(rename = "use")]
    pub key_use: String,

    pub alg: String,

    pub kid: String,

    /// RSA modulus, base64url without padding
    pub n: String,

    /// RSA public exponent, base64url without padding
    pub e: String,
}

/// JWKS document served under the well-known discovery path
///
/// Long-cacheable: the content only changes on deployment-time key rotation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JwkSet {
    pub keys: Vec<PublicJwk>,
}

/// One loaded signing key
pub struct SigningKey {
    kid: String,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    public_jwk: PublicJwk,
}

impl std::fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SigningKey").field("kid", &self.kid).finish()
    }
}

impl SigningKey {
    pub fn kid(&self) -> &str {
        &self.kid
    }

    pub fn encoding_key(&self) -> &EncodingKey {
        &self.encoding_key
    }

    pub fn decoding_key(&self) -> &DecodingKey {
        &self.decoding_key
    }

    pub fn public_jwk(&self) -> &PublicJwk {
        &self.public_jwk
    }
}

/// Registry of signing keys with exactly one active key
pub struct KeyRegistry {
    algorithm: Algorithm,
    active_kid: String,
    keys: HashMap<String, SigningKey>,
}

impl std::fmt::Debug for KeyRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyRegistry")
            .field("algorithm", &self.algorithm)
            .field("active_kid", &self.active_kid)
            .field("kids", &self.keys.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl KeyRegistry {
    /// Loads and validates the key set.
    ///
    /// Errors here are fatal startup errors: an empty definition list, a
    /// blank field, a duplicate kid, unparseable PEM material, or an
    /// `active_kid` that matches no loaded key all mean the process must not
    /// come up.
    pub fn load(
        algorithm: Algorithm,
        active_kid: &str,
        defs: Vec<SigningKeyDef>,
    ) -> Result<Self, DomainError> {
        let alg_name = match algorithm {
            Algorithm::RS256 => "RS256",
            Algorithm::RS384 => "RS384",
            Algorithm::RS512 => "RS512",
            other => {
                return Err(key_load_error(format!(
                    "registry only holds RSA keys, got {other:?}"
                )))
            }
        };

        if defs.is_empty() {
            return Err(key_load_error("no signing keys configured"));
        }

        let mut keys = HashMap::with_capacity(defs.len());
        for def in defs {
            if def.kid.trim().is_empty()
                || def.private_key_pem.trim().is_empty()
                || def.public_key_pem.trim().is_empty()
            {
                return Err(key_load_error(format!(
                    "signing key definition is incomplete (kid: {:?})",
                    def.kid
                )));
            }

            let encoding_key = EncodingKey::from_rsa_pem(def.private_key_pem.as_bytes())
                .map_err(|e| key_load_error(format!("invalid private key for {}: {e}", def.kid)))?;
            let decoding_key = DecodingKey::from_rsa_pem(def.public_key_pem.as_bytes())
                .map_err(|e| key_load_error(format!("invalid public key for {}: {e}", def.kid)))?;
            let public_jwk = derive_public_jwk(&def.kid, alg_name, &def.public_key_pem)?;

            let kid = def.kid.clone();
            let previous = keys.insert(
                kid.clone(),
                SigningKey {
                    kid,
                    encoding_key,
                    decoding_key,
                    public_jwk,
                },
            );
            if previous.is_some() {
                return Err(key_load_error(format!("duplicate signing key id {}", def.kid)));
            }
        }

        if !keys.contains_key(active_kid) {
            return Err(key_load_error(format!(
                "active key id {active_kid} is not among the loaded keys"
            )));
        }

        tracing::info!(active_kid, key_count = keys.len(), "signing key registry loaded");

        Ok(Self {
            algorithm,
            active_kid: active_kid.to_string(),
            keys,
        })
    }

    /// Loads key material from PEM files on disk, the way deployments mount
    /// it into the container.
    pub fn load_from_files<P: AsRef<Path>>(
        algorithm: Algorithm,
        active_kid: &str,
        paths: Vec<(String, P, P)>,
    ) -> Result<Self, DomainError> {
        let mut defs = Vec::with_capacity(paths.len());
        for (kid, private_path, public_path) in paths {
            let private_key_pem = fs::read_to_string(private_path.as_ref())
                .map_err(|e| key_load_error(format!("failed to read private key for {kid}: {e}")))?;
            let public_key_pem = fs::read_to_string(public_path.as_ref())
                .map_err(|e| key_load_error(format!("failed to read public key for {kid}: {e}")))?;

            defs.push(SigningKeyDef {
                kid,
                private_key_pem,
                public_key_pem,
            });
        }

        Self::load(algorithm, active_kid, defs)
    }

    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    /// The key used to sign new tokens.
    pub fn active_key(&self) -> &SigningKey {
        // load() guarantees the active kid is present
        &self.keys[&self.active_kid]
    }

    /// Looks up the verification key for `kid`.
    ///
    /// Unknown kids return `None`; verification never falls back to the
    /// active key.
    pub fn key_for(&self, kid: &str) -> Option<&SigningKey> {
        self.keys.get(kid)
    }

    /// All loaded public keys as a JWKS document.
    ///
    /// Returns an owned copy ordered by kid; the registry cannot be mutated
    /// through it.
    pub fn public_key_set(&self) -> JwkSet {
        let mut keys: Vec<PublicJwk> = self.keys.values().map(|k| k.public_jwk.clone()).collect();
        keys.sort_by(|a, b| a.kid.cmp(&b.kid));
        JwkSet { keys }
    }
}

fn derive_public_jwk(kid: &str, alg: &str, public_key_pem: &str) -> Result<PublicJwk, DomainError> {
    let public_key = RsaPublicKey::from_public_key_pem(public_key_pem)
        .map_err(|e| key_load_error(format!("cannot derive JWK for {kid}: {e}")))?;

    Ok(PublicJwk {
        kty: "RSA".to_string(),
        key_use: "sig".to_string(),
        alg: alg.to_string(),
        kid: kid.to_string(),
        n: URL_SAFE_NO_PAD.encode(public_key.n().to_bytes_be()),
        e: URL_SAFE_NO_PAD.encode(public_key.e().to_bytes_be()),
    })
}

fn key_load_error(message: impl Into<String>) -> DomainError {
    DomainError::Token(TokenError::KeyLoad {
        message: message.into(),
    })
}
