// crates/swan-node/src/keyring.rs
// ============================================================================
// Module: SWAN Keyring
// Description: Issuer public keys and ed25519 proof verification.
// Purpose: Back the core verifier seam with configured trust roots.
// Dependencies: swan-core, swan-config, ed25519-dalek, base64
// ============================================================================

//! ## Overview
//! A [`Keyring`] maps issuing domains to ed25519 verifying keys and
//! implements [`Verifier`]. Keys are loaded from disk either as 32 raw bytes
//! or as base64 text.
//!
//! Outcomes:
//! - Domain not permitted by the trust scheme: `Ok(false)`.
//! - Permitted but no key configured: [`VerifyError::UnknownIssuer`] when
//!   `require_known_issuer` is set, otherwise `Ok(false)`.
//! - Signature bytes of the wrong length: [`VerifyError::MalformedSignature`].
//! - Signature that does not check out: `Ok(false)`.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use ed25519_dalek::Signature;
use ed25519_dalek::VerifyingKey;
use swan_config::TrustConfig;
use swan_core::Proof;
use swan_core::TrustScheme;
use swan_core::VerifyError;
use swan_core::Verifier;
use swan_core::signed_message;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Length of an ed25519 key in bytes.
pub const KEY_LENGTH: usize = 32;
/// Largest key file accepted from disk.
const MAX_KEY_FILE_BYTES: u64 = 4096;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors raised while loading keys or building a keyring.
#[derive(Debug, Error)]
pub enum KeyringError {
    /// Key file could not be read.
    #[error("unable to read key {path}: {reason}")]
    Read {
        /// Key file path.
        path: String,
        /// I/O failure description.
        reason: String,
    },
    /// Key file exceeds the size limit.
    #[error("key file {path} is {size} bytes (max {limit})")]
    TooLarge {
        /// Key file path.
        path: String,
        /// Observed size.
        size: u64,
        /// Size limit.
        limit: u64,
    },
    /// Key material is not a valid ed25519 key.
    #[error("invalid ed25519 key in {path}: {reason}")]
    Invalid {
        /// Key file path.
        path: String,
        /// Failure description.
        reason: &'static str,
    },
    /// The same issuing domain was registered twice.
    #[error("duplicate issuer key for {domain}")]
    DuplicateIssuer {
        /// Issuing domain.
        domain: String,
    },
}

// ============================================================================
// SECTION: Key Loading
// ============================================================================

/// Reads 32 key bytes from disk, accepting raw bytes or base64 text.
///
/// # Errors
///
/// Returns [`KeyringError`] when the file is unreadable, too large, or does
/// not hold exactly 32 key bytes.
pub fn read_key_bytes(path: &Path) -> Result<[u8; KEY_LENGTH], KeyringError> {
    let display = path.display().to_string();
    let size = fs::metadata(path)
        .map_err(|err| KeyringError::Read {
            path: display.clone(),
            reason: err.to_string(),
        })?
        .len();
    if size > MAX_KEY_FILE_BYTES {
        return Err(KeyringError::TooLarge {
            path: display,
            size,
            limit: MAX_KEY_FILE_BYTES,
        });
    }
    let bytes = fs::read(path).map_err(|err| KeyringError::Read {
        path: display.clone(),
        reason: err.to_string(),
    })?;
    decode_key_bytes(&bytes).map_err(|reason| KeyringError::Invalid {
        path: display,
        reason,
    })
}

/// Decodes key material held in memory.
fn decode_key_bytes(bytes: &[u8]) -> Result<[u8; KEY_LENGTH], &'static str> {
    let key_bytes = if bytes.len() == KEY_LENGTH {
        bytes.to_vec()
    } else {
        let text = std::str::from_utf8(bytes).map_err(|_| "key must be raw bytes or utf-8 base64")?;
        BASE64.decode(text.trim()).map_err(|_| "invalid base64 key")?
    };
    key_bytes.as_slice().try_into().map_err(|_| "key must be 32 bytes")
}

/// Loads an ed25519 public key from disk.
///
/// # Errors
///
/// Returns [`KeyringError`] when the key cannot be read or is not a valid
/// curve point.
pub fn load_verifying_key(path: &Path) -> Result<VerifyingKey, KeyringError> {
    let bytes = read_key_bytes(path)?;
    VerifyingKey::from_bytes(&bytes).map_err(|_| KeyringError::Invalid {
        path: path.display().to_string(),
        reason: "not an ed25519 public key",
    })
}

// ============================================================================
// SECTION: Keyring
// ============================================================================

/// Issuer domain to verifying key map.
#[derive(Debug, Clone)]
pub struct Keyring {
    /// Keys by issuing domain.
    keys: BTreeMap<String, VerifyingKey>,
    /// Whether an unknown issuer is an error rather than a failed check.
    require_known_issuer: bool,
}

impl Default for Keyring {
    fn default() -> Self {
        Self::new(true)
    }
}

impl Keyring {
    /// Creates an empty keyring.
    #[must_use]
    pub const fn new(require_known_issuer: bool) -> Self {
        Self {
            keys: BTreeMap::new(),
            require_known_issuer,
        }
    }

    /// Builds a keyring from the `[trust]` section, reading every key file.
    ///
    /// # Errors
    ///
    /// Returns [`KeyringError`] when a key cannot be loaded or a domain
    /// repeats.
    pub fn from_config(config: &TrustConfig) -> Result<Self, KeyringError> {
        let mut keyring = Self::new(config.require_known_issuer);
        for issuer in &config.issuers {
            let key = load_verifying_key(Path::new(issuer.public_key.trim()))?;
            keyring.insert(issuer.domain.clone(), key)?;
        }
        Ok(keyring)
    }

    /// Registers a key for `domain`.
    ///
    /// # Errors
    ///
    /// Returns [`KeyringError::DuplicateIssuer`] when `domain` already has a
    /// key.
    pub fn insert(&mut self, domain: impl Into<String>, key: VerifyingKey) -> Result<(), KeyringError> {
        let domain = domain.into();
        if self.keys.contains_key(&domain) {
            return Err(KeyringError::DuplicateIssuer {
                domain,
            });
        }
        self.keys.insert(domain, key);
        Ok(())
    }

    /// Returns true when a key is registered for `domain`.
    #[must_use]
    pub fn contains(&self, domain: &str) -> bool {
        self.keys.contains_key(domain)
    }

    /// Returns the registered issuing domains.
    pub fn domains(&self) -> impl Iterator<Item = &str> {
        self.keys.keys().map(String::as_str)
    }

    /// Number of registered issuers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Returns true when no issuer is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

impl Verifier for Keyring {
    fn verify(&self, proof: &Proof, payload: &[u8], scheme: &TrustScheme) -> Result<bool, VerifyError> {
        if !scheme.permits(proof.domain()) {
            return Ok(false);
        }
        let Some(key) = self.keys.get(proof.domain()) else {
            if self.require_known_issuer {
                return Err(VerifyError::UnknownIssuer {
                    domain: proof.domain().to_string(),
                });
            }
            return Ok(false);
        };
        let signature = Signature::try_from(proof.signature()).map_err(|_| VerifyError::MalformedSignature)?;
        let message = signed_message(proof.domain(), proof.created(), payload)
            .map_err(|err| VerifyError::Unavailable(err.to_string()))?;
        Ok(key.verify_strict(&message, &signature).is_ok())
    }
}

#[cfg(test)]
mod tests;
