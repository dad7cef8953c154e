// crates/swan-node/src/signer.rs
// ============================================================================
// Module: SWAN Ed25519 Signer
// Description: Node-owned signing key producing proof envelopes.
// Purpose: Back the core signer seam with an ed25519 key and injected clock.
// Dependencies: swan-core, ed25519-dalek, rand
// ============================================================================

//! ## Overview
//! [`Ed25519Signer`] signs the exact bytes returned by
//! [`signed_message`] and stamps proofs with its clock's time.
//! [`Ed25519Signer::at`] borrows the key with a pinned creation time so a
//! whole request can be signed at one instant.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::path::Path;
use std::sync::Arc;

use ed25519_dalek::Signer as _;
use ed25519_dalek::SigningKey;
use ed25519_dalek::VerifyingKey;
use rand::RngCore;
use rand::rngs::OsRng;
use swan_core::Proof;
use swan_core::SignError;
use swan_core::Signer;
use swan_core::Timestamp;
use swan_core::signed_message;

use crate::clock::Clock;
use crate::clock::SystemClock;
use crate::keyring::KEY_LENGTH;
use crate::keyring::KeyringError;
use crate::keyring::read_key_bytes;

// ============================================================================
// SECTION: Signer
// ============================================================================

/// Ed25519 signer for one issuing domain.
pub struct Ed25519Signer {
    /// Issuing domain stamped into proofs.
    domain: String,
    /// Secret signing key.
    key: SigningKey,
    /// Time source for proof creation.
    clock: Arc<dyn Clock>,
}

impl Ed25519Signer {
    /// Creates a signer using the system clock.
    #[must_use]
    pub fn new(domain: impl Into<String>, key: SigningKey) -> Self {
        Self {
            domain: domain.into(),
            key,
            clock: Arc::new(SystemClock),
        }
    }

    /// Creates a signer with a fresh random key.
    #[must_use]
    pub fn generate(domain: impl Into<String>) -> Self {
        Self::new(domain, generate_signing_key())
    }

    /// Loads the secret key from disk (raw 32 bytes or base64).
    ///
    /// # Errors
    ///
    /// Returns [`KeyringError`] when the key file cannot be read or decoded.
    pub fn load(domain: impl Into<String>, path: &Path) -> Result<Self, KeyringError> {
        let bytes = read_key_bytes(path)?;
        Ok(Self::new(domain, SigningKey::from_bytes(&bytes)))
    }

    /// Replaces the time source.
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Returns the public half of the key.
    #[must_use]
    pub fn verifying_key(&self) -> VerifyingKey {
        self.key.verifying_key()
    }

    /// Borrows this signer with proofs pinned to `created`.
    #[must_use]
    pub const fn at(&self, created: Timestamp) -> StampedSigner<'_> {
        StampedSigner {
            signer: self,
            created,
        }
    }

    /// Signs `payload` as if at `created`.
    fn sign_at(&self, created: Timestamp, payload: &[u8]) -> Result<Proof, SignError> {
        let message = signed_message(&self.domain, created, payload)
            .map_err(|err| SignError::Failed(err.to_string()))?;
        let signature = self.key.sign(&message);
        Ok(Proof::new(self.domain.clone(), created, signature.to_bytes().to_vec()))
    }
}

impl Signer for Ed25519Signer {
    fn domain(&self) -> &str {
        &self.domain
    }

    fn sign(&self, payload: &[u8]) -> Result<Proof, SignError> {
        self.sign_at(self.clock.now(), payload)
    }
}

/// Signer view with a fixed proof creation time.
pub struct StampedSigner<'a> {
    /// Underlying signer.
    signer: &'a Ed25519Signer,
    /// Creation time stamped into proofs.
    created: Timestamp,
}

impl Signer for StampedSigner<'_> {
    fn domain(&self) -> &str {
        &self.signer.domain
    }

    fn sign(&self, payload: &[u8]) -> Result<Proof, SignError> {
        self.signer.sign_at(self.created, payload)
    }
}

// ============================================================================
// SECTION: Key Generation
// ============================================================================

/// Generates a random ed25519 signing key from the OS entropy source.
#[must_use]
pub fn generate_signing_key() -> SigningKey {
    let mut secret = [0u8; KEY_LENGTH];
    OsRng.fill_bytes(&mut secret);
    SigningKey::from_bytes(&secret)
}
