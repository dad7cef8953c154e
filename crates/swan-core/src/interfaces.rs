// crates/swan-core/src/interfaces.rs
// ============================================================================
// Module: SWAN Collaborator Interfaces
// Description: Contracts for the signer/verifier and storage-network collaborators.
// Purpose: Keep signature algorithms and replication out of the core.
// Dependencies: crate::{model, pair, proof}, serde, thiserror
// ============================================================================

//! ## Overview
//! The core never signs, verifies, or stores anything itself. It hands exact
//! byte ranges to a [`Signer`] or [`Verifier`] and exchanges [`Pair`]
//! sequences with a [`StorageNetwork`]. Implementations must be synchronous
//! and must surface timeouts or transport failures as ordinary errors.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use crate::model::ModelKey;
use crate::pair::Pair;
use crate::proof::Proof;

// ============================================================================
// SECTION: Trust Scheme
// ============================================================================

/// Which issuers a verification call is prepared to accept.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", content = "domains", rename_all = "snake_case")]
pub enum TrustScheme {
    /// Any issuer whose key the verifier knows.
    #[default]
    AnyKnownIssuer,
    /// Only the listed issuing domains.
    Issuers(BTreeSet<String>),
}

impl TrustScheme {
    /// Builds a scheme restricted to the given domains.
    #[must_use]
    pub fn issuers<I, S>(domains: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Issuers(domains.into_iter().map(Into::into).collect())
    }

    /// Returns true when `domain` may be trusted under this scheme.
    #[must_use]
    pub fn permits(&self, domain: &str) -> bool {
        match self {
            Self::AnyKnownIssuer => true,
            Self::Issuers(domains) => domains.contains(domain),
        }
    }
}

// ============================================================================
// SECTION: Signer / Verifier
// ============================================================================

/// Errors raised by a signing collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SignError {
    /// The signer could not produce a proof.
    #[error("signing failed: {0}")]
    Failed(String),
}

/// Errors raised by a verifying collaborator.
///
/// A signature that simply does not check out is `Ok(false)`, never an error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VerifyError {
    /// No key is known for the issuing domain.
    #[error("no verifying key for issuer {domain}")]
    UnknownIssuer {
        /// Issuing domain named by the proof.
        domain: String,
    },
    /// Signature bytes have the wrong shape for the scheme.
    #[error("malformed signature bytes")]
    MalformedSignature,
    /// The verifier failed for another reason (I/O, timeout).
    #[error("verifier unavailable: {0}")]
    Unavailable(String),
}

/// Signing collaborator owned by the issuing party.
pub trait Signer {
    /// Returns the domain stamped into produced proofs.
    fn domain(&self) -> &str;

    /// Signs the exact payload bytes and returns a proof envelope.
    ///
    /// # Errors
    ///
    /// Returns [`SignError`] when the signature cannot be produced.
    fn sign(&self, payload: &[u8]) -> Result<Proof, SignError>;
}

/// Verifying collaborator holding issuer public keys.
pub trait Verifier {
    /// Verifies `proof` over the recomputed payload bytes.
    ///
    /// # Errors
    ///
    /// Returns [`VerifyError`] when verification cannot be attempted.
    fn verify(&self, proof: &Proof, payload: &[u8], scheme: &TrustScheme) -> Result<bool, VerifyError>;
}

// ============================================================================
// SECTION: Storage Network
// ============================================================================

/// Errors raised by a storage-network collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StorageError {
    /// The storage network rejected or could not complete the operation.
    #[error("storage network error: {0}")]
    Unavailable(String),
}

/// Storage-network collaborator exchanging [`Pair`] sequences.
pub trait StorageNetwork {
    /// Persists pairs, replacing any previous pair with the same key.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] when the pairs cannot be stored.
    fn store(&self, pairs: &[Pair]) -> Result<(), StorageError>;

    /// Fetches the most recent pair for each requested key that exists.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] when the fetch cannot be completed.
    fn fetch(&self, keys: &[ModelKey]) -> Result<Vec<Pair>, StorageError>;
}
