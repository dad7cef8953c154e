// crates/swan-core/tests/common/mod.rs
// =============================================================================
// Module: Core Test Helpers
// Description: Deterministic signer/verifier and entity fixtures.
// Purpose: Exercise proof handling without a real signature scheme.
// =============================================================================

#![allow(dead_code, reason = "Test helpers are selectively used across suites.")]

use std::collections::BTreeMap;

use sha2::Digest;
use sha2::Sha256;
use swan_core::Proof;
use swan_core::SignError;
use swan_core::Signer;
use swan_core::Timestamp;
use swan_core::TrustScheme;
use swan_core::VerifyError;
use swan_core::Verifier;
use swan_core::signed_message;

/// Issuing domain used by default fixtures.
pub const ISSUER: &str = "issuer.example";
/// Shared secret used by default fixtures.
pub const SECRET: &[u8] = b"test-secret";
/// Proof creation time used by default fixtures.
pub const CREATED: Timestamp = Timestamp::from_unix_seconds(1_700_000_000);

/// Keyed SHA-256 over the signed message.
fn mac(secret: &[u8], message: &[u8]) -> Vec<u8> {
    let mut hasher = Sha256::new();
    hasher.update(secret);
    hasher.update(message);
    hasher.finalize().to_vec()
}

/// Deterministic signer for tests.
pub struct HashSigner {
    /// Issuing domain.
    pub domain: String,
    /// Shared secret.
    pub secret: Vec<u8>,
    /// Timestamp stamped into proofs.
    pub created: Timestamp,
}

impl HashSigner {
    /// Returns the default fixture signer.
    pub fn fixture() -> Self {
        Self {
            domain: ISSUER.to_string(),
            secret: SECRET.to_vec(),
            created: CREATED,
        }
    }
}

impl Signer for HashSigner {
    fn domain(&self) -> &str {
        &self.domain
    }

    fn sign(&self, payload: &[u8]) -> Result<Proof, SignError> {
        let message = signed_message(&self.domain, self.created, payload)
            .map_err(|err| SignError::Failed(err.to_string()))?;
        Ok(Proof::new(self.domain.clone(), self.created, mac(&self.secret, &message)))
    }
}

/// Deterministic verifier for tests.
#[derive(Default)]
pub struct HashVerifier {
    /// Secrets by issuing domain.
    pub secrets: BTreeMap<String, Vec<u8>>,
}

impl HashVerifier {
    /// Returns a verifier that knows the default fixture issuer.
    pub fn fixture() -> Self {
        let mut verifier = Self::default();
        verifier.secrets.insert(ISSUER.to_string(), SECRET.to_vec());
        verifier
    }
}

impl Verifier for HashVerifier {
    fn verify(&self, proof: &Proof, payload: &[u8], scheme: &TrustScheme) -> Result<bool, VerifyError> {
        if !scheme.permits(proof.domain()) {
            return Ok(false);
        }
        let secret = self.secrets.get(proof.domain()).ok_or_else(|| VerifyError::UnknownIssuer {
            domain: proof.domain().to_string(),
        })?;
        if proof.signature().len() != 32 {
            return Err(VerifyError::MalformedSignature);
        }
        let message = signed_message(proof.domain(), proof.created(), payload)
            .map_err(|err| VerifyError::Unavailable(err.to_string()))?;
        Ok(mac(secret, &message) == proof.signature())
    }
}
