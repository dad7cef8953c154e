// crates/swan-core/src/proof.rs
// ============================================================================
// Module: SWAN Proof Envelope
// Description: Self-delimiting signature block appended to signed entities.
// Purpose: Bind an entity's canonical bytes to an issuing domain and timestamp.
// Dependencies: base64, serde, thiserror
// ============================================================================

//! ## Overview
//! A [`Proof`] is the signature block an issuing party appends after an
//! entity's payload. It never signs itself: the signed message is built by
//! [`signed_message`] from the proof header fields followed by the target
//! entity's proof-less encoding.
//!
//! Wire format: `[version:1][domain: string][created: i64 LE][signature: byte array]`.

// ============================================================================
// SECTION: Imports
// ============================================================================

use base64::Engine;
use base64::engine::general_purpose::STANDARD as Base64;
use serde::Deserialize;
use serde::Deserializer;
use serde::Serialize;
use serde::Serializer;
use serde::de::Error as _;
use thiserror::Error;

use crate::codec::CodecError;
use crate::codec::Reader;
use crate::codec::Writer;
use crate::time::Timestamp;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Current proof envelope version.
pub const PROOF_VERSION: u8 = 1;
/// Domain separation prefix for signed messages.
const SIGNED_MESSAGE_TAG: &str = "swan-proof-v1";

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors raised when reading a proof envelope.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProofError {
    /// Proof bytes were malformed.
    #[error(transparent)]
    Codec(#[from] CodecError),
    /// Proof version is not supported.
    #[error("unsupported proof version {0}")]
    UnsupportedVersion(u8),
    /// Proof base64 text was malformed.
    #[error("invalid proof base64: {0}")]
    Base64(String),
    /// Bytes remained after a standalone proof.
    #[error("{0} trailing bytes after proof")]
    TrailingBytes(usize),
}

// ============================================================================
// SECTION: Proof
// ============================================================================

/// Signature block issued by a SWAN participant.
///
/// # Invariants
/// - `domain` is the issuer's registrable domain and selects the verifying key.
/// - `signature` covers [`signed_message`] over the target entity's `encode()` bytes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Proof {
    /// Envelope format version.
    version: u8,
    /// Issuing domain.
    domain: String,
    /// Time the proof was created.
    created: Timestamp,
    /// Signature bytes produced by the issuer.
    signature: Vec<u8>,
}

impl Proof {
    /// Creates a proof envelope at the current version.
    #[must_use]
    pub fn new(domain: impl Into<String>, created: Timestamp, signature: Vec<u8>) -> Self {
        Self {
            version: PROOF_VERSION,
            domain: domain.into(),
            created,
            signature,
        }
    }

    /// Returns the envelope version.
    #[must_use]
    pub const fn version(&self) -> u8 {
        self.version
    }

    /// Returns the issuing domain.
    #[must_use]
    pub fn domain(&self) -> &str {
        &self.domain
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created(&self) -> Timestamp {
        self.created
    }

    /// Returns the signature bytes.
    #[must_use]
    pub fn signature(&self) -> &[u8] {
        &self.signature
    }

    /// Appends the envelope to a writer.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError`] when any field fails to encode.
    pub fn write_to<W: std::io::Write>(&self, writer: &mut Writer<W>) -> Result<(), CodecError> {
        writer.write_u8("proof.version", self.version)?;
        writer.write_string("proof.domain", &self.domain)?;
        writer.write_i64("proof.created", self.created.as_unix_seconds())?;
        writer.write_byte_array("proof.signature", &self.signature)
    }

    /// Reads one envelope from a reader, leaving any following bytes unread.
    ///
    /// # Errors
    ///
    /// Returns [`ProofError`] when the envelope is malformed or unsupported.
    pub fn read_from(reader: &mut Reader<'_>) -> Result<Self, ProofError> {
        let version = reader.read_u8("proof.version")?;
        if version != PROOF_VERSION {
            return Err(ProofError::UnsupportedVersion(version));
        }
        let domain = reader.read_string("proof.domain")?;
        let created = Timestamp::from_unix_seconds(reader.read_i64("proof.created")?);
        let signature = reader.read_byte_array("proof.signature")?;
        Ok(Self {
            version,
            domain,
            created,
            signature,
        })
    }

    /// Encodes the envelope on its own.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError`] when any field fails to encode.
    pub fn to_bytes(&self) -> Result<Vec<u8>, CodecError> {
        let mut writer = Writer::new();
        self.write_to(&mut writer)?;
        Ok(writer.into_bytes())
    }

    /// Decodes a standalone envelope, rejecting trailing bytes.
    ///
    /// # Errors
    ///
    /// Returns [`ProofError`] when the bytes are not exactly one envelope.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ProofError> {
        let mut reader = Reader::new(bytes);
        let proof = Self::read_from(&mut reader)?;
        if !reader.is_empty() {
            return Err(ProofError::TrailingBytes(reader.remaining()));
        }
        Ok(proof)
    }

    /// Encodes the envelope as standard base64.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError`] when any field fails to encode.
    pub fn to_base64(&self) -> Result<String, CodecError> {
        Ok(Base64.encode(self.to_bytes()?))
    }

    /// Decodes a standalone envelope from standard base64.
    ///
    /// # Errors
    ///
    /// Returns [`ProofError`] when the text or envelope is malformed.
    pub fn from_base64(text: &str) -> Result<Self, ProofError> {
        let bytes = Base64.decode(text.trim()).map_err(|err| ProofError::Base64(err.to_string()))?;
        Self::from_bytes(&bytes)
    }
}

// ============================================================================
// SECTION: Signed Message
// ============================================================================

/// Builds the exact message a signer signs for `payload`.
///
/// The message binds the issuing domain and creation time to the target
/// entity's proof-less encoding so a proof cannot be replayed under a
/// different issuer or date.
///
/// # Errors
///
/// Returns [`CodecError`] when the domain contains a nul byte.
pub fn signed_message(domain: &str, created: Timestamp, payload: &[u8]) -> Result<Vec<u8>, CodecError> {
    let mut writer = Writer::new();
    writer.write_string("proof.tag", SIGNED_MESSAGE_TAG)?;
    writer.write_string("proof.domain", domain)?;
    writer.write_i64("proof.created", created.as_unix_seconds())?;
    writer.write_byte_array("proof.payload", payload)?;
    Ok(writer.into_bytes())
}

// ============================================================================
// SECTION: Serde
// ============================================================================

impl Serialize for Proof {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let text = self.to_base64().map_err(serde::ser::Error::custom)?;
        serializer.serialize_str(&text)
    }
}

impl<'de> Deserialize<'de> for Proof {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Self::from_base64(&text).map_err(D::Error::custom)
    }
}
