// crates/swan-core/src/entity.rs
// ============================================================================
// Module: SWAN Entity Base
// Description: Versioned header, encode/decode skeleton, and proof binding.
// Purpose: Give every concrete entity the same structure and proof handling.
// Dependencies: crate::{codec, interfaces, proof}, base64, serde, thiserror
// ============================================================================

//! ## Overview
//! Every concrete entity embeds an [`EntityHeader`] and implements
//! [`Entity`] by supplying only its payload writer and reader. The provided
//! methods implement the shared skeleton:
//!
//! - `encode`: version, then payload. This is the exact byte range signed.
//! - `encode_with_proof`: `encode` followed by the proof envelope.
//! - `decode`: version gate, payload, then an optional trailing proof.
//!
//! Verification uses an explicit two-step binding: the decoded entity is
//! asked for [`Entity::attach_self_as_proof_target`], which returns a
//! borrow-scoped [`BoundProof`] holding a non-owning reference back to the
//! entity for the duration of the verify call.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::io::Write;

use base64::Engine;
use base64::engine::general_purpose::STANDARD as Base64;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use crate::codec::CodecError;
use crate::codec::Reader;
use crate::codec::Writer;
use crate::interfaces::SignError;
use crate::interfaces::Signer;
use crate::interfaces::TrustScheme;
use crate::interfaces::VerifyError;
use crate::interfaces::Verifier;
use crate::proof::Proof;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Format version written by every encode.
pub const ENTITY_VERSION: u8 = 1;
/// Oldest format version accepted on decode.
pub const MIN_SUPPORTED_VERSION: u8 = 1;
/// Newest format version accepted on decode.
pub const MAX_SUPPORTED_VERSION: u8 = 1;

// ============================================================================
// SECTION: Entity Kind
// ============================================================================

/// Closed set of concrete entity types, used for error context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    /// Signed opaque byte array.
    ByteArray,
    /// Email address claim.
    Email,
    /// Salt used for signed-in identifier derivation.
    Salt,
    /// Browser or signed-in identifier.
    Identifier,
    /// Personalization preference flag.
    Preferences,
    /// Ordered list of strings (stop-list, state).
    StringArray,
    /// Advertising opportunity bundle.
    Seed,
    /// Bid value claim attached to a node.
    Claim,
    /// Winning bid response.
    Bid,
    /// Failed bid response.
    Failed,
    /// Empty bid response.
    Empty,
    /// Response envelope whose variant tag has not been read yet.
    Response,
}

impl EntityKind {
    /// Returns a stable label for the kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ByteArray => "byte_array",
            Self::Email => "email",
            Self::Salt => "salt",
            Self::Identifier => "identifier",
            Self::Preferences => "preferences",
            Self::StringArray => "string_array",
            Self::Seed => "seed",
            Self::Claim => "claim",
            Self::Bid => "bid",
            Self::Failed => "failed",
            Self::Empty => "empty",
            Self::Response => "response",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors raised while encoding, decoding, signing, or verifying an entity.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EntityError {
    /// Primitive codec failure in the header or payload.
    #[error(transparent)]
    Codec(#[from] CodecError),
    /// Header version outside the supported range.
    #[error("{kind} version {version} is outside the supported range {min}..={max}")]
    UnsupportedVersion {
        /// Entity being decoded.
        kind: EntityKind,
        /// Version found in the header.
        version: u8,
        /// Minimum supported version.
        min: u8,
        /// Maximum supported version.
        max: u8,
    },
    /// Response envelope tag does not match the requested variant.
    #[error("{expected} decoder received a response envelope tagged {tag}")]
    VariantMismatch {
        /// Variant the caller asked for.
        expected: EntityKind,
        /// Tag found in the envelope.
        tag: u8,
    },
    /// Response envelope tag names no known variant.
    #[error("unknown response envelope tag {tag}")]
    UnknownVariant {
        /// Tag found in the envelope.
        tag: u8,
    },
    /// Proof bytes are missing or malformed.
    #[error("invalid proof on {kind}: {reason}")]
    InvalidProof {
        /// Entity carrying the proof.
        kind: EntityKind,
        /// Failure description.
        reason: String,
    },
    /// Base64 transport text is malformed.
    #[error("invalid base64 for {kind}: {reason}")]
    Base64 {
        /// Entity being decoded.
        kind: EntityKind,
        /// Decoder error description.
        reason: String,
    },
    /// The entity kind is never independently signed.
    #[error("{kind} entities are never signed")]
    Unsignable {
        /// Entity being signed.
        kind: EntityKind,
    },
    /// The signing collaborator failed.
    #[error("signing {kind} failed: {source}")]
    Sign {
        /// Entity being signed.
        kind: EntityKind,
        /// Collaborator error.
        source: SignError,
    },
    /// The verifying collaborator failed.
    #[error("verifying {kind} failed: {source}")]
    Verify {
        /// Entity being verified.
        kind: EntityKind,
        /// Collaborator error.
        source: VerifyError,
    },
}

impl EntityError {
    /// Returns a stable label for logs.
    #[must_use]
    pub const fn kind_label(&self) -> &'static str {
        match self {
            Self::Codec(_) => "codec",
            Self::UnsupportedVersion {
                ..
            } => "unsupported_version",
            Self::VariantMismatch {
                ..
            } => "variant_mismatch",
            Self::UnknownVariant {
                ..
            } => "unknown_variant",
            Self::InvalidProof {
                ..
            } => "invalid_proof",
            Self::Base64 {
                ..
            } => "base64",
            Self::Unsignable {
                ..
            } => "unsignable",
            Self::Sign {
                ..
            } => "sign",
            Self::Verify {
                ..
            } => "verify",
        }
    }
}

// ============================================================================
// SECTION: Entity Header
// ============================================================================

/// Common header embedded in every entity: format version plus optional proof.
///
/// # Invariants
/// - The entity owns its proof; the proof never refers back to the entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityHeader {
    /// Format version the entity was decoded with or created at.
    #[serde(default = "current_version")]
    version: u8,
    /// Attached proof, when the entity has been signed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    proof: Option<Proof>,
}

/// Serde default for header versions.
const fn current_version() -> u8 {
    ENTITY_VERSION
}

impl Default for EntityHeader {
    fn default() -> Self {
        Self::new()
    }
}

impl EntityHeader {
    /// Creates an unsigned header at the current version.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            version: ENTITY_VERSION,
            proof: None,
        }
    }

    /// Creates a header with an explicit version, used by decoders and tests.
    #[must_use]
    pub const fn with_version(version: u8) -> Self {
        Self {
            version,
            proof: None,
        }
    }

    /// Returns the format version.
    #[must_use]
    pub const fn version(&self) -> u8 {
        self.version
    }

    /// Returns the attached proof.
    #[must_use]
    pub const fn proof(&self) -> Option<&Proof> {
        self.proof.as_ref()
    }

    /// Attaches a proof, replacing any previous one.
    pub fn set_proof(&mut self, proof: Proof) {
        self.proof = Some(proof);
    }

    /// Detaches and returns the proof.
    pub const fn take_proof(&mut self) -> Option<Proof> {
        self.proof.take()
    }

    /// Returns true when the version lies in the supported range.
    #[must_use]
    pub const fn is_supported(&self) -> bool {
        self.version >= MIN_SUPPORTED_VERSION && self.version <= MAX_SUPPORTED_VERSION
    }

    /// Fails when the version lies outside the supported range.
    ///
    /// # Errors
    ///
    /// Returns [`EntityError::UnsupportedVersion`] for out-of-range versions.
    pub const fn check_version(&self, kind: EntityKind) -> Result<(), EntityError> {
        if self.is_supported() {
            Ok(())
        } else {
            Err(EntityError::UnsupportedVersion {
                kind,
                version: self.version,
                min: MIN_SUPPORTED_VERSION,
                max: MAX_SUPPORTED_VERSION,
            })
        }
    }

    /// Reads and validates the version byte.
    pub(crate) fn read(reader: &mut Reader<'_>, kind: EntityKind) -> Result<Self, EntityError> {
        let header = Self::with_version(reader.read_u8("version")?);
        header.check_version(kind)?;
        Ok(header)
    }
}

// ============================================================================
// SECTION: Entity Trait
// ============================================================================

/// Shared encode/decode/sign/verify skeleton for concrete entities.
///
/// Implementors provide header access and the type-specific payload codec.
/// The provided methods must not be overridden.
pub trait Entity: Sized {
    /// Concrete kind reported in errors.
    const KIND: EntityKind;
    /// Whether the kind carries its own proof.
    const SIGNABLE: bool = true;

    /// Returns the embedded header.
    fn header(&self) -> &EntityHeader;

    /// Returns the embedded header mutably.
    fn header_mut(&mut self) -> &mut EntityHeader;

    /// Writes the type-specific payload fields.
    ///
    /// # Errors
    ///
    /// Returns [`EntityError`] when a field fails to encode.
    fn write_payload<W: Write>(&self, writer: &mut Writer<W>) -> Result<(), EntityError>;

    /// Reads the type-specific payload fields following a validated header.
    ///
    /// # Errors
    ///
    /// Returns [`EntityError`] when a field fails to decode.
    fn read_payload(header: EntityHeader, reader: &mut Reader<'_>) -> Result<Self, EntityError>;

    /// Returns the attached proof.
    fn proof(&self) -> Option<&Proof> {
        self.header().proof()
    }

    /// Encodes version and payload, without the proof.
    ///
    /// # Errors
    ///
    /// Returns [`EntityError`] when a field fails to encode.
    fn encode(&self) -> Result<Vec<u8>, EntityError> {
        let mut writer = Writer::new();
        writer.write_u8("version", ENTITY_VERSION)?;
        self.write_payload(&mut writer)?;
        Ok(writer.into_bytes())
    }

    /// Encodes version, payload, and the attached proof when present.
    ///
    /// Unsignable kinds never carry a proof on the wire.
    ///
    /// # Errors
    ///
    /// Returns [`EntityError`] when a field or the proof fails to encode.
    fn encode_with_proof(&self) -> Result<Vec<u8>, EntityError> {
        let mut bytes = self.encode()?;
        if !Self::SIGNABLE {
            return Ok(bytes);
        }
        if let Some(proof) = self.proof() {
            let mut writer = Writer::from_sink(&mut bytes);
            proof.write_to(&mut writer)?;
        }
        Ok(bytes)
    }

    /// Decodes an entity, reading a trailing proof when bytes remain.
    ///
    /// # Errors
    ///
    /// Returns [`EntityError::UnsupportedVersion`] for a bad header,
    /// payload errors unchanged, or [`EntityError::InvalidProof`] for
    /// malformed trailing proof bytes.
    fn decode(bytes: &[u8]) -> Result<Self, EntityError> {
        let mut reader = Reader::new(bytes);
        let header = EntityHeader::read(&mut reader, Self::KIND)?;
        let mut entity = Self::read_payload(header, &mut reader)?;
        if reader.is_empty() {
            return Ok(entity);
        }
        if !Self::SIGNABLE {
            return Err(EntityError::InvalidProof {
                kind: Self::KIND,
                reason: format!("{} unexpected trailing bytes", reader.remaining()),
            });
        }
        let proof = Proof::read_from(&mut reader).map_err(|err| EntityError::InvalidProof {
            kind: Self::KIND,
            reason: err.to_string(),
        })?;
        if !reader.is_empty() {
            return Err(EntityError::InvalidProof {
                kind: Self::KIND,
                reason: format!("{} trailing bytes after proof", reader.remaining()),
            });
        }
        entity.header_mut().set_proof(proof);
        Ok(entity)
    }

    /// Decodes an entity that must carry a proof.
    ///
    /// # Errors
    ///
    /// Returns [`EntityError::InvalidProof`] when no proof is present, or any
    /// error from [`Entity::decode`].
    fn decode_signed(bytes: &[u8]) -> Result<Self, EntityError> {
        let entity = Self::decode(bytes)?;
        if entity.proof().is_none() {
            return Err(EntityError::InvalidProof {
                kind: Self::KIND,
                reason: "missing proof".to_string(),
            });
        }
        Ok(entity)
    }

    /// Encodes the full wire format as standard base64.
    ///
    /// # Errors
    ///
    /// Returns [`EntityError`] when encoding fails.
    fn to_base64(&self) -> Result<String, EntityError> {
        Ok(Base64.encode(self.encode_with_proof()?))
    }

    /// Decodes the full wire format from standard base64.
    ///
    /// # Errors
    ///
    /// Returns [`EntityError::Base64`] for malformed text or any decode error.
    fn from_base64(text: &str) -> Result<Self, EntityError> {
        let bytes = Base64.decode(text.trim()).map_err(|err| EntityError::Base64 {
            kind: Self::KIND,
            reason: err.to_string(),
        })?;
        Self::decode(&bytes)
    }

    /// Signs the entity's `encode()` bytes and attaches the resulting proof.
    ///
    /// # Errors
    ///
    /// Returns [`EntityError::Unsignable`] for kinds that are never signed, or
    /// the encode/sign failure.
    fn sign<S: Signer + ?Sized>(&mut self, signer: &S) -> Result<(), EntityError> {
        if !Self::SIGNABLE {
            return Err(EntityError::Unsignable {
                kind: Self::KIND,
            });
        }
        let payload = self.encode()?;
        let proof = signer.sign(&payload).map_err(|source| EntityError::Sign {
            kind: Self::KIND,
            source,
        })?;
        self.header_mut().set_proof(proof);
        Ok(())
    }

    /// Binds the attached proof to this entity for verification.
    ///
    /// # Errors
    ///
    /// Returns [`EntityError::InvalidProof`] when no proof is attached.
    fn attach_self_as_proof_target(&self) -> Result<BoundProof<'_, Self>, EntityError> {
        let proof = self.proof().ok_or_else(|| EntityError::InvalidProof {
            kind: Self::KIND,
            reason: "missing proof".to_string(),
        })?;
        Ok(BoundProof {
            target: self,
            proof,
        })
    }

    /// Verifies the attached proof against this entity's `encode()` bytes.
    ///
    /// # Errors
    ///
    /// Returns [`EntityError`] when no proof is attached, the version is
    /// unsupported, or the verifier cannot complete.
    fn verify<V: Verifier + ?Sized>(&self, verifier: &V, scheme: &TrustScheme) -> Result<bool, EntityError> {
        self.attach_self_as_proof_target()?.verify(verifier, scheme)
    }
}

// ============================================================================
// SECTION: Bound Proof
// ============================================================================

/// A proof bound to its target entity for the duration of a borrow.
///
/// # Invariants
/// - `proof` is the proof attached to `target`.
#[derive(Debug)]
pub struct BoundProof<'a, E: Entity> {
    /// Entity the proof signs.
    target: &'a E,
    /// Proof attached to the entity.
    proof: &'a Proof,
}

impl<'a, E: Entity> BoundProof<'a, E> {
    /// Returns the bound proof.
    #[must_use]
    pub const fn proof(&self) -> &'a Proof {
        self.proof
    }

    /// Returns the bound target entity.
    #[must_use]
    pub const fn target(&self) -> &'a E {
        self.target
    }

    /// Recomputes the exact bytes the proof signs.
    ///
    /// # Errors
    ///
    /// Returns [`EntityError`] when the target fails to encode.
    pub fn signed_bytes(&self) -> Result<Vec<u8>, EntityError> {
        self.target.encode()
    }

    /// Verifies the proof over the target's recomputed bytes.
    ///
    /// # Errors
    ///
    /// Returns [`EntityError::UnsupportedVersion`] when the target carries an
    /// unsupported version, or [`EntityError::Verify`] when the verifier fails.
    pub fn verify<V: Verifier + ?Sized>(&self, verifier: &V, scheme: &TrustScheme) -> Result<bool, EntityError> {
        self.target.header().check_version(E::KIND)?;
        let payload = self.signed_bytes()?;
        verifier.verify(self.proof, &payload, scheme).map_err(|source| EntityError::Verify {
            kind: E::KIND,
            source,
        })
    }
}

// ============================================================================
// SECTION: Serde Helpers
// ============================================================================

/// Serde adapter encoding byte vectors as standard base64 strings.
pub(crate) mod base64_bytes {
    use base64::Engine;
    use base64::engine::general_purpose::STANDARD as Base64;
    use serde::Deserialize;
    use serde::Deserializer;
    use serde::Serializer;
    use serde::de::Error as _;

    /// Serializes bytes as base64 text.
    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&Base64.encode(bytes))
    }

    /// Deserializes bytes from base64 text.
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let text = String::deserialize(deserializer)?;
        Base64.decode(text.as_bytes()).map_err(D::Error::custom)
    }
}

/// Serde adapter encoding sequences of byte vectors as base64 strings.
pub(crate) mod base64_byte_arrays {
    use base64::Engine;
    use base64::engine::general_purpose::STANDARD as Base64;
    use serde::Deserialize;
    use serde::Deserializer;
    use serde::Serializer;
    use serde::de::Error as _;
    use serde::ser::SerializeSeq;

    /// Serializes each byte vector as base64 text.
    pub fn serialize<S: Serializer>(values: &[Vec<u8>], serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(values.len()))?;
        for value in values {
            seq.serialize_element(&Base64.encode(value))?;
        }
        seq.end()
    }

    /// Deserializes each byte vector from base64 text.
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<Vec<u8>>, D::Error> {
        let texts = Vec::<String>::deserialize(deserializer)?;
        texts.iter().map(|text| Base64.decode(text.as_bytes()).map_err(D::Error::custom)).collect()
    }
}
