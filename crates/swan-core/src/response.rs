// crates/swan-core/src/response.rs
// ============================================================================
// Module: SWAN Response Variants
// Description: Bid, Failed, and Empty auction outcomes in a tagged envelope.
// Purpose: Encode mutually exclusive outcomes with a strict discriminant.
// Dependencies: crate::{codec, entity, interfaces, proof}, serde
// ============================================================================

//! ## Overview
//! Every response shares the envelope `[version][tag][fields][proof]`. Each
//! variant writes its own tag during `write_payload`, so a caller can never
//! produce a mislabeled envelope. Decoding into a variant checks the tag and
//! fails with [`EntityError::VariantMismatch`] instead of coercing.
//! [`Response`] decodes an envelope of unknown variant by peeking the tag.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io::Write;

use serde::Deserialize;
use serde::Serialize;

use crate::codec::Reader;
use crate::codec::Writer;
use crate::entity::Entity;
use crate::entity::EntityError;
use crate::entity::EntityHeader;
use crate::entity::EntityKind;
use crate::interfaces::TrustScheme;
use crate::interfaces::Verifier;
use crate::proof::Proof;

// ============================================================================
// SECTION: Response Tag
// ============================================================================

/// Envelope discriminant for response variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ResponseTag {
    /// Winning bid.
    Bid = 1,
    /// Failed evaluation.
    Failed = 2,
    /// No bid.
    Empty = 3,
}

impl ResponseTag {
    /// Returns the wire byte.
    #[must_use]
    pub const fn as_u8(self) -> u8 {
        self as u8
    }

    /// Parses a wire byte.
    #[must_use]
    pub const fn from_u8(value: u8) -> Option<Self> {
        match value {
            1 => Some(Self::Bid),
            2 => Some(Self::Failed),
            3 => Some(Self::Empty),
            _ => None,
        }
    }

    /// Returns the entity kind of the tagged variant.
    #[must_use]
    pub const fn kind(self) -> EntityKind {
        match self {
            Self::Bid => EntityKind::Bid,
            Self::Failed => EntityKind::Failed,
            Self::Empty => EntityKind::Empty,
        }
    }
}

/// Reads the tag and fails unless it matches `expected`.
fn expect_tag(reader: &mut Reader<'_>, expected: ResponseTag) -> Result<(), EntityError> {
    let tag = reader.read_u8("response.tag")?;
    if tag == expected.as_u8() {
        Ok(())
    } else {
        Err(EntityError::VariantMismatch {
            expected: expected.kind(),
            tag,
        })
    }
}

// ============================================================================
// SECTION: Bid
// ============================================================================

/// Winning bid with the creative to display.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Bid {
    /// Version and proof.
    #[serde(flatten)]
    header: EntityHeader,
    /// URL of the media to display.
    media_url: String,
    /// URL of the advertiser landing page.
    advertiser_url: String,
}

impl Bid {
    /// Creates an unsigned bid.
    #[must_use]
    pub fn new(media_url: impl Into<String>, advertiser_url: impl Into<String>) -> Self {
        Self {
            header: EntityHeader::new(),
            media_url: media_url.into(),
            advertiser_url: advertiser_url.into(),
        }
    }

    /// Returns the media URL.
    #[must_use]
    pub fn media_url(&self) -> &str {
        &self.media_url
    }

    /// Returns the advertiser URL.
    #[must_use]
    pub fn advertiser_url(&self) -> &str {
        &self.advertiser_url
    }

    /// Replaces the media URL.
    pub fn set_media_url(&mut self, media_url: impl Into<String>) {
        self.media_url = media_url.into();
    }

    /// Replaces the advertiser URL.
    pub fn set_advertiser_url(&mut self, advertiser_url: impl Into<String>) {
        self.advertiser_url = advertiser_url.into();
    }
}

impl Entity for Bid {
    const KIND: EntityKind = EntityKind::Bid;

    fn header(&self) -> &EntityHeader {
        &self.header
    }

    fn header_mut(&mut self) -> &mut EntityHeader {
        &mut self.header
    }

    fn write_payload<W: Write>(&self, writer: &mut Writer<W>) -> Result<(), EntityError> {
        writer.write_u8("response.tag", ResponseTag::Bid.as_u8())?;
        writer.write_string("bid.media_url", &self.media_url)?;
        writer.write_string("bid.advertiser_url", &self.advertiser_url)?;
        Ok(())
    }

    fn read_payload(header: EntityHeader, reader: &mut Reader<'_>) -> Result<Self, EntityError> {
        expect_tag(reader, ResponseTag::Bid)?;
        let media_url = reader.read_string("bid.media_url")?;
        let advertiser_url = reader.read_string("bid.advertiser_url")?;
        Ok(Self {
            header,
            media_url,
            advertiser_url,
        })
    }
}

// ============================================================================
// SECTION: Failed
// ============================================================================

/// Failed bid evaluation at a host.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Failed {
    /// Version and proof.
    #[serde(flatten)]
    header: EntityHeader,
    /// Host that failed.
    host: String,
    /// Failure description.
    error: String,
}

impl Failed {
    /// Creates an unsigned failure.
    #[must_use]
    pub fn new(host: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            header: EntityHeader::new(),
            host: host.into(),
            error: error.into(),
        }
    }

    /// Returns the failing host.
    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Returns the failure description.
    #[must_use]
    pub fn error(&self) -> &str {
        &self.error
    }

    /// Replaces the failing host.
    pub fn set_host(&mut self, host: impl Into<String>) {
        self.host = host.into();
    }

    /// Replaces the failure description.
    pub fn set_error(&mut self, error: impl Into<String>) {
        self.error = error.into();
    }
}

impl Entity for Failed {
    const KIND: EntityKind = EntityKind::Failed;

    fn header(&self) -> &EntityHeader {
        &self.header
    }

    fn header_mut(&mut self) -> &mut EntityHeader {
        &mut self.header
    }

    fn write_payload<W: Write>(&self, writer: &mut Writer<W>) -> Result<(), EntityError> {
        writer.write_u8("response.tag", ResponseTag::Failed.as_u8())?;
        writer.write_string("failed.host", &self.host)?;
        writer.write_string("failed.error", &self.error)?;
        Ok(())
    }

    fn read_payload(header: EntityHeader, reader: &mut Reader<'_>) -> Result<Self, EntityError> {
        expect_tag(reader, ResponseTag::Failed)?;
        let host = reader.read_string("failed.host")?;
        let error = reader.read_string("failed.error")?;
        Ok(Self {
            header,
            host,
            error,
        })
    }
}

// ============================================================================
// SECTION: Empty
// ============================================================================

/// No bid was made.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Empty {
    /// Version and proof.
    #[serde(flatten)]
    header: EntityHeader,
}

impl Empty {
    /// Creates an unsigned empty response.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            header: EntityHeader::new(),
        }
    }
}

impl Entity for Empty {
    const KIND: EntityKind = EntityKind::Empty;

    fn header(&self) -> &EntityHeader {
        &self.header
    }

    fn header_mut(&mut self) -> &mut EntityHeader {
        &mut self.header
    }

    fn write_payload<W: Write>(&self, writer: &mut Writer<W>) -> Result<(), EntityError> {
        writer.write_u8("response.tag", ResponseTag::Empty.as_u8())?;
        Ok(())
    }

    fn read_payload(header: EntityHeader, reader: &mut Reader<'_>) -> Result<Self, EntityError> {
        expect_tag(reader, ResponseTag::Empty)?;
        Ok(Self {
            header,
        })
    }
}

// ============================================================================
// SECTION: Any Response
// ============================================================================

/// A response envelope of any variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "entity", rename_all = "snake_case")]
pub enum Response {
    /// Winning bid.
    Bid(Bid),
    /// Failed evaluation.
    Failed(Failed),
    /// No bid.
    Empty(Empty),
}

impl Response {
    /// Decodes an envelope, selecting the variant from its tag.
    ///
    /// # Errors
    ///
    /// Returns [`EntityError::UnsupportedVersion`] for an out-of-range
    /// header, [`EntityError::UnknownVariant`] for unknown tags, or any error
    /// from the selected variant's decoder.
    pub fn decode(bytes: &[u8]) -> Result<Self, EntityError> {
        let mut reader = Reader::new(bytes);
        EntityHeader::read(&mut reader, EntityKind::Response)?;
        let tag = reader.read_u8("response.tag")?;
        match ResponseTag::from_u8(tag) {
            Some(ResponseTag::Bid) => Bid::decode(bytes).map(Self::Bid),
            Some(ResponseTag::Failed) => Failed::decode(bytes).map(Self::Failed),
            Some(ResponseTag::Empty) => Empty::decode(bytes).map(Self::Empty),
            None => Err(EntityError::UnknownVariant {
                tag,
            }),
        }
    }

    /// Returns the envelope tag.
    #[must_use]
    pub const fn tag(&self) -> ResponseTag {
        match self {
            Self::Bid(_) => ResponseTag::Bid,
            Self::Failed(_) => ResponseTag::Failed,
            Self::Empty(_) => ResponseTag::Empty,
        }
    }

    /// Returns the attached proof.
    #[must_use]
    pub fn proof(&self) -> Option<&Proof> {
        match self {
            Self::Bid(bid) => bid.proof(),
            Self::Failed(failed) => failed.proof(),
            Self::Empty(empty) => empty.proof(),
        }
    }

    /// Encodes the envelope with its proof.
    ///
    /// # Errors
    ///
    /// Returns [`EntityError`] when encoding fails.
    pub fn encode_with_proof(&self) -> Result<Vec<u8>, EntityError> {
        match self {
            Self::Bid(bid) => bid.encode_with_proof(),
            Self::Failed(failed) => failed.encode_with_proof(),
            Self::Empty(empty) => empty.encode_with_proof(),
        }
    }

    /// Verifies the attached proof.
    ///
    /// # Errors
    ///
    /// Returns [`EntityError`] when no proof is attached or the verifier fails.
    pub fn verify<V: Verifier + ?Sized>(&self, verifier: &V, scheme: &TrustScheme) -> Result<bool, EntityError> {
        match self {
            Self::Bid(bid) => bid.verify(verifier, scheme),
            Self::Failed(failed) => failed.verify(verifier, scheme),
            Self::Empty(empty) => empty.verify(verifier, scheme),
        }
    }
}
