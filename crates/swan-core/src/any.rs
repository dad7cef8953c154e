// crates/swan-core/src/any.rs
// ============================================================================
// Module: SWAN Any Entity
// Description: Closed tagged union over every concrete entity type.
// Purpose: Inspect and verify an entity whose type is known only by its key.
// Dependencies: crate::{entities, entity, interfaces, model, proof, response}, serde
// ============================================================================

//! ## Overview
//! [`AnyEntity`] selects a decoder from a storage or cookie key. Keys the
//! decoder does not recognise land in the [`AnyEntity::Unknown`] arm with
//! their raw bytes, so newer participants' keys pass through untouched.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Serialize;

use crate::entities::Claim;
use crate::entities::Email;
use crate::entities::Identifier;
use crate::entities::Preferences;
use crate::entities::Salt;
use crate::entities::Seed;
use crate::entities::StringArray;
use crate::entity::Entity;
use crate::entity::EntityError;
use crate::entity::EntityHeader;
use crate::entity::EntityKind;
use crate::interfaces::TrustScheme;
use crate::interfaces::Verifier;
use crate::model::ModelKey;
use crate::proof::Proof;
use crate::response::Bid;
use crate::response::Empty;
use crate::response::Failed;

// ============================================================================
// SECTION: Keys
// ============================================================================

/// Key of a seed outside the model.
pub const SEED_KEY: &str = "seed";
/// Key of a bid response.
pub const BID_KEY: &str = "bid";
/// Key of a failed response.
pub const FAILED_KEY: &str = "failed";
/// Key of an empty response.
pub const EMPTY_KEY: &str = "empty";
/// Key of a bid-value claim.
pub const CLAIM_KEY: &str = "claim";

// ============================================================================
// SECTION: Any Entity
// ============================================================================

/// Any decoded entity, selected by key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "key", content = "entity", rename_all = "snake_case")]
pub enum AnyEntity {
    /// Random browser identifier.
    Rid(Identifier),
    /// Signed-in identifier.
    Sid(Identifier),
    /// Email claim.
    Email(Email),
    /// Salt claim.
    Salt(Salt),
    /// Preferences.
    Pref(Preferences),
    /// Stopped domains.
    Stop(StringArray),
    /// Opaque caller state.
    State(StringArray),
    /// Advertising opportunity.
    Seed(Seed),
    /// Winning bid.
    Bid(Bid),
    /// Failed evaluation.
    Failed(Failed),
    /// No bid.
    Empty(Empty),
    /// Bid-value claim.
    Claim(Claim),
    /// Unrecognised key.
    Unknown {
        /// Key as received.
        key: String,
        /// Raw bytes as received.
        bytes: Vec<u8>,
    },
}

impl AnyEntity {
    /// Decodes `bytes` with the decoder selected by `key`.
    ///
    /// # Errors
    ///
    /// Returns [`EntityError`] when a recognised key's bytes fail to decode.
    pub fn decode(key: &str, bytes: &[u8]) -> Result<Self, EntityError> {
        if let Some(model_key) = ModelKey::parse(key) {
            return Ok(match model_key {
                ModelKey::Rid => Self::Rid(Identifier::decode(bytes)?),
                ModelKey::Sid => Self::Sid(Identifier::decode(bytes)?),
                ModelKey::Email => Self::Email(Email::decode(bytes)?),
                ModelKey::Salt => Self::Salt(Salt::decode(bytes)?),
                ModelKey::Pref => Self::Pref(Preferences::decode(bytes)?),
                ModelKey::Stop => Self::Stop(StringArray::decode(bytes)?),
                ModelKey::State => Self::State(StringArray::decode(bytes)?),
            });
        }
        Ok(match key {
            SEED_KEY => Self::Seed(Seed::decode(bytes)?),
            BID_KEY => Self::Bid(Bid::decode(bytes)?),
            FAILED_KEY => Self::Failed(Failed::decode(bytes)?),
            EMPTY_KEY => Self::Empty(Empty::decode(bytes)?),
            CLAIM_KEY => Self::Claim(Claim::decode(bytes)?),
            _ => Self::Unknown {
                key: key.to_string(),
                bytes: bytes.to_vec(),
            },
        })
    }

    /// Returns the entity kind, or `None` for unknown keys.
    #[must_use]
    pub const fn kind(&self) -> Option<EntityKind> {
        Some(match self {
            Self::Rid(_) | Self::Sid(_) => EntityKind::Identifier,
            Self::Email(_) => EntityKind::Email,
            Self::Salt(_) => EntityKind::Salt,
            Self::Pref(_) => EntityKind::Preferences,
            Self::Stop(_) | Self::State(_) => EntityKind::StringArray,
            Self::Seed(_) => EntityKind::Seed,
            Self::Bid(_) => EntityKind::Bid,
            Self::Failed(_) => EntityKind::Failed,
            Self::Empty(_) => EntityKind::Empty,
            Self::Claim(_) => EntityKind::Claim,
            Self::Unknown {
                ..
            } => return None,
        })
    }

    /// Returns the header of a known entity.
    #[must_use]
    pub fn header(&self) -> Option<&EntityHeader> {
        Some(match self {
            Self::Rid(entity) | Self::Sid(entity) => entity.header(),
            Self::Email(entity) => entity.header(),
            Self::Salt(entity) => entity.header(),
            Self::Pref(entity) => entity.header(),
            Self::Stop(entity) | Self::State(entity) => entity.header(),
            Self::Seed(entity) => entity.header(),
            Self::Bid(entity) => entity.header(),
            Self::Failed(entity) => entity.header(),
            Self::Empty(entity) => entity.header(),
            Self::Claim(entity) => entity.header(),
            Self::Unknown {
                ..
            } => return None,
        })
    }

    /// Returns the format version, or `None` for unknown keys.
    #[must_use]
    pub fn version(&self) -> Option<u8> {
        self.header().map(EntityHeader::version)
    }

    /// Returns the attached proof.
    #[must_use]
    pub fn proof(&self) -> Option<&Proof> {
        self.header().and_then(EntityHeader::proof)
    }

    /// Verifies the attached proof.
    ///
    /// Returns `Ok(None)` when there is nothing to verify: the key is unknown
    /// or the entity carries no proof.
    ///
    /// # Errors
    ///
    /// Returns [`EntityError`] when the verifier fails.
    pub fn verify<V: Verifier + ?Sized>(&self, verifier: &V, scheme: &TrustScheme) -> Result<Option<bool>, EntityError> {
        if self.proof().is_none() {
            return Ok(None);
        }
        let verified = match self {
            Self::Rid(entity) | Self::Sid(entity) => entity.verify(verifier, scheme),
            Self::Email(entity) => entity.verify(verifier, scheme),
            Self::Salt(entity) => entity.verify(verifier, scheme),
            Self::Pref(entity) => entity.verify(verifier, scheme),
            Self::Stop(entity) | Self::State(entity) => entity.verify(verifier, scheme),
            Self::Seed(entity) => entity.verify(verifier, scheme),
            Self::Bid(entity) => entity.verify(verifier, scheme),
            Self::Failed(entity) => entity.verify(verifier, scheme),
            Self::Empty(entity) => entity.verify(verifier, scheme),
            Self::Claim(entity) => entity.verify(verifier, scheme),
            Self::Unknown {
                ..
            } => return Ok(None),
        }?;
        Ok(Some(verified))
    }
}
