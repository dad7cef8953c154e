// crates/swan-core/src/entities/identifier.rs
// ============================================================================
// Module: SWAN Identifier Entity
// Description: Signed browser or signed-in identifier.
// Purpose: Carry random (UUID) and derived (digest) identifiers.
// Dependencies: crate::{codec, entity, writeable}, serde, uuid
// ============================================================================

//! ## Overview
//! Random identifiers hold a 16-byte v4 UUID. Signed-in identifiers hold a
//! digest derived from an email and salt pair, so the value is stored as a
//! length-prefixed byte array rather than fixed 16 bytes. An identifier with
//! an empty value means "no identity" and is still a valid, signable entity.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io::Write;

use serde::Deserialize;
use serde::Serialize;
use uuid::Uuid;

use crate::codec::Reader;
use crate::codec::Writer;
use crate::entity::Entity;
use crate::entity::EntityError;
use crate::entity::EntityHeader;
use crate::entity::EntityKind;
use crate::entity::base64_bytes;
use crate::writeable::Writeable;
use crate::writeable::WriteableState;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Identifier type of random browser identifiers.
pub const ID_TYPE_RANDOM: &str = "rid";
/// Identifier type of signed-in identifiers.
pub const ID_TYPE_SIGNED_IN: &str = "sid";

// ============================================================================
// SECTION: Identifier
// ============================================================================

/// Signed identifier.
///
/// # Invariants
/// - `id_type` never contains a nul byte once encoded.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Identifier {
    /// Version and proof.
    #[serde(flatten)]
    header: EntityHeader,
    /// Cookie validity and persisted flag.
    #[serde(flatten)]
    state: WriteableState,
    /// Identifier type label.
    id_type: String,
    /// Identifier bytes.
    #[serde(with = "base64_bytes")]
    value: Vec<u8>,
}

impl Identifier {
    /// Creates an unsigned identifier from explicit bytes.
    #[must_use]
    pub fn new(id_type: impl Into<String>, value: impl Into<Vec<u8>>) -> Self {
        Self {
            header: EntityHeader::new(),
            state: WriteableState::new(),
            id_type: id_type.into(),
            value: value.into(),
        }
    }

    /// Creates an unsigned identifier holding a fresh v4 UUID.
    #[must_use]
    pub fn new_random(id_type: impl Into<String>) -> Self {
        Self::new(id_type, Uuid::new_v4().into_bytes().to_vec())
    }

    /// Returns the identifier type label.
    #[must_use]
    pub fn id_type(&self) -> &str {
        &self.id_type
    }

    /// Returns the identifier bytes.
    #[must_use]
    pub fn value(&self) -> &[u8] {
        &self.value
    }

    /// Replaces the identifier bytes.
    pub fn set_value(&mut self, value: impl Into<Vec<u8>>) {
        self.value = value.into();
    }

    /// Returns the value as a UUID when it is exactly 16 bytes.
    #[must_use]
    pub fn uuid(&self) -> Option<Uuid> {
        Uuid::from_slice(&self.value).ok()
    }

    /// Returns true when the identifier carries no bytes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }
}

impl Entity for Identifier {
    const KIND: EntityKind = EntityKind::Identifier;

    fn header(&self) -> &EntityHeader {
        &self.header
    }

    fn header_mut(&mut self) -> &mut EntityHeader {
        &mut self.header
    }

    fn write_payload<W: Write>(&self, writer: &mut Writer<W>) -> Result<(), EntityError> {
        writer.write_string("identifier.id_type", &self.id_type)?;
        writer.write_byte_array("identifier.value", &self.value)?;
        Ok(())
    }

    fn read_payload(header: EntityHeader, reader: &mut Reader<'_>) -> Result<Self, EntityError> {
        let id_type = reader.read_string("identifier.id_type")?;
        let value = reader.read_byte_array("identifier.value")?;
        Ok(Self {
            header,
            state: WriteableState::new(),
            id_type,
            value,
        })
    }
}

impl Writeable for Identifier {
    fn state(&self) -> &WriteableState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut WriteableState {
        &mut self.state
    }
}
