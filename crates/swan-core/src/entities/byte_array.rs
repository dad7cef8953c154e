// crates/swan-core/src/entities/byte_array.rs
// ============================================================================
// Module: SWAN Byte Array Entity
// Description: Signed opaque byte payload.
// Purpose: Carry arbitrary signed bytes without a type-specific schema.
// Dependencies: crate::{codec, entity}, serde
// ============================================================================

//! ## Overview
//! A [`ByteArray`] signs bytes whose meaning is agreed out of band. It has
//! no cookie state and is never stored as a model entry.

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
use crate::entity::base64_bytes;

/// Signed opaque byte payload.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ByteArray {
    /// Version and proof.
    #[serde(flatten)]
    header: EntityHeader,
    /// Payload bytes.
    #[serde(with = "base64_bytes")]
    value: Vec<u8>,
}

impl ByteArray {
    /// Creates an unsigned byte array.
    #[must_use]
    pub fn new(value: impl Into<Vec<u8>>) -> Self {
        Self {
            header: EntityHeader::new(),
            value: value.into(),
        }
    }

    /// Returns the payload bytes.
    #[must_use]
    pub fn value(&self) -> &[u8] {
        &self.value
    }

    /// Replaces the payload bytes.
    pub fn set_value(&mut self, value: impl Into<Vec<u8>>) {
        self.value = value.into();
    }
}

impl Entity for ByteArray {
    const KIND: EntityKind = EntityKind::ByteArray;

    fn header(&self) -> &EntityHeader {
        &self.header
    }

    fn header_mut(&mut self) -> &mut EntityHeader {
        &mut self.header
    }

    fn write_payload<W: Write>(&self, writer: &mut Writer<W>) -> Result<(), EntityError> {
        writer.write_byte_array("byte_array.value", &self.value)?;
        Ok(())
    }

    fn read_payload(header: EntityHeader, reader: &mut Reader<'_>) -> Result<Self, EntityError> {
        Ok(Self {
            header,
            value: reader.read_byte_array("byte_array.value")?,
        })
    }
}
