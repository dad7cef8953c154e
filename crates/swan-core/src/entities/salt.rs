// crates/swan-core/src/entities/salt.rs
// ============================================================================
// Module: SWAN Salt Entity
// Description: Signed salt bytes paired with an email claim.
// Purpose: Salt the signed-in identifier digest.
// Dependencies: crate::{codec, entity, writeable}, serde
// ============================================================================

//! ## Overview
//! A [`Salt`] is a variable-length byte string issued alongside an email
//! claim and mixed into the signed-in identifier digest.

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
use crate::writeable::Writeable;
use crate::writeable::WriteableState;

/// Signed variable-length salt.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Salt {
    /// Version and proof.
    #[serde(flatten)]
    header: EntityHeader,
    /// Cookie validity and persisted flag.
    #[serde(flatten)]
    state: WriteableState,
    /// Salt bytes.
    #[serde(with = "base64_bytes")]
    value: Vec<u8>,
}

impl Salt {
    /// Creates an unsigned salt.
    #[must_use]
    pub fn new(value: impl Into<Vec<u8>>) -> Self {
        Self {
            header: EntityHeader::new(),
            state: WriteableState::new(),
            value: value.into(),
        }
    }

    /// Returns the salt bytes.
    #[must_use]
    pub fn value(&self) -> &[u8] {
        &self.value
    }

    /// Replaces the salt bytes.
    pub fn set_value(&mut self, value: impl Into<Vec<u8>>) {
        self.value = value.into();
    }
}

impl Entity for Salt {
    const KIND: EntityKind = EntityKind::Salt;

    fn header(&self) -> &EntityHeader {
        &self.header
    }

    fn header_mut(&mut self) -> &mut EntityHeader {
        &mut self.header
    }

    fn write_payload<W: Write>(&self, writer: &mut Writer<W>) -> Result<(), EntityError> {
        writer.write_byte_array("salt.value", &self.value)?;
        Ok(())
    }

    fn read_payload(header: EntityHeader, reader: &mut Reader<'_>) -> Result<Self, EntityError> {
        Ok(Self {
            header,
            state: WriteableState::new(),
            value: reader.read_byte_array("salt.value")?,
        })
    }
}

impl Writeable for Salt {
    fn state(&self) -> &WriteableState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut WriteableState {
        &mut self.state
    }
}
