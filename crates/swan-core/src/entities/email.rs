// crates/swan-core/src/entities/email.rs
// ============================================================================
// Module: SWAN Email Entity
// Description: Signed email address claim.
// Purpose: Carry a user's email address as issued by a trusted participant.
// Dependencies: crate::{codec, entity, writeable}, serde
// ============================================================================

//! ## Overview
//! An [`Email`] is one half of the signed-in identifier derivation. An empty
//! address is a valid value meaning "signed out".

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
use crate::writeable::Writeable;
use crate::writeable::WriteableState;

// ============================================================================
// SECTION: Email
// ============================================================================

/// Signed email address claim.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Email {
    /// Version and proof.
    #[serde(flatten)]
    header: EntityHeader,
    /// Cookie validity and persisted flag.
    #[serde(flatten)]
    state: WriteableState,
    /// Email address, possibly empty.
    address: String,
}

impl Email {
    /// Creates an unsigned email claim.
    #[must_use]
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            header: EntityHeader::new(),
            state: WriteableState::new(),
            address: address.into(),
        }
    }

    /// Returns the address.
    #[must_use]
    pub fn address(&self) -> &str {
        &self.address
    }

    /// Replaces the address.
    pub fn set_address(&mut self, address: impl Into<String>) {
        self.address = address.into();
    }

    /// Returns true when the address is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.address.is_empty()
    }
}

impl Entity for Email {
    const KIND: EntityKind = EntityKind::Email;

    fn header(&self) -> &EntityHeader {
        &self.header
    }

    fn header_mut(&mut self) -> &mut EntityHeader {
        &mut self.header
    }

    fn write_payload<W: Write>(&self, writer: &mut Writer<W>) -> Result<(), EntityError> {
        writer.write_string("email.address", &self.address)?;
        Ok(())
    }

    fn read_payload(header: EntityHeader, reader: &mut Reader<'_>) -> Result<Self, EntityError> {
        Ok(Self {
            header,
            state: WriteableState::new(),
            address: reader.read_string("email.address")?,
        })
    }
}

impl Writeable for Email {
    fn state(&self) -> &WriteableState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut WriteableState {
        &mut self.state
    }
}
