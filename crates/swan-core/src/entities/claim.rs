// crates/swan-core/src/entities/claim.rs
// ============================================================================
// Module: SWAN Claim Entity
// Description: Signed integer bid-value claim attached to auction nodes.
// Purpose: Indicate which child an auction participant selected.
// Dependencies: crate::{codec, entity}, serde
// ============================================================================

//! ## Overview
//! A [`Claim`] is the signed bid value attached to an auction node. A
//! non-negative value selects a child by index; a negative value selects
//! nothing.

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

/// Signed integer claim. Non-negative values index a node's children.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Claim {
    /// Version and proof.
    #[serde(flatten)]
    header: EntityHeader,
    /// Claimed value.
    value: i32,
}

impl Claim {
    /// Creates an unsigned claim.
    #[must_use]
    pub const fn new(value: i32) -> Self {
        Self {
            header: EntityHeader::new(),
            value,
        }
    }

    /// Returns the claimed value.
    #[must_use]
    pub const fn value(&self) -> i32 {
        self.value
    }

    /// Replaces the claimed value.
    pub const fn set_value(&mut self, value: i32) {
        self.value = value;
    }

    /// Returns the value as a child index when it is non-negative.
    #[must_use]
    pub fn child_index(&self) -> Option<usize> {
        usize::try_from(self.value).ok()
    }
}

impl Entity for Claim {
    const KIND: EntityKind = EntityKind::Claim;

    fn header(&self) -> &EntityHeader {
        &self.header
    }

    fn header_mut(&mut self) -> &mut EntityHeader {
        &mut self.header
    }

    fn write_payload<W: Write>(&self, writer: &mut Writer<W>) -> Result<(), EntityError> {
        writer.write_i32("claim.value", self.value)?;
        Ok(())
    }

    fn read_payload(header: EntityHeader, reader: &mut Reader<'_>) -> Result<Self, EntityError> {
        Ok(Self {
            header,
            value: reader.read_i32("claim.value")?,
        })
    }
}
