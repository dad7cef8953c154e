// crates/swan-core/src/entities/string_array.rs
// ============================================================================
// Module: SWAN String Array Entity
// Description: Ordered list of strings such as the stopped-domain list.
// Purpose: Carry unsigned list state inside a model.
// Dependencies: crate::{codec, entity, writeable}, serde
// ============================================================================

//! ## Overview
//! A [`StringArray`] is never independently signed. Its proof is always
//! absent and [`Entity::sign`] fails with [`EntityError::Unsignable`]. Order
//! is preserved on every round trip.

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
// SECTION: String Array
// ============================================================================

/// Ordered list of strings.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StringArray {
    /// Version; the proof slot stays empty.
    #[serde(flatten)]
    header: EntityHeader,
    /// Cookie validity and persisted flag.
    #[serde(flatten)]
    state: WriteableState,
    /// Values in insertion order.
    values: Vec<String>,
}

impl StringArray {
    /// Creates a list from values in order.
    #[must_use]
    pub fn new<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            header: EntityHeader::new(),
            state: WriteableState::new(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    /// Returns the values in order.
    #[must_use]
    pub fn values(&self) -> &[String] {
        &self.values
    }

    /// Returns true when `value` is present.
    #[must_use]
    pub fn contains(&self, value: &str) -> bool {
        self.values.iter().any(|existing| existing == value)
    }

    /// Appends `value` unless it is already present.
    #[must_use]
    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        let value = value.into();
        if !self.contains(&value) {
            self.values.push(value);
        }
        self
    }

    /// Removes every occurrence of `value`.
    #[must_use]
    pub fn without_value(mut self, value: &str) -> Self {
        self.values.retain(|existing| existing != value);
        self
    }
}

impl Entity for StringArray {
    const KIND: EntityKind = EntityKind::StringArray;
    const SIGNABLE: bool = false;

    fn header(&self) -> &EntityHeader {
        &self.header
    }

    fn header_mut(&mut self) -> &mut EntityHeader {
        &mut self.header
    }

    fn write_payload<W: Write>(&self, writer: &mut Writer<W>) -> Result<(), EntityError> {
        writer.write_string_array("string_array.values", &self.values)?;
        Ok(())
    }

    fn read_payload(header: EntityHeader, reader: &mut Reader<'_>) -> Result<Self, EntityError> {
        Ok(Self {
            header,
            state: WriteableState::new(),
            values: reader.read_string_array("string_array.values")?,
        })
    }
}

impl Writeable for StringArray {
    fn state(&self) -> &WriteableState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut WriteableState {
        &mut self.state
    }
}
