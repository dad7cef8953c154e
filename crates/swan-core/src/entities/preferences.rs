// crates/swan-core/src/entities/preferences.rs
// ============================================================================
// Module: SWAN Preferences Entity
// Description: Signed personalization consent flag.
// Purpose: Record whether browsing may be used for personalization.
// Dependencies: crate::{codec, entity, writeable}, serde
// ============================================================================

//! ## Overview
//! [`Preferences`] carries one consent flag plus writeable cookie state.

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

/// Signed personalization preference.
///
/// Preferences travel through storage like the other model entries, so they
/// carry cookie state even though the wire payload is a single flag.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Preferences {
    /// Version and proof.
    #[serde(flatten)]
    header: EntityHeader,
    /// Cookie validity and persisted flag.
    #[serde(flatten)]
    state: WriteableState,
    /// True when browsing may be used for personalization.
    use_browsing_for_personalization: bool,
}

impl Preferences {
    /// Creates an unsigned preference.
    #[must_use]
    pub const fn new(use_browsing_for_personalization: bool) -> Self {
        Self {
            header: EntityHeader::new(),
            state: WriteableState::new(),
            use_browsing_for_personalization,
        }
    }

    /// Returns the personalization flag.
    #[must_use]
    pub const fn use_browsing_for_personalization(&self) -> bool {
        self.use_browsing_for_personalization
    }

    /// Replaces the personalization flag.
    pub const fn set_use_browsing_for_personalization(&mut self, value: bool) {
        self.use_browsing_for_personalization = value;
    }
}

impl Entity for Preferences {
    const KIND: EntityKind = EntityKind::Preferences;

    fn header(&self) -> &EntityHeader {
        &self.header
    }

    fn header_mut(&mut self) -> &mut EntityHeader {
        &mut self.header
    }

    fn write_payload<W: Write>(&self, writer: &mut Writer<W>) -> Result<(), EntityError> {
        writer.write_bool("preferences.use_browsing_for_personalization", self.use_browsing_for_personalization)?;
        Ok(())
    }

    fn read_payload(header: EntityHeader, reader: &mut Reader<'_>) -> Result<Self, EntityError> {
        Ok(Self {
            header,
            state: WriteableState::new(),
            use_browsing_for_personalization: reader.read_bool("preferences.use_browsing_for_personalization")?,
        })
    }
}

impl Writeable for Preferences {
    fn state(&self) -> &WriteableState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut WriteableState {
        &mut self.state
    }
}
