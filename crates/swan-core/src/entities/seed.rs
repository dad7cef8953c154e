// crates/swan-core/src/entities/seed.rs
// ============================================================================
// Module: SWAN Seed Entity
// Description: Signed bundle describing one advertising opportunity.
// Purpose: Bind identifiers, preferences, and stop-list to transaction ids.
// Dependencies: crate::{codec, entity, entities}, serde
// ============================================================================

//! ## Overview
//! A [`Seed`] is constructed with its transaction ids, populated by the
//! publisher, then signed once. Nested entities are embedded with their own
//! proofs as length-prefixed byte arrays, so the seed's signature covers
//! those proofs too. An empty nested byte array encodes an absent entity.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io::Write;

use serde::Deserialize;
use serde::Serialize;

use crate::codec::Reader;
use crate::codec::Writer;
use crate::entities::Identifier;
use crate::entities::Preferences;
use crate::entity::Entity;
use crate::entity::EntityError;
use crate::entity::EntityHeader;
use crate::entity::EntityKind;
use crate::entity::base64_byte_arrays;

// ============================================================================
// SECTION: Seed
// ============================================================================

/// Signed advertising opportunity bundle.
///
/// # Invariants
/// - Nested entities are owned exclusively by this seed.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Seed {
    /// Version and proof.
    #[serde(flatten)]
    header: EntityHeader,
    /// Publisher domain offering the opportunity.
    pub_domain: String,
    /// Transaction identifiers, one per placement.
    #[serde(with = "base64_byte_arrays")]
    transaction_ids: Vec<Vec<u8>>,
    /// Random browser identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    random_id: Option<Identifier>,
    /// Signed-in identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    signed_in_id: Option<Identifier>,
    /// Personalization preference.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    preferences: Option<Preferences>,
    /// Domains the user has stopped.
    #[serde(default)]
    stopped_domains: Vec<String>,
}

impl Seed {
    /// Creates an empty unsigned seed for the given transactions.
    #[must_use]
    pub fn new(transaction_ids: Vec<Vec<u8>>) -> Self {
        Self {
            header: EntityHeader::new(),
            pub_domain: String::new(),
            transaction_ids,
            random_id: None,
            signed_in_id: None,
            preferences: None,
            stopped_domains: Vec::new(),
        }
    }

    /// Returns the publisher domain.
    #[must_use]
    pub fn pub_domain(&self) -> &str {
        &self.pub_domain
    }

    /// Sets the publisher domain.
    pub fn set_pub_domain(&mut self, pub_domain: impl Into<String>) {
        self.pub_domain = pub_domain.into();
    }

    /// Returns the transaction ids.
    #[must_use]
    pub fn transaction_ids(&self) -> &[Vec<u8>] {
        &self.transaction_ids
    }

    /// Returns the random identifier.
    #[must_use]
    pub const fn random_id(&self) -> Option<&Identifier> {
        self.random_id.as_ref()
    }

    /// Sets the random identifier.
    pub fn set_random_id(&mut self, random_id: Option<Identifier>) {
        self.random_id = random_id;
    }

    /// Returns the signed-in identifier.
    #[must_use]
    pub const fn signed_in_id(&self) -> Option<&Identifier> {
        self.signed_in_id.as_ref()
    }

    /// Sets the signed-in identifier.
    pub fn set_signed_in_id(&mut self, signed_in_id: Option<Identifier>) {
        self.signed_in_id = signed_in_id;
    }

    /// Returns the preferences.
    #[must_use]
    pub const fn preferences(&self) -> Option<&Preferences> {
        self.preferences.as_ref()
    }

    /// Sets the preferences.
    pub fn set_preferences(&mut self, preferences: Option<Preferences>) {
        self.preferences = preferences;
    }

    /// Returns the stopped domains.
    #[must_use]
    pub fn stopped_domains(&self) -> &[String] {
        &self.stopped_domains
    }

    /// Sets the stopped domains.
    pub fn set_stopped_domains(&mut self, stopped_domains: Vec<String>) {
        self.stopped_domains = stopped_domains;
    }
}

// ============================================================================
// SECTION: Nested Encoding
// ============================================================================

/// Encodes an optional nested entity, using an empty array for `None`.
fn nested_bytes<E: Entity>(entity: Option<&E>) -> Result<Vec<u8>, EntityError> {
    entity.map_or_else(|| Ok(Vec::new()), E::encode_with_proof)
}

/// Decodes an optional nested entity from its byte array.
fn read_nested<E: Entity>(bytes: &[u8]) -> Result<Option<E>, EntityError> {
    if bytes.is_empty() {
        return Ok(None);
    }
    E::decode(bytes).map(Some)
}

// ============================================================================
// SECTION: Entity
// ============================================================================

impl Entity for Seed {
    const KIND: EntityKind = EntityKind::Seed;

    fn header(&self) -> &EntityHeader {
        &self.header
    }

    fn header_mut(&mut self) -> &mut EntityHeader {
        &mut self.header
    }

    fn write_payload<W: Write>(&self, writer: &mut Writer<W>) -> Result<(), EntityError> {
        writer.write_string("seed.pub_domain", &self.pub_domain)?;
        writer.write_byte_array_array("seed.transaction_ids", &self.transaction_ids)?;
        writer.write_byte_array("seed.random_id", &nested_bytes(self.random_id.as_ref())?)?;
        writer.write_byte_array("seed.signed_in_id", &nested_bytes(self.signed_in_id.as_ref())?)?;
        writer.write_byte_array("seed.preferences", &nested_bytes(self.preferences.as_ref())?)?;
        writer.write_string_array("seed.stopped_domains", &self.stopped_domains)?;
        Ok(())
    }

    fn read_payload(header: EntityHeader, reader: &mut Reader<'_>) -> Result<Self, EntityError> {
        let pub_domain = reader.read_string("seed.pub_domain")?;
        let transaction_ids = reader.read_byte_array_array("seed.transaction_ids")?;
        let random_id = read_nested(&reader.read_byte_array("seed.random_id")?)?;
        let signed_in_id = read_nested(&reader.read_byte_array("seed.signed_in_id")?)?;
        let preferences = read_nested(&reader.read_byte_array("seed.preferences")?)?;
        let stopped_domains = reader.read_string_array("seed.stopped_domains")?;
        Ok(Self {
            header,
            pub_domain,
            transaction_ids,
            random_id,
            signed_in_id,
            preferences,
            stopped_domains,
        })
    }
}
