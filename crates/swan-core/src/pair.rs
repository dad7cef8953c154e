// crates/swan-core/src/pair.rs
// ============================================================================
// Module: SWAN Transport Pair
// Description: Flat key/validity/value tuple exchanged with the storage network.
// Purpose: Map typed entities to and from their storage representation.
// Dependencies: crate::{entity, time, writeable}, serde, thiserror
// ============================================================================

//! ## Overview
//! A [`Pair`] owns no entity. Its `value` is the standard base64 of the
//! entity's full wire format. An empty value is treated as absent for every
//! key; a non-empty value that fails to decode is a hard error.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use crate::entity::Entity;
use crate::entity::EntityError;
use crate::time::Timestamp;
use crate::writeable::CookieValidity;
use crate::writeable::Writeable;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors raised when mapping pairs to entities.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PairError {
    /// The pair carries no value.
    #[error("pair {key} has no value")]
    Empty {
        /// Pair key.
        key: String,
    },
    /// The pair value is not a valid entity.
    #[error("pair {key} does not hold a valid entity: {source}")]
    Entity {
        /// Pair key.
        key: String,
        /// Decode or encode failure.
        source: EntityError,
    },
}

// ============================================================================
// SECTION: Pair
// ============================================================================

/// Storage-network transport tuple.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pair {
    /// Role key such as `email` or `stop`.
    pub key: String,
    /// Time the value was created.
    pub created: Timestamp,
    /// Time the value expires.
    pub expires: Timestamp,
    /// Base64 wire format of the entity.
    pub value: String,
}

impl Pair {
    /// Creates a pair from raw parts.
    #[must_use]
    pub fn new(key: impl Into<String>, created: Timestamp, expires: Timestamp, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            created,
            expires,
            value: value.into(),
        }
    }

    /// Builds a pair from any entity with an explicit validity window.
    ///
    /// # Errors
    ///
    /// Returns [`PairError::Entity`] when the entity fails to encode.
    pub fn from_entity<E: Entity>(key: &str, entity: &E, validity: CookieValidity) -> Result<Self, PairError> {
        let value = entity.to_base64().map_err(|source| PairError::Entity {
            key: key.to_string(),
            source,
        })?;
        Ok(Self::new(key, validity.created, validity.expires, value))
    }

    /// Builds a pair from a writeable entity using its own cookie window.
    ///
    /// Falls back to `default_validity` when the entity has no window yet.
    ///
    /// # Errors
    ///
    /// Returns [`PairError::Entity`] when the entity fails to encode.
    pub fn from_writeable<E: Writeable>(
        key: &str,
        entity: &E,
        default_validity: CookieValidity,
    ) -> Result<Self, PairError> {
        let validity = entity.cookie_validity().unwrap_or(default_validity);
        Self::from_entity(key, entity, validity)
    }

    /// Returns true when the pair carries no value.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.value.trim().is_empty()
    }

    /// Returns the validity window carried by the pair.
    #[must_use]
    pub const fn validity(&self) -> CookieValidity {
        CookieValidity::new(self.created, self.expires)
    }

    /// Decodes the value into an entity.
    ///
    /// # Errors
    ///
    /// Returns [`PairError::Empty`] for an empty value or
    /// [`PairError::Entity`] when decoding fails.
    pub fn decode_entity<E: Entity>(&self) -> Result<E, PairError> {
        if self.is_empty() {
            return Err(PairError::Empty {
                key: self.key.clone(),
            });
        }
        E::from_base64(&self.value).map_err(|source| PairError::Entity {
            key: self.key.clone(),
            source,
        })
    }

    /// Decodes the value into a writeable entity carrying the pair's window.
    ///
    /// The decoded entity is marked persisted.
    ///
    /// # Errors
    ///
    /// Returns [`PairError::Empty`] for an empty value or
    /// [`PairError::Entity`] when decoding fails.
    pub fn decode_writeable<E: Writeable>(&self) -> Result<E, PairError> {
        let mut entity: E = self.decode_entity()?;
        entity.set_cookie_validity(self.validity());
        entity.set_persisted(true);
        Ok(entity)
    }
}
