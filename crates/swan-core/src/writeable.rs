// crates/swan-core/src/writeable.rs
// ============================================================================
// Module: SWAN Writeable State
// Description: Cookie validity window and persisted flag for stored entities.
// Purpose: Track how long a client-stored entity remains valid.
// Dependencies: crate::{entity, time}, serde
// ============================================================================

//! ## Overview
//! Entities that round-trip through browser or storage-network persistence
//! embed a [`WriteableState`]. The cookie window is not part of the wire
//! payload: it travels alongside the entity as pair or cookie metadata.
//! The window is not covered by the proof, so JSON input never sets it.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

use crate::entity::Entity;
use crate::time::Timestamp;

// ============================================================================
// SECTION: Cookie Validity
// ============================================================================

/// Validity window of a client-stored entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CookieValidity {
    /// Time the stored value was created.
    pub created: Timestamp,
    /// Time the stored value expires, or zero when unknown.
    pub expires: Timestamp,
}

impl CookieValidity {
    /// Creates a validity window.
    #[must_use]
    pub const fn new(created: Timestamp, expires: Timestamp) -> Self {
        Self {
            created,
            expires,
        }
    }
}

// ============================================================================
// SECTION: Writeable State
// ============================================================================

/// Persistence metadata embedded in writeable entities.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct WriteableState {
    /// Lazily created cookie validity; never taken from inbound JSON.
    #[serde(default, skip_deserializing, skip_serializing_if = "Option::is_none")]
    cookie: Option<CookieValidity>,
    /// True once the value was read from or written to storage.
    #[serde(skip)]
    persisted: bool,
}

impl WriteableState {
    /// Creates empty state.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            cookie: None,
            persisted: false,
        }
    }
}

// ============================================================================
// SECTION: Writeable Trait
// ============================================================================

/// Entity with a client-storage validity window.
pub trait Writeable: Entity {
    /// Returns the embedded state.
    fn state(&self) -> &WriteableState;

    /// Returns the embedded state mutably.
    fn state_mut(&mut self) -> &mut WriteableState;

    /// Returns the cookie window, creating it on first access.
    ///
    /// A new window is seeded from the proof's creation time, or zero when
    /// the entity is unsigned. Its expiry starts at zero.
    fn cookie(&mut self) -> &mut CookieValidity {
        let seed = self.proof().map_or(Timestamp::ZERO, |proof| proof.created());
        self.state_mut().cookie.get_or_insert(CookieValidity::new(seed, Timestamp::ZERO))
    }

    /// Returns the cookie window without creating it.
    fn cookie_validity(&self) -> Option<CookieValidity> {
        self.state().cookie
    }

    /// Replaces the cookie window.
    fn set_cookie_validity(&mut self, validity: CookieValidity) {
        self.state_mut().cookie = Some(validity);
    }

    /// Returns true once the value was read from or written to storage.
    fn is_persisted(&self) -> bool {
        self.state().persisted
    }

    /// Marks the value as persisted or not.
    fn set_persisted(&mut self, persisted: bool) {
        self.state_mut().persisted = persisted;
    }
}
