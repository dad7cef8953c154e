// crates/swan-node/src/clock.rs
// ============================================================================
// Module: SWAN Node Clock
// Description: Injectable time source for proof stamping.
// Purpose: Keep wall-clock reads out of core logic and deterministic in tests.
// Dependencies: swan-core
// ============================================================================

//! ## Overview
//! The core never reads the clock. Hosts inject a [`Clock`] into the signer
//! and pass `now` explicitly to processor operations.

use swan_core::Timestamp;

/// Time source.
pub trait Clock: Send + Sync {
    /// Returns the current time.
    fn now(&self) -> Timestamp;
}

/// Wall-clock time source.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Timestamp::now()
    }
}

/// Clock pinned to a single instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub Timestamp);

impl Clock for FixedClock {
    fn now(&self) -> Timestamp {
        self.0
    }
}
