// crates/swan-core/src/time.rs
// ============================================================================
// Module: SWAN Time Model
// Description: Canonical timestamp representation for proofs, cookies, and pairs.
// Purpose: Provide deterministic, caller-supplied time values across SWAN records.
// Dependencies: serde, thiserror, time
// ============================================================================

//! ## Overview
//! SWAN records carry explicit unix-second timestamps. Core operations never read
//! wall-clock time; hosts supply "now" to every operation that needs it so
//! that validity reconciliation stays replayable.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;
use time::OffsetDateTime;
use time::macros::format_description;

// ============================================================================
// SECTION: Timestamp
// ============================================================================

/// Unix timestamp in whole seconds.
///
/// # Invariants
/// - `Timestamp::ZERO` means "unset" wherever an expiry is optional.
/// - Core operations take time as a parameter; only hosts call [`Timestamp::now`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(i64);

impl Timestamp {
    /// The unset timestamp (unix epoch).
    pub const ZERO: Self = Self(0);

    /// Creates a timestamp from unix seconds.
    #[must_use]
    pub const fn from_unix_seconds(seconds: i64) -> Self {
        Self(seconds)
    }

    /// Returns the timestamp as unix seconds.
    #[must_use]
    pub const fn as_unix_seconds(self) -> i64 {
        self.0
    }

    /// Returns true when the timestamp is unset.
    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Returns the current wall-clock time.
    ///
    /// Host layers read the clock once and pass the value inward.
    #[must_use]
    pub fn now() -> Self {
        Self(OffsetDateTime::now_utc().unix_timestamp())
    }

    /// Returns the timestamp shifted forward by `seconds`, saturating at the maximum.
    #[must_use]
    pub fn plus_seconds(self, seconds: u64) -> Self {
        let delta = i64::try_from(seconds).unwrap_or(i64::MAX);
        Self(self.0.saturating_add(delta))
    }

    /// Formats the timestamp as an HTTP date (`Wed, 21 Oct 2015 07:28:00 GMT`).
    ///
    /// # Errors
    ///
    /// Returns [`TimeError`] when the value is outside the representable calendar range.
    pub fn to_http_date(self) -> Result<String, TimeError> {
        let datetime = OffsetDateTime::from_unix_timestamp(self.0)
            .map_err(|err| TimeError::OutOfRange(err.to_string()))?;
        let format = format_description!(
            "[weekday repr:short], [day] [month repr:short] [year] [hour]:[minute]:[second] GMT"
        );
        datetime.format(&format).map_err(|err| TimeError::Format(err.to_string()))
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<OffsetDateTime> for Timestamp {
    fn from(value: OffsetDateTime) -> Self {
        Self(value.unix_timestamp())
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors raised when converting timestamps to calendar forms.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimeError {
    /// The timestamp cannot be represented as a calendar date.
    #[error("timestamp out of range: {0}")]
    OutOfRange(String),
    /// Calendar formatting failed.
    #[error("timestamp formatting failed: {0}")]
    Format(String),
}
