// crates/swan-core/src/codec.rs
// ============================================================================
// Module: SWAN Primitive Codec
// Description: Length and terminator based encoding of primitive field values.
// Purpose: Provide the single byte-level contract shared by every SWAN entity.
// Dependencies: thiserror
// ============================================================================

//! ## Overview
//! Every entity writes its fields through [`Writer`] and reads them back
//! through [`Reader`]. Strings are nul-terminated, byte arrays carry a
//! little-endian `u32` length prefix, and booleans occupy a single byte.
//! Readers consume exactly the bytes of each value and never look ahead.
//!
//! Security posture: decoded bytes are untrusted. Every read is bounds-checked
//! and reports [`CodecError::Truncated`] instead of panicking.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io::Write;

use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Width in bytes of every length and count prefix.
pub const LENGTH_PREFIX_BYTES: usize = 4;
/// String terminator byte.
const STRING_TERMINATOR: u8 = 0x00;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors raised by the primitive codec.
///
/// Each variant names the field being processed so callers can report
/// precisely which value failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    /// Input ended before the value was complete.
    #[error("truncated data reading {field}: needed {needed} bytes, {remaining} remaining")]
    Truncated {
        /// Field being read.
        field: &'static str,
        /// Bytes required to complete the value.
        needed: usize,
        /// Bytes left in the input.
        remaining: usize,
    },
    /// The output sink rejected bytes.
    #[error("write failed for {field}: {reason}")]
    WriteFailed {
        /// Field being written.
        field: &'static str,
        /// Sink error description.
        reason: String,
    },
    /// A string value contains a nul byte and would truncate on read.
    #[error("string field {field} contains an embedded nul byte")]
    EmbeddedNul {
        /// Field being written.
        field: &'static str,
    },
    /// A string value is not valid UTF-8.
    #[error("string field {field} is not valid utf-8")]
    InvalidUtf8 {
        /// Field being read.
        field: &'static str,
    },
    /// A length does not fit the fixed-width prefix.
    #[error("length of {field} does not fit the length prefix")]
    LengthOverflow {
        /// Field being processed.
        field: &'static str,
    },
}

// ============================================================================
// SECTION: Writer
// ============================================================================

/// Primitive writer over a growable output sink.
///
/// # Invariants
/// - Every write either appends the full value or returns an error.
#[derive(Debug, Default)]
pub struct Writer<W = Vec<u8>> {
    /// Output sink receiving encoded bytes.
    sink: W,
}

impl Writer<Vec<u8>> {
    /// Creates a writer over an empty byte buffer.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            sink: Vec::new(),
        }
    }

    /// Returns the accumulated bytes.
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.sink
    }
}

impl<W: Write> Writer<W> {
    /// Creates a writer over an arbitrary sink.
    pub const fn from_sink(sink: W) -> Self {
        Self {
            sink,
        }
    }

    /// Returns the wrapped sink.
    pub fn into_inner(self) -> W {
        self.sink
    }

    /// Appends raw bytes to the sink.
    fn put(&mut self, field: &'static str, bytes: &[u8]) -> Result<(), CodecError> {
        self.sink.write_all(bytes).map_err(|err| CodecError::WriteFailed {
            field,
            reason: err.to_string(),
        })
    }

    /// Writes a single byte.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::WriteFailed`] when the sink rejects the byte.
    pub fn write_u8(&mut self, field: &'static str, value: u8) -> Result<(), CodecError> {
        self.put(field, &[value])
    }

    /// Writes a little-endian `u32`.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::WriteFailed`] when the sink rejects the bytes.
    pub fn write_u32(&mut self, field: &'static str, value: u32) -> Result<(), CodecError> {
        self.put(field, &value.to_le_bytes())
    }

    /// Writes a little-endian `i32`.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::WriteFailed`] when the sink rejects the bytes.
    pub fn write_i32(&mut self, field: &'static str, value: i32) -> Result<(), CodecError> {
        self.put(field, &value.to_le_bytes())
    }

    /// Writes a little-endian `i64`.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::WriteFailed`] when the sink rejects the bytes.
    pub fn write_i64(&mut self, field: &'static str, value: i64) -> Result<(), CodecError> {
        self.put(field, &value.to_le_bytes())
    }

    /// Writes a boolean as exactly `0x00` or `0x01`.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::WriteFailed`] when the sink rejects the byte.
    pub fn write_bool(&mut self, field: &'static str, value: bool) -> Result<(), CodecError> {
        self.write_u8(field, u8::from(value))
    }

    /// Writes fixed-width bytes with no prefix.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::WriteFailed`] when the sink rejects the bytes.
    pub fn write_fixed(&mut self, field: &'static str, bytes: &[u8]) -> Result<(), CodecError> {
        self.put(field, bytes)
    }

    /// Writes a string followed by a single nul terminator.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::EmbeddedNul`] when the string contains a nul byte,
    /// or [`CodecError::WriteFailed`] when the sink rejects the bytes.
    pub fn write_string(&mut self, field: &'static str, value: &str) -> Result<(), CodecError> {
        if value.as_bytes().contains(&STRING_TERMINATOR) {
            return Err(CodecError::EmbeddedNul {
                field,
            });
        }
        self.put(field, value.as_bytes())?;
        self.put(field, &[STRING_TERMINATOR])
    }

    /// Writes a length-prefixed byte array.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::LengthOverflow`] when the length exceeds `u32`,
    /// or [`CodecError::WriteFailed`] when the sink rejects the bytes.
    pub fn write_byte_array(&mut self, field: &'static str, value: &[u8]) -> Result<(), CodecError> {
        self.write_count(field, value.len())?;
        self.put(field, value)
    }

    /// Writes a count-prefixed sequence of byte arrays.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError`] when any element fails to encode.
    pub fn write_byte_array_array<T: AsRef<[u8]>>(
        &mut self,
        field: &'static str,
        values: &[T],
    ) -> Result<(), CodecError> {
        self.write_count(field, values.len())?;
        for value in values {
            self.write_byte_array(field, value.as_ref())?;
        }
        Ok(())
    }

    /// Writes a count-prefixed sequence of nul-terminated strings.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError`] when any element fails to encode.
    pub fn write_string_array<T: AsRef<str>>(
        &mut self,
        field: &'static str,
        values: &[T],
    ) -> Result<(), CodecError> {
        self.write_count(field, values.len())?;
        for value in values {
            self.write_string(field, value.as_ref())?;
        }
        Ok(())
    }

    /// Writes a length or count prefix.
    fn write_count(&mut self, field: &'static str, count: usize) -> Result<(), CodecError> {
        let count = u32::try_from(count).map_err(|_| CodecError::LengthOverflow {
            field,
        })?;
        self.write_u32(field, count)
    }
}

// ============================================================================
// SECTION: Reader
// ============================================================================

/// Primitive reader over a borrowed input buffer.
///
/// # Invariants
/// - `position <= data.len()` at all times.
/// - Failed reads leave the cursor where the failing value started.
#[derive(Debug, Clone)]
pub struct Reader<'a> {
    /// Input bytes.
    data: &'a [u8],
    /// Cursor offset into `data`.
    position: usize,
}

impl<'a> Reader<'a> {
    /// Creates a reader positioned at the start of `data`.
    #[must_use]
    pub const fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            position: 0,
        }
    }

    /// Returns the number of unread bytes.
    #[must_use]
    pub const fn remaining(&self) -> usize {
        self.data.len() - self.position
    }

    /// Returns true when every byte has been consumed.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// Returns the current cursor offset.
    #[must_use]
    pub const fn position(&self) -> usize {
        self.position
    }

    /// Consumes exactly `count` bytes.
    fn take(&mut self, field: &'static str, count: usize) -> Result<&'a [u8], CodecError> {
        let remaining = self.remaining();
        if count > remaining {
            return Err(CodecError::Truncated {
                field,
                needed: count,
                remaining,
            });
        }
        let start = self.position;
        self.position += count;
        Ok(&self.data[start .. self.position])
    }

    /// Reads exactly `N` bytes into an array.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::Truncated`] when fewer than `N` bytes remain.
    pub fn read_fixed<const N: usize>(&mut self, field: &'static str) -> Result<[u8; N], CodecError> {
        let bytes = self.take(field, N)?;
        let mut out = [0_u8; N];
        out.copy_from_slice(bytes);
        Ok(out)
    }

    /// Reads a single byte.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::Truncated`] when no bytes remain.
    pub fn read_u8(&mut self, field: &'static str) -> Result<u8, CodecError> {
        let [value] = self.read_fixed::<1>(field)?;
        Ok(value)
    }

    /// Reads a little-endian `u32`.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::Truncated`] when fewer than four bytes remain.
    pub fn read_u32(&mut self, field: &'static str) -> Result<u32, CodecError> {
        Ok(u32::from_le_bytes(self.read_fixed(field)?))
    }

    /// Reads a little-endian `i32`.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::Truncated`] when fewer than four bytes remain.
    pub fn read_i32(&mut self, field: &'static str) -> Result<i32, CodecError> {
        Ok(i32::from_le_bytes(self.read_fixed(field)?))
    }

    /// Reads a little-endian `i64`.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::Truncated`] when fewer than eight bytes remain.
    pub fn read_i64(&mut self, field: &'static str) -> Result<i64, CodecError> {
        Ok(i64::from_le_bytes(self.read_fixed(field)?))
    }

    /// Reads a boolean; any non-zero byte is `true`.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::Truncated`] when no bytes remain.
    pub fn read_bool(&mut self, field: &'static str) -> Result<bool, CodecError> {
        Ok(self.read_u8(field)? != 0)
    }

    /// Reads a nul-terminated string, consuming the terminator.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::Truncated`] when no terminator is present, or
    /// [`CodecError::InvalidUtf8`] when the content is not UTF-8.
    pub fn read_string(&mut self, field: &'static str) -> Result<String, CodecError> {
        let rest = &self.data[self.position ..];
        let Some(end) = rest.iter().position(|byte| *byte == STRING_TERMINATOR) else {
            return Err(CodecError::Truncated {
                field,
                needed: rest.len() + 1,
                remaining: rest.len(),
            });
        };
        let value = std::str::from_utf8(&rest[.. end]).map_err(|_| CodecError::InvalidUtf8 {
            field,
        })?;
        let value = value.to_string();
        self.position += end + 1;
        Ok(value)
    }

    /// Reads a length-prefixed byte array.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::Truncated`] when the prefix or content is incomplete.
    pub fn read_byte_array(&mut self, field: &'static str) -> Result<Vec<u8>, CodecError> {
        let start = self.position;
        let len = self.read_count(field)?;
        match self.take(field, len) {
            Ok(bytes) => Ok(bytes.to_vec()),
            Err(err) => {
                self.position = start;
                Err(err)
            }
        }
    }

    /// Reads a count-prefixed sequence of byte arrays.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::Truncated`] when any element is incomplete.
    pub fn read_byte_array_array(&mut self, field: &'static str) -> Result<Vec<Vec<u8>>, CodecError> {
        let count = self.read_count(field)?;
        let mut values = Vec::with_capacity(count.min(self.remaining() / LENGTH_PREFIX_BYTES));
        for _ in 0 .. count {
            values.push(self.read_byte_array(field)?);
        }
        Ok(values)
    }

    /// Reads a count-prefixed sequence of nul-terminated strings.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError`] when any element is incomplete or not UTF-8.
    pub fn read_string_array(&mut self, field: &'static str) -> Result<Vec<String>, CodecError> {
        let count = self.read_count(field)?;
        let mut values = Vec::with_capacity(count.min(self.remaining()));
        for _ in 0 .. count {
            values.push(self.read_string(field)?);
        }
        Ok(values)
    }

    /// Reads a length or count prefix.
    fn read_count(&mut self, field: &'static str) -> Result<usize, CodecError> {
        let count = self.read_u32(field)?;
        usize::try_from(count).map_err(|_| CodecError::LengthOverflow {
            field,
        })
    }
}
