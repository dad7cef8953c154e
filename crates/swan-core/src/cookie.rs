// crates/swan-core/src/cookie.rs
// ============================================================================
// Module: SWAN HTTP Cookies
// Description: Set-Cookie header values for client-stored entities.
// Purpose: Format entity cookies with the network's naming and scoping rules.
// Dependencies: crate::time, serde, thiserror
// ============================================================================

//! ## Overview
//! A cookie is named `prefix + key`, holds the entity's base64 wire format,
//! is scoped to the request host with any port removed, and is always
//! `SameSite=Lax`. A zero expiry produces a session cookie.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use crate::time::TimeError;
use crate::time::Timestamp;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default cookie name prefix.
pub const DEFAULT_COOKIE_PREFIX: &str = "swan-";

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors raised while formatting cookies.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CookieError {
    /// Cookie name contains characters outside the token set.
    #[error("invalid cookie name: {0}")]
    InvalidName(String),
    /// Cookie value contains characters outside the cookie-octet set.
    #[error("invalid value for cookie {0}")]
    InvalidValue(String),
    /// Host is empty after removing the port.
    #[error("invalid cookie host: {0}")]
    InvalidHost(String),
    /// Expiry cannot be formatted.
    #[error(transparent)]
    Time(#[from] TimeError),
}

// ============================================================================
// SECTION: Options
// ============================================================================

/// Cookie formatting options supplied by the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CookieOptions {
    /// Name prefix prepended to each key.
    pub prefix: String,
    /// Whether to add the `Secure` attribute.
    pub secure: bool,
    /// Cookie path.
    pub path: String,
}

impl Default for CookieOptions {
    fn default() -> Self {
        Self {
            prefix: DEFAULT_COOKIE_PREFIX.to_string(),
            secure: true,
            path: "/".to_string(),
        }
    }
}

// ============================================================================
// SECTION: Set-Cookie
// ============================================================================

/// One `Set-Cookie` header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetCookie {
    /// Cookie name.
    pub name: String,
    /// Cookie value.
    pub value: String,
    /// Cookie domain without port.
    pub domain: String,
    /// Cookie path.
    pub path: String,
    /// Expiry, or zero for a session cookie.
    pub expires: Timestamp,
    /// Whether the `Secure` attribute is set.
    pub secure: bool,
}

impl SetCookie {
    /// Builds a cookie for `key` scoped to `host`.
    ///
    /// # Errors
    ///
    /// Returns [`CookieError::InvalidHost`] when the host is empty.
    pub fn new(
        key: &str,
        value: impl Into<String>,
        host: &str,
        expires: Timestamp,
        options: &CookieOptions,
    ) -> Result<Self, CookieError> {
        let domain = cookie_domain(host);
        if domain.is_empty() {
            return Err(CookieError::InvalidHost(host.to_string()));
        }
        Ok(Self {
            name: format!("{}{key}", options.prefix),
            value: value.into(),
            domain: domain.to_string(),
            path: options.path.clone(),
            expires,
            secure: options.secure,
        })
    }

    /// Formats the `Set-Cookie` header value.
    ///
    /// # Errors
    ///
    /// Returns [`CookieError`] when the name or value is not cookie-safe or
    /// the expiry cannot be formatted.
    pub fn header_value(&self) -> Result<String, CookieError> {
        if self.name.is_empty() || !self.name.bytes().all(is_token_byte) {
            return Err(CookieError::InvalidName(self.name.clone()));
        }
        if !self.value.bytes().all(is_cookie_octet) {
            return Err(CookieError::InvalidValue(self.name.clone()));
        }
        let mut header = format!("{}={}; Domain={}; Path={}", self.name, self.value, self.domain, self.path);
        if !self.expires.is_zero() {
            header.push_str("; Expires=");
            header.push_str(&self.expires.to_http_date()?);
        }
        header.push_str("; SameSite=Lax");
        if self.secure {
            header.push_str("; Secure");
        }
        Ok(header)
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Returns `host` with any trailing port removed.
#[must_use]
pub fn cookie_domain(host: &str) -> &str {
    let host = host.trim();
    if let Some(rest) = host.strip_prefix('[') {
        return rest.split_once(']').map_or(host, |(address, _)| address);
    }
    match host.rsplit_once(':') {
        Some((name, port)) if !name.contains(':') && port.bytes().all(|byte| byte.is_ascii_digit()) => name,
        _ => host,
    }
}

/// Returns true for RFC 6265 token bytes.
const fn is_token_byte(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || matches!(byte, b'!' | b'#' | b'$' | b'%' | b'&' | b'\'' | b'*' | b'+' | b'-' | b'.' | b'^' | b'_' | b'`' | b'|' | b'~')
}

/// Returns true for RFC 6265 cookie-octet bytes.
const fn is_cookie_octet(byte: u8) -> bool {
    matches!(byte, 0x21 | 0x23 ..= 0x2b | 0x2d ..= 0x3a | 0x3c ..= 0x5b | 0x5d ..= 0x7e)
}
