// crates/swan-config/src/config.rs
// ============================================================================
// Module: SWAN Configuration
// Description: Configuration loading and validation for SWAN nodes.
// Purpose: Provide strict, fail-closed config parsing with hard limits.
// Dependencies: swan-core, serde, toml
// ============================================================================

//! ## Overview
//! Configuration is loaded from a TOML file with strict size and path limits.
//! Missing or invalid configuration fails closed: a node never starts with a
//! partially understood trust set or cookie policy.
//!
//! Resolution order is an explicit path, then the `SWAN_CONFIG` environment
//! variable, then `swan.toml` in the working directory.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;
use std::env;
use std::fs;
use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;
use swan_core::CookieOptions;
use swan_core::cookie::DEFAULT_COOKIE_PREFIX;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default configuration filename when no path is specified.
pub const DEFAULT_CONFIG_NAME: &str = "swan.toml";
/// Environment variable used to override the config path.
pub const CONFIG_ENV_VAR: &str = "SWAN_CONFIG";
/// Maximum configuration file size in bytes.
pub(crate) const MAX_CONFIG_FILE_SIZE: usize = 1024 * 1024;
/// Maximum length of a single path component.
pub(crate) const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum total path length.
pub(crate) const MAX_TOTAL_PATH_LENGTH: usize = 4096;
/// Maximum length of a DNS domain name.
pub(crate) const MAX_DOMAIN_LENGTH: usize = 253;
/// Maximum number of trusted issuer entries.
pub(crate) const MAX_TRUSTED_ISSUERS: usize = 256;
/// Maximum length of the cookie name prefix.
pub(crate) const MAX_COOKIE_PREFIX_LENGTH: usize = 64;
/// Default revalidation window in seconds (one day).
pub(crate) const DEFAULT_REVALIDATE_SECONDS: u64 = 86_400;
/// Maximum revalidation window in seconds (one year).
pub(crate) const MAX_REVALIDATE_SECONDS: u64 = 31_536_000;
/// Default cookie lifetime in seconds (90 days).
pub(crate) const DEFAULT_COOKIE_SECONDS: u64 = 7_776_000;
/// Maximum cookie lifetime in seconds (400 days, the browser ceiling).
pub(crate) const MAX_COOKIE_SECONDS: u64 = 34_560_000;

// ============================================================================
// SECTION: Configuration Types
// ============================================================================

/// SWAN node configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SwanConfig {
    /// Identity of this participating node.
    #[serde(default)]
    pub node: NodeConfig,
    /// Issuers whose proofs this node accepts.
    #[serde(default)]
    pub trust: TrustConfig,
    /// Cookie formatting options.
    #[serde(default)]
    pub cookies: CookieConfig,
    /// Model validity windows.
    #[serde(default)]
    pub validity: ValidityConfig,
    /// Audit sink selection.
    #[serde(default)]
    pub audit: AuditConfig,
}

impl SwanConfig {
    /// Loads configuration from disk using the default resolution rules.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when loading or validation fails.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let resolved = resolve_path(path)?;
        validate_path(&resolved)?;
        let bytes = fs::read(&resolved).map_err(|err| ConfigError::Io(err.to_string()))?;
        if bytes.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigError::Invalid("config file exceeds size limit".to_string()));
        }
        let content = std::str::from_utf8(&bytes)
            .map_err(|_| ConfigError::Invalid("config file must be utf-8".to_string()))?;
        Self::from_toml(content)
    }

    /// Parses and validates configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when parsing or validation fails.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self =
            toml::from_str(content).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration for internal consistency.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when configuration is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.node.validate()?;
        self.trust.validate()?;
        self.cookies.validate()?;
        self.validity.validate()?;
        self.audit.validate()?;
        Ok(())
    }
}

/// Identity of this participating node.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NodeConfig {
    /// Issuing domain stamped on every proof this node creates.
    #[serde(default)]
    pub domain: String,
    /// Path to the ed25519 secret key (raw 32 bytes or base64).
    #[serde(default)]
    pub signing_key: Option<String>,
}

impl NodeConfig {
    /// Validates node identity settings.
    fn validate(&self) -> Result<(), ConfigError> {
        validate_domain("node.domain", &self.domain)?;
        if let Some(path) = &self.signing_key {
            validate_path_string("node.signing_key", path)?;
        }
        Ok(())
    }
}

/// Trusted issuer configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct TrustConfig {
    /// Issuers and their public keys.
    #[serde(default)]
    pub issuers: Vec<IssuerConfig>,
    /// Treat proofs from issuers without a configured key as errors.
    #[serde(default = "default_require_known_issuer")]
    pub require_known_issuer: bool,
}

impl Default for TrustConfig {
    fn default() -> Self {
        Self {
            issuers: Vec::new(),
            require_known_issuer: default_require_known_issuer(),
        }
    }
}

impl TrustConfig {
    /// Validates issuer entries.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.issuers.len() > MAX_TRUSTED_ISSUERS {
            return Err(ConfigError::Invalid("trust.issuers exceeds max entries".to_string()));
        }
        let mut seen = BTreeSet::new();
        for issuer in &self.issuers {
            issuer.validate()?;
            if !seen.insert(issuer.domain.as_str()) {
                return Err(ConfigError::Invalid(format!(
                    "duplicate trust.issuers.domain: {}",
                    issuer.domain
                )));
            }
        }
        Ok(())
    }
}

/// One trusted issuing domain.
#[derive(Debug, Clone, Deserialize)]
pub struct IssuerConfig {
    /// Issuing domain as it appears in proofs.
    pub domain: String,
    /// Path to the ed25519 public key (raw 32 bytes or base64).
    pub public_key: String,
}

impl IssuerConfig {
    /// Validates a single issuer entry.
    fn validate(&self) -> Result<(), ConfigError> {
        validate_domain("trust.issuers.domain", &self.domain)?;
        validate_path_string("trust.issuers.public_key", &self.public_key)
    }
}

/// Cookie formatting configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct CookieConfig {
    /// Name prefix prepended to each storage key.
    #[serde(default = "default_cookie_prefix")]
    pub prefix: String,
    /// Emit the `Secure` attribute.
    #[serde(default = "default_cookie_secure")]
    pub secure: bool,
    /// Cookie path attribute.
    #[serde(default = "default_cookie_path")]
    pub path: String,
}

impl Default for CookieConfig {
    fn default() -> Self {
        Self {
            prefix: default_cookie_prefix(),
            secure: default_cookie_secure(),
            path: default_cookie_path(),
        }
    }
}

impl CookieConfig {
    /// Converts the section into core cookie options.
    #[must_use]
    pub fn to_options(&self) -> CookieOptions {
        CookieOptions {
            prefix: self.prefix.clone(),
            secure: self.secure,
            path: self.path.clone(),
        }
    }

    /// Validates cookie settings.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.prefix.len() > MAX_COOKIE_PREFIX_LENGTH {
            return Err(ConfigError::Invalid("cookies.prefix exceeds max length".to_string()));
        }
        if !self.prefix.bytes().all(is_token_byte) {
            return Err(ConfigError::Invalid(
                "cookies.prefix must contain only token characters".to_string(),
            ));
        }
        if !self.path.starts_with('/') {
            return Err(ConfigError::Invalid("cookies.path must start with '/'".to_string()));
        }
        if self.path.bytes().any(|byte| byte == b';' || byte.is_ascii_control()) {
            return Err(ConfigError::Invalid(
                "cookies.path must not contain ';' or control characters".to_string(),
            ));
        }
        Ok(())
    }
}

/// Model validity windows.
#[derive(Debug, Clone, Deserialize)]
pub struct ValidityConfig {
    /// Upper bound on a fetched model's lifetime before revalidation.
    #[serde(default = "default_revalidate_seconds")]
    pub revalidate_seconds: u64,
    /// Lifetime given to entries stored without an explicit expiry.
    #[serde(default = "default_cookie_seconds")]
    pub default_cookie_seconds: u64,
}

impl Default for ValidityConfig {
    fn default() -> Self {
        Self {
            revalidate_seconds: default_revalidate_seconds(),
            default_cookie_seconds: default_cookie_seconds(),
        }
    }
}

impl ValidityConfig {
    /// Validates validity windows.
    fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=MAX_REVALIDATE_SECONDS).contains(&self.revalidate_seconds) {
            return Err(ConfigError::Invalid(format!(
                "validity.revalidate_seconds must be between 1 and {MAX_REVALIDATE_SECONDS}"
            )));
        }
        if !(1..=MAX_COOKIE_SECONDS).contains(&self.default_cookie_seconds) {
            return Err(ConfigError::Invalid(format!(
                "validity.default_cookie_seconds must be between 1 and {MAX_COOKIE_SECONDS}"
            )));
        }
        Ok(())
    }
}

/// Audit sink kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AuditSinkKind {
    /// Discard audit events.
    #[default]
    None,
    /// Write JSON lines to stderr.
    Stderr,
    /// Append JSON lines to a file.
    File,
}

/// Audit logging configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuditConfig {
    /// Sink selection.
    #[serde(default)]
    pub sink: AuditSinkKind,
    /// Audit log path (JSON lines), required for the file sink.
    #[serde(default)]
    pub path: Option<String>,
}

impl AuditConfig {
    /// Validates audit configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        match (&self.sink, &self.path) {
            (AuditSinkKind::File, None) => {
                Err(ConfigError::Invalid("audit.path is required for the file sink".to_string()))
            }
            (_, Some(path)) => validate_path_string("audit.path", path),
            (_, None) => Ok(()),
        }
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration loading or validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O failure while reading configuration.
    #[error("config io error: {0}")]
    Io(String),
    /// TOML parsing error.
    #[error("config parse error: {0}")]
    Parse(String),
    /// Invalid configuration data.
    #[error("invalid config: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Resolves the config path using the override and env var.
fn resolve_path(path: Option<&Path>) -> Result<PathBuf, ConfigError> {
    if let Some(path) = path {
        return Ok(path.to_path_buf());
    }
    if let Ok(env_path) = env::var(CONFIG_ENV_VAR) {
        if env_path.len() > MAX_TOTAL_PATH_LENGTH {
            return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
        }
        return Ok(PathBuf::from(env_path));
    }
    Ok(PathBuf::from(DEFAULT_CONFIG_NAME))
}

/// Validates the resolved path against security limits.
fn validate_path(path: &Path) -> Result<(), ConfigError> {
    let text = path.to_string_lossy();
    if text.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
    }
    for component in path.components() {
        let value = component.as_os_str().to_string_lossy();
        if value.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid("config path component too long".to_string()));
        }
    }
    Ok(())
}

/// Validates a path string against length constraints.
fn validate_path_string(field: &str, value: &str) -> Result<(), ConfigError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::Invalid(format!("{field} must be non-empty")));
    }
    if trimmed.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid(format!("{field} exceeds max length")));
    }
    for component in Path::new(trimmed).components() {
        if component.as_os_str().len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid(format!("{field} path component too long")));
        }
    }
    Ok(())
}

/// Validates an issuing domain: non-empty, trimmed, bare host without port.
fn validate_domain(field: &str, value: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Invalid(format!("{field} must be non-empty")));
    }
    if value.trim() != value {
        return Err(ConfigError::Invalid(format!("{field} must be trimmed")));
    }
    if value.len() > MAX_DOMAIN_LENGTH {
        return Err(ConfigError::Invalid(format!("{field} exceeds max length")));
    }
    if value.contains(':') {
        return Err(ConfigError::Invalid(format!("{field} must not include a port")));
    }
    if value.chars().any(|ch| ch == '/' || ch.is_whitespace()) {
        return Err(ConfigError::Invalid(format!("{field} must be a bare host name")));
    }
    Ok(())
}

/// Returns true for RFC 7230 token characters.
const fn is_token_byte(byte: u8) -> bool {
    byte.is_ascii_alphanumeric()
        || matches!(
            byte,
            b'!' | b'#'
                | b'$'
                | b'%'
                | b'&'
                | b'\''
                | b'*'
                | b'+'
                | b'-'
                | b'.'
                | b'^'
                | b'_'
                | b'`'
                | b'|'
                | b'~'
        )
}

/// Default for `trust.require_known_issuer`.
const fn default_require_known_issuer() -> bool {
    true
}

/// Default for `cookies.prefix`.
fn default_cookie_prefix() -> String {
    DEFAULT_COOKIE_PREFIX.to_string()
}

/// Default for `cookies.secure`.
const fn default_cookie_secure() -> bool {
    true
}

/// Default for `cookies.path`.
fn default_cookie_path() -> String {
    "/".to_string()
}

/// Default for `validity.revalidate_seconds`.
const fn default_revalidate_seconds() -> u64 {
    DEFAULT_REVALIDATE_SECONDS
}

/// Default for `validity.default_cookie_seconds`.
const fn default_cookie_seconds() -> u64 {
    DEFAULT_COOKIE_SECONDS
}
