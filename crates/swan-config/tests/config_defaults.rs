//! Default and loading tests for swan-config.
// crates/swan-config/tests/config_defaults.rs
// =============================================================================
// Module: Config Default Tests
// Description: Defaults, file loading limits, and option conversion.
// Purpose: Ensure omitted sections fall back to safe values.
// =============================================================================

use std::path::Path;

use swan_config::AuditSinkKind;
use swan_config::ConfigError;
use swan_config::SwanConfig;

mod common;

type TestResult = Result<(), String>;

#[test]
fn omitted_sections_use_defaults() -> TestResult {
    let config = SwanConfig::from_toml(common::MINIMAL_TOML).map_err(|err| err.to_string())?;
    if config.node.domain != "swan.example" {
        return Err(format!("unexpected domain {}", config.node.domain));
    }
    if !config.trust.require_known_issuer || !config.trust.issuers.is_empty() {
        return Err("trust defaults changed".to_string());
    }
    let options = config.cookies.to_options();
    if options.prefix != "swan-" || !options.secure || options.path != "/" {
        return Err("cookie defaults changed".to_string());
    }
    if config.validity.revalidate_seconds != 86_400
        || config.validity.default_cookie_seconds != 7_776_000
    {
        return Err("validity defaults changed".to_string());
    }
    if config.audit.sink != AuditSinkKind::None {
        return Err("audit sink should default to none".to_string());
    }
    Ok(())
}

#[test]
fn full_config_loads_from_file() -> TestResult {
    let toml = r#"
[node]
domain = "swan.example"
signing_key = "keys/node.key"

[trust]
require_known_issuer = false

[[trust.issuers]]
domain = "cmp.example"
public_key = "keys/cmp.pub"

[cookies]
prefix = "s_"
secure = false
path = "/swan"

[validity]
revalidate_seconds = 60
default_cookie_seconds = 3600

[audit]
sink = "file"
path = "audit.jsonl"
"#;
    let (_dir, path) = common::write_config(toml.as_bytes())?;
    let config = SwanConfig::load(Some(&path)).map_err(|err| err.to_string())?;
    if config.trust.issuers.len() != 1 || config.trust.issuers[0].domain != "cmp.example" {
        return Err("issuer not loaded".to_string());
    }
    if config.cookies.prefix != "s_" || config.cookies.secure {
        return Err("cookie section not loaded".to_string());
    }
    if config.validity.revalidate_seconds != 60 || config.audit.sink != AuditSinkKind::File {
        return Err("validity or audit not loaded".to_string());
    }
    Ok(())
}

#[test]
fn missing_file_is_io_error() -> TestResult {
    match SwanConfig::load(Some(Path::new("/nonexistent/swan/swan.toml"))) {
        Err(ConfigError::Io(_)) => Ok(()),
        other => Err(format!("expected io error, got {}", describe(&other))),
    }
}

#[test]
fn oversized_file_is_rejected() -> TestResult {
    let mut content = common::MINIMAL_TOML.as_bytes().to_vec();
    content.extend(std::iter::repeat_n(b'#', 1024 * 1024));
    let (_dir, path) = common::write_config(&content)?;
    common::assert_invalid(SwanConfig::load(Some(&path)), "exceeds size limit")
}

#[test]
fn non_utf8_file_is_rejected() -> TestResult {
    let (_dir, path) = common::write_config(&[0xff, 0xfe, 0x00])?;
    common::assert_invalid(SwanConfig::load(Some(&path)), "must be utf-8")
}

#[test]
fn malformed_toml_is_parse_error() -> TestResult {
    let (_dir, path) = common::write_config(b"[node\ndomain = ")?;
    match SwanConfig::load(Some(&path)) {
        Err(ConfigError::Parse(_)) => Ok(()),
        other => Err(format!("expected parse error, got {}", describe(&other))),
    }
}

#[test]
fn overlong_path_component_is_rejected() -> TestResult {
    let long = "a".repeat(300);
    common::assert_invalid(SwanConfig::load(Some(Path::new(&long))), "component too long")
}

/// Renders a load outcome for failure messages.
fn describe(result: &Result<SwanConfig, ConfigError>) -> String {
    match result {
        Ok(_) => "ok".to_string(),
        Err(err) => err.to_string(),
    }
}
