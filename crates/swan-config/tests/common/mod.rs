// crates/swan-config/tests/common/mod.rs
// =============================================================================
// Module: Config Test Helpers
// Description: Shared helpers for config validation tests.
// Purpose: Reduce duplication across integration tests for swan-config.
// =============================================================================

#![allow(dead_code, reason = "Test helpers are selectively used across suites.")]

use std::fs;
use std::path::PathBuf;

use swan_config::ConfigError;
use swan_config::SwanConfig;
use tempfile::TempDir;

/// Smallest valid configuration.
pub const MINIMAL_TOML: &str = r#"
[node]
domain = "swan.example"
"#;

/// Parses a TOML string into a `SwanConfig` without validation.
pub fn config_from_toml(toml_str: &str) -> Result<SwanConfig, toml::de::Error> {
    toml::from_str(toml_str)
}

/// Returns a minimal config with all defaults applied.
pub fn minimal_config() -> Result<SwanConfig, toml::de::Error> {
    config_from_toml(MINIMAL_TOML)
}

/// Writes `content` to a config file inside a fresh temp dir.
pub fn write_config(content: &[u8]) -> Result<(TempDir, PathBuf), String> {
    let dir = tempfile::tempdir().map_err(|err| err.to_string())?;
    let path = dir.path().join("swan.toml");
    fs::write(&path, content).map_err(|err| err.to_string())?;
    Ok((dir, path))
}

/// Asserts the result is an invalid-config error mentioning `needle`.
pub fn assert_invalid<T>(result: Result<T, ConfigError>, needle: &str) -> Result<(), String> {
    match result {
        Err(error) => {
            let message = error.to_string();
            if message.contains(needle) {
                Ok(())
            } else {
                Err(format!("error {message} did not contain {needle}"))
            }
        }
        Ok(_) => Err("expected invalid config".to_string()),
    }
}
