// crates/swan-cli/src/main_tests.rs
// ============================================================================
// Module: CLI Main Helpers Tests
// Description: Unit tests for key generation, reports, and trust loading.
// Purpose: Ensure CLI helpers fail closed and agree with the node's keyring.
// Dependencies: swan-cli main helpers, swan-node, tempfile
// ============================================================================

//! ## Overview
//! Exercises the helpers behind `keygen`, `inspect`, `verify`, and
//! `config validate` without spawning the binary.

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only panic-based assertions are permitted."
)]

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs;
use std::path::Path;

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use clap::Parser;
use ed25519_dalek::SigningKey;
use swan_core::Email;
use swan_core::Entity;
use swan_core::EntityKind;
use swan_core::TrustScheme;
use swan_node::Ed25519Signer;
use swan_node::InspectReport;
use swan_node::keyring::read_key_bytes;

use super::Cli;
use super::Commands;
use super::ConfigCommand;
use super::PUBLIC_KEY_FILE;
use super::SECRET_KEY_FILE;
use super::keyring_for;
use super::load_config;
use super::write_key_pair;

// ============================================================================
// SECTION: Helpers
// ============================================================================

const CMP: &str = "cmp.example";

fn cmp_key() -> SigningKey {
    SigningKey::from_bytes(&[1u8; 32])
}

fn signed_email(key: SigningKey) -> String {
    let mut email = Email::new("user@example.com");
    email.sign(&Ed25519Signer::new(CMP, key)).unwrap();
    BASE64.encode(email.encode_with_proof().unwrap())
}

fn write_config(dir: &Path) -> std::path::PathBuf {
    fs::write(dir.join("cmp.pub"), BASE64.encode(cmp_key().verifying_key().to_bytes())).unwrap();
    let toml = format!(
        r#"
[node]
domain = "node.example"

[[trust.issuers]]
domain = "cmp.example"
public_key = "{cmp}"
"#,
        cmp = dir.join("cmp.pub").display(),
    );
    let path = dir.join("swan.toml");
    fs::write(&path, toml).unwrap();
    path
}

fn verify(config: &Path, input: &str) -> InspectReport {
    let config = load_config(Some(config)).unwrap();
    let keyring = keyring_for(&config).unwrap();
    InspectReport::from_base64("email", input, Some(&keyring), &TrustScheme::AnyKnownIssuer).unwrap()
}

// ============================================================================
// SECTION: Keygen
// ============================================================================

#[test]
fn keygen_writes_matching_base64_pair() {
    let dir = tempfile::tempdir().unwrap();
    let key = SigningKey::from_bytes(&[7u8; 32]);
    let (secret, public) = write_key_pair(dir.path(), &key).unwrap();
    assert_eq!(secret, dir.path().join(SECRET_KEY_FILE));
    assert_eq!(public, dir.path().join(PUBLIC_KEY_FILE));
    assert_eq!(read_key_bytes(&secret).unwrap(), key.to_bytes());
    assert_eq!(read_key_bytes(&public).unwrap(), key.verifying_key().to_bytes());
}

#[test]
fn keygen_refuses_to_overwrite_existing_keys() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join(SECRET_KEY_FILE), "keep").unwrap();
    let err = write_key_pair(dir.path(), &cmp_key()).unwrap_err();
    assert!(err.to_string().contains("unable to create"));
    assert_eq!(fs::read_to_string(dir.path().join(SECRET_KEY_FILE)).unwrap(), "keep");
}

// ============================================================================
// SECTION: Inspect And Verify
// ============================================================================

#[test]
fn inspect_without_keys_reports_issuer_only() {
    let report =
        InspectReport::from_base64("email", &signed_email(cmp_key()), None, &TrustScheme::AnyKnownIssuer).unwrap();
    assert_eq!(report.kind, Some(EntityKind::Email));
    assert_eq!(report.issuer.as_deref(), Some(CMP));
    assert_eq!(report.verified, None);
}

#[test]
fn verify_accepts_entity_signed_by_configured_issuer() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(dir.path());
    let report = verify(&config, &signed_email(cmp_key()));
    assert_eq!(report.verified, Some(true));
}

#[test]
fn verify_rejects_entity_signed_by_other_key() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(dir.path());
    let report = verify(&config, &signed_email(SigningKey::from_bytes(&[9u8; 32])));
    assert_eq!(report.verified, Some(false));
}

#[test]
fn keyring_includes_node_signing_key() {
    let dir = tempfile::tempdir().unwrap();
    let node_key = SigningKey::from_bytes(&[2u8; 32]);
    fs::write(dir.path().join("node.key"), node_key.to_bytes()).unwrap();
    let toml = format!("[node]\ndomain = \"node.example\"\nsigning_key = \"{}\"\n", dir.path().join("node.key").display());
    let path = dir.path().join("swan.toml");
    fs::write(&path, toml).unwrap();
    let keyring = keyring_for(&load_config(Some(&path)).unwrap()).unwrap();
    assert!(keyring.contains("node.example"));
    assert_eq!(keyring.len(), 1);
}

#[test]
fn missing_issuer_key_file_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(dir.path());
    fs::remove_file(dir.path().join("cmp.pub")).unwrap();
    let err = keyring_for(&load_config(Some(&config)).unwrap()).unwrap_err();
    assert!(err.to_string().starts_with("trust keys:"));
}

// ============================================================================
// SECTION: Arguments
// ============================================================================

#[test]
fn parses_verify_arguments() {
    let cli = Cli::try_parse_from(["swan", "verify", "--config", "swan.toml", "--key", "email", "AAAA"]).unwrap();
    let Commands::Verify(command) = cli.command else {
        panic!("expected verify command");
    };
    assert_eq!(command.key, "email");
    assert_eq!(command.input, "AAAA");
    assert_eq!(command.config, Path::new("swan.toml"));
}

#[test]
fn parses_config_validate_without_path() {
    let cli = Cli::try_parse_from(["swan", "config", "validate"]).unwrap();
    let Commands::Config {
        command: ConfigCommand::Validate(command),
    } = cli.command
    else {
        panic!("expected config validate command");
    };
    assert!(command.config.is_none());
}

#[test]
fn keygen_requires_output_directory() {
    assert!(Cli::try_parse_from(["swan", "keygen"]).is_err());
}
