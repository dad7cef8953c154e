// crates/swan-node/src/keyring/tests.rs
// ============================================================================
// Module: Keyring Unit Tests
// Description: Key decoding and verifier outcome mapping.
// Purpose: Validate raw/base64 key handling and fail-closed verification.
// Dependencies: swan-node, ed25519-dalek, tempfile
// ============================================================================

//! ## Overview
//! Covers key file decoding and how the keyring maps proofs to verifier
//! outcomes.

// ============================================================================
// SECTION: Lint Configuration
// ============================================================================

#![allow(
    clippy::expect_used,
    clippy::unwrap_used,
    clippy::panic,
    clippy::use_debug,
    reason = "Test-only assertions favor direct unwrap/expect for clarity."
)]

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs;

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use ed25519_dalek::SigningKey;
use swan_core::Proof;
use swan_core::Timestamp;
use swan_core::TrustScheme;
use swan_core::VerifyError;
use swan_core::Verifier;

use super::Keyring;
use super::KeyringError;
use super::decode_key_bytes;
use super::load_verifying_key;
use super::read_key_bytes;
use crate::signer::Ed25519Signer;

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Deterministic signing key.
fn signing_key() -> SigningKey {
    SigningKey::from_bytes(&[7u8; 32])
}

/// Keyring trusting `issuer.example` with the fixture key.
fn keyring(require_known_issuer: bool) -> Keyring {
    let mut keyring = Keyring::new(require_known_issuer);
    keyring.insert("issuer.example", signing_key().verifying_key()).unwrap();
    keyring
}

/// Proof over `payload` from the fixture key.
fn proof_for(payload: &[u8]) -> Proof {
    let signer = Ed25519Signer::new("issuer.example", signing_key());
    swan_core::Signer::sign(&signer.at(Timestamp::from_unix_seconds(1_700_000_000)), payload).unwrap()
}

// ============================================================================
// SECTION: Key Decoding
// ============================================================================

#[test]
fn raw_and_base64_keys_decode_identically() {
    let raw = [9u8; 32];
    let text = BASE64.encode(raw);
    assert_eq!(decode_key_bytes(&raw).unwrap(), raw);
    assert_eq!(decode_key_bytes(format!("{text}\n").as_bytes()).unwrap(), raw);
}

#[test]
fn short_keys_are_rejected() {
    assert!(decode_key_bytes(&[1u8; 16]).is_err());
    assert!(decode_key_bytes(BASE64.encode([1u8; 16]).as_bytes()).is_err());
}

#[test]
fn key_files_load_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("issuer.pub");
    let public = signing_key().verifying_key();
    fs::write(&path, BASE64.encode(public.to_bytes())).unwrap();
    assert_eq!(load_verifying_key(&path).unwrap(), public);
}

#[test]
fn oversized_key_files_are_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("huge.key");
    fs::write(&path, vec![b'A'; 8192]).unwrap();
    assert!(matches!(read_key_bytes(&path), Err(KeyringError::TooLarge { .. })));
}

#[test]
fn duplicate_issuers_are_rejected() {
    let mut keyring = keyring(true);
    let err = keyring.insert("issuer.example", signing_key().verifying_key()).unwrap_err();
    assert!(matches!(err, KeyringError::DuplicateIssuer { .. }));
}

// ============================================================================
// SECTION: Verification
// ============================================================================

#[test]
fn valid_signature_verifies() {
    let proof = proof_for(b"payload");
    assert!(keyring(true).verify(&proof, b"payload", &TrustScheme::AnyKnownIssuer).unwrap());
}

#[test]
fn altered_payload_fails() {
    let proof = proof_for(b"payload");
    assert!(!keyring(true).verify(&proof, b"pay1oad", &TrustScheme::AnyKnownIssuer).unwrap());
}

#[test]
fn scheme_excluding_issuer_fails_without_error() {
    let proof = proof_for(b"payload");
    let scheme = TrustScheme::issuers(["other.example"]);
    assert!(!keyring(true).verify(&proof, b"payload", &scheme).unwrap());
}

#[test]
fn unknown_issuer_depends_on_policy() {
    let proof = proof_for(b"payload");
    let empty = Keyring::new(true);
    assert_eq!(
        empty.verify(&proof, b"payload", &TrustScheme::AnyKnownIssuer).unwrap_err(),
        VerifyError::UnknownIssuer {
            domain: "issuer.example".to_string(),
        }
    );
    let lenient = Keyring::new(false);
    assert!(!lenient.verify(&proof, b"payload", &TrustScheme::AnyKnownIssuer).unwrap());
}

#[test]
fn wrong_length_signature_is_malformed() {
    let proof = Proof::new("issuer.example", Timestamp::from_unix_seconds(1), vec![0u8; 10]);
    assert_eq!(
        keyring(true).verify(&proof, b"payload", &TrustScheme::AnyKnownIssuer).unwrap_err(),
        VerifyError::MalformedSignature
    );
}
