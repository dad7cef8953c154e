// crates/swan-core/tests/signed_in_id.rs
// ============================================================================
// Module: Signed-In Identifier Tests
// Description: Determinism and sensitivity of the email x salt digest.
// Purpose: Ensure the derived identifier is stable and input-bound.
// Dependencies: swan-core
// ============================================================================

//! Determinism and sensitivity of the email x salt digest.

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    reason = "Test-only panic-based assertions are permitted."
)]

mod common;

use common::HashSigner;
use common::HashVerifier;
use swan_core::Email;
use swan_core::Entity;
use swan_core::Salt;
use swan_core::TrustScheme;
use swan_core::derive_signed_in_id;
use swan_core::entities::ID_TYPE_SIGNED_IN;
use swan_core::sid::signed_in_digest;

#[test]
fn identical_inputs_yield_identical_digests() {
    let email = Email::new("user@example.com");
    let salt = Salt::new(vec![1_u8, 2, 3]);
    let first = derive_signed_in_id(&email, &salt, &HashSigner::fixture()).unwrap();
    let second = derive_signed_in_id(&email, &salt, &HashSigner::fixture()).unwrap();
    assert_eq!(first.value(), second.value());
    assert_eq!(first.id_type(), ID_TYPE_SIGNED_IN);
    assert!(first.verify(&HashVerifier::fixture(), &TrustScheme::AnyKnownIssuer).unwrap());
}

#[test]
fn changing_either_input_changes_digest() {
    let email = Email::new("user@example.com");
    let salt = Salt::new(vec![1_u8, 2, 3]);
    let base = signed_in_digest(&email, &salt).unwrap();
    assert_ne!(base, signed_in_digest(&Email::new("other@example.com"), &salt).unwrap());
    assert_ne!(base, signed_in_digest(&email, &Salt::new(vec![1_u8, 2, 4])).unwrap());
}

#[test]
fn shifting_bytes_between_email_and_salt_changes_digest() {
    let joined = signed_in_digest(&Email::new("ab"), &Salt::new(b"c".to_vec())).unwrap();
    let shifted = signed_in_digest(&Email::new("a"), &Salt::new(b"bc".to_vec())).unwrap();
    assert_ne!(joined, shifted);
}

#[test]
fn empty_email_yields_empty_identifier() {
    let sid = derive_signed_in_id(&Email::new(""), &Salt::new(vec![1_u8]), &HashSigner::fixture()).unwrap();
    assert!(sid.is_empty());
    assert!(sid.proof().is_some());
}
