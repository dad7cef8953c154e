// crates/swan-core/tests/tamper_detection.rs
// ============================================================================
// Module: Tamper Detection Tests
// Description: Single-field mutations of signed entities.
// Purpose: Ensure any payload change makes verification return false.
// Dependencies: swan-core
// ============================================================================

//! ## Overview
//! Signs an entity, mutates exactly one payload field, and asserts that
//! verification returns `Ok(false)`: never `true`, never a codec error.
//!
//! Threat model: altered identity or consent values replayed under a valid proof.

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
use swan_core::Bid;
use swan_core::ByteArray;
use swan_core::Claim;
use swan_core::Email;
use swan_core::Entity;
use swan_core::Failed;
use swan_core::Identifier;
use swan_core::Preferences;
use swan_core::Salt;
use swan_core::Seed;
use swan_core::TrustScheme;

/// Signs `entity`, applies `mutate`, and asserts verification returns false.
fn assert_tamper_detected<E: Entity>(mut entity: E, mutate: impl FnOnce(&mut E)) {
    entity.sign(&HashSigner::fixture()).unwrap();
    let verifier = HashVerifier::fixture();
    assert!(entity.verify(&verifier, &TrustScheme::AnyKnownIssuer).unwrap());
    mutate(&mut entity);
    assert!(!entity.verify(&verifier, &TrustScheme::AnyKnownIssuer).unwrap());
}

#[test]
fn mutated_email_fails_verification() {
    assert_tamper_detected(Email::new("user@example.com"), |email| email.set_address("attacker@example.com"));
}

#[test]
fn mutated_salt_fails_verification() {
    assert_tamper_detected(Salt::new(vec![1_u8, 2, 3]), |salt| salt.set_value(vec![1_u8, 2, 4]));
}

#[test]
fn mutated_identifier_fails_verification() {
    assert_tamper_detected(Identifier::new("rid", vec![0_u8; 16]), |rid| rid.set_value(vec![1_u8; 16]));
}

#[test]
fn mutated_preferences_fail_verification() {
    assert_tamper_detected(Preferences::new(false), |pref| pref.set_use_browsing_for_personalization(true));
}

#[test]
fn mutated_byte_array_fails_verification() {
    assert_tamper_detected(ByteArray::new(vec![5_u8]), |bytes| bytes.set_value(Vec::new()));
}

#[test]
fn mutated_bid_fails_verification() {
    assert_tamper_detected(Bid::new("https://cdn.example/a.png", "https://shop.example"), |bid| {
        bid.set_media_url("https://cdn.example/b.png");
    });
}

#[test]
fn mutated_bid_advertiser_fails_verification() {
    assert_tamper_detected(Bid::new("https://cdn.example/a.png", "https://shop.example"), |bid| {
        bid.set_advertiser_url("https://other.example");
    });
}

#[test]
fn mutated_failed_host_fails_verification() {
    assert_tamper_detected(Failed::new("dsp.example", "timeout"), |failed| failed.set_host("rival.example"));
}

#[test]
fn mutated_failed_error_fails_verification() {
    assert_tamper_detected(Failed::new("dsp.example", "timeout"), |failed| failed.set_error("no fill"));
}

#[test]
fn mutated_claim_value_fails_verification() {
    assert_tamper_detected(Claim::new(1), |claim| claim.set_value(0));
}

/// Seed carrying signed nested entities.
fn populated_seed() -> Seed {
    let signer = HashSigner::fixture();
    let mut rid = Identifier::new("rid", vec![0_u8; 16]);
    rid.sign(&signer).unwrap();
    let mut pref = Preferences::new(false);
    pref.sign(&signer).unwrap();
    let mut seed = Seed::new(vec![vec![1_u8]]);
    seed.set_pub_domain("pub.example");
    seed.set_random_id(Some(rid));
    seed.set_preferences(Some(pref));
    seed
}

#[test]
fn mutated_seed_random_id_fails_verification() {
    assert_tamper_detected(populated_seed(), |seed| {
        seed.set_random_id(Some(Identifier::new("rid", vec![1_u8; 16])));
    });
}

#[test]
fn mutated_seed_preferences_fail_verification() {
    assert_tamper_detected(populated_seed(), |seed| seed.set_preferences(Some(Preferences::new(true))));
}

#[test]
fn mutated_seed_fails_verification() {
    assert_tamper_detected(Seed::new(vec![vec![1_u8]]), |seed| seed.set_pub_domain("other.example"));
}

#[test]
fn flipped_wire_byte_fails_verification() {
    let mut email = Email::new("user@example.com");
    email.sign(&HashSigner::fixture()).unwrap();
    let mut wire = email.encode_with_proof().unwrap();
    // Byte 1 is the first address character.
    wire[1] = b'U';
    let decoded = Email::decode(&wire).unwrap();
    assert!(!decoded.verify(&HashVerifier::fixture(), &TrustScheme::AnyKnownIssuer).unwrap());
}
