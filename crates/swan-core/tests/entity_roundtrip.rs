// crates/swan-core/tests/entity_roundtrip.rs
// ============================================================================
// Module: Entity Round-Trip Tests
// Description: Encode/decode, proof binding, and transport forms for entities.
// Purpose: Ensure every entity survives binary, base64, and JSON transport.
// Dependencies: swan-core, serde_json
// ============================================================================

//! ## Overview
//! Each concrete entity is encoded, decoded, signed, and re-verified. The
//! proof must always cover exactly the proof-less encoding.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only output and panic-based assertions are permitted."
)]

mod common;

use common::HashSigner;
use common::HashVerifier;
use swan_core::ByteArray;
use swan_core::Claim;
use swan_core::Email;
use swan_core::Entity;
use swan_core::EntityError;
use swan_core::EntityKind;
use swan_core::Identifier;
use swan_core::Preferences;
use swan_core::Proof;
use swan_core::Salt;
use swan_core::Seed;
use swan_core::StringArray;
use swan_core::TrustScheme;
use swan_core::VerifyError;

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Asserts unsigned and signed round trips for one entity.
fn assert_roundtrip<E: Entity + PartialEq + std::fmt::Debug + Clone>(entity: E) {
    let bytes = entity.encode().unwrap();
    let decoded = E::decode(&bytes).unwrap();
    assert_eq!(decoded, entity);
    assert!(decoded.proof().is_none());

    let mut signed = entity;
    signed.sign(&HashSigner::fixture()).unwrap();
    let wire = signed.encode_with_proof().unwrap();
    let decoded = E::decode_signed(&wire).unwrap();
    assert_eq!(decoded, signed);
    assert!(decoded.verify(&HashVerifier::fixture(), &TrustScheme::AnyKnownIssuer).unwrap());
}

/// Builds a populated seed with signed nested entities.
fn populated_seed() -> Seed {
    let signer = HashSigner::fixture();
    let mut rid = Identifier::new("rid", vec![7_u8; 16]);
    rid.sign(&signer).unwrap();
    let mut pref = Preferences::new(true);
    pref.sign(&signer).unwrap();
    let mut seed = Seed::new(vec![vec![1, 2, 3], vec![4, 5, 6]]);
    seed.set_pub_domain("news.example");
    seed.set_random_id(Some(rid));
    seed.set_preferences(Some(pref));
    seed.set_stopped_domains(vec!["ads.example".to_string()]);
    seed
}

// ============================================================================
// SECTION: Binary Round Trips
// ============================================================================

#[test]
fn byte_array_roundtrips() {
    assert_roundtrip(ByteArray::new(vec![0_u8, 1, 2, 255]));
}

#[test]
fn email_roundtrips() {
    assert_roundtrip(Email::new("user@example.com"));
    assert_roundtrip(Email::new(""));
}

#[test]
fn salt_roundtrips() {
    assert_roundtrip(Salt::new(vec![9_u8; 4]));
}

#[test]
fn identifier_roundtrips() {
    let rid = Identifier::new_random("rid");
    assert!(rid.uuid().is_some());
    assert_roundtrip(rid);
    assert_roundtrip(Identifier::new("sid", Vec::new()));
}

#[test]
fn preferences_roundtrip() {
    assert_roundtrip(Preferences::new(true));
    assert_roundtrip(Preferences::new(false));
}

#[test]
fn claim_roundtrips() {
    assert_roundtrip(Claim::new(-1));
    assert_roundtrip(Claim::new(i32::MAX));
}

#[test]
fn seed_roundtrips_with_nested_proofs() {
    let seed = populated_seed();
    assert_roundtrip(seed.clone());
    let decoded = Seed::decode(&seed.encode().unwrap()).unwrap();
    let rid = decoded.random_id().unwrap();
    assert!(rid.verify(&HashVerifier::fixture(), &TrustScheme::AnyKnownIssuer).unwrap());
    assert!(decoded.signed_in_id().is_none());
}

#[test]
fn string_array_roundtrips_and_is_never_signed() {
    let stop = StringArray::new(["a.com", "b.com"]);
    let decoded = StringArray::decode(&stop.encode().unwrap()).unwrap();
    assert_eq!(decoded.values(), ["a.com".to_string(), "b.com".to_string()]);
    assert!(decoded.proof().is_none());

    let mut unsigned = stop;
    let err = unsigned.sign(&HashSigner::fixture()).unwrap_err();
    assert_eq!(
        err,
        EntityError::Unsignable {
            kind: EntityKind::StringArray
        }
    );
}

#[test]
fn string_array_rejects_trailing_bytes() {
    let mut bytes = StringArray::new(["a.com"]).encode().unwrap();
    bytes.push(0x01);
    let err = StringArray::decode(&bytes).unwrap_err();
    assert!(matches!(err, EntityError::InvalidProof { kind: EntityKind::StringArray, .. }));
}

#[test]
fn stop_list_helpers_keep_order_without_duplicates() {
    let stop = StringArray::new(["a.com"]).with_value("b.com").with_value("a.com");
    assert_eq!(stop.values(), ["a.com".to_string(), "b.com".to_string()]);
    assert!(stop.contains("b.com"));
    let stop = stop.without_value("a.com");
    assert_eq!(stop.values(), ["b.com".to_string()]);
}

// ============================================================================
// SECTION: Proof Handling
// ============================================================================

#[test]
fn proof_covers_encode_not_encode_with_proof() {
    let mut email = Email::new("user@example.com");
    email.sign(&HashSigner::fixture()).unwrap();
    let bound = email.attach_self_as_proof_target().unwrap();
    assert_eq!(bound.signed_bytes().unwrap(), email.encode().unwrap());
    assert_ne!(bound.signed_bytes().unwrap(), email.encode_with_proof().unwrap());
    assert_eq!(bound.proof().domain(), common::ISSUER);
}

#[test]
fn verify_without_proof_is_invalid_proof() {
    let email = Email::new("user@example.com");
    let err = email.verify(&HashVerifier::fixture(), &TrustScheme::AnyKnownIssuer).unwrap_err();
    assert!(matches!(err, EntityError::InvalidProof { kind: EntityKind::Email, .. }));
}

#[test]
fn decode_signed_requires_proof() {
    let bytes = Salt::new(vec![1_u8]).encode().unwrap();
    let err = Salt::decode_signed(&bytes).unwrap_err();
    assert!(matches!(err, EntityError::InvalidProof { kind: EntityKind::Salt, .. }));
}

#[test]
fn malformed_trailing_proof_is_invalid_proof() {
    let mut salt = Salt::new(vec![1_u8, 2]);
    salt.sign(&HashSigner::fixture()).unwrap();
    let wire = salt.encode_with_proof().unwrap();
    let truncated = &wire[.. wire.len() - 3];
    let err = Salt::decode(truncated).unwrap_err();
    assert!(matches!(err, EntityError::InvalidProof { kind: EntityKind::Salt, .. }));

    let mut extended = wire;
    extended.push(0);
    let err = Salt::decode(&extended).unwrap_err();
    assert!(matches!(err, EntityError::InvalidProof { kind: EntityKind::Salt, .. }));
}

#[test]
fn truncated_payload_propagates_codec_error() {
    let bytes = Email::new("user@example.com").encode().unwrap();
    let err = Email::decode(&bytes[.. 4]).unwrap_err();
    assert!(matches!(err, EntityError::Codec(_)));
}

#[test]
fn unknown_issuer_surfaces_as_verify_error() {
    let mut email = Email::new("user@example.com");
    email.sign(&HashSigner::fixture()).unwrap();
    let err = email.verify(&HashVerifier::default(), &TrustScheme::AnyKnownIssuer).unwrap_err();
    assert_eq!(
        err,
        EntityError::Verify {
            kind: EntityKind::Email,
            source: VerifyError::UnknownIssuer {
                domain: common::ISSUER.to_string(),
            },
        }
    );
}

#[test]
fn untrusted_issuer_does_not_verify() {
    let mut email = Email::new("user@example.com");
    email.sign(&HashSigner::fixture()).unwrap();
    let scheme = TrustScheme::issuers(["other.example"]);
    assert!(!email.verify(&HashVerifier::fixture(), &scheme).unwrap());
}

// ============================================================================
// SECTION: Transport Forms
// ============================================================================

#[test]
fn base64_roundtrip_keeps_proof() {
    let mut pref = Preferences::new(true);
    pref.sign(&HashSigner::fixture()).unwrap();
    let text = pref.to_base64().unwrap();
    let decoded = Preferences::from_base64(&text).unwrap();
    assert_eq!(decoded, pref);
}

#[test]
fn invalid_base64_is_reported_with_kind() {
    let err = Preferences::from_base64("not base64!").unwrap_err();
    assert!(matches!(err, EntityError::Base64 { kind: EntityKind::Preferences, .. }));
}

#[test]
fn json_decode_then_bind_verifies_like_binary() {
    let mut rid = Identifier::new_random("rid");
    rid.sign(&HashSigner::fixture()).unwrap();
    let json = serde_json::to_string(&rid).unwrap();
    let decoded: Identifier = serde_json::from_str(&json).unwrap();
    assert_eq!(decoded, rid);
    let bound = decoded.attach_self_as_proof_target().unwrap();
    assert!(bound.verify(&HashVerifier::fixture(), &TrustScheme::AnyKnownIssuer).unwrap());
}

#[test]
fn proof_standalone_bytes_reject_trailing_data() {
    let proof = Proof::new("issuer.example", common::CREATED, vec![1, 2, 3]);
    let mut bytes = proof.to_bytes().unwrap();
    assert_eq!(Proof::from_bytes(&bytes).unwrap(), proof);
    bytes.push(9);
    assert!(Proof::from_bytes(&bytes).is_err());
}
