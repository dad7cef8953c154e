// crates/swan-core/tests/version_gate.rs
// ============================================================================
// Module: Version Gate Tests
// Description: Out-of-range header versions for every entity type.
// Purpose: Ensure unsupported versions are rejected before payload parsing.
// Dependencies: swan-core
// ============================================================================

//! ## Overview
//! Rewrites the version byte of valid encodings to one below the minimum and
//! one above the maximum and asserts `UnsupportedVersion` for each type.

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    reason = "Test-only panic-based assertions are permitted."
)]

use swan_core::Bid;
use swan_core::ByteArray;
use swan_core::Claim;
use swan_core::Email;
use swan_core::Empty;
use swan_core::Entity;
use swan_core::EntityError;
use swan_core::EntityKind;
use swan_core::Failed;
use swan_core::Identifier;
use swan_core::MAX_SUPPORTED_VERSION;
use swan_core::MIN_SUPPORTED_VERSION;
use swan_core::Preferences;
use swan_core::Response;
use swan_core::Salt;
use swan_core::Seed;
use swan_core::StringArray;

/// Asserts both out-of-range versions fail for `entity`'s encoding.
fn assert_version_gate<E: Entity + std::fmt::Debug>(entity: &E) {
    let bytes = entity.encode().unwrap();
    assert_eq!(bytes[0], swan_core::ENTITY_VERSION);
    for version in [MIN_SUPPORTED_VERSION - 1, MAX_SUPPORTED_VERSION + 1] {
        let mut patched = bytes.clone();
        patched[0] = version;
        let err = E::decode(&patched).unwrap_err();
        assert_eq!(
            err,
            EntityError::UnsupportedVersion {
                kind: E::KIND,
                version,
                min: MIN_SUPPORTED_VERSION,
                max: MAX_SUPPORTED_VERSION,
            }
        );
    }
}

#[test]
fn every_entity_type_rejects_out_of_range_versions() {
    assert_version_gate(&ByteArray::new(vec![1_u8]));
    assert_version_gate(&Email::new("user@example.com"));
    assert_version_gate(&Salt::new(vec![2_u8]));
    assert_version_gate(&Identifier::new_random("rid"));
    assert_version_gate(&Preferences::new(true));
    assert_version_gate(&StringArray::new(["a.com"]));
    assert_version_gate(&Seed::new(vec![vec![1]]));
    assert_version_gate(&Claim::new(3));
    assert_version_gate(&Bid::new("https://cdn.example/ad.png", "https://shop.example"));
    assert_version_gate(&Failed::new("dsp.example", "timeout"));
    assert_version_gate(&Empty::new());
}

#[test]
fn empty_input_is_truncated_not_unsupported() {
    let err = Email::decode(&[]).unwrap_err();
    assert!(matches!(err, EntityError::Codec(_)));
}

#[test]
fn response_envelope_checks_version_before_tag() {
    let bytes = Bid::new("https://cdn.example/ad.png", "https://shop.example").encode().unwrap();
    for version in [MIN_SUPPORTED_VERSION - 1, MAX_SUPPORTED_VERSION + 1] {
        let mut patched = bytes.clone();
        patched[0] = version;
        let err = Response::decode(&patched).unwrap_err();
        assert_eq!(
            err,
            EntityError::UnsupportedVersion {
                kind: EntityKind::Response,
                version,
                min: MIN_SUPPORTED_VERSION,
                max: MAX_SUPPORTED_VERSION,
            }
        );
    }
    assert!(matches!(Response::decode(&[0]), Err(EntityError::UnsupportedVersion { .. })));
    assert!(matches!(
        Response::decode(&[MAX_SUPPORTED_VERSION + 1, 9]),
        Err(EntityError::UnsupportedVersion { .. })
    ));
}
