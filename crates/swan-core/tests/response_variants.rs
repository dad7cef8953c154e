// crates/swan-core/tests/response_variants.rs
// ============================================================================
// Module: Response Variant Tests
// Description: Envelope discriminant handling for Bid, Failed, and Empty.
// Purpose: Ensure tags are checked strictly and never coerced.
// Dependencies: swan-core
// ============================================================================

//! Envelope discriminant handling for Bid, Failed, and Empty.

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
use swan_core::Empty;
use swan_core::Entity;
use swan_core::EntityError;
use swan_core::EntityKind;
use swan_core::Failed;
use swan_core::Response;
use swan_core::ResponseTag;
use swan_core::TrustScheme;

#[test]
fn bid_bytes_decode_as_bid() {
    let bid = Bid::new("https://cdn.example/ad.png", "https://shop.example");
    let bytes = bid.encode().unwrap();
    assert_eq!(bytes[1], ResponseTag::Bid.as_u8());
    assert_eq!(Bid::decode(&bytes).unwrap(), bid);
}

#[test]
fn bid_bytes_rejected_by_failed_decoder() {
    let bytes = Bid::new("https://cdn.example/ad.png", "https://shop.example").encode().unwrap();
    let err = Failed::decode(&bytes).unwrap_err();
    assert_eq!(
        err,
        EntityError::VariantMismatch {
            expected: EntityKind::Failed,
            tag: ResponseTag::Bid.as_u8(),
        }
    );
}

#[test]
fn empty_bytes_rejected_by_bid_decoder() {
    let bytes = Empty::new().encode().unwrap();
    let err = Bid::decode(&bytes).unwrap_err();
    assert!(matches!(err, EntityError::VariantMismatch { expected: EntityKind::Bid, tag: 3 }));
}

#[test]
fn response_decode_selects_variant_from_tag() {
    let mut failed = Failed::new("dsp.example", "timeout");
    failed.sign(&HashSigner::fixture()).unwrap();
    let wire = failed.encode_with_proof().unwrap();
    let response = Response::decode(&wire).unwrap();
    assert_eq!(response.tag(), ResponseTag::Failed);
    assert_eq!(response, Response::Failed(failed));
    assert!(response.verify(&HashVerifier::fixture(), &TrustScheme::AnyKnownIssuer).unwrap());
    assert_eq!(response.encode_with_proof().unwrap(), wire);
}

#[test]
fn response_decode_rejects_unknown_tag() {
    let err = Response::decode(&[1, 9]).unwrap_err();
    assert_eq!(
        err,
        EntityError::UnknownVariant {
            tag: 9
        }
    );
}
