// crates/swan-node/tests/winner_resolution.rs
// ============================================================================
// Module: Winner Resolution Tests
// Description: Verified descent through signed auction trees.
// Purpose: Ensure forged claims or outcomes never produce a winner.
// Dependencies: swan-node, swan-core
// ============================================================================

//! Verified descent through signed auction trees.

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    reason = "Test-only panic-based assertions are permitted."
)]

mod common;

use common::Harness;
use common::signed;
use swan_core::Bid;
use swan_core::Claim;
use swan_core::Empty;
use swan_core::Entity;
use swan_core::Node;
use swan_core::Response;
use swan_node::ProcessorError;

/// Signed bid node with a signed claim.
fn bid_node(name: &str, claim: i32) -> Node {
    Node::from_bid(signed(Bid::new(name, "https://shop.example"))).with_claim(signed(Claim::new(claim)))
}

/// `root(1) -> [A(-1), B(0) -> [X(-1)]]`, all signed.
fn tree() -> Node {
    bid_node("root", 1).with_children([bid_node("A", -1), bid_node("B", 0).with_children([bid_node("X", -1)])])
}

#[test]
fn signed_tree_resolves_to_verified_winner() {
    let harness = Harness::new();
    let json = serde_json::to_string(&tree()).unwrap();
    let report = harness.processor.resolve_winner(&json).unwrap().unwrap();
    assert_eq!(report.depth, 2);
    let Response::Bid(bid) = &report.outcome else {
        panic!("expected bid outcome");
    };
    assert_eq!(bid.media_url(), "X");
    let last = harness.audit.events().pop().unwrap();
    assert_eq!(last.event, "winner_resolved");
    assert_eq!(last.key.as_deref(), Some("bid"));
}

#[test]
fn tree_without_claims_has_no_winner() {
    let harness = Harness::new();
    let tree = Node::from_empty(signed(Empty::new()));
    let json = serde_json::to_string(&tree).unwrap();
    assert!(harness.processor.resolve_winner(&json).unwrap().is_none());
}

#[test]
fn forged_claim_on_path_is_rejected() {
    let harness = Harness::new();
    let genuine = signed(Claim::new(0));
    let mut forged = Claim::new(1);
    forged.header_mut().set_proof(genuine.proof().cloned().unwrap());
    let tree = bid_node("root", 0).with_claim(forged).with_children([bid_node("A", -1), bid_node("B", -1)]);
    let json = serde_json::to_string(&tree).unwrap();
    let err = harness.processor.resolve_winner(&json).unwrap_err();
    assert!(matches!(
        err,
        ProcessorError::ClaimRejected {
            depth: 0
        }
    ));
}

#[test]
fn unsigned_claim_on_path_is_rejected() {
    let harness = Harness::new();
    let tree = bid_node("root", 0).with_claim(Claim::new(0)).with_children([bid_node("A", -1)]);
    let json = serde_json::to_string(&tree).unwrap();
    let err = harness.processor.resolve_winner(&json).unwrap_err();
    assert_eq!(err.kind_label(), "invalid_proof");
}

#[test]
fn tampered_winning_bid_is_rejected() {
    let harness = Harness::new();
    let mut bid = signed(Bid::new("X", "https://shop.example"));
    bid.set_media_url("https://evil.example/ad.png");
    let tree = bid_node("root", 0).with_children([Node::from_bid(bid).with_claim(signed(Claim::new(-1)))]);
    let json = serde_json::to_string(&tree).unwrap();
    let err = harness.processor.resolve_winner(&json).unwrap_err();
    assert!(matches!(err, ProcessorError::OutcomeRejected));
}

#[test]
fn ambiguous_winner_is_rejected() {
    let harness = Harness::new();
    let mut json = serde_json::to_value(bid_node("root", 0)).unwrap();
    json["empty"] = serde_json::to_value(signed(Empty::new())).unwrap();
    let err = harness.processor.resolve_winner(&json.to_string()).unwrap_err();
    assert!(matches!(err, ProcessorError::Node(_)));
}

#[test]
fn malformed_tree_json_is_rejected() {
    let harness = Harness::new();
    let err = harness.processor.resolve_winner("[").unwrap_err();
    assert!(matches!(err, ProcessorError::Json(_)));
}
