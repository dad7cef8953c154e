// crates/swan-core/src/node.rs
// ============================================================================
// Module: SWAN Node Tree
// Description: Recursive auction fan-out tree with predicate search.
// Purpose: Locate the effective auction result via claim-driven descent.
// Dependencies: crate::{entities, response}, serde, thiserror
// ============================================================================

//! ## Overview
//! A [`Node`] records the outcome of one bid request and the nodes it fanned
//! out to. Search is depth-first, parent before children, left to right.
//!
//! Winner resolution seeds from the first node (in that order) whose claim is
//! non-negative, then descends while each node's claim is a valid child
//! index. When several nodes carry non-negative claims only the first found
//! seeds the descent; this is first-found-wins, not "best bid".

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use crate::entities::Claim;
use crate::response::Bid;
use crate::response::Empty;
use crate::response::Failed;
use crate::response::Response;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors raised when interpreting a node's outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum NodeError {
    /// More than one outcome is set on the node.
    #[error("node carries {count} outcomes; exactly one is required")]
    Ambiguous {
        /// Number of outcomes present.
        count: usize,
    },
    /// No outcome is set on the node.
    #[error("node carries no outcome")]
    NoOutcome,
}

// ============================================================================
// SECTION: Outcome
// ============================================================================

/// Borrowed view of a node's single outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome<'a> {
    /// Winning bid.
    Bid(&'a Bid),
    /// Failed evaluation.
    Failed(&'a Failed),
    /// No bid.
    Empty(&'a Empty),
}

impl Outcome<'_> {
    /// Clones the borrowed outcome into an owned response.
    #[must_use]
    pub fn to_response(self) -> Response {
        match self {
            Self::Bid(bid) => Response::Bid(bid.clone()),
            Self::Failed(failed) => Response::Failed(failed.clone()),
            Self::Empty(empty) => Response::Empty(empty.clone()),
        }
    }
}

// ============================================================================
// SECTION: Node
// ============================================================================

/// One node of an auction tree.
///
/// # Invariants
/// - Constructors set at most one of `bid`, `failed`, `empty`.
/// - Transport decoding may violate the above; [`Node::outcome`] rejects it.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Node {
    /// Winning bid outcome.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    bid: Option<Bid>,
    /// Failed outcome.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    failed: Option<Failed>,
    /// Empty outcome.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    empty: Option<Empty>,
    /// Child index selected at this node.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    claim: Option<Claim>,
    /// Nodes this request fanned out to, in order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    children: Vec<Self>,
}

impl Node {
    /// Creates a node without an outcome.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            bid: None,
            failed: None,
            empty: None,
            claim: None,
            children: Vec::new(),
        }
    }

    /// Creates a node holding a bid.
    #[must_use]
    pub fn from_bid(bid: Bid) -> Self {
        Self {
            bid: Some(bid),
            ..Self::new()
        }
    }

    /// Creates a node holding a failure.
    #[must_use]
    pub fn from_failed(failed: Failed) -> Self {
        Self {
            failed: Some(failed),
            ..Self::new()
        }
    }

    /// Creates a node holding an empty response.
    #[must_use]
    pub fn from_empty(empty: Empty) -> Self {
        Self {
            empty: Some(empty),
            ..Self::new()
        }
    }

    /// Attaches a claim.
    #[must_use]
    pub fn with_claim(mut self, claim: Claim) -> Self {
        self.claim = Some(claim);
        self
    }

    /// Appends children in order.
    #[must_use]
    pub fn with_children<I: IntoIterator<Item = Self>>(mut self, children: I) -> Self {
        self.children.extend(children);
        self
    }

    /// Returns the bid outcome.
    #[must_use]
    pub const fn bid(&self) -> Option<&Bid> {
        self.bid.as_ref()
    }

    /// Returns the failed outcome.
    #[must_use]
    pub const fn failed(&self) -> Option<&Failed> {
        self.failed.as_ref()
    }

    /// Returns the empty outcome.
    #[must_use]
    pub const fn empty(&self) -> Option<&Empty> {
        self.empty.as_ref()
    }

    /// Returns the claim.
    #[must_use]
    pub const fn claim(&self) -> Option<&Claim> {
        self.claim.as_ref()
    }

    /// Returns the children.
    #[must_use]
    pub fn children(&self) -> &[Self] {
        &self.children
    }

    /// Returns the single outcome of this node.
    ///
    /// # Errors
    ///
    /// Returns [`NodeError::Ambiguous`] when several outcomes are set, or
    /// [`NodeError::NoOutcome`] when none is.
    pub fn outcome(&self) -> Result<Outcome<'_>, NodeError> {
        let outcomes = [
            self.bid.as_ref().map(Outcome::Bid),
            self.failed.as_ref().map(Outcome::Failed),
            self.empty.as_ref().map(Outcome::Empty),
        ];
        let mut present = outcomes.into_iter().flatten();
        match (present.next(), present.count()) {
            (Some(outcome), 0) => Ok(outcome),
            (Some(_), extra) => Err(NodeError::Ambiguous {
                count: extra + 1,
            }),
            (None, _) => Err(NodeError::NoOutcome),
        }
    }

    /// Iterates the tree depth-first, parent before children, left to right.
    #[must_use]
    pub fn depth_first(&self) -> DepthFirst<'_> {
        DepthFirst {
            stack: vec![self],
        }
    }

    /// Returns the first node, including this one, satisfying `predicate`.
    pub fn find_first<P>(&self, mut predicate: P) -> Option<&Self>
    where
        P: FnMut(&Self) -> bool,
    {
        self.depth_first().find(|node| predicate(node))
    }

    /// Appends every node satisfying `predicate` to `matches` in traversal order.
    pub fn add_matching<'a, P>(&'a self, mut predicate: P, matches: &mut Vec<&'a Self>)
    where
        P: FnMut(&Self) -> bool,
    {
        matches.extend(self.depth_first().filter(|node| predicate(node)));
    }

    /// Returns the nodes visited by winner resolution, seed first.
    ///
    /// The path is empty when no node carries a non-negative claim.
    #[must_use]
    pub fn winning_path(&self) -> Vec<&Self> {
        let Some(mut current) = self.find_first(|node| node.claim.as_ref().is_some_and(|claim| claim.value() >= 0))
        else {
            return Vec::new();
        };
        let mut path = vec![current];
        loop {
            let next = current.claim.as_ref().and_then(Claim::child_index).and_then(|index| current.children.get(index));
            let Some(next) = next else {
                break;
            };
            path.push(next);
            current = next;
        }
        path
    }

    /// Returns the deepest node reached by winner resolution.
    ///
    /// `None` means no winner: no node carries a non-negative claim.
    #[must_use]
    pub fn resolve_winner(&self) -> Option<&Self> {
        self.winning_path().last().copied()
    }
}

// ============================================================================
// SECTION: Traversal
// ============================================================================

/// Preorder iterator over a node tree.
#[derive(Debug)]
pub struct DepthFirst<'a> {
    /// Nodes pending visit; the next node is on top.
    stack: Vec<&'a Node>,
}

impl<'a> Iterator for DepthFirst<'a> {
    type Item = &'a Node;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children.iter().rev());
        Some(node)
    }
}
