// crates/swan-core/src/lib.rs
// ============================================================================
// Module: SWAN Core Library
// Description: Public API surface for the SWAN signed-entity engine.
// Purpose: Expose the codec, entities, auction tree, and model aggregation.
// Dependencies: crate::{codec, entity, entities, model, node, pair, response}
// ============================================================================

//! ## Overview
//! SWAN core defines the record model exchanged between participants of a
//! federated advertising identity and consent network: small entities that
//! are signed by their issuer, carried as compact binary or base64 payloads,
//! and reassembled into models with reconciled validity windows.
//!
//! The core is synchronous and performs no I/O. Signing, verification, and
//! storage are delegated to the collaborator traits in [`interfaces`].

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod any;
pub mod codec;
pub mod cookie;
pub mod entities;
pub mod entity;
pub mod interfaces;
pub mod model;
pub mod node;
pub mod pair;
pub mod proof;
pub mod response;
pub mod sid;
pub mod time;
pub mod writeable;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use any::AnyEntity;
pub use codec::CodecError;
pub use codec::Reader;
pub use codec::Writer;
pub use cookie::CookieError;
pub use cookie::CookieOptions;
pub use cookie::SetCookie;
pub use entities::ByteArray;
pub use entities::Claim;
pub use entities::Email;
pub use entities::Identifier;
pub use entities::Preferences;
pub use entities::Salt;
pub use entities::Seed;
pub use entities::StringArray;
pub use entity::BoundProof;
pub use entity::ENTITY_VERSION;
pub use entity::Entity;
pub use entity::EntityError;
pub use entity::EntityHeader;
pub use entity::EntityKind;
pub use entity::MAX_SUPPORTED_VERSION;
pub use entity::MIN_SUPPORTED_VERSION;
pub use interfaces::SignError;
pub use interfaces::Signer;
pub use interfaces::StorageError;
pub use interfaces::StorageNetwork;
pub use interfaces::TrustScheme;
pub use interfaces::VerifyError;
pub use interfaces::Verifier;
pub use model::Model;
pub use model::ModelError;
pub use model::ModelKey;
pub use model::ModelRequest;
pub use model::ModelResponse;
pub use node::Node;
pub use node::NodeError;
pub use node::Outcome;
pub use pair::Pair;
pub use pair::PairError;
pub use proof::Proof;
pub use proof::ProofError;
pub use proof::signed_message;
pub use response::Bid;
pub use response::Empty;
pub use response::Failed;
pub use response::Response;
pub use response::ResponseTag;
pub use sid::derive_signed_in_id;
pub use time::TimeError;
pub use time::Timestamp;
pub use writeable::CookieValidity;
pub use writeable::Writeable;
pub use writeable::WriteableState;
