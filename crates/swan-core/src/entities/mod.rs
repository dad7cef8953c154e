// crates/swan-core/src/entities/mod.rs
// ============================================================================
// Module: SWAN Concrete Entities
// Description: Identity, consent, and opportunity records exchanged by participants.
// Purpose: Define each entity's payload fields on top of the shared skeleton.
// Dependencies: crate::{codec, entity, writeable}
// ============================================================================

//! ## Overview
//! Each concrete entity supplies only its payload reader and writer. Header
//! handling, proof attachment, and base64 transport are inherited from
//! [`crate::entity::Entity`].

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod byte_array;
pub mod claim;
pub mod email;
pub mod identifier;
pub mod preferences;
pub mod salt;
pub mod seed;
pub mod string_array;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use byte_array::ByteArray;
pub use claim::Claim;
pub use email::Email;
pub use identifier::ID_TYPE_RANDOM;
pub use identifier::ID_TYPE_SIGNED_IN;
pub use identifier::Identifier;
pub use preferences::Preferences;
pub use salt::Salt;
pub use seed::Seed;
pub use string_array::StringArray;
