// crates/swan-core/src/sid.rs
// ============================================================================
// Module: SWAN Signed-In Identifier Derivation
// Description: One-way digest of an email claim and its salt.
// Purpose: Produce a stable, non-reversible identifier for signed-in users.
// Dependencies: crate::{codec, entities, entity, interfaces}, sha2
// ============================================================================

//! ## Overview
//! The signed-in identifier is SHA-256 over the email address bytes and then
//! the salt bytes, each written as a length-prefixed codec byte array so no
//! two (email, salt) splits share an input. The digest is wrapped as an
//! [`Identifier`] of type [`ID_TYPE_SIGNED_IN`] and signed by the processing party. An empty email
//! yields an identifier with an empty value, so "no identity" stays
//! distinguishable from "no claim present".

// ============================================================================
// SECTION: Imports
// ============================================================================

use sha2::Digest;
use sha2::Sha256;

use crate::codec::CodecError;
use crate::codec::Writer;
use crate::entities::Email;
use crate::entities::ID_TYPE_SIGNED_IN;
use crate::entities::Identifier;
use crate::entities::Salt;
use crate::entity::Entity;
use crate::entity::EntityError;
use crate::interfaces::Signer;

// ============================================================================
// SECTION: Derivation
// ============================================================================

/// Computes the signed-in digest; empty when the email is empty.
///
/// # Errors
///
/// Returns [`CodecError`] when either part is too long to length-prefix.
pub fn signed_in_digest(email: &Email, salt: &Salt) -> Result<Vec<u8>, CodecError> {
    if email.is_empty() {
        return Ok(Vec::new());
    }
    let mut writer = Writer::from_sink(Sha256::new());
    writer.write_byte_array("sid.email", email.address().as_bytes())?;
    writer.write_byte_array("sid.salt", salt.value())?;
    Ok(writer.into_inner().finalize().to_vec())
}

/// Derives and signs the signed-in identifier for `email` and `salt`.
///
/// Callers must verify both claims before deriving.
///
/// # Errors
///
/// Returns [`EntityError`] when the identifier cannot be signed.
pub fn derive_signed_in_id<S: Signer + ?Sized>(email: &Email, salt: &Salt, signer: &S) -> Result<Identifier, EntityError> {
    let mut identifier = Identifier::new(ID_TYPE_SIGNED_IN, signed_in_digest(email, salt)?);
    identifier.sign(signer)?;
    Ok(identifier)
}
