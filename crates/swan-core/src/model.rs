// crates/swan-core/src/model.rs
// ============================================================================
// Module: SWAN Model Aggregation
// Description: Role-keyed aggregate of signed entities plus request/response views.
// Purpose: Verify, reconcile, and transport a user's identity and consent state.
// Dependencies: crate::{cookie, entities, entity, interfaces, pair, sid, time, writeable}
// ============================================================================

//! ## Overview
//! A [`Model`] holds at most one entity per role. Two views wrap it:
//!
//! - [`ModelRequest`]: built from an untrusted JSON request body. Every
//!   signable entry must carry a proof and verify before use.
//! - [`ModelResponse`]: built from storage-network pairs. It adds the
//!   signed-in identifier and an overall validity window that never outlives
//!   the shortest-lived entry.
//!
//! Security posture: request and storage input is untrusted; verification
//! fails closed and reports the offending role key.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use crate::cookie::CookieError;
use crate::cookie::CookieOptions;
use crate::cookie::SetCookie;
use crate::entities::Email;
use crate::entities::Identifier;
use crate::entities::Preferences;
use crate::entities::Salt;
use crate::entities::StringArray;
use crate::entity::Entity;
use crate::entity::EntityError;
use crate::interfaces::Signer;
use crate::interfaces::TrustScheme;
use crate::interfaces::Verifier;
use crate::pair::Pair;
use crate::pair::PairError;
use crate::sid::derive_signed_in_id;
use crate::time::Timestamp;
use crate::writeable::CookieValidity;
use crate::writeable::Writeable;

// ============================================================================
// SECTION: Model Keys
// ============================================================================

/// Role keys used for pairs and cookies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelKey {
    /// Random browser identifier.
    Rid,
    /// Email claim.
    Email,
    /// Salt claim.
    Salt,
    /// Preferences.
    Pref,
    /// Signed-in identifier.
    Sid,
    /// Stopped domains.
    Stop,
    /// Opaque caller state.
    State,
}

impl ModelKey {
    /// Every key, in transport order.
    pub const ALL: [Self; 7] = [Self::Rid, Self::Email, Self::Salt, Self::Pref, Self::Sid, Self::Stop, Self::State];

    /// Returns the wire name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Rid => "rid",
            Self::Email => "email",
            Self::Salt => "salt",
            Self::Pref => "pref",
            Self::Sid => "sid",
            Self::Stop => "stop",
            Self::State => "state",
        }
    }

    /// Parses a wire name; unknown names yield `None`.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|key| key.as_str() == name)
    }
}

impl fmt::Display for ModelKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors raised by model verification and transport.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    /// An entry failed to encode, decode, sign, or reach its verifier.
    #[error("model entry {key}: {source}")]
    Entry {
        /// Offending role key.
        key: ModelKey,
        /// Underlying entity error.
        source: EntityError,
    },
    /// A storage pair could not be decoded.
    #[error("model pair {key}: {source}")]
    Pair {
        /// Offending role key.
        key: ModelKey,
        /// Underlying pair error.
        source: PairError,
    },
    /// An entry's signature did not check out.
    #[error("model entry {key} failed verification")]
    VerificationFailed {
        /// Offending role key.
        key: ModelKey,
    },
    /// A request entry that must be signed carries no proof.
    #[error("model entry {key} is missing its proof")]
    MissingProof {
        /// Offending role key.
        key: ModelKey,
    },
    /// An entry carries an unsupported format version.
    #[error("model entry {key} has unsupported version {version}")]
    UnsupportedVersion {
        /// Offending role key.
        key: ModelKey,
        /// Version found on the entry.
        version: u8,
    },
    /// A cookie could not be formatted.
    #[error("model cookie {key}: {source}")]
    Cookie {
        /// Offending role key.
        key: ModelKey,
        /// Underlying cookie error.
        source: CookieError,
    },
    /// JSON input was malformed.
    #[error("model json error: {0}")]
    Json(String),
}

impl ModelError {
    /// Returns the role key the error names, if any.
    #[must_use]
    pub const fn key(&self) -> Option<ModelKey> {
        match self {
            Self::Entry {
                key,
                ..
            }
            | Self::Pair {
                key,
                ..
            }
            | Self::VerificationFailed {
                key,
            }
            | Self::MissingProof {
                key,
            }
            | Self::UnsupportedVersion {
                key,
                ..
            }
            | Self::Cookie {
                key,
                ..
            } => Some(*key),
            Self::Json(_) => None,
        }
    }

    /// Returns a stable label for logs.
    #[must_use]
    pub const fn kind_label(&self) -> &'static str {
        match self {
            Self::Entry {
                ..
            } => "entry",
            Self::Pair {
                ..
            } => "pair",
            Self::VerificationFailed {
                ..
            } => "verification_failed",
            Self::MissingProof {
                ..
            } => "missing_proof",
            Self::UnsupportedVersion {
                ..
            } => "unsupported_version",
            Self::Cookie {
                ..
            } => "cookie",
            Self::Json(_) => "json",
        }
    }
}

// ============================================================================
// SECTION: Entry Helpers
// ============================================================================

/// Whether an entry without a proof is acceptable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ProofPolicy {
    /// Unsigned entries are skipped.
    VerifyIfPresent,
    /// Signable entries must carry a proof.
    Required,
}

/// Checks the version of one entry and verifies its proof per `policy`.
fn verify_entry<E: Entity, V: Verifier + ?Sized>(
    key: ModelKey,
    entity: Option<&E>,
    verifier: &V,
    scheme: &TrustScheme,
    policy: ProofPolicy,
) -> Result<(), ModelError> {
    let Some(entity) = entity else {
        return Ok(());
    };
    let header = entity.header();
    if !header.is_supported() {
        return Err(ModelError::UnsupportedVersion {
            key,
            version: header.version(),
        });
    }
    if entity.proof().is_none() {
        if policy == ProofPolicy::Required && E::SIGNABLE {
            return Err(ModelError::MissingProof {
                key,
            });
        }
        return Ok(());
    }
    match entity.verify(verifier, scheme) {
        Ok(true) => Ok(()),
        Ok(false) => Err(ModelError::VerificationFailed {
            key,
        }),
        Err(source) => Err(ModelError::Entry {
            key,
            source,
        }),
    }
}

/// Rejects a proof carried by an entry whose kind is never signed.
fn reject_unsignable_proof<E: Entity>(key: ModelKey, entity: Option<&E>) -> Result<(), ModelError> {
    match entity {
        Some(entity) if !E::SIGNABLE && entity.proof().is_some() => Err(ModelError::Entry {
            key,
            source: EntityError::Unsignable {
                kind: E::KIND,
            },
        }),
        _ => Ok(()),
    }
}

/// Appends a pair for a populated writeable entry.
fn push_pair<E: Writeable>(
    pairs: &mut Vec<Pair>,
    key: ModelKey,
    entity: Option<&E>,
    default_validity: CookieValidity,
) -> Result<(), ModelError> {
    if let Some(entity) = entity {
        let pair = Pair::from_writeable(key.as_str(), entity, default_validity).map_err(|source| ModelError::Pair {
            key,
            source,
        })?;
        pairs.push(pair);
    }
    Ok(())
}

/// Decodes a writeable entry from a pair.
fn decode_pair<E: Writeable>(key: ModelKey, pair: &Pair) -> Result<E, ModelError> {
    pair.decode_writeable().map_err(|source| ModelError::Pair {
        key,
        source,
    })
}

/// Returns a populated entry's non-zero cookie expiry.
fn entry_expiry<E: Writeable>(entity: Option<&E>) -> Option<Timestamp> {
    entity.and_then(E::cookie_validity).map(|validity| validity.expires).filter(|expires| !expires.is_zero())
}

/// Appends a cookie for a populated writeable entry.
fn push_cookie<E: Writeable>(
    cookies: &mut Vec<SetCookie>,
    key: ModelKey,
    entity: Option<&E>,
    host: &str,
    fallback_expires: Timestamp,
    options: &CookieOptions,
) -> Result<(), ModelError> {
    let Some(entity) = entity else {
        return Ok(());
    };
    let value = entity.to_base64().map_err(|source| ModelError::Entry {
        key,
        source,
    })?;
    let expires = entry_expiry(Some(entity)).unwrap_or(fallback_expires);
    let cookie = SetCookie::new(key.as_str(), value, host, expires, options).map_err(|source| ModelError::Cookie {
        key,
        source,
    })?;
    cookies.push(cookie);
    Ok(())
}

// ============================================================================
// SECTION: Model
// ============================================================================

/// Role-keyed aggregate of signed entities.
///
/// # Invariants
/// - Every entry is owned exclusively by this model.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Model {
    /// Random browser identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rid: Option<Identifier>,
    /// Personalization preference.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pref: Option<Preferences>,
    /// Email claim.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<Email>,
    /// Salt claim.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub salt: Option<Salt>,
    /// Stopped domains.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stop: Option<StringArray>,
    /// Opaque caller state.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<StringArray>,
}

impl Model {
    /// Verifies every entry that carries a proof.
    ///
    /// Entries are checked in the order email, pref, salt, rid, stop; the
    /// first failure aborts.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError`] naming the first entry that has an unsupported
    /// version, fails verification, or cannot be verified.
    pub fn verify<V: Verifier + ?Sized>(&self, verifier: &V, scheme: &TrustScheme) -> Result<(), ModelError> {
        self.verify_with(verifier, scheme, ProofPolicy::VerifyIfPresent)
    }

    /// Verifies entries under the given proof policy.
    fn verify_with<V: Verifier + ?Sized>(
        &self,
        verifier: &V,
        scheme: &TrustScheme,
        policy: ProofPolicy,
    ) -> Result<(), ModelError> {
        verify_entry(ModelKey::Email, self.email.as_ref(), verifier, scheme, policy)?;
        verify_entry(ModelKey::Pref, self.pref.as_ref(), verifier, scheme, policy)?;
        verify_entry(ModelKey::Salt, self.salt.as_ref(), verifier, scheme, policy)?;
        verify_entry(ModelKey::Rid, self.rid.as_ref(), verifier, scheme, policy)?;
        verify_entry(ModelKey::Stop, self.stop.as_ref(), verifier, scheme, policy)?;
        verify_entry(ModelKey::State, self.state.as_ref(), verifier, scheme, policy)
    }

    /// Fails when a list entry arrives carrying a proof.
    fn reject_list_proofs(&self) -> Result<(), ModelError> {
        reject_unsignable_proof(ModelKey::Stop, self.stop.as_ref())?;
        reject_unsignable_proof(ModelKey::State, self.state.as_ref())
    }

    /// Returns the non-zero cookie expiries of populated entries.
    fn entry_expiries(&self) -> impl Iterator<Item = Timestamp> {
        [
            entry_expiry(self.rid.as_ref()),
            entry_expiry(self.pref.as_ref()),
            entry_expiry(self.email.as_ref()),
            entry_expiry(self.salt.as_ref()),
            entry_expiry(self.stop.as_ref()),
            entry_expiry(self.state.as_ref()),
        ]
        .into_iter()
        .flatten()
    }

    /// Appends pairs for every populated entry except the signed-in id.
    fn push_pairs(&self, pairs: &mut Vec<Pair>, default_validity: CookieValidity) -> Result<(), ModelError> {
        push_pair(pairs, ModelKey::Rid, self.rid.as_ref(), default_validity)?;
        push_pair(pairs, ModelKey::Email, self.email.as_ref(), default_validity)?;
        push_pair(pairs, ModelKey::Salt, self.salt.as_ref(), default_validity)?;
        push_pair(pairs, ModelKey::Pref, self.pref.as_ref(), default_validity)?;
        Ok(())
    }

    /// Appends the stop and state pairs, which come after the signed-in id.
    fn push_list_pairs(&self, pairs: &mut Vec<Pair>, default_validity: CookieValidity) -> Result<(), ModelError> {
        push_pair(pairs, ModelKey::Stop, self.stop.as_ref(), default_validity)?;
        push_pair(pairs, ModelKey::State, self.state.as_ref(), default_validity)
    }
}

// ============================================================================
// SECTION: Model Request
// ============================================================================

/// Model received from an untrusted request body.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ModelRequest {
    /// Requested entries.
    #[serde(flatten)]
    pub model: Model,
}

impl ModelRequest {
    /// Parses a request body.
    ///
    /// Cookie windows in the body are ignored; stored entries always take
    /// the window issued by the processing node.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::Json`] when the body is not a valid model, or
    /// [`ModelError::Entry`] when a stop or state list carries a proof.
    pub fn from_json(body: &str) -> Result<Self, ModelError> {
        let request: Self = serde_json::from_str(body).map_err(|err| ModelError::Json(err.to_string()))?;
        request.model.reject_list_proofs()?;
        Ok(request)
    }

    /// Verifies every signable entry; unsigned signable entries are rejected.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError`] naming the first entry that is unsigned, has an
    /// unsupported version, or fails verification.
    pub fn verify<V: Verifier + ?Sized>(&self, verifier: &V, scheme: &TrustScheme) -> Result<(), ModelError> {
        self.model.verify_with(verifier, scheme, ProofPolicy::Required)
    }

    /// Converts the request into storage pairs.
    ///
    /// When both email and salt are present the signed-in identifier is
    /// derived and signed by `signer`. Entries without their own cookie
    /// window use `default_validity`.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError`] when an entry cannot be encoded or signed.
    pub fn to_storage_pairs<S: Signer + ?Sized>(
        &self,
        signer: &S,
        default_validity: CookieValidity,
    ) -> Result<Vec<Pair>, ModelError> {
        let mut pairs = Vec::new();
        self.model.push_pairs(&mut pairs, default_validity)?;
        if let Some(sid) = self.signed_in_id(signer)? {
            push_pair(&mut pairs, ModelKey::Sid, Some(&sid), default_validity)?;
        }
        self.model.push_list_pairs(&mut pairs, default_validity)?;
        Ok(pairs)
    }

    /// Derives the signed-in identifier when email and salt are present.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::Entry`] when the identifier cannot be signed.
    pub fn signed_in_id<S: Signer + ?Sized>(&self, signer: &S) -> Result<Option<Identifier>, ModelError> {
        let (Some(email), Some(salt)) = (self.model.email.as_ref(), self.model.salt.as_ref()) else {
            return Ok(None);
        };
        derive_signed_in_id(email, salt, signer).map(Some).map_err(|source| ModelError::Entry {
            key: ModelKey::Sid,
            source,
        })
    }
}

// ============================================================================
// SECTION: Model Response
// ============================================================================

/// Model assembled from storage for return to a caller.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ModelResponse {
    /// Stored entries.
    #[serde(flatten)]
    pub model: Model,
    /// Signed-in identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sid: Option<Identifier>,
    /// Overall validity window.
    #[serde(default)]
    pub validity: CookieValidity,
}

impl ModelResponse {
    /// Unpacks storage pairs into typed entries.
    ///
    /// Unknown keys and empty values are skipped. Each decoded entry carries
    /// its pair's validity window and is marked persisted.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::Pair`] naming the first pair whose non-empty
    /// value fails to decode.
    pub fn unmarshal_from_storage(pairs: &[Pair]) -> Result<Self, ModelError> {
        let mut response = Self::default();
        for pair in pairs {
            let Some(key) = ModelKey::parse(&pair.key) else {
                continue;
            };
            if pair.is_empty() {
                continue;
            }
            match key {
                ModelKey::Rid => response.model.rid = Some(decode_pair(key, pair)?),
                ModelKey::Email => response.model.email = Some(decode_pair(key, pair)?),
                ModelKey::Salt => response.model.salt = Some(decode_pair(key, pair)?),
                ModelKey::Pref => response.model.pref = Some(decode_pair(key, pair)?),
                ModelKey::Sid => response.sid = Some(decode_pair(key, pair)?),
                ModelKey::Stop => response.model.stop = Some(decode_pair(key, pair)?),
                ModelKey::State => response.model.state = Some(decode_pair(key, pair)?),
            }
        }
        Ok(response)
    }

    /// Packs populated entries into storage pairs in transport order.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::Pair`] when an entry cannot be encoded.
    pub fn marshal_to_storage(&self) -> Result<Vec<Pair>, ModelError> {
        let mut pairs = Vec::new();
        self.model.push_pairs(&mut pairs, self.validity)?;
        push_pair(&mut pairs, ModelKey::Sid, self.sid.as_ref(), self.validity)?;
        self.model.push_list_pairs(&mut pairs, self.validity)?;
        Ok(pairs)
    }

    /// Recomputes the overall validity window.
    ///
    /// The window starts at `now` and lasts `revalidate_seconds`, shrunk to
    /// the earliest non-zero entry expiry. Idempotent for a fixed `now`.
    pub fn reconcile_validity(&mut self, now: Timestamp, revalidate_seconds: u64) {
        let mut expires = now.plus_seconds(revalidate_seconds);
        let sid_expiry = entry_expiry(self.sid.as_ref());
        for entry in self.model.entry_expiries().chain(sid_expiry) {
            if entry < expires {
                expires = entry;
            }
        }
        self.validity = CookieValidity::new(now, expires);
    }

    /// Verifies every entry that carries a proof, including the signed-in id.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError`] naming the first failing entry.
    pub fn verify<V: Verifier + ?Sized>(&self, verifier: &V, scheme: &TrustScheme) -> Result<(), ModelError> {
        self.model.verify(verifier, scheme)?;
        verify_entry(ModelKey::Sid, self.sid.as_ref(), verifier, scheme, ProofPolicy::VerifyIfPresent)
    }

    /// Builds one cookie per populated entry.
    ///
    /// Entries without their own expiry use the overall validity expiry.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError`] when an entry cannot be encoded or a cookie
    /// cannot be built.
    pub fn cookies(&self, host: &str, options: &CookieOptions) -> Result<Vec<SetCookie>, ModelError> {
        let fallback = self.validity.expires;
        let mut cookies = Vec::new();
        push_cookie(&mut cookies, ModelKey::Rid, self.model.rid.as_ref(), host, fallback, options)?;
        push_cookie(&mut cookies, ModelKey::Email, self.model.email.as_ref(), host, fallback, options)?;
        push_cookie(&mut cookies, ModelKey::Salt, self.model.salt.as_ref(), host, fallback, options)?;
        push_cookie(&mut cookies, ModelKey::Pref, self.model.pref.as_ref(), host, fallback, options)?;
        push_cookie(&mut cookies, ModelKey::Sid, self.sid.as_ref(), host, fallback, options)?;
        push_cookie(&mut cookies, ModelKey::Stop, self.model.stop.as_ref(), host, fallback, options)?;
        push_cookie(&mut cookies, ModelKey::State, self.model.state.as_ref(), host, fallback, options)?;
        Ok(cookies)
    }
}
