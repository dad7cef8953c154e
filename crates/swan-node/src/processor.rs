// crates/swan-node/src/processor.rs
// ============================================================================
// Module: SWAN Request Processor
// Description: Update, fetch, inspect, and winner flows for one node.
// Purpose: Wire core entities to keys, storage, and audit in one place.
// Dependencies: swan-core, swan-config, base64, serde, serde_json
// ============================================================================

//! ## Overview
//! The [`Processor`] is the host-facing surface of a participating domain:
//!
//! - `update`: verify an untrusted request, derive the signed-in id, store.
//! - `fetch`: unpack stored pairs, verify, reconcile validity, emit cookies.
//! - `inspect`: decode and verify a single keyed entity for display.
//! - `resolve_winner`: verify the winning path of an auction tree.
//!
//! Every step records an audit event. Time is always passed in; the
//! processor never reads the clock itself.
//!
//! Security posture: request bodies, stored pairs, and trees are untrusted.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::path::Path;
use std::sync::Arc;

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde::Serialize;
use swan_config::SwanConfig;
use swan_core::AnyEntity;
use swan_core::CookieError;
use swan_core::CookieOptions;
use swan_core::CookieValidity;
use swan_core::Entity;
use swan_core::EntityError;
use swan_core::EntityKind;
use swan_core::ModelError;
use swan_core::ModelKey;
use swan_core::ModelRequest;
use swan_core::ModelResponse;
use swan_core::Node;
use swan_core::NodeError;
use swan_core::Pair;
use swan_core::Response;
use swan_core::SetCookie;
use swan_core::StorageError;
use swan_core::StorageNetwork;
use swan_core::Timestamp;
use swan_core::TrustScheme;
use swan_core::Verifier;
use thiserror::Error;

use crate::audit::AuditEvent;
use crate::audit::AuditOperation;
use crate::audit::AuditOutcome;
use crate::audit::AuditSink;
use crate::audit::sink_from_config;
use crate::keyring::Keyring;
use crate::keyring::KeyringError;
use crate::signer::Ed25519Signer;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors raised by processor operations.
#[derive(Debug, Error)]
pub enum ProcessorError {
    /// Configuration cannot be turned into a running node.
    #[error("processor config error: {0}")]
    Config(String),
    /// Key material failed to load.
    #[error(transparent)]
    Keyring(#[from] KeyringError),
    /// Model parsing, verification, or transport failed.
    #[error(transparent)]
    Model(#[from] ModelError),
    /// A single entity failed to decode or verify.
    #[error(transparent)]
    Entity(#[from] EntityError),
    /// Node tree outcome is malformed.
    #[error(transparent)]
    Node(#[from] NodeError),
    /// Storage network failed.
    #[error(transparent)]
    Storage(#[from] StorageError),
    /// Cookie header could not be rendered.
    #[error(transparent)]
    Cookie(#[from] CookieError),
    /// Base64 input is malformed.
    #[error("invalid base64 input: {0}")]
    Base64(String),
    /// JSON input is malformed.
    #[error("invalid json input: {0}")]
    Json(String),
    /// A claim on the winning path did not verify.
    #[error("claim at depth {depth} failed verification")]
    ClaimRejected {
        /// Depth of the node holding the claim (root is 0).
        depth: usize,
    },
    /// The winning outcome did not verify.
    #[error("winning outcome failed verification")]
    OutcomeRejected,
}

impl ProcessorError {
    /// Returns a stable label for logs.
    #[must_use]
    pub const fn kind_label(&self) -> &'static str {
        match self {
            Self::Config(_) => "config",
            Self::Keyring(_) => "keyring",
            Self::Model(err) => err.kind_label(),
            Self::Entity(err) => err.kind_label(),
            Self::Node(_) => "node",
            Self::Storage(_) => "storage",
            Self::Cookie(_) => "cookie",
            Self::Base64(_) => "base64",
            Self::Json(_) => "json",
            Self::ClaimRejected {
                ..
            } => "claim_rejected",
            Self::OutcomeRejected => "outcome_rejected",
        }
    }
}

// ============================================================================
// SECTION: Settings
// ============================================================================

/// Config-derived processor settings.
#[derive(Debug, Clone)]
pub struct ProcessorSettings {
    /// Cookie formatting options.
    pub cookies: CookieOptions,
    /// Upper bound on a fetched model's lifetime.
    pub revalidate_seconds: u64,
    /// Lifetime for stored entries without their own window.
    pub default_cookie_seconds: u64,
    /// Trust scheme passed to every verification.
    pub scheme: TrustScheme,
}

impl Default for ProcessorSettings {
    fn default() -> Self {
        Self::from_config(&SwanConfig::default())
    }
}

impl ProcessorSettings {
    /// Builds settings from a validated configuration.
    #[must_use]
    pub fn from_config(config: &SwanConfig) -> Self {
        Self {
            cookies: config.cookies.to_options(),
            revalidate_seconds: config.validity.revalidate_seconds,
            default_cookie_seconds: config.validity.default_cookie_seconds,
            scheme: TrustScheme::AnyKnownIssuer,
        }
    }
}

// ============================================================================
// SECTION: Results
// ============================================================================

/// Result of a fetch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FetchResult {
    /// Verified, reconciled model.
    pub response: ModelResponse,
    /// `Set-Cookie` header values, one per populated entry.
    pub cookies: Vec<String>,
}

/// Inspection report for one keyed entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InspectReport {
    /// Key the bytes were decoded under.
    pub key: String,
    /// Concrete entity kind, absent for unknown keys.
    pub kind: Option<EntityKind>,
    /// Header version, absent for unknown keys.
    pub version: Option<u8>,
    /// Issuing domain of the attached proof.
    pub issuer: Option<String>,
    /// Proof creation time.
    pub created: Option<Timestamp>,
    /// Verification result; absent when there is nothing to verify.
    pub verified: Option<bool>,
    /// Verifier failure, when verification could not be attempted.
    pub verify_error: Option<String>,
    /// Decoded entity.
    pub entity: AnyEntity,
}

impl InspectReport {
    /// Decodes base64 `input` under `key` and optionally verifies it.
    ///
    /// Without a verifier the report carries no verification result.
    /// Verifier failures are reported in the result rather than raised.
    ///
    /// # Errors
    ///
    /// Returns [`ProcessorError`] when the input is not base64 or the bytes
    /// do not decode as the keyed entity.
    pub fn from_base64(
        key: &str,
        input: &str,
        verifier: Option<&dyn Verifier>,
        scheme: &TrustScheme,
    ) -> Result<Self, ProcessorError> {
        let bytes = BASE64.decode(input.trim()).map_err(|err| ProcessorError::Base64(err.to_string()))?;
        let entity = AnyEntity::decode(key, &bytes)?;
        let (verified, verify_error) = match verifier.map(|verifier| entity.verify(verifier, scheme)) {
            None => (None, None),
            Some(Ok(verified)) => (verified, None),
            Some(Err(err)) => (None, Some(err.to_string())),
        };
        Ok(Self {
            key: key.to_string(),
            kind: entity.kind(),
            version: entity.version(),
            issuer: entity.proof().map(|proof| proof.domain().to_string()),
            created: entity.proof().map(swan_core::Proof::created),
            verified,
            verify_error,
            entity,
        })
    }
}

/// Verified auction winner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WinnerReport {
    /// Depth of the winning node (root is 0).
    pub depth: usize,
    /// Winning outcome.
    pub outcome: Response,
}

// ============================================================================
// SECTION: Processor
// ============================================================================

/// Host-facing processor for one participating domain.
pub struct Processor {
    /// Config-derived settings.
    settings: ProcessorSettings,
    /// Node signing key.
    signer: Ed25519Signer,
    /// Trusted issuer keys.
    keyring: Keyring,
    /// Storage network collaborator.
    storage: Arc<dyn StorageNetwork + Send + Sync>,
    /// Audit sink.
    audit: Arc<dyn AuditSink>,
}

impl Processor {
    /// Creates a processor from explicit collaborators.
    #[must_use]
    pub fn new(
        settings: ProcessorSettings,
        signer: Ed25519Signer,
        keyring: Keyring,
        storage: Arc<dyn StorageNetwork + Send + Sync>,
        audit: Arc<dyn AuditSink>,
    ) -> Self {
        Self {
            settings,
            signer,
            keyring,
            storage,
            audit,
        }
    }

    /// Builds a processor from configuration, loading keys from disk.
    ///
    /// The node's own public key is added to the keyring so it can verify
    /// the identifiers it signs.
    ///
    /// # Errors
    ///
    /// Returns [`ProcessorError`] when the signing key is missing, a key
    /// fails to load, or the audit sink cannot be opened.
    pub fn from_config(
        config: &SwanConfig,
        storage: Arc<dyn StorageNetwork + Send + Sync>,
    ) -> Result<Self, ProcessorError> {
        let Some(key_path) = config.node.signing_key.as_deref() else {
            return Err(ProcessorError::Config("node.signing_key is required".to_string()));
        };
        let signer = Ed25519Signer::load(config.node.domain.clone(), Path::new(key_path.trim()))?;
        let mut keyring = Keyring::from_config(&config.trust)?;
        if !keyring.contains(&config.node.domain) {
            keyring.insert(config.node.domain.clone(), signer.verifying_key())?;
        }
        let audit = sink_from_config(&config.audit).map_err(|err| ProcessorError::Config(err.to_string()))?;
        Ok(Self::new(ProcessorSettings::from_config(config), signer, keyring, storage, audit))
    }

    /// Returns the processor settings.
    #[must_use]
    pub const fn settings(&self) -> &ProcessorSettings {
        &self.settings
    }

    /// Returns the trusted issuer keys.
    #[must_use]
    pub const fn keyring(&self) -> &Keyring {
        &self.keyring
    }

    /// Verifies a JSON request and stores it, adding the signed-in id.
    ///
    /// # Errors
    ///
    /// Returns [`ProcessorError`] when the body is malformed, any entry is
    /// unsigned or fails verification, signing fails, or storage fails.
    pub fn update(&self, request_json: &str, now: Timestamp) -> Result<Vec<Pair>, ProcessorError> {
        let operation = AuditOperation::Update;
        let request = ModelRequest::from_json(request_json).map_err(|err| self.reject(operation, err.into()))?;
        request
            .verify(&self.keyring, &self.settings.scheme)
            .map_err(|err| self.reject(operation, err.into()))?;
        self.record(AuditEvent::new("request_verified", operation, AuditOutcome::Ok));

        let validity = CookieValidity::new(now, now.plus_seconds(self.settings.default_cookie_seconds));
        let pairs = request
            .to_storage_pairs(&self.signer.at(now), validity)
            .map_err(|err| self.fail(operation, err.into()))?;
        self.storage.store(&pairs).map_err(|err| self.fail(operation, err.into()))?;
        self.record(
            AuditEvent::new("pairs_stored", operation, AuditOutcome::Ok).with_detail(format!("{} pairs", pairs.len())),
        );
        Ok(pairs)
    }

    /// Loads, verifies, and reconciles the stored model.
    ///
    /// # Errors
    ///
    /// Returns [`ProcessorError`] when storage fails, a pair cannot be
    /// decoded, an entry fails verification, or a cookie cannot be built.
    pub fn fetch(&self, host: &str, now: Timestamp) -> Result<FetchResult, ProcessorError> {
        let operation = AuditOperation::Fetch;
        let pairs = self.storage.fetch(&ModelKey::ALL).map_err(|err| self.fail(operation, err.into()))?;
        let mut response =
            ModelResponse::unmarshal_from_storage(&pairs).map_err(|err| self.reject(operation, err.into()))?;
        self.record(
            AuditEvent::new("storage_unpacked", operation, AuditOutcome::Ok)
                .with_detail(format!("{} pairs", pairs.len())),
        );
        response
            .verify(&self.keyring, &self.settings.scheme)
            .map_err(|err| self.reject(operation, err.into()))?;
        self.record(AuditEvent::new("model_verified", operation, AuditOutcome::Ok));

        response.reconcile_validity(now, self.settings.revalidate_seconds);
        let cookies = response
            .cookies(host, &self.settings.cookies)
            .map_err(|err| self.fail(operation, err.into()))?
            .iter()
            .map(SetCookie::header_value)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|err| self.fail(operation, err.into()))?;
        Ok(FetchResult {
            response,
            cookies,
        })
    }

    /// Decodes a base64 entity under `key` and verifies it if signed.
    ///
    /// Verifier failures are reported in the result rather than raised.
    ///
    /// # Errors
    ///
    /// Returns [`ProcessorError`] when the input is not base64 or the bytes
    /// do not decode as the keyed entity.
    pub fn inspect(&self, key: &str, base64: &str) -> Result<InspectReport, ProcessorError> {
        let operation = AuditOperation::Inspect;
        let report = InspectReport::from_base64(key, base64, Some(&self.keyring), &self.settings.scheme)
            .map_err(|err| self.reject(operation, err))?;
        let outcome = match report.verified {
            Some(false) => AuditOutcome::Rejected,
            _ if report.verify_error.is_some() => AuditOutcome::Error,
            _ => AuditOutcome::Ok,
        };
        self.record(
            AuditEvent::new("entity_inspected", operation, outcome)
                .with_key(key)
                .with_issuer(report.issuer.as_deref()),
        );
        Ok(report)
    }

    /// Resolves and verifies the winner of an auction tree.
    ///
    /// Every claim on the winning path must verify, as must the winning
    /// node's outcome. A tree without a winner yields `None`.
    ///
    /// # Errors
    ///
    /// Returns [`ProcessorError`] when the JSON is malformed, the winning
    /// node's outcome is ambiguous, or any proof on the path fails.
    pub fn resolve_winner(&self, tree_json: &str) -> Result<Option<WinnerReport>, ProcessorError> {
        let operation = AuditOperation::ResolveWinner;
        let tree: Node = serde_json::from_str(tree_json)
            .map_err(|err| self.reject(operation, ProcessorError::Json(err.to_string())))?;
        let path = tree.winning_path();
        let Some(winner) = path.last() else {
            self.record(AuditEvent::new("winner_resolved", operation, AuditOutcome::Ok).with_detail("no winner"));
            return Ok(None);
        };
        for (depth, node) in path.iter().enumerate() {
            if let Some(claim) = node.claim() {
                let verified = claim
                    .verify(&self.keyring, &self.settings.scheme)
                    .map_err(|err| self.reject(operation, err.into()))?;
                if !verified {
                    let err = ProcessorError::ClaimRejected {
                        depth,
                    };
                    return Err(self.reject(operation, err));
                }
            }
        }
        let outcome = winner.outcome().map_err(|err| self.reject(operation, err.into()))?.to_response();
        let verified = outcome
            .verify(&self.keyring, &self.settings.scheme)
            .map_err(|err| self.reject(operation, err.into()))?;
        if !verified {
            return Err(self.reject(operation, ProcessorError::OutcomeRejected));
        }
        let depth = path.len() - 1;
        self.record(
            AuditEvent::new("winner_resolved", operation, AuditOutcome::Ok)
                .with_key(outcome.tag().kind().as_str())
                .with_issuer(outcome.proof().map(swan_core::Proof::domain))
                .with_detail(format!("depth {depth}")),
        );
        Ok(Some(WinnerReport {
            depth,
            outcome,
        }))
    }

    /// Records an event.
    fn record(&self, event: AuditEvent) {
        self.audit.record(&event);
    }

    /// Records a refused input and hands the error back.
    fn reject(&self, operation: AuditOperation, err: ProcessorError) -> ProcessorError {
        self.record_failure(operation, AuditOutcome::Rejected, &err);
        err
    }

    /// Records a collaborator failure and hands the error back.
    fn fail(&self, operation: AuditOperation, err: ProcessorError) -> ProcessorError {
        self.record_failure(operation, AuditOutcome::Error, &err);
        err
    }

    /// Records a failure event naming the offending key when known.
    fn record_failure(&self, operation: AuditOperation, outcome: AuditOutcome, err: &ProcessorError) {
        let mut event = AuditEvent::new("operation_failed", operation, outcome).with_error_kind(err.kind_label());
        if let ProcessorError::Model(model) = err
            && let Some(key) = model.key()
        {
            event = event.with_key(key.as_str());
        }
        self.record(event);
    }
}
