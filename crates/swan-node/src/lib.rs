// crates/swan-node/src/lib.rs
// ============================================================================
// Module: SWAN Node Library
// Description: Host layer for one participating SWAN domain.
// Purpose: Bind core entities to real keys, storage, and audit logging.
// Dependencies: swan-core, swan-config, ed25519-dalek
// ============================================================================

//! ## Overview
//! `swan-node` implements the collaborator seams of `swan-core` for a
//! single node: an ed25519 [`Keyring`] verifier and [`Ed25519Signer`], an
//! in-memory storage network, JSON-line audit sinks, and the [`Processor`]
//! that runs update, fetch, inspect, and winner resolution.
//!
//! Security posture: every input crossing the processor is untrusted and is
//! verified before it is stored or returned.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod audit;
pub mod clock;
pub mod keyring;
pub mod processor;
pub mod signer;
pub mod storage;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use audit::AuditEvent;
pub use audit::AuditOperation;
pub use audit::AuditOutcome;
pub use audit::AuditSink;
pub use audit::FileAuditSink;
pub use audit::MemoryAuditSink;
pub use audit::NoopAuditSink;
pub use audit::StderrAuditSink;
pub use clock::Clock;
pub use clock::FixedClock;
pub use clock::SystemClock;
pub use keyring::Keyring;
pub use keyring::KeyringError;
pub use processor::FetchResult;
pub use processor::InspectReport;
pub use processor::Processor;
pub use processor::ProcessorError;
pub use processor::ProcessorSettings;
pub use processor::WinnerReport;
pub use signer::Ed25519Signer;
pub use signer::StampedSigner;
pub use storage::InMemoryStorage;
