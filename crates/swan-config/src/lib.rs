// crates/swan-config/src/lib.rs
// ============================================================================
// Module: SWAN Config Library
// Description: Canonical config model and validation for SWAN nodes.
// Purpose: Single source of truth for swan.toml semantics.
// Dependencies: swan-core, serde, toml
// ============================================================================

//! ## Overview
//! `swan-config` defines the configuration model for a SWAN participant
//! node. It provides strict, fail-closed validation of every section.
//!
//! Security posture: config inputs are untrusted.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use config::*;
