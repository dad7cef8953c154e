// crates/swan-node/tests/common/mod.rs
// =============================================================================
// Module: Node Test Helpers
// Description: Fixed ed25519 keys, processor wiring, and signed fixtures.
// Purpose: Reduce duplication across swan-node integration tests.
// =============================================================================

#![allow(dead_code, reason = "Test helpers are selectively used across suites.")]

use std::sync::Arc;

use ed25519_dalek::SigningKey;
use swan_core::Email;
use swan_core::Entity;
use swan_core::Identifier;
use swan_core::ModelRequest;
use swan_core::Preferences;
use swan_core::Salt;
use swan_core::StringArray;
use swan_core::Timestamp;
use swan_node::Ed25519Signer;
use swan_node::FixedClock;
use swan_node::InMemoryStorage;
use swan_node::Keyring;
use swan_node::MemoryAuditSink;
use swan_node::Processor;
use swan_node::ProcessorSettings;

/// Domain of the node under test.
pub const NODE: &str = "node.example";
/// Domain of a trusted consent platform.
pub const CMP: &str = "cmp.example";
/// Proof creation time for fixture entities.
pub const CREATED: Timestamp = Timestamp::from_unix_seconds(1_700_000_000);
/// Processing time.
pub const NOW: Timestamp = Timestamp::from_unix_seconds(1_700_000_100);

/// Secret key of the node.
pub fn node_key() -> SigningKey {
    SigningKey::from_bytes(&[2u8; 32])
}

/// Secret key of the consent platform.
pub fn cmp_key() -> SigningKey {
    SigningKey::from_bytes(&[1u8; 32])
}

/// Consent platform signer pinned to [`CREATED`].
pub fn cmp_signer() -> Ed25519Signer {
    Ed25519Signer::new(CMP, cmp_key()).with_clock(Arc::new(FixedClock(CREATED)))
}

/// Keyring trusting the node and the consent platform.
pub fn keyring() -> Keyring {
    let mut keyring = Keyring::new(true);
    keyring.insert(NODE, node_key().verifying_key()).unwrap();
    keyring.insert(CMP, cmp_key().verifying_key()).unwrap();
    keyring
}

/// Processor wired to in-memory storage and audit.
pub struct Harness {
    /// Processor under test.
    pub processor: Processor,
    /// Backing storage.
    pub storage: InMemoryStorage,
    /// Recorded audit events.
    pub audit: Arc<MemoryAuditSink>,
}

impl Harness {
    /// Builds a harness with default settings.
    pub fn new() -> Self {
        let storage = InMemoryStorage::new();
        let audit = Arc::new(MemoryAuditSink::new());
        let processor = Processor::new(
            ProcessorSettings::default(),
            Ed25519Signer::new(NODE, node_key()),
            keyring(),
            Arc::new(storage.clone()),
            audit.clone(),
        );
        Self {
            processor,
            storage,
            audit,
        }
    }

    /// Names of recorded audit events in order.
    pub fn event_names(&self) -> Vec<&'static str> {
        self.audit.events().iter().map(|event| event.event).collect()
    }
}

/// Signs `entity` with the consent platform key.
pub fn signed<E: Entity>(mut entity: E) -> E {
    entity.sign(&cmp_signer()).unwrap();
    entity
}

/// Fully signed request.
pub fn signed_request() -> ModelRequest {
    let mut request = ModelRequest::default();
    request.model.rid = Some(signed(Identifier::new_random("rid")));
    request.model.email = Some(signed(Email::new("user@example.com")));
    request.model.salt = Some(signed(Salt::new(vec![1_u8, 2, 3, 4])));
    request.model.pref = Some(signed(Preferences::new(true)));
    request.model.stop = Some(StringArray::new(["blocked.example"]));
    request
}

/// JSON body of `request`.
pub fn to_json(request: &ModelRequest) -> String {
    serde_json::to_string(request).unwrap()
}
