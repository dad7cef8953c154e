// crates/swan-node/src/storage.rs
// ============================================================================
// Module: SWAN In-Memory Storage
// Description: Mutex-guarded pair store for tests and local nodes.
// Purpose: Provide a deterministic storage-network collaborator.
// Dependencies: swan-core
// ============================================================================

//! ## Overview
//! [`InMemoryStorage`] keeps the most recent [`Pair`] per key. It is not
//! intended for production use.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::Mutex;

use swan_core::ModelKey;
use swan_core::Pair;
use swan_core::StorageError;
use swan_core::StorageNetwork;

// ============================================================================
// SECTION: In-Memory Storage
// ============================================================================

/// In-memory storage network.
#[derive(Debug, Default, Clone)]
pub struct InMemoryStorage {
    /// Pairs by key, protected by a mutex.
    pairs: Arc<Mutex<BTreeMap<String, Pair>>>,
}

impl InMemoryStorage {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored pairs.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] when the store mutex is poisoned.
    pub fn len(&self) -> Result<usize, StorageError> {
        Ok(self.lock()?.len())
    }

    /// Locks the pair map.
    fn lock(&self) -> Result<std::sync::MutexGuard<'_, BTreeMap<String, Pair>>, StorageError> {
        self.pairs.lock().map_err(|_| StorageError::Unavailable("pair store mutex poisoned".to_string()))
    }
}

impl StorageNetwork for InMemoryStorage {
    fn store(&self, pairs: &[Pair]) -> Result<(), StorageError> {
        let mut guard = self.lock()?;
        for pair in pairs {
            guard.insert(pair.key.clone(), pair.clone());
        }
        drop(guard);
        Ok(())
    }

    fn fetch(&self, keys: &[ModelKey]) -> Result<Vec<Pair>, StorageError> {
        let guard = self.lock()?;
        Ok(keys.iter().filter_map(|key| guard.get(key.as_str()).cloned()).collect())
    }
}
