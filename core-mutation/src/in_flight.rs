//! Per-entity submission guard

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::error::MutationError;

/// Keys of entities with a mutation in flight.
///
/// Clones share the registry. A key is held for as long as the returned
/// [`InFlightGuard`] lives.
#[derive(Debug, Clone, Default)]
pub struct InFlight {
    keys: Arc<Mutex<HashSet<String>>>,
}

impl InFlight {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim `key`, or fail if a mutation for it is already running.
    pub fn acquire(&self, key: &str) -> Result<InFlightGuard, MutationError> {
        if !lock(&self.keys).insert(key.to_string()) {
            return Err(MutationError::InFlight {
                key: key.to_string(),
            });
        }
        Ok(InFlightGuard {
            keys: Arc::clone(&self.keys),
            key: key.to_string(),
        })
    }

    pub fn contains(&self, key: &str) -> bool {
        lock(&self.keys).contains(key)
    }

    pub fn is_empty(&self) -> bool {
        lock(&self.keys).is_empty()
    }
}

/// Releases its key on drop.
#[derive(Debug)]
pub struct InFlightGuard {
    keys: Arc<Mutex<HashSet<String>>>,
    key: String,
}

impl InFlightGuard {
    pub fn key(&self) -> &str {
        &self.key
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        lock(&self.keys).remove(&self.key);
    }
}

fn lock(keys: &Mutex<HashSet<String>>) -> MutexGuard<'_, HashSet<String>> {
    keys.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
