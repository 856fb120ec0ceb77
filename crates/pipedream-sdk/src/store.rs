//! Key/value stores backing `$.service.db` props.

use std::collections::HashMap;

use parking_lot::RwLock;
use serde_json::{Map, Value};

/// A host-provided key/value mapping.
///
/// Durability is the store's concern; the `Db` prop only records what it
/// was asked to do.
pub trait KvStore: Send + Sync + std::fmt::Debug {
    /// Value for `key`, `None` on a miss.
    fn get(&self, key: &str) -> Option<Value>;

    /// Store `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: Value);
}

/// In-memory store, seeded from the host's `$db` object.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, Value>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_map(map: Map<String, Value>) -> Self {
        Self {
            entries: RwLock::new(map.into_iter().collect()),
        }
    }

    /// Current contents, for handing back to the host.
    pub fn snapshot(&self) -> Map<String, Value> {
        let entries = self.entries.read();
        let mut keys: Vec<&String> = entries.keys().collect();
        keys.sort();
        keys.into_iter()
            .map(|k| (k.clone(), entries[k].clone()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

impl KvStore for MemoryStore {
    fn get(&self, key: &str) -> Option<Value> {
        self.entries.read().get(key).cloned()
    }

    fn set(&self, key: &str, value: Value) {
        self.entries.write().insert(key.to_string(), value);
    }
}
