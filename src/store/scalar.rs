use std::collections::HashMap;
use std::sync::RwLock;

use serde::Serialize;
use tracing::info;

use crate::error::StoreError;

/// Plain string get/set, the only capability the HTTP layer needs from
/// scalar storage
pub trait ScalarStore: Send + Sync {
    /// Get the value for a key, `None` when it was never set
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Set a key to the given value, overwriting any previous one
    fn set(&self, key: String, value: String) -> Result<(), StoreError>;
}

/// In-memory scalar store
pub struct MemoryScalarStore {
    data: RwLock<HashMap<String, String>>,
}

impl MemoryScalarStore {
    /// Create a new empty store
    pub fn new() -> Self {
        info!("created new scalar store");
        Self {
            data: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for MemoryScalarStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ScalarStore for MemoryScalarStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let data = self.data.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(data.get(key).cloned())
    }

    fn set(&self, key: String, value: String) -> Result<(), StoreError> {
        let mut data = self.data.write().map_err(|_| StoreError::LockPoisoned)?;
        info!(key = %key, value = %value, "key set");
        data.insert(key, value);
        Ok(())
    }
}

/// Rough type of a scalar value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ScalarKind {
    #[serde(rename = "D")]
    Int,
    #[serde(rename = "S")]
    String,
    #[serde(rename = "U")]
    Undefined,
}

impl ScalarKind {
    pub fn classify(value: &str) -> Self {
        if value.parse::<i64>().is_ok() {
            ScalarKind::Int
        } else if value.is_empty() || value == "undefined" {
            ScalarKind::Undefined
        } else {
            ScalarKind::String
        }
    }
}
