// Durable key-value storage
//
// String keys, JSON values. Callers treat every error as non-fatal: in-memory
// state stays authoritative for the session when storage is unavailable.

mod file;

pub use file::FileStore;

use serde_json::Value;
use std::collections::HashMap;
use std::sync::Mutex;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage I/O failed for '{key}': {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },

    #[error("stored value for '{key}' is not valid JSON: {source}")]
    Corrupt {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("storage quota exceeded writing '{key}' ({needed} bytes, {available} available)")]
    QuotaExceeded {
        key: String,
        needed: usize,
        available: usize,
    },

    #[error("storage is unavailable")]
    Unavailable,
}

/// Key-value persistence used by history and the response cache
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<Value>, StorageError>;

    fn set(&self, key: &str, value: &Value) -> Result<(), StorageError>;

    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// In-process store with an optional byte quota
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
    quota: Option<usize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            quota: None,
        }
    }

    /// Store that rejects writes once the serialized total would exceed `bytes`
    pub fn with_quota(bytes: usize) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            quota: Some(bytes),
        }
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, String>>, StorageError> {
        self.entries.lock().map_err(|_| StorageError::Unavailable)
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<Value>, StorageError> {
        let entries = self.lock()?;
        match entries.get(key) {
            Some(raw) => serde_json::from_str(raw)
                .map(Some)
                .map_err(|source| StorageError::Corrupt {
                    key: key.to_string(),
                    source,
                }),
            None => Ok(None),
        }
    }

    fn set(&self, key: &str, value: &Value) -> Result<(), StorageError> {
        let raw = value.to_string();
        let mut entries = self.lock()?;

        if let Some(quota) = self.quota {
            let used: usize = entries
                .iter()
                .filter(|(k, _)| k.as_str() != key)
                .map(|(k, v)| k.len() + v.len())
                .sum();
            let needed = key.len() + raw.len();
            if used + needed > quota {
                return Err(StorageError::QuotaExceeded {
                    key: key.to_string(),
                    needed,
                    available: quota.saturating_sub(used),
                });
            }
        }

        entries.insert(key.to_string(), raw);
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.lock()?.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_memory_store_roundtrip() {
        let store = MemoryStore::new();
        store.set("cmd_history", &json!(["help", "cp"])).unwrap();

        assert_eq!(store.get("cmd_history").unwrap(), Some(json!(["help", "cp"])));

        store.remove("cmd_history").unwrap();
        assert_eq!(store.get("cmd_history").unwrap(), None);
    }

    #[test]
    fn test_quota_rejects_oversized_write() {
        let store = MemoryStore::with_quota(16);
        store.set("k", &json!("small")).unwrap();

        let err = store.set("other", &json!("this value is far too large")).unwrap_err();
        assert!(matches!(err, StorageError::QuotaExceeded { .. }));

        // The rejected write leaves existing data alone
        assert_eq!(store.get("k").unwrap(), Some(json!("small")));
    }

    #[test]
    fn test_quota_counts_overwrite_once() {
        let store = MemoryStore::with_quota(12);
        store.set("k", &json!("aaaa")).unwrap();
        store.set("k", &json!("bbbb")).unwrap();
        assert_eq!(store.get("k").unwrap(), Some(json!("bbbb")));
    }
}
