// Response cache for external lookups
//
// Entries live in memory and are mirrored to storage as
// `api_cache_<name>` -> `{ data, expiry }` (expiry in epoch milliseconds).
// An entry is valid while `now < expiry`; an expired entry is evicted on read.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::config::constants::CACHE_KEY_PREFIX;
use crate::storage::KeyValueStore;

/// Time source, swappable in tests
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock that only moves when told to
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(start),
        }
    }

    pub fn advance(&self, by: Duration) {
        if let Ok(mut now) = self.now.lock() {
            *now += chrono::Duration::milliseconds(by.as_millis() as i64);
        }
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        self.now.lock().map(|now| *now).unwrap_or_else(|_| Utc::now())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheEntry {
    pub data: String,
    pub expiry: i64,
}

pub struct ResponseCache {
    entries: HashMap<String, CacheEntry>,
    store: Arc<dyn KeyValueStore>,
    clock: Arc<dyn Clock>,
    default_ttl: Duration,
}

impl ResponseCache {
    pub fn new(
        store: Arc<dyn KeyValueStore>,
        clock: Arc<dyn Clock>,
        default_ttl: Duration,
    ) -> Self {
        Self {
            entries: HashMap::new(),
            store,
            clock,
            default_ttl,
        }
    }

    /// Cached value for `name`, or `None` when absent or expired
    pub fn get(&mut self, name: &str) -> Option<String> {
        let entry = match self.entries.get(name) {
            Some(entry) => Some(entry.clone()),
            None => self.load(name),
        }?;

        if self.clock.now().timestamp_millis() < entry.expiry {
            self.entries.insert(name.to_string(), entry.clone());
            Some(entry.data)
        } else {
            tracing::debug!("Cache entry '{}' expired, evicting", name);
            self.evict(name);
            None
        }
    }

    /// Store `value` under `name` for `ttl` (default TTL when `None`)
    pub fn set(&mut self, name: &str, value: impl Into<String>, ttl: Option<Duration>) {
        let ttl = ttl.unwrap_or(self.default_ttl);
        let ttl_ms = i64::try_from(ttl.as_millis()).unwrap_or(i64::MAX);
        let entry = CacheEntry {
            data: value.into(),
            expiry: self.clock.now().timestamp_millis().saturating_add(ttl_ms),
        };

        match serde_json::to_value(&entry) {
            Ok(value) => {
                if let Err(e) = self.store.set(&storage_key(name), &value) {
                    tracing::debug!("Failed to persist cache entry '{}': {}", name, e);
                }
            }
            Err(e) => tracing::debug!("Failed to serialize cache entry '{}': {}", name, e),
        }

        self.entries.insert(name.to_string(), entry);
    }

    fn load(&self, name: &str) -> Option<CacheEntry> {
        match self.store.get(&storage_key(name)) {
            Ok(Some(value)) => match serde_json::from_value(value) {
                Ok(entry) => Some(entry),
                Err(e) => {
                    tracing::debug!("Ignoring malformed cache entry '{}': {}", name, e);
                    None
                }
            },
            Ok(None) => None,
            Err(e) => {
                tracing::debug!("Cache storage unavailable for '{}': {}", name, e);
                None
            }
        }
    }

    fn evict(&mut self, name: &str) {
        self.entries.remove(name);
        if let Err(e) = self.store.remove(&storage_key(name)) {
            tracing::debug!("Failed to evict cache entry '{}': {}", name, e);
        }
    }
}

fn storage_key(name: &str) -> String {
    format!("{}{}", CACHE_KEY_PREFIX, name)
}
