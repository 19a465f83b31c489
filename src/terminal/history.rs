// Command history with a recall cursor
//
// Entries are stored verbatim, oldest first. The recall cursor counts
// backward from the newest entry; `None` means "not recalling".

use serde_json::Value;
use std::sync::Arc;

use crate::config::constants::HISTORY_KEY;
use crate::storage::KeyValueStore;

pub struct HistoryStore {
    entries: Vec<String>,
    cursor: Option<usize>,
    limit: usize,
    store: Arc<dyn KeyValueStore>,
}

impl HistoryStore {
    /// Load persisted history. Unreadable or malformed storage yields an empty log.
    pub fn load(store: Arc<dyn KeyValueStore>, limit: usize) -> Self {
        let mut entries: Vec<String> = match store.get(HISTORY_KEY) {
            Ok(Some(value)) => serde_json::from_value(value).unwrap_or_else(|e| {
                tracing::debug!("Ignoring malformed history: {}", e);
                Vec::new()
            }),
            Ok(None) => Vec::new(),
            Err(e) => {
                tracing::debug!("History unavailable: {}", e);
                Vec::new()
            }
        };

        let limit = limit.max(1);
        if entries.len() > limit {
            entries.drain(..entries.len() - limit);
        }

        Self {
            entries,
            cursor: None,
            limit,
            store,
        }
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    /// Record a submitted line, evicting the oldest past the limit
    pub fn append(&mut self, line: &str) {
        self.entries.push(line.to_string());
        if self.entries.len() > self.limit {
            let excess = self.entries.len() - self.limit;
            self.entries.drain(..excess);
        }
        self.cursor = None;
        self.persist();
    }

    /// Step toward older entries. `None` when there is no history to recall.
    pub fn recall_older(&mut self) -> Option<String> {
        if self.entries.is_empty() {
            return None;
        }
        let last = self.entries.len() - 1;
        self.cursor = Some(match self.cursor {
            None => 0,
            Some(i) => (i + 1).min(last),
        });
        Some(self.current())
    }

    /// Step toward newer entries, ending at the empty line
    pub fn recall_newer(&mut self) -> Option<String> {
        if self.entries.is_empty() {
            return None;
        }
        self.cursor = match self.cursor {
            None | Some(0) => None,
            Some(i) => Some(i - 1),
        };
        Some(self.current())
    }

    pub fn reset_cursor(&mut self) {
        self.cursor = None;
    }

    /// Drop all entries, in memory and in storage
    pub fn clear(&mut self) {
        self.entries.clear();
        self.cursor = None;
        if let Err(e) = self.store.remove(HISTORY_KEY) {
            tracing::debug!("Failed to clear persisted history: {}", e);
        }
    }

    fn current(&self) -> String {
        match self.cursor {
            None => String::new(),
            Some(i) => self.entries[self.entries.len() - 1 - i].clone(),
        }
    }

    fn persist(&self) {
        let value = Value::from(self.entries.clone());
        if let Err(e) = self.store.set(HISTORY_KEY, &value) {
            tracing::debug!("Failed to persist history: {}", e);
        }
    }
}
