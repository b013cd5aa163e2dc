//! In-memory response cache with time-bucket expiry.
//!
//! An entry serves reads until its bucket elapses, then disappears on the
//! next lookup. There is no other eviction policy and no background sweeper.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use serde_json::Value;

pub struct ResponseCache {
    ttl: Duration,
    entries: Mutex<HashMap<String, Entry>>,
}

struct Entry {
    stored_at: Instant,
    body: Value,
}

impl ResponseCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Returns the cached body if its bucket has not elapsed. A poisoned lock
    /// degrades to a miss.
    pub fn get(&self, key: &str) -> Option<Value> {
        let Ok(mut entries) = self.entries.lock() else {
            return None;
        };
        match entries.get(key) {
            Some(entry) if entry.stored_at.elapsed() < self.ttl => Some(entry.body.clone()),
            Some(_) => {
                entries.remove(key);
                None
            }
            None => None,
        }
    }

    pub fn put(&self, key: &str, body: Value) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.insert(
                key.to_owned(),
                Entry {
                    stored_at: Instant::now(),
                    body,
                },
            );
        }
    }
}
