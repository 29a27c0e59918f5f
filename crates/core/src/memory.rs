// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! In-memory state store.
//!
//! Conforms to the [`StateStore`] contract without touching disk. Used by
//! tests and by ephemeral tooling that wants queue semantics without a
//! state directory.

use std::collections::HashMap;
use std::sync::Mutex;

use serde_json::Value;

use crate::error::Result;
use crate::notify::NotifierHub;
use crate::store::{merge_values, StateStore, StoreCallback, SubscriptionId};

/// A [`StateStore`] backed by a process-local map.
pub struct MemoryStore {
    values: Mutex<HashMap<String, Value>>,
    hub: NotifierHub,
}

impl MemoryStore {
    pub fn new() -> Self {
        MemoryStore {
            values: Mutex::new(HashMap::new()),
            hub: NotifierHub::new(),
        }
    }

    /// A store whose notification deliveries are held until [`resume`] is
    /// called, so tests can stage races deterministically.
    ///
    /// [`resume`]: MemoryStore::resume
    #[cfg(test)]
    pub(crate) fn paused() -> Self {
        MemoryStore {
            values: Mutex::new(HashMap::new()),
            hub: NotifierHub::new_paused(),
        }
    }

    /// Holds further notification deliveries until [`resume`] is called.
    ///
    /// [`resume`]: MemoryStore::resume
    #[cfg(test)]
    pub(crate) fn pause(&self) {
        self.hub.pause();
    }

    /// Releases held notification deliveries.
    #[cfg(test)]
    pub(crate) fn resume(&self) {
        self.hub.resume();
    }

    /// Blocks until all queued notifications (and their cascades) have been
    /// delivered.
    pub fn settle(&self) {
        self.hub.settle();
    }

    fn lock_values(&self) -> std::sync::MutexGuard<'_, HashMap<String, Value>> {
        self.values.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        MemoryStore::new()
    }
}

impl StateStore for MemoryStore {
    fn set(&self, key: &str, value: Option<Value>) -> Result<()> {
        {
            let mut values = self.lock_values();
            match &value {
                Some(v) => {
                    values.insert(key.to_string(), v.clone());
                }
                None => {
                    values.remove(key);
                }
            }
        }
        self.hub.publish(key, value);
        Ok(())
    }

    fn merge(&self, key: &str, partial: Value) -> Result<()> {
        let merged = {
            let mut values = self.lock_values();
            let merged = merge_values(values.remove(key), partial);
            values.insert(key.to_string(), merged.clone());
            merged
        };
        self.hub.publish(key, Some(merged));
        Ok(())
    }

    fn get(&self, key: &str) -> Result<Option<Value>> {
        Ok(self.lock_values().get(key).cloned())
    }

    fn subscribe(&self, key: &str, callback: StoreCallback) -> SubscriptionId {
        let current = self.lock_values().get(key).cloned();
        self.hub.subscribe(key, callback, current)
    }

    fn unsubscribe(&self, id: SubscriptionId) {
        self.hub.unsubscribe(id);
    }
}

#[cfg(test)]
#[path = "memory_tests.rs"]
mod tests;
