// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! The durable-store contract the queue is built on.
//!
//! A [`StateStore`] is a persistent key/value store with subscribe/notify
//! semantics: a subscription delivers the current value once immediately
//! (asynchronously), then again on every subsequent write to the key from
//! any writer, including writes made by the subscribing process itself.
//! Deliveries for a key arrive in write order.
//!
//! The queue learns state exclusively through its subscriptions; [`get`] is
//! a snapshot read for tooling and diagnostics.
//!
//! [`get`]: StateStore::get

use serde_json::Value;

use crate::error::Result;

/// The store keys the queue operates on.
pub mod keys {
    /// The ordered list of pending requests (JSON array of Request).
    pub const PENDING_REQUESTS: &str = "pending_requests";
    /// The in-flight request, if any (JSON Request object).
    pub const ONGOING_REQUEST: &str = "ongoing_request";
}

/// Handle returned by [`StateStore::subscribe`], used to detach the callback.
pub type SubscriptionId = u64;

/// Callback invoked with the value of a key; `None` means the key is unset.
pub type StoreCallback = Box<dyn Fn(Option<Value>) + Send + Sync>;

/// A persistent key/value store with subscribe/notify semantics.
pub trait StateStore: Send + Sync {
    /// Writes `value` to `key`; `None` clears the key. Subscribers are
    /// notified asynchronously.
    fn set(&self, key: &str, value: Option<Value>) -> Result<()>;

    /// Deep-merges a partial JSON document into the current value of `key`.
    ///
    /// Object fields merge recursively, an explicit JSON null deletes the
    /// field, and arrays and scalars replace.
    fn merge(&self, key: &str, partial: Value) -> Result<()>;

    /// Snapshot read of the current value of `key`.
    fn get(&self, key: &str) -> Result<Option<Value>>;

    /// Registers `callback` for `key`. The current value is delivered once
    /// immediately (asynchronously), then on every subsequent write.
    fn subscribe(&self, key: &str, callback: StoreCallback) -> SubscriptionId;

    /// Detaches a callback. Deliveries already queued may still arrive.
    fn unsubscribe(&self, id: SubscriptionId);
}

/// Deep-merges `partial` into `current`.
///
/// Object fields merge recursively; an explicit JSON null in `partial`
/// deletes the field; arrays and scalars replace the current value.
pub fn merge_values(current: Option<Value>, partial: Value) -> Value {
    match (current, partial) {
        (Some(Value::Object(mut base)), Value::Object(patch)) => {
            for (field, value) in patch {
                if value.is_null() {
                    base.remove(&field);
                } else {
                    let merged = merge_values(base.remove(&field), value);
                    base.insert(field, merged);
                }
            }
            Value::Object(base)
        }
        (_, partial) => partial,
    }
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
