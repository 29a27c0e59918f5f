// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! The queued mutation value type.
//!
//! A [`Request`] is one client-originated mutation awaiting delivery to a
//! backend. The queue treats `command` and `data` as opaque; it only cares
//! about ordering, the durability flag, and structural identity.
//!
//! Structural identity deliberately ignores `request_id` and `is_rollback`:
//! two requests with the same command, payload, and durability flag are the
//! same entry to completion matching and crash-recovery collision detection.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One queued client-originated mutation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Request {
    /// Identifier of the operation to perform (opaque to the queue).
    pub command: String,

    /// Operation payload (opaque to the queue).
    #[serde(default)]
    pub data: Value,

    /// Correlation identifier for related requests. Not part of structural
    /// identity; used for de-duplication in the application layer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,

    /// Whether the in-flight state of this request must itself be persisted,
    /// so a crash mid-flight can be recovered.
    #[serde(default)]
    pub persist_when_ongoing: bool,

    /// Set when a previously-ongoing request was pushed back to the queue
    /// after a failure or crash.
    #[serde(default)]
    pub is_rollback: bool,
}

impl Request {
    /// Creates a new request for the given command with a null payload.
    pub fn new(command: impl Into<String>) -> Self {
        Request {
            command: command.into(),
            data: Value::Null,
            request_id: None,
            persist_when_ongoing: false,
            is_rollback: false,
        }
    }

    /// Sets the operation payload.
    pub fn with_data(mut self, data: Value) -> Self {
        self.data = data;
        self
    }

    /// Sets the correlation identifier.
    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = Some(request_id.into());
        self
    }

    /// Marks the in-flight state of this request as durable.
    pub fn persist_when_ongoing(mut self) -> Self {
        self.persist_when_ongoing = true;
        self
    }

    /// Structural identity: same command, payload, and durability flag.
    ///
    /// `request_id` and `is_rollback` are excluded, so a rolled-back copy of
    /// a request is the same entry as the original.
    pub fn same_request(&self, other: &Request) -> bool {
        self.command == other.command
            && self.data == other.data
            && self.persist_when_ongoing == other.persist_when_ongoing
    }

    /// Clones this request tagged as a rollback, for reinsertion at the
    /// front of the queue.
    pub fn to_rollback(&self) -> Request {
        let mut rolled = self.clone();
        rolled.is_rollback = true;
        rolled
    }
}

#[cfg(test)]
#[path = "request_tests.rs"]
mod tests;
