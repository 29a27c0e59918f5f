// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! The request queue manager.
//!
//! [`RequestQueue`] owns the in-memory mirror of two store entries: the
//! pending queue (ordered list of requests) and the ongoing slot (the at
//! most one request currently checked out by a processor). All mutations
//! and both store subscriptions serialize on one mutex; an echo of the
//! queue's own write and an externally-caused update flow through the same
//! reconciliation path without distinguishing their origin.
//!
//! Persistence is fire-and-forget: the in-memory view advances immediately
//! and a failed write is only logged, because the next delivery from the
//! store corrects any divergence.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard};

use serde_json::Value;

use crate::buffer::SaveBuffer;
use crate::error::{Error, Result};
use crate::request::Request;
use crate::store::{keys, StateStore, SubscriptionId};

type InitCallback = Box<dyn FnOnce() + Send>;

#[derive(Default)]
struct QueueState {
    pending: Vec<Request>,
    ongoing: Option<Request>,
    buffer: SaveBuffer,
    /// Whether the pending-queue subscription has delivered its first value.
    initialized: bool,
    /// Whether the first empty-to-non-empty transition has been observed.
    init_fired: bool,
    init_callbacks: Vec<InitCallback>,
}

struct QueueInner {
    store: Arc<dyn StateStore>,
    pending_key: String,
    ongoing_key: String,
    state: Mutex<QueueState>,
}

/// Offline-tolerant, crash-recoverable sequential request queue.
///
/// Constructed over a [`StateStore`]; registers subscriptions on both queue
/// keys and keeps them until dropped.
pub struct RequestQueue {
    inner: Arc<QueueInner>,
    pending_sub: SubscriptionId,
    ongoing_sub: SubscriptionId,
}

impl RequestQueue {
    /// Creates a queue over the default store keys.
    pub fn new(store: Arc<dyn StateStore>) -> Self {
        RequestQueue::with_keys(store, keys::PENDING_REQUESTS, keys::ONGOING_REQUEST)
    }

    /// Creates a queue over custom store keys, for hosting several queues
    /// on one store.
    pub fn with_keys(store: Arc<dyn StateStore>, pending_key: &str, ongoing_key: &str) -> Self {
        let inner = Arc::new(QueueInner {
            store: Arc::clone(&store),
            pending_key: pending_key.to_string(),
            ongoing_key: ongoing_key.to_string(),
            state: Mutex::new(QueueState::default()),
        });

        // The pending subscription is registered first so its initial
        // delivery lands before the ongoing one; crash recovery must see
        // the adopted queue to detect an already-rolled-back request.
        let pending_sub = store.subscribe(
            pending_key,
            Box::new({
                let inner = Arc::clone(&inner);
                move |value| inner.on_pending_delivery(value)
            }),
        );
        let ongoing_sub = store.subscribe(
            ongoing_key,
            Box::new({
                let inner = Arc::clone(&inner);
                move |value| inner.on_ongoing_delivery(value)
            }),
        );

        RequestQueue {
            inner,
            pending_sub,
            ongoing_sub,
        }
    }

    /// Enqueues a request for later processing.
    ///
    /// Before the store's first delivery the request is buffered and
    /// flushed, in save order, once the persisted state is known.
    pub fn save(&self, request: Request) {
        let mut state = self.inner.lock_state();
        if !state.initialized {
            tracing::debug!(command = %request.command, "buffering save before initialization");
            state.buffer.push(request);
            return;
        }
        state.pending.push(request);
        self.inner.persist_pending(&state.pending);
    }

    /// Promotes the queue head to the ongoing slot and returns it.
    ///
    /// Idempotent while a request is checked out: returns the current
    /// ongoing request unchanged. Fails with [`Error::NoPendingRequests`]
    /// when the queue is empty and nothing is in flight.
    pub fn process_next_request(&self) -> Result<Request> {
        let mut state = self.inner.lock_state();
        if let Some(ongoing) = &state.ongoing {
            return Ok(ongoing.clone());
        }
        if state.pending.is_empty() {
            return Err(Error::NoPendingRequests);
        }
        let head = state.pending.remove(0);
        state.ongoing = Some(head.clone());
        self.inner.persist_pending(&state.pending);
        if head.persist_when_ongoing {
            self.inner.persist_ongoing(Some(&head));
        }
        tracing::debug!(command = %head.command, "checked out request");
        Ok(head)
    }

    /// Replaces the ongoing request in place, e.g. after the processor
    /// attached a refreshed credential.
    pub fn update_ongoing_request(&self, request: Request) {
        let mut state = self.inner.lock_state();
        if request.persist_when_ongoing {
            self.inner.persist_ongoing(Some(&request));
        }
        state.ongoing = Some(request);
    }

    /// Successful-completion path: clears the ongoing slot and removes the
    /// first structurally-equal match from the pending queue.
    ///
    /// Only the first match is removed; a legitimately duplicated later
    /// request must survive. Finding no match is not an error, the store
    /// may already have advanced past this entry.
    pub fn end_request_and_remove_from_queue(&self, request: &Request) {
        let mut state = self.inner.lock_state();
        state.ongoing = None;
        match state.pending.iter().position(|r| r.same_request(request)) {
            Some(index) => {
                state.pending.remove(index);
            }
            None => {
                tracing::debug!(
                    command = %request.command,
                    "no queued entry matched the completed request; treating as already resolved"
                );
            }
        }
        self.inner.persist_pending(&state.pending);
        self.inner.persist_ongoing(None);
        tracing::info!(command = %request.command, "request completed");
    }

    /// Failure path: moves the ongoing request back to the front of the
    /// pending queue, tagged as a rollback, so it is retried before
    /// anything submitted after it. No-op when nothing is checked out.
    pub fn rollback_ongoing_request(&self) {
        let mut state = self.inner.lock_state();
        let Some(ongoing) = state.ongoing.take() else {
            return;
        };
        state.pending.insert(0, ongoing.to_rollback());
        self.inner.persist_pending(&state.pending);
        if ongoing.persist_when_ongoing {
            self.inner.persist_ongoing(None);
        }
        tracing::info!(command = %ongoing.command, "rolled back ongoing request to the front of the queue");
    }

    /// Replaces the pending request at `index`. Never touches the ongoing
    /// slot. An out-of-range index is ignored with a warning.
    pub fn update(&self, index: usize, request: Request) {
        let mut state = self.inner.lock_state();
        if index >= state.pending.len() {
            tracing::warn!(
                index,
                pending = state.pending.len(),
                "ignoring update at out-of-range index"
            );
            return;
        }
        state.pending[index] = request;
        self.inner.persist_pending(&state.pending);
    }

    /// Deletes the pending requests at the given positions. Indices refer
    /// to positions at call time; out-of-range indices are harmless.
    pub fn delete_requests_by_indices(&self, indices: &[usize]) {
        let mut state = self.inner.lock_state();
        let discard: HashSet<usize> = indices.iter().copied().collect();
        let mut position = 0;
        state.pending.retain(|_| {
            let keep = !discard.contains(&position);
            position += 1;
            keep
        });
        self.inner.persist_pending(&state.pending);
    }

    /// Snapshot of the pending queue, in processing order.
    pub fn get_all(&self) -> Vec<Request> {
        self.inner.lock_state().pending.clone()
    }

    /// Pending count plus one if a request is checked out.
    pub fn get_length(&self) -> usize {
        let state = self.inner.lock_state();
        state.pending.len() + usize::from(state.ongoing.is_some())
    }

    /// The request currently checked out, if any.
    pub fn get_ongoing_request(&self) -> Option<Request> {
        self.inner.lock_state().ongoing.clone()
    }

    /// Registers a callback for the moment buffered pre-init saves first
    /// turn an empty queue non-empty; fires immediately if that moment has
    /// already passed.
    pub fn on_initialization(&self, callback: impl FnOnce() + Send + 'static) {
        let mut state = self.inner.lock_state();
        if state.init_fired {
            drop(state);
            callback();
            return;
        }
        state.init_callbacks.push(Box::new(callback));
    }

    /// Resets both store keys and all queue-owned in-memory state. Debug
    /// tool; the store connection stays live and initialized.
    pub fn clear(&self) {
        let mut state = self.inner.lock_state();
        state.pending.clear();
        state.ongoing = None;
        state.buffer.clear();
        self.inner.persist_pending(&state.pending);
        self.inner.persist_ongoing(None);
        tracing::debug!("queue cleared");
    }
}

impl Drop for RequestQueue {
    fn drop(&mut self) {
        self.inner.store.unsubscribe(self.pending_sub);
        self.inner.store.unsubscribe(self.ongoing_sub);
    }
}

impl QueueInner {
    fn lock_state(&self) -> MutexGuard<'_, QueueState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Pending-queue subscription callback: adopts the delivered list,
    /// minus a head that is already checked out locally, and on the first
    /// delivery flushes the save buffer.
    fn on_pending_delivery(&self, value: Option<Value>) {
        let delivered: Vec<Request> = match value {
            None | Some(Value::Null) => Vec::new(),
            Some(v) => match serde_json::from_value(v) {
                Ok(list) => list,
                Err(e) => {
                    tracing::warn!(error = %e, "ignoring undecodable pending-queue delivery");
                    return;
                }
            },
        };

        let mut to_fire = Vec::new();
        {
            let mut state = self.lock_state();
            let mut adopted = delivered;

            // The delivered head may duplicate the checked-out request when
            // the store echoes a write made just before the head was
            // promoted. Drop it rather than double-count it.
            if let Some(ongoing) = &state.ongoing {
                if adopted
                    .first()
                    .is_some_and(|head| head.same_request(ongoing))
                {
                    tracing::debug!(command = %ongoing.command, "dropping delivered head already checked out");
                    adopted.remove(0);
                }
            }
            state.pending = adopted;

            if !state.initialized {
                state.initialized = true;
                if !state.buffer.is_empty() {
                    let was_empty = state.pending.is_empty();
                    tracing::debug!(count = state.buffer.len(), "flushing buffered saves");
                    let buffered = state.buffer.drain();
                    state.pending.extend(buffered);
                    self.persist_pending(&state.pending);
                    if was_empty && !state.init_fired {
                        state.init_fired = true;
                        to_fire = std::mem::take(&mut state.init_callbacks);
                    }
                }
            }
        }
        for callback in to_fire {
            callback();
        }
    }

    /// Ongoing-slot subscription callback: the crash-recovery path.
    fn on_ongoing_delivery(&self, value: Option<Value>) {
        let delivered: Option<Request> = match value {
            None | Some(Value::Null) => None,
            Some(v) => match serde_json::from_value(v) {
                Ok(request) => Some(request),
                Err(e) => {
                    tracing::warn!(error = %e, "ignoring undecodable ongoing delivery");
                    return;
                }
            },
        };

        let mut state = self.lock_state();
        let Some(delivered) = delivered else {
            // A cleared slot never clobbers an active checkout.
            if state.ongoing.is_some() {
                tracing::trace!("ignoring cleared ongoing slot while a request is checked out");
            }
            return;
        };

        if let Some(ongoing) = &state.ongoing {
            if ongoing.same_request(&delivered) {
                tracing::trace!(command = %ongoing.command, "ongoing slot echo confirms checked-out request");
            } else {
                tracing::warn!(
                    delivered = %delivered.command,
                    active = %ongoing.command,
                    "ignoring stale ongoing delivery while a different request is checked out"
                );
            }
            return;
        }

        if state.pending.iter().any(|r| r.same_request(&delivered)) {
            tracing::debug!(
                command = %delivered.command,
                "persisted ongoing request already rolled back into the queue; clearing slot"
            );
            self.persist_ongoing(None);
            return;
        }

        tracing::info!(command = %delivered.command, "recovering request stranded in flight by a previous run");
        state.pending.insert(0, delivered.to_rollback());
        self.persist_pending(&state.pending);
        self.persist_ongoing(None);
    }

    fn persist_pending(&self, pending: &[Request]) {
        match serde_json::to_value(pending) {
            Ok(value) => {
                if let Err(e) = self.store.set(&self.pending_key, Some(value)) {
                    tracing::warn!(key = %self.pending_key, error = %e, "failed to persist pending queue");
                }
            }
            Err(e) => tracing::warn!(error = %e, "failed to serialize pending queue"),
        }
    }

    fn persist_ongoing(&self, request: Option<&Request>) {
        let value = match request.map(serde_json::to_value) {
            None => None,
            Some(Ok(value)) => Some(value),
            Some(Err(e)) => {
                tracing::warn!(error = %e, "failed to serialize ongoing request");
                return;
            }
        };
        if let Err(e) = self.store.set(&self.ongoing_key, value) {
            tracing::warn!(key = %self.ongoing_key, error = %e, "failed to persist ongoing slot");
        }
    }
}

#[cfg(test)]
#[path = "queue_tests.rs"]
mod tests;
