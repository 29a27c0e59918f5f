// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Notification hub shared by the shipped store implementations.
//!
//! Writes capture the subscriber list and the value snapshot at write time
//! and enqueue one delivery job per subscriber; a single background thread
//! invokes callbacks in enqueue order without holding any store lock, so
//! callbacks are free to re-enter the store. Per key this yields delivery
//! in write order.

use std::collections::HashMap;
use std::sync::mpsc::{Receiver, Sender};
use std::sync::{mpsc, Arc, Condvar, Mutex};
use std::thread::JoinHandle;

use serde_json::Value;

use crate::store::{StoreCallback, SubscriptionId};

type SharedCallback = Arc<dyn Fn(Option<Value>) + Send + Sync>;

struct Subscriber {
    key: String,
    callback: SharedCallback,
}

enum Job {
    Deliver {
        callback: SharedCallback,
        value: Option<Value>,
    },
    Stop,
}

struct HubShared {
    subscribers: Mutex<HashMap<SubscriptionId, Subscriber>>,
    next_id: Mutex<SubscriptionId>,
    sender: Mutex<Sender<Job>>,
    /// Jobs enqueued but not yet delivered; guarded for the settle condvar.
    in_flight: Mutex<usize>,
    settled: Condvar,
    paused: Mutex<bool>,
    resumed: Condvar,
}

fn lock<'a, T>(mutex: &'a Mutex<T>) -> std::sync::MutexGuard<'a, T> {
    mutex.lock().unwrap_or_else(|e| e.into_inner())
}

/// Subscriber registry plus a single background delivery thread.
pub(crate) struct NotifierHub {
    shared: Arc<HubShared>,
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl NotifierHub {
    pub(crate) fn new() -> Self {
        NotifierHub::with_paused(false)
    }

    /// A hub whose deliveries are held until [`resume`] is called. Used by
    /// tests to stage notification races deterministically.
    ///
    /// [`resume`]: NotifierHub::resume
    #[cfg(test)]
    pub(crate) fn new_paused() -> Self {
        NotifierHub::with_paused(true)
    }

    fn with_paused(paused: bool) -> Self {
        let (sender, receiver) = mpsc::channel();
        let shared = Arc::new(HubShared {
            subscribers: Mutex::new(HashMap::new()),
            next_id: Mutex::new(1),
            sender: Mutex::new(sender),
            in_flight: Mutex::new(0),
            settled: Condvar::new(),
            paused: Mutex::new(paused),
            resumed: Condvar::new(),
        });
        let worker = std::thread::spawn({
            let shared = Arc::clone(&shared);
            move || deliver_loop(&shared, &receiver)
        });
        NotifierHub {
            shared,
            worker: Mutex::new(Some(worker)),
        }
    }

    /// Registers a callback for `key` and queues the initial delivery of
    /// `current`, the value of the key at registration time.
    pub(crate) fn subscribe(
        &self,
        key: &str,
        callback: StoreCallback,
        current: Option<Value>,
    ) -> SubscriptionId {
        let callback: SharedCallback = Arc::from(callback);
        let id = {
            let mut next_id = lock(&self.shared.next_id);
            let id = *next_id;
            *next_id += 1;
            id
        };
        lock(&self.shared.subscribers).insert(
            id,
            Subscriber {
                key: key.to_string(),
                callback: Arc::clone(&callback),
            },
        );
        tracing::trace!(key, id, "subscribed");
        self.enqueue(vec![(callback, current)]);
        id
    }

    pub(crate) fn unsubscribe(&self, id: SubscriptionId) {
        if lock(&self.shared.subscribers).remove(&id).is_some() {
            tracing::trace!(id, "unsubscribed");
        }
    }

    /// Queues one delivery of `value` per subscriber of `key`.
    pub(crate) fn publish(&self, key: &str, value: Option<Value>) {
        let jobs: Vec<(SharedCallback, Option<Value>)> = lock(&self.shared.subscribers)
            .values()
            .filter(|s| s.key == key)
            .map(|s| (Arc::clone(&s.callback), value.clone()))
            .collect();
        if !jobs.is_empty() {
            tracing::trace!(key, subscribers = jobs.len(), "publishing");
            self.enqueue(jobs);
        }
    }

    /// Blocks until every queued delivery, including deliveries caused by
    /// the callbacks themselves, has run.
    pub(crate) fn settle(&self) {
        let mut in_flight = lock(&self.shared.in_flight);
        while *in_flight > 0 {
            in_flight = self
                .shared
                .settled
                .wait(in_flight)
                .unwrap_or_else(|e| e.into_inner());
        }
    }

    /// Holds further deliveries until [`resume`] is called.
    ///
    /// [`resume`]: NotifierHub::resume
    #[cfg(test)]
    pub(crate) fn pause(&self) {
        *lock(&self.shared.paused) = true;
    }

    /// Releases deliveries held by a paused hub.
    #[cfg(test)]
    pub(crate) fn resume(&self) {
        *lock(&self.shared.paused) = false;
        self.shared.resumed.notify_all();
    }

    fn enqueue(&self, jobs: Vec<(SharedCallback, Option<Value>)>) {
        *lock(&self.shared.in_flight) += jobs.len();
        let sender = lock(&self.shared.sender);
        for (callback, value) in jobs {
            // Send only fails after the worker stopped, i.e. during teardown.
            let _ = sender.send(Job::Deliver { callback, value });
        }
    }
}

impl Drop for NotifierHub {
    fn drop(&mut self) {
        *lock(&self.shared.paused) = false;
        self.shared.resumed.notify_all();
        let _ = lock(&self.shared.sender).send(Job::Stop);
        if let Some(worker) = lock(&self.worker).take() {
            let _ = worker.join();
        }
    }
}

fn deliver_loop(shared: &HubShared, receiver: &Receiver<Job>) {
    while let Ok(job) = receiver.recv() {
        match job {
            Job::Stop => break,
            Job::Deliver { callback, value } => {
                {
                    let mut paused = lock(&shared.paused);
                    while *paused {
                        paused = shared
                            .resumed
                            .wait(paused)
                            .unwrap_or_else(|e| e.into_inner());
                    }
                }
                callback(value);
                let mut in_flight = lock(&shared.in_flight);
                *in_flight -= 1;
                if *in_flight == 0 {
                    shared.settled.notify_all();
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "notify_tests.rs"]
mod tests;
