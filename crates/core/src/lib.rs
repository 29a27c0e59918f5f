// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! relay-core: Offline-tolerant, crash-recoverable sequential request queue.
//!
//! This crate provides the queue manager that persists an ordered list of
//! pending requests, tracks at most one in-flight request, reconciles its
//! in-memory state against a durable store that notifies changes
//! asynchronously, and recovers safely from a crash mid-flight.
//!
//! The store is a contract ([`StateStore`]); two conforming implementations
//! ship with the crate: [`MemoryStore`] for tests and ephemeral use, and
//! [`SqliteStore`] for real durability.

mod buffer;
pub mod drain;
pub mod error;
pub mod memory;
mod notify;
pub mod queue;
pub mod request;
pub mod sqlite;
pub mod store;

pub use drain::{drain, Disposition, DrainSummary, Executor};
pub use error::{Error, Result};
pub use memory::MemoryStore;
pub use queue::RequestQueue;
pub use request::Request;
pub use sqlite::SqliteStore;
pub use store::{keys, merge_values, StateStore, StoreCallback, SubscriptionId};
