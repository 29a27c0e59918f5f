// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Buffer for saves issued before the store's first delivery.
//!
//! Until the pending-queue subscription has delivered its initial value,
//! the persisted state is unknown and appending to the live queue would
//! race with it. Saves land here instead and are flushed in order once
//! initialization completes.

use crate::request::Request;

/// FIFO holding requests saved before initialization.
#[derive(Debug, Default)]
pub(crate) struct SaveBuffer {
    items: Vec<Request>,
}

impl SaveBuffer {
    pub(crate) fn push(&mut self, request: Request) {
        self.items.push(request);
    }

    /// Takes the buffered requests, in save order.
    pub(crate) fn drain(&mut self) -> Vec<Request> {
        std::mem::take(&mut self.items)
    }

    pub(crate) fn clear(&mut self) {
        self.items.clear();
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub(crate) fn len(&self) -> usize {
        self.items.len()
    }
}

#[cfg(test)]
#[path = "buffer_tests.rs"]
mod tests;
