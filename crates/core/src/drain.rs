// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Reference sequential consumer of the queue.
//!
//! [`drain`] checks requests out one at a time, hands each to an
//! [`Executor`], and reports the outcome back to the queue. It carries no
//! retry policy: a failure rolls the request back to the front of the
//! queue and stops the drain, and the caller decides when to drain again.

use crate::queue::RequestQueue;
use crate::request::Request;

/// Outcome of executing one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// The request was delivered; remove it from the queue.
    Completed,
    /// Delivery failed; roll the request back for a later retry.
    Failed,
}

/// Executes requests against a backend.
pub trait Executor {
    fn execute(&mut self, request: &Request) -> Disposition;
}

/// What a [`drain`] pass accomplished.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DrainSummary {
    /// Requests completed and removed.
    pub completed: usize,
    /// Requests rolled back to the front of the queue (0 or 1).
    pub rolled_back: usize,
}

/// Drains the queue until it is empty or a request fails.
pub fn drain(queue: &RequestQueue, executor: &mut dyn Executor) -> DrainSummary {
    let mut summary = DrainSummary::default();
    loop {
        let Ok(request) = queue.process_next_request() else {
            break;
        };
        match executor.execute(&request) {
            Disposition::Completed => {
                queue.end_request_and_remove_from_queue(&request);
                summary.completed += 1;
            }
            Disposition::Failed => {
                tracing::debug!(command = %request.command, "execution failed; stopping drain");
                queue.rollback_ongoing_request();
                summary.rolled_back += 1;
                break;
            }
        }
    }
    summary
}

#[cfg(test)]
#[path = "drain_tests.rs"]
mod tests;
