//! Order number generation
//!
//! Format: `OF-{YYYY}-{NNNN}`, e.g. `OF-2026-0001`.
//!
//! Numbers come from a process-wide atomic counter, so concurrent creates can
//! never collide. The store keeps a unique order-number index as a backstop
//! (a persistent deployment would seed the counter from durable state).

use chrono::Datelike;
use std::sync::atomic::{AtomicU64, Ordering};

/// Order number prefix
const ORDER_NUMBER_PREFIX: &str = "OF";

/// Monotonic order number generator
#[derive(Debug)]
pub struct OrderNumberGenerator {
    sequence: AtomicU64,
}

impl OrderNumberGenerator {
    pub fn new() -> Self {
        Self {
            sequence: AtomicU64::new(0),
        }
    }

    /// Allocate the next order number
    ///
    /// Safe under concurrent callers; every call returns a distinct number.
    pub fn next(&self) -> String {
        let seq = self.sequence.fetch_add(1, Ordering::Relaxed) + 1;
        let year = chrono::Utc::now().year();
        format!("{}-{}-{:04}", ORDER_NUMBER_PREFIX, year, seq)
    }
}

impl Default for OrderNumberGenerator {
    fn default() -> Self {
        Self::new()
    }
}
