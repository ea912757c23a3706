//! Error statistics sink.
//!
//! The stack reports classified failure events through an injected
//! [`StatsSink`] so hosts can wire them into whatever metrics pipeline they
//! run. The engine itself only ever emits events; it never reads them back.

use std::sync::atomic::{AtomicU64, Ordering};

/// Classified failure events the stack reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorEvent {
    /// The SSL engine failed on either the cleartext or ciphertext side.
    Ssl,
    /// Outbound framing (encapsulation or standalone-ACK generation) failed.
    Encapsulation,
}

/// Receiver for stack error events.
///
/// Implementations must be cheap: the stack calls this synchronously on its
/// error paths.
pub trait StatsSink: Send + Sync {
    /// Record one occurrence of `event`.
    fn error(&self, event: ErrorEvent);
}

/// Sink that discards every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullStats;

impl StatsSink for NullStats {
    fn error(&self, _event: ErrorEvent) {}
}

/// Sink keeping one atomic counter per event kind.
#[derive(Debug, Default)]
pub struct CounterStats {
    ssl: AtomicU64,
    encapsulation: AtomicU64,
}

impl CounterStats {
    /// Create a sink with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of [`ErrorEvent::Ssl`] events recorded.
    pub fn ssl_errors(&self) -> u64 {
        self.ssl.load(Ordering::Relaxed)
    }

    /// Number of [`ErrorEvent::Encapsulation`] events recorded.
    pub fn encapsulation_errors(&self) -> u64 {
        self.encapsulation.load(Ordering::Relaxed)
    }
}

impl StatsSink for CounterStats {
    fn error(&self, event: ErrorEvent) {
        let counter = match event {
            ErrorEvent::Ssl => &self.ssl,
            ErrorEvent::Encapsulation => &self.encapsulation,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }
}
