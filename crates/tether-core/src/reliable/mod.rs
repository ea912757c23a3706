//! Reliability layer: sliding windows and acknowledgement tracking.
//!
//! Three cooperating pieces give the stack at-most-once, in-order delivery
//! over a transport that drops, duplicates, and reorders:
//!
//! - [`SendWindow`]: outgoing messages awaiting acknowledgement, each with
//!   its own retransmit timer.
//! - [`RecvWindow`]: reorder and deduplication buffer for inbound messages.
//! - [`AckTracker`]: bounded queue of received ids that still owe the peer
//!   an acknowledgement.
//!
//! Raw control packets and SSL ciphertext share one sequence space, so
//! ordering is preserved across both streams.

pub mod ack;
pub mod recv;
pub mod send;

pub use ack::AckTracker;
pub use recv::RecvWindow;
pub use send::{SendEntry, SendWindow};

/// Message sequence identifier.
///
/// Monotonically increasing and never reused within a session; the 32-bit
/// space is not expected to wrap before the session is torn down.
pub type SequenceId = u32;
