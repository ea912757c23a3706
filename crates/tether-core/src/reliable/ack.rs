//! Bounded queue of received ids awaiting acknowledgement.

use std::collections::VecDeque;

use super::SequenceId;

/// FIFO of sequence ids that still owe the peer an acknowledgement.
///
/// Ids are recorded when a packet is decapsulated and drained when they are
/// piggybacked onto an outgoing packet or emitted in a standalone ACK. The
/// queue never grows past its capacity: recording onto a full tracker evicts
/// the oldest entry, which only delays that acknowledgement — the peer
/// retransmits and the id is recorded again. The stack additionally forces
/// standalone ACK emission whenever an inbound packet fills the tracker, so
/// eviction is the backstop, not the steady state.
#[derive(Debug)]
pub struct AckTracker {
    pending: VecDeque<SequenceId>,
    capacity: usize,
}

impl AckTracker {
    /// Create a tracker holding at most `capacity` pending ids.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity >= 1, "ack capacity must be at least 1");
        Self { pending: VecDeque::with_capacity(capacity), capacity }
    }

    /// Queue `id` for acknowledgement. Ids already pending are ignored.
    pub fn record(&mut self, id: SequenceId) {
        if self.pending.contains(&id) {
            return;
        }
        if self.pending.len() == self.capacity {
            let evicted = self.pending.pop_front();
            tracing::warn!(?evicted, id, "ack tracker full, evicting oldest pending ack");
        }
        self.pending.push_back(id);
    }

    /// Take up to `max` of the oldest pending ids.
    pub fn drain(&mut self, max: usize) -> Vec<SequenceId> {
        let n = max.min(self.pending.len());
        self.pending.drain(..n).collect()
    }

    /// `true` when no acknowledgement is pending.
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// `true` when the tracker is at capacity.
    pub fn is_full(&self) -> bool {
        self.pending.len() == self.capacity
    }

    /// Number of pending acknowledgements.
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Maximum number of pending acknowledgements.
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
