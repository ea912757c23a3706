//! Outgoing sliding window with per-message retransmit timers.

use std::{
    collections::VecDeque,
    time::{Duration, Instant},
};

use super::SequenceId;
use crate::packet::Packet;

/// One in-flight message occupying a window slot.
///
/// An entry stays in the window until its id is acknowledged or the session
/// is invalidated. Entries acknowledged out of order are only marked — the
/// window slides when the head entry is acknowledged, keeping the id range
/// contiguous.
#[derive(Debug)]
pub struct SendEntry<P> {
    id: SequenceId,
    /// Encapsulated payload, retransmitted verbatim until acknowledged.
    pub packet: P,
    sent_at: Instant,
    retransmit_at: Instant,
    interval: Duration,
    acked: bool,
}

impl<P: Packet> SendEntry<P> {
    /// Sequence id of this entry.
    pub fn id(&self) -> SequenceId {
        self.id
    }

    /// Time the entry was first placed into the window.
    pub fn sent_at(&self) -> Instant {
        self.sent_at
    }

    /// `true` once the peer acknowledged this id.
    pub fn acked(&self) -> bool {
        self.acked
    }

    /// `true` when the retransmit timer has expired and the entry is still
    /// unacknowledged.
    pub fn ready_retransmit(&self, now: Instant) -> bool {
        !self.acked && now >= self.retransmit_at
    }

    /// Re-arm the retransmit timer after (re)sending.
    ///
    /// The backoff policy lives here: this implementation re-arms at a fixed
    /// per-entry interval.
    pub fn reset_retransmit(&mut self, now: Instant) {
        self.retransmit_at = now + self.interval;
    }

    fn until_retransmit(&self, now: Instant) -> Duration {
        self.retransmit_at.saturating_duration_since(now)
    }
}

/// Sliding window of up to `span` outstanding messages with ids forming the
/// contiguous range `[head_id, tail_id)`.
#[derive(Debug)]
pub struct SendWindow<P> {
    entries: VecDeque<SendEntry<P>>,
    head: SequenceId,
    next: SequenceId,
    span: usize,
    interval: Duration,
}

impl<P: Packet> SendWindow<P> {
    /// Create a window admitting at most `span` unacknowledged messages,
    /// each retransmitted every `retransmit_interval` until acknowledged.
    pub fn new(span: usize, retransmit_interval: Duration) -> Self {
        assert!(span >= 1, "window span must be at least 1");
        Self {
            entries: VecDeque::with_capacity(span),
            head: 0,
            next: 0,
            span,
            interval: retransmit_interval,
        }
    }

    /// `true` when the window can accept another message.
    pub fn ready(&self) -> bool {
        self.entries.len() < self.span
    }

    /// Allocate the next slot, stamping `now` as send time and arming the
    /// retransmit timer. The caller fills in the returned entry's packet.
    ///
    /// # Panics
    ///
    /// Panics when the window is full; check [`SendWindow::ready`] first.
    pub fn send(&mut self, now: Instant) -> &mut SendEntry<P> {
        assert!(self.ready(), "send window full");
        let id = self.next;
        self.next += 1;
        self.entries.push_back(SendEntry {
            id,
            packet: P::default(),
            sent_at: now,
            retransmit_at: now + self.interval,
            interval: self.interval,
            acked: false,
        });
        self.entries.back_mut().expect("entry just pushed")
    }

    /// Acknowledge `id`, which may arrive out of order. Returns `false` for
    /// ids outside the window or already acknowledged.
    pub fn ack(&mut self, id: SequenceId) -> bool {
        if id < self.head || id >= self.next {
            return false;
        }
        let idx = (id - self.head) as usize;
        let entry = &mut self.entries[idx];
        if entry.acked {
            return false;
        }
        entry.acked = true;
        entry.packet.reset();
        while self.entries.front().is_some_and(|e| e.acked) {
            self.entries.pop_front();
            self.head += 1;
        }
        true
    }

    /// Id of the oldest outstanding message.
    pub fn head_id(&self) -> SequenceId {
        self.head
    }

    /// One past the newest allocated id.
    pub fn tail_id(&self) -> SequenceId {
        self.next
    }

    /// Number of entries currently occupying window slots.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// `true` when no message is in flight.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Minimum time until any unacknowledged entry is due for
    /// retransmission, or `None` when nothing is outstanding.
    pub fn until_retransmit(&self, now: Instant) -> Option<Duration> {
        self.entries.iter().filter(|e| !e.acked).map(|e| e.until_retransmit(now)).min()
    }

    /// Entries in strictly increasing id order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut SendEntry<P>> {
        self.entries.iter_mut()
    }
}
