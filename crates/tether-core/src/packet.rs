//! Packet contract the engine is generic over.
//!
//! The stack never parses packet contents. A packet is an opaque carrier of
//! a reference-counted byte buffer plus one routing bit: whether it is a raw
//! sequenced control packet or an SSL ciphertext record. The concrete shape
//! (and the wire framing around it) belongs to the outer protocol.

use bytes::Bytes;

use crate::frame::{Frame, FrameContext};

/// Opaque byte-buffer carrier moved through the stack.
///
/// The empty (post-[`Default`]) and defined states are distinct;
/// [`Packet::reset`] returns a packet to the empty state so the same value
/// can be reused, which the stack relies on for its standalone-ACK scratch
/// packet and which `raw_recv` implementations rely on when they steal a
/// delivered packet's buffer.
pub trait Packet: Default {
    /// Wrap an SSL-produced ciphertext record. `is_raw` is `false` for the
    /// result.
    fn from_ciphertext(buf: Bytes) -> Self;

    /// `true` for raw sequenced control packets, `false` for SSL ciphertext.
    ///
    /// Authoritative for receive-side routing: raw packets are surfaced to
    /// the application as-is, everything else is fed to the SSL engine.
    fn is_raw(&self) -> bool;

    /// `true` once the packet carries data (it is not in the empty state).
    fn is_defined(&self) -> bool;

    /// Return to the empty post-[`Default`] state.
    fn reset(&mut self);

    /// The underlying reference-counted buffer.
    fn buffer(&self) -> &Bytes;

    /// Reset and pre-size for use in `ctx` per the frame descriptor.
    fn prepare(&mut self, frame: &Frame, ctx: FrameContext);
}
