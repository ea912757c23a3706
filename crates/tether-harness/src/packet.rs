//! Byte-buffer packet used throughout the harness.

use bytes::Bytes;
use tether_core::{
    frame::{Frame, FrameContext},
    packet::Packet,
};

/// Minimal [`Packet`] implementation: one `Bytes` buffer plus the raw flag.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TestPacket {
    buf: Bytes,
    raw: bool,
    defined: bool,
}

impl TestPacket {
    /// Raw (non-SSL) packet carrying `payload`.
    pub fn raw(payload: impl Into<Bytes>) -> Self {
        Self { buf: payload.into(), raw: true, defined: true }
    }

    /// SSL-ciphertext packet carrying `payload`.
    pub fn ssl(payload: impl Into<Bytes>) -> Self {
        Self { buf: payload.into(), raw: false, defined: true }
    }

    /// Replace the buffer, e.g. after the codec framed the payload.
    pub fn set_buffer(&mut self, buf: Bytes) {
        self.buf = buf;
        self.defined = true;
    }
}

impl Packet for TestPacket {
    fn from_ciphertext(buf: Bytes) -> Self {
        Self { buf, raw: false, defined: true }
    }

    fn is_raw(&self) -> bool {
        self.raw
    }

    fn is_defined(&self) -> bool {
        self.defined
    }

    fn reset(&mut self) {
        *self = Self::default();
    }

    fn buffer(&self) -> &Bytes {
        &self.buf
    }

    fn prepare(&mut self, _frame: &Frame, _ctx: FrameContext) {
        // Framing writes a whole fresh buffer, so reuse needs no reserved
        // capacity here.
        self.reset();
    }
}
