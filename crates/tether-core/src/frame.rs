//! Buffer sizing descriptor.
//!
//! Different points in the stack need buffers shaped differently: a
//! standalone-ACK scratch packet wants headroom for the outer framing, while
//! the cleartext buffer handed to the SSL engine wants a full payload's worth
//! of writable space. The [`Frame`] descriptor names those contexts so hosts
//! can tune sizes without the engine knowing any wire layout.

use bytes::BytesMut;

/// Named buffer-preparation contexts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameContext {
    /// Scratch packet about to carry a standalone ACK.
    WriteAckStandalone,
    /// Buffer the SSL engine decrypts application cleartext into.
    ReadSslCleartext,
}

/// Sizing for one buffer context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameLayout {
    /// Space reserved in front of the payload for prepended framing.
    pub headroom: usize,
    /// Maximum payload size.
    pub payload: usize,
    /// Space reserved behind the payload for appended framing.
    pub tailroom: usize,
}

impl FrameLayout {
    /// Total capacity a buffer for this layout should reserve.
    pub fn capacity(&self) -> usize {
        self.headroom + self.payload + self.tailroom
    }
}

/// Per-context buffer sizing supplied by the host at construction.
#[derive(Debug, Clone)]
pub struct Frame {
    ack_standalone: FrameLayout,
    ssl_cleartext: FrameLayout,
}

impl Frame {
    /// Build a descriptor from explicit per-context layouts.
    pub fn new(ack_standalone: FrameLayout, ssl_cleartext: FrameLayout) -> Self {
        Self { ack_standalone, ssl_cleartext }
    }

    /// Layout for `ctx`.
    pub fn layout(&self, ctx: FrameContext) -> &FrameLayout {
        match ctx {
            FrameContext::WriteAckStandalone => &self.ack_standalone,
            FrameContext::ReadSslCleartext => &self.ssl_cleartext,
        }
    }

    /// Reset `buf` for use in `ctx`.
    ///
    /// The buffer is cleared and its capacity reserved up front. Read
    /// contexts are additionally zero-extended to the payload size so the
    /// producer can write into `&mut buf[..]` directly; the caller truncates
    /// to the bytes actually produced.
    pub fn prepare(&self, ctx: FrameContext, buf: &mut BytesMut) {
        let layout = self.layout(ctx);
        buf.clear();
        buf.reserve(layout.capacity());
        if matches!(ctx, FrameContext::ReadSslCleartext) {
            buf.resize(layout.payload, 0);
        }
    }
}

impl Default for Frame {
    fn default() -> Self {
        Self {
            ack_standalone: FrameLayout { headroom: 64, payload: 256, tailroom: 16 },
            ssl_cleartext: FrameLayout { headroom: 0, payload: 4096, tailroom: 0 },
        }
    }
}
