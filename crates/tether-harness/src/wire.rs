//! Concrete wire codec and output capture for the harness.
//!
//! `TestWire` supplies the stack's protocol hooks with a deliberately small
//! framing:
//!
//! ```text
//! data packet:        [kind: u8][ack_count: u8][ack_id: u32 BE × count]
//!                     [seq_id: u32 BE][payload…]
//! standalone ack:     [kind = 2][ack_count: u8][ack_id: u32 BE × count]
//! ```
//!
//! `kind` 0 is SSL ciphertext, 1 is a raw control packet, 2 is a standalone
//! acknowledgement (which is unsequenced and consumes no window slot). Up to
//! [`MAX_PIGGYBACK_ACKS`] pending acknowledgements ride along on every data
//! packet.
//!
//! Everything the stack pushes outward — network packets, application
//! cleartext, raw deliveries, the invalidation signal — is captured in
//! public fields for test assertions.

use bytes::{BufMut, Bytes, BytesMut};
use tether_core::{
    error::WireError,
    packet::Packet,
    reliable::{AckTracker, RecvWindow, SendWindow, SequenceId},
    stack::StackIo,
};

use crate::packet::TestPacket;

const KIND_SSL: u8 = 0;
const KIND_RAW: u8 = 1;
const KIND_ACK: u8 = 2;

/// Maximum acknowledgements piggybacked on one data packet.
pub const MAX_PIGGYBACK_ACKS: usize = 4;
/// Maximum acknowledgements carried by one standalone ACK packet.
pub const MAX_STANDALONE_ACKS: usize = 8;

/// Wire codec plus captured stack output.
#[derive(Debug, Default)]
pub struct TestWire {
    /// Packets handed to the network, in emission order.
    pub outbox: Vec<TestPacket>,
    /// Cleartext delivered to the application, in delivery order.
    pub app_inbox: Vec<Bytes>,
    /// Raw packets delivered to the application, in delivery order.
    pub raw_inbox: Vec<TestPacket>,
    /// How many times the invalidation hook fired.
    pub invalidations: usize,
    /// When set, the next `encapsulate` fails with this message.
    pub fail_next_encapsulate: Option<String>,
}

impl TestWire {
    /// Empty codec with no captured output.
    pub fn new() -> Self {
        Self::default()
    }

    /// Drain and return everything queued for the network.
    pub fn take_outbox(&mut self) -> Vec<TestPacket> {
        std::mem::take(&mut self.outbox)
    }

    fn frame(
        kind: u8,
        id: Option<SequenceId>,
        payload: &[u8],
        acks: &[SequenceId],
    ) -> Bytes {
        let mut buf = BytesMut::with_capacity(2 + acks.len() * 4 + 4 + payload.len());
        buf.put_u8(kind);
        buf.put_u8(acks.len() as u8);
        for ack in acks {
            buf.put_u32(*ack);
        }
        if let Some(id) = id {
            buf.put_u32(id);
        }
        buf.extend_from_slice(payload);
        buf.freeze()
    }
}

impl StackIo<TestPacket> for TestWire {
    fn encapsulate(
        &mut self,
        id: SequenceId,
        pkt: &mut TestPacket,
        acks: &mut AckTracker,
    ) -> Result<(), WireError> {
        if let Some(msg) = self.fail_next_encapsulate.take() {
            return Err(WireError::Internal(msg));
        }
        let kind = if pkt.is_raw() { KIND_RAW } else { KIND_SSL };
        let piggyback = acks.drain(MAX_PIGGYBACK_ACKS);
        let framed = Self::frame(kind, Some(id), pkt.buffer(), &piggyback);
        pkt.set_buffer(framed);
        Ok(())
    }

    fn decapsulate(
        &mut self,
        pkt: &mut TestPacket,
        send: &mut SendWindow<TestPacket>,
        recv: &mut RecvWindow<TestPacket>,
        acks: &mut AckTracker,
    ) -> Result<bool, WireError> {
        let buf = pkt.buffer().clone();
        if buf.len() < 2 {
            return Err(WireError::Truncated { expected: 2, actual: buf.len() });
        }
        let kind = buf[0];
        if kind != KIND_SSL && kind != KIND_RAW && kind != KIND_ACK {
            return Err(WireError::UnknownKind(kind));
        }

        let ack_count = usize::from(buf[1]);
        let mut offset = 2;
        if buf.len() < offset + ack_count * 4 {
            return Err(WireError::BadAckBlock { count: ack_count, available: buf.len() - offset });
        }
        for _ in 0..ack_count {
            let id = u32::from_be_bytes(
                buf[offset..offset + 4].try_into().expect("bounds checked above"),
            );
            send.ack(id);
            offset += 4;
        }

        if kind == KIND_ACK {
            // Acknowledgements only; nothing enters the receive window.
            return Ok(false);
        }

        if buf.len() < offset + 4 {
            return Err(WireError::Truncated { expected: offset + 4, actual: buf.len() });
        }
        let id =
            u32::from_be_bytes(buf[offset..offset + 4].try_into().expect("bounds checked above"));
        offset += 4;
        let payload = buf.slice(offset..);

        // Record before the window check: a replayed id still owes the peer
        // an acknowledgement, or its sender retransmits forever.
        acks.record(id);

        let inner =
            if kind == KIND_RAW { TestPacket::raw(payload) } else { TestPacket::ssl(payload) };
        Ok(recv.accept(id, inner))
    }

    fn generate_ack(
        &mut self,
        pkt: &mut TestPacket,
        acks: &mut AckTracker,
    ) -> Result<(), WireError> {
        let drained = acks.drain(MAX_STANDALONE_ACKS);
        debug_assert!(!drained.is_empty(), "standalone ack requested with an empty tracker");
        pkt.set_buffer(Self::frame(KIND_ACK, None, &[], &drained));
        Ok(())
    }

    fn net_send(&mut self, pkt: &TestPacket) {
        self.outbox.push(pkt.clone());
    }

    fn app_recv(&mut self, cleartext: BytesMut) {
        self.app_inbox.push(cleartext.freeze());
    }

    fn raw_recv(&mut self, pkt: &mut TestPacket) {
        self.raw_inbox.push(std::mem::take(pkt));
    }

    fn invalidated(&mut self) {
        self.invalidations += 1;
    }
}
