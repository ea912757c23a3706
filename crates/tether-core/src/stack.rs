//! The protocol stack engine.
//!
//! [`Stack`] coordinates four independent event sources — network input,
//! application output, SSL handshake progress, and retransmission timers —
//! through one non-reentrant state machine:
//!
//! ```text
//!            app_send / raw_send              app_recv / raw_recv
//!                   │                                 ▲
//!                   ▼                                 │
//!             ┌──────────┐   cleartext   ┌────────────┴─┐
//!             │  queues  ├──────────────►│  SSL engine  │
//!             └────┬─────┘               └──────▲───────┘
//!                  │ raw                        │ ciphertext
//!                  ▼                            │
//!           ┌─────────────┐  encapsulate  ┌─────┴──────┐
//!           │ send window │◄──────────────┤ recv window│
//!           └──────┬──────┘   decapsulate └─────▲──────┘
//!                  │ net_send                   │ net_recv
//!                  ▼                            │
//!            ─────────────── datagram transport ───────────────
//! ```
//!
//! The engine is single-threaded and cooperative: nothing blocks, all hooks
//! run synchronously on the caller's stack, and the host event loop is
//! responsible for serializing calls and arming a timer for
//! [`Stack::next_retransmit`].
//!
//! Down direction: application cleartext runs through the SSL engine, each
//! resulting ciphertext record takes a slot (and a sequence id) in the send
//! window, is encapsulated by the outer protocol, and goes out via
//! `net_send`. Raw packets skip the SSL step but share the same sequence
//! space. Up direction: `decapsulate` absorbs peer ACKs and feeds the recv
//! window, which releases packets strictly in order — raw ones straight to
//! the application, ciphertext into the SSL engine, whose cleartext output
//! is delivered to `app_recv`.

use std::{
    collections::VecDeque,
    sync::Arc,
    time::{Duration, Instant},
};

use bytes::{Bytes, BytesMut};

use crate::{
    error::{SslError, StackError, WireError},
    frame::{Frame, FrameContext},
    packet::Packet,
    reliable::{AckTracker, RecvWindow, SendWindow, SequenceId},
    ssl::{SslContext, SslRead, SslSession, SslWrite},
    stats::{ErrorEvent, StatsSink},
};

/// Hook contract supplied by the outer protocol.
///
/// These are the only protocol-specific behaviors the engine needs; it never
/// interprets packet bytes itself. The four inward hooks define the wire
/// format, the outward pair delivers data to the application.
pub trait StackIo<P: Packet> {
    /// Wrap `pkt` with framing carrying sequence id `id`, piggybacking as
    /// many pending acknowledgements from `acks` as fit.
    ///
    /// # Errors
    ///
    /// Any error is fatal: the stack records an encapsulation statistic and
    /// invalidates the session.
    fn encapsulate(
        &mut self,
        id: SequenceId,
        pkt: &mut P,
        acks: &mut AckTracker,
    ) -> Result<(), WireError>;

    /// Verify and unwrap one received packet.
    ///
    /// Implementations must: check integrity, mark any acknowledged ids in
    /// `send`, record the packet's sequence id in `acks`, offer the payload
    /// to `recv`, and return whether it was accepted. Expected adversarial
    /// input — replays, duplicates — is not an error: return `Ok(false)`.
    ///
    /// # Errors
    ///
    /// Errors are per-packet and transient: they propagate to the caller of
    /// [`Stack::net_recv`] without invalidating the session.
    fn decapsulate(
        &mut self,
        pkt: &mut P,
        send: &mut SendWindow<P>,
        recv: &mut RecvWindow<P>,
        acks: &mut AckTracker,
    ) -> Result<bool, WireError>;

    /// Build a standalone ACK packet from `acks`, draining at least one
    /// pending id (as many as fit). `pkt` arrives freshly prepared.
    ///
    /// # Errors
    ///
    /// Same fatal semantics as [`StackIo::encapsulate`].
    fn generate_ack(&mut self, pkt: &mut P, acks: &mut AckTracker) -> Result<(), WireError>;

    /// Transmit an encapsulated packet to the peer. Implementations must not
    /// mutate or retain `pkt`'s buffer unless they copy it.
    fn net_send(&mut self, pkt: &P);

    /// Deliver decrypted application cleartext. The buffer is owned by the
    /// callee.
    fn app_recv(&mut self, cleartext: BytesMut);

    /// Deliver a raw sequenced packet. The callee may steal the buffer as
    /// long as it leaves `pkt` in a reusable (reset) state.
    fn raw_recv(&mut self, pkt: &mut P);

    /// Called once when the session transitions into the invalidated state.
    fn invalidated(&mut self) {}
}

/// Reliability tuning for one session.
#[derive(Debug, Clone)]
pub struct StackConfig {
    /// Maximum in-flight unacknowledged messages in each direction.
    pub span: usize,
    /// Maximum ids held back for acknowledgement before standalone ACK
    /// emission is forced.
    pub max_ack_list: usize,
    /// Per-message retransmission interval.
    pub retransmit_interval: Duration,
}

impl Default for StackConfig {
    fn default() -> Self {
        Self { span: 8, max_ack_list: 4, retransmit_interval: Duration::from_secs(2) }
    }
}

/// Reliable-SSL-over-datagram session engine.
///
/// Generic over the packet carrier `P`, the SSL implementation behind `C`,
/// and the outer protocol's hooks `Io`. All state lives in the instance;
/// invalidation is the single terminal state and is sticky — once entered,
/// every public operation becomes a no-op.
pub struct Stack<P, C, Io>
where
    P: Packet,
    C: SslContext,
    Io: StackIo<P>,
{
    ssl: C::Session,
    frame: Frame,
    io: Io,
    stats: Arc<dyn StatsSink>,
    rel_send: SendWindow<P>,
    rel_recv: RecvWindow<P>,
    xmit_acks: AckTracker,
    app_write_queue: VecDeque<Bytes>,
    raw_write_queue: VecDeque<P>,
    ack_send_buf: P,
    up_stack_depth: u32,
    ssl_started: bool,
    invalidated: bool,
    next_retransmit: Option<Instant>,
}

impl<P, C, Io> Stack<P, C, Io>
where
    P: Packet,
    C: SslContext,
    Io: StackIo<P>,
{
    /// Create a session: a fresh SSL session from `ctx`, empty windows, and
    /// no retransmission scheduled.
    ///
    /// # Errors
    ///
    /// Returns [`SslError`] when the SSL context cannot produce a session.
    pub fn new(
        ctx: &C,
        frame: Frame,
        io: Io,
        stats: Arc<dyn StatsSink>,
        config: StackConfig,
    ) -> Result<Self, SslError> {
        let ssl = ctx.new_session()?;
        Ok(Self {
            ssl,
            frame,
            io,
            stats,
            rel_send: SendWindow::new(config.span, config.retransmit_interval),
            rel_recv: RecvWindow::new(config.span),
            xmit_acks: AckTracker::new(config.max_ack_list),
            app_write_queue: VecDeque::new(),
            raw_write_queue: VecDeque::new(),
            ack_send_buf: P::default(),
            up_stack_depth: 0,
            ssl_started: false,
            invalidated: false,
            next_retransmit: None,
        })
    }

    /// Begin the SSL handshake. The handshake may immediately produce
    /// ciphertext, which a following [`Stack::flush`] sends.
    ///
    /// # Errors
    ///
    /// SSL failures are fatal and invalidate the session.
    pub fn start_handshake(&mut self) -> Result<(), StackError> {
        if self.invalidated {
            return Ok(());
        }
        if let Err(e) = self.ssl.start_handshake() {
            return Err(self.fail_ssl(e));
        }
        self.ssl_started = true;
        self.up_sequenced()
    }

    /// Push one packet received from the network up the stack, taking
    /// ownership of it.
    ///
    /// # Errors
    ///
    /// [`StackError::Packet`] for malformed or unverifiable input — the
    /// session stays usable. SSL failures triggered while draining the
    /// sequenced packets are fatal.
    pub fn net_recv(&mut self, mut pkt: P) -> Result<(), StackError> {
        if self.invalidated {
            return Ok(());
        }
        self.up_stack_depth += 1;
        let result = self.up_stack(&mut pkt);
        self.up_stack_depth -= 1;
        result?;

        // A full tracker with no outbound traffic to piggyback on would
        // stall the peer's send window; drain it now.
        if self.xmit_acks.is_full() {
            self.emit_standalone_acks()?;
        }
        Ok(())
    }

    /// Queue application cleartext for encryption and transmission on the
    /// next [`Stack::flush`].
    pub fn app_send(&mut self, buf: Bytes) {
        if !self.invalidated {
            self.app_write_queue.push_back(buf);
        }
    }

    /// Queue a raw packet: never encrypted, but still sequenced, encapsulated,
    /// and retransmitted like any other message.
    pub fn raw_send(&mut self, pkt: P) {
        if !self.invalidated {
            self.raw_write_queue.push_back(pkt);
        }
    }

    /// Drain pending output to the network and update the retransmission
    /// timer. Call as the final step after one or more `net_recv`,
    /// `app_send`, `raw_send`, or `start_handshake` calls.
    ///
    /// Raw packets drain before application data so control traffic is never
    /// head-of-line blocked behind cleartext the SSL engine has not yet
    /// accepted. A `flush` issued while the up path is active is deferred to
    /// the host's outer `flush`.
    ///
    /// # Errors
    ///
    /// SSL and encapsulation failures are fatal and invalidate the session.
    pub fn flush(&mut self, now: Instant) -> Result<(), StackError> {
        if self.invalidated || self.up_stack_depth > 0 {
            return Ok(());
        }
        self.down_stack_raw(now)?;
        self.down_stack_app(now)?;
        self.update_retransmit(now);
        Ok(())
    }

    /// Emit standalone ACK packets until every pending acknowledgement has
    /// been sent to the peer.
    ///
    /// # Errors
    ///
    /// ACK generation failures are fatal and invalidate the session.
    pub fn send_pending_acks(&mut self) -> Result<(), StackError> {
        if self.invalidated {
            return Ok(());
        }
        self.emit_standalone_acks()
    }

    /// Retransmit every in-flight message whose timer has expired, in id
    /// order, re-arming each timer. A no-op before the
    /// [`Stack::next_retransmit`] deadline.
    pub fn retransmit(&mut self, now: Instant) {
        if self.invalidated {
            return;
        }
        let Some(due) = self.next_retransmit else { return };
        if now < due {
            return;
        }
        for entry in self.rel_send.iter_mut() {
            if entry.ready_retransmit(now) {
                tracing::debug!(id = entry.id(), "retransmitting");
                self.io.net_send(&entry.packet);
                entry.reset_retransmit(now);
            }
        }
        self.update_retransmit(now);
    }

    /// Deadline for the next [`Stack::retransmit`] call, or `None` when
    /// nothing is outstanding or the session is invalidated.
    pub fn next_retransmit(&self) -> Option<Instant> {
        if self.invalidated {
            None
        } else {
            self.next_retransmit
        }
    }

    /// Has [`Stack::start_handshake`] been called?
    pub fn ssl_started(&self) -> bool {
        self.ssl_started
    }

    /// Has the session been invalidated?
    pub fn invalidated(&self) -> bool {
        self.invalidated
    }

    /// Invalidate the session. Sticky and idempotent; the
    /// [`StackIo::invalidated`] hook fires on the first call only.
    pub fn invalidate(&mut self) {
        if self.invalidated {
            return;
        }
        self.invalidated = true;
        tracing::warn!("session invalidated");
        self.io.invalidated();
    }

    /// The underlying SSL session.
    pub fn ssl(&self) -> &C::Session {
        &self.ssl
    }

    /// Mutable access to the underlying SSL session.
    pub fn ssl_mut(&mut self) -> &mut C::Session {
        &mut self.ssl
    }

    /// The outer protocol hooks.
    pub fn io(&self) -> &Io {
        &self.io
    }

    /// Mutable access to the outer protocol hooks.
    pub fn io_mut(&mut self) -> &mut Io {
        &mut self.io
    }

    fn fail_ssl(&mut self, err: SslError) -> StackError {
        self.stats.error(ErrorEvent::Ssl);
        self.invalidate();
        StackError::Ssl(err)
    }

    fn fail_encapsulation(&mut self, err: WireError) -> StackError {
        self.stats.error(ErrorEvent::Encapsulation);
        self.invalidate();
        StackError::Encapsulation(err)
    }

    // raw queue -> encapsulation -> send window -> network
    fn down_stack_raw(&mut self, now: Instant) -> Result<(), StackError> {
        while !self.raw_write_queue.is_empty() && self.rel_send.ready() {
            let pkt = self.raw_write_queue.pop_front().expect("queue checked non-empty");
            let entry = self.rel_send.send(now);
            entry.packet = pkt;
            let id = entry.id();
            if let Err(e) = self.io.encapsulate(id, &mut entry.packet, &mut self.xmit_acks) {
                return Err(self.fail_encapsulation(e));
            }
            self.io.net_send(&entry.packet);
        }
        Ok(())
    }

    // app queue -> SSL -> encapsulation -> send window -> network
    fn down_stack_app(&mut self, now: Instant) -> Result<(), StackError> {
        if !self.ssl_started {
            return Ok(());
        }

        // Push queued cleartext through the SSL engine. On backpressure the
        // buffer stays at the head of the queue for the next flush.
        while let Some(buf) = self.app_write_queue.front() {
            match self.ssl.write_cleartext(buf) {
                Ok(SslWrite::Consumed) => {
                    self.app_write_queue.pop_front();
                },
                Ok(SslWrite::WouldBlock) => break,
                Err(e) => return Err(self.fail_ssl(e)),
            }
        }

        // Ship whatever ciphertext the engine produced, while the window has
        // room for it.
        while self.rel_send.ready() {
            let Some(record) = self.ssl.read_ciphertext() else { break };
            let entry = self.rel_send.send(now);
            entry.packet = P::from_ciphertext(record);
            let id = entry.id();
            if let Err(e) = self.io.encapsulate(id, &mut entry.packet, &mut self.xmit_acks) {
                return Err(self.fail_encapsulation(e));
            }
            self.io.net_send(&entry.packet);
        }
        Ok(())
    }

    // network -> decapsulation -> recv window -> SSL -> app
    fn up_stack(&mut self, pkt: &mut P) -> Result<(), StackError> {
        let accepted = self
            .io
            .decapsulate(pkt, &mut self.rel_send, &mut self.rel_recv, &mut self.xmit_acks)
            .map_err(StackError::Packet)?;
        if accepted {
            self.up_sequenced()?;
        }
        Ok(())
    }

    // Move sequenced packets up the stack: raw ones to the application,
    // ciphertext into the SSL engine, then surface any cleartext produced.
    fn up_sequenced(&mut self) -> Result<(), StackError> {
        while self.rel_recv.ready() {
            let msg = self.rel_recv.next_sequenced();
            if msg.is_raw() {
                self.io.raw_recv(msg);
            } else if self.ssl_started {
                let record = msg.buffer().clone();
                if let Err(e) = self.ssl.write_ciphertext(record) {
                    return Err(self.fail_ssl(e));
                }
            } else {
                // Handshake not started: this and every later packet must
                // wait so delivery order holds.
                break;
            }
            self.rel_recv.advance();
        }

        if !self.ssl_started {
            return Ok(());
        }
        while self.ssl.cleartext_ready() {
            let mut to_app = BytesMut::new();
            self.frame.prepare(FrameContext::ReadSslCleartext, &mut to_app);
            match self.ssl.read_cleartext(&mut to_app) {
                Ok(SslRead::Data(size)) => {
                    to_app.truncate(size);
                    self.io.app_recv(to_app);
                },
                Ok(SslRead::WouldBlock) => break,
                Err(e) => return Err(self.fail_ssl(e)),
            }
        }
        Ok(())
    }

    fn emit_standalone_acks(&mut self) -> Result<(), StackError> {
        while !self.xmit_acks.is_empty() {
            self.ack_send_buf.prepare(&self.frame, FrameContext::WriteAckStandalone);
            if let Err(e) = self.io.generate_ack(&mut self.ack_send_buf, &mut self.xmit_acks) {
                return Err(self.fail_encapsulation(e));
            }
            self.io.net_send(&self.ack_send_buf);
        }
        Ok(())
    }

    fn update_retransmit(&mut self, now: Instant) {
        self.next_retransmit = self.rel_send.until_retransmit(now).map(|wait| now + wait);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::CounterStats;

    #[derive(Debug, Default, Clone, PartialEq, Eq)]
    struct StubPacket {
        buf: Bytes,
        raw: bool,
        defined: bool,
    }

    impl StubPacket {
        fn raw(payload: &[u8]) -> Self {
            Self { buf: Bytes::copy_from_slice(payload), raw: true, defined: true }
        }
    }

    impl Packet for StubPacket {
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
            self.reset();
        }
    }

    /// SSL stub that never produces traffic; the tests below exercise the
    /// raw path and the engine's state handling.
    struct StubSsl;

    impl SslSession for StubSsl {
        fn start_handshake(&mut self) -> Result<(), SslError> {
            Ok(())
        }
        fn write_cleartext(&mut self, _data: &[u8]) -> Result<SslWrite, SslError> {
            Ok(SslWrite::Consumed)
        }
        fn read_ciphertext(&mut self) -> Option<Bytes> {
            None
        }
        fn write_ciphertext(&mut self, _record: Bytes) -> Result<(), SslError> {
            Ok(())
        }
        fn cleartext_ready(&self) -> bool {
            false
        }
        fn read_cleartext(&mut self, _out: &mut [u8]) -> Result<SslRead, SslError> {
            Ok(SslRead::WouldBlock)
        }
    }

    struct StubCtx;

    impl SslContext for StubCtx {
        type Session = StubSsl;
        fn new_session(&self) -> Result<StubSsl, SslError> {
            Ok(StubSsl)
        }
    }

    /// Trivial codec: `[id: u8][payload...]`, raw payloads only.
    #[derive(Default)]
    struct LoopIo {
        sent: Vec<StubPacket>,
        raw_inbox: Vec<StubPacket>,
        invalidations: usize,
        fail_next_encapsulate: bool,
    }

    impl StackIo<StubPacket> for LoopIo {
        fn encapsulate(
            &mut self,
            id: SequenceId,
            pkt: &mut StubPacket,
            acks: &mut AckTracker,
        ) -> Result<(), WireError> {
            if self.fail_next_encapsulate {
                self.fail_next_encapsulate = false;
                return Err(WireError::Internal("injected".into()));
            }
            acks.drain(usize::MAX);
            let mut framed = vec![id as u8];
            framed.extend_from_slice(pkt.buffer());
            pkt.buf = Bytes::from(framed);
            Ok(())
        }

        fn decapsulate(
            &mut self,
            pkt: &mut StubPacket,
            _send: &mut SendWindow<StubPacket>,
            recv: &mut RecvWindow<StubPacket>,
            acks: &mut AckTracker,
        ) -> Result<bool, WireError> {
            let buf = pkt.buffer();
            if buf.is_empty() {
                return Err(WireError::Truncated { expected: 1, actual: 0 });
            }
            let id = SequenceId::from(buf[0]);
            acks.record(id);
            Ok(recv.accept(id, StubPacket::raw(&buf[1..])))
        }

        fn generate_ack(
            &mut self,
            pkt: &mut StubPacket,
            acks: &mut AckTracker,
        ) -> Result<(), WireError> {
            let ids = acks.drain(usize::MAX);
            pkt.buf = Bytes::from(ids.iter().map(|id| *id as u8).collect::<Vec<_>>());
            pkt.defined = true;
            Ok(())
        }

        fn net_send(&mut self, pkt: &StubPacket) {
            self.sent.push(pkt.clone());
        }

        fn app_recv(&mut self, _cleartext: BytesMut) {}

        fn raw_recv(&mut self, pkt: &mut StubPacket) {
            self.raw_inbox.push(std::mem::take(pkt));
        }

        fn invalidated(&mut self) {
            self.invalidations += 1;
        }
    }

    type StubStack = Stack<StubPacket, StubCtx, LoopIo>;

    fn stack() -> (StubStack, Arc<CounterStats>) {
        let stats = Arc::new(CounterStats::new());
        let stack = Stack::new(
            &StubCtx,
            Frame::default(),
            LoopIo::default(),
            stats.clone(),
            StackConfig::default(),
        )
        .expect("stub session");
        (stack, stats)
    }

    #[test]
    fn raw_flush_emits_and_arms_retransmit_timer() {
        let t0 = Instant::now();
        let (mut stack, _) = stack();
        assert_eq!(stack.next_retransmit(), None);

        stack.raw_send(StubPacket::raw(b"ping"));
        stack.flush(t0).expect("flush");

        assert_eq!(stack.io().sent.len(), 1);
        assert_eq!(stack.io().sent[0].buffer().as_ref(), b"\x00ping");
        let interval = StackConfig::default().retransmit_interval;
        assert_eq!(stack.next_retransmit(), Some(t0 + interval));
    }

    #[test]
    fn flush_is_suppressed_while_up_stack_is_active() {
        let t0 = Instant::now();
        let (mut stack, _) = stack();
        stack.raw_send(StubPacket::raw(b"ping"));

        stack.up_stack_depth = 1;
        stack.flush(t0).expect("flush");
        assert!(stack.io().sent.is_empty());

        stack.up_stack_depth = 0;
        stack.flush(t0).expect("flush");
        assert_eq!(stack.io().sent.len(), 1);
    }

    #[test]
    fn retransmit_honors_deadline_and_rearms() {
        let t0 = Instant::now();
        let interval = StackConfig::default().retransmit_interval;
        let (mut stack, _) = stack();

        stack.raw_send(StubPacket::raw(b"ping"));
        stack.flush(t0).expect("flush");
        assert_eq!(stack.io().sent.len(), 1);

        // Before the deadline nothing happens.
        stack.retransmit(t0 + interval / 2);
        assert_eq!(stack.io().sent.len(), 1);

        stack.retransmit(t0 + interval);
        assert_eq!(stack.io().sent.len(), 2);
        assert_eq!(stack.next_retransmit(), Some(t0 + interval * 2));
    }

    #[test]
    fn transient_decapsulation_error_leaves_session_usable() {
        let (mut stack, _) = stack();

        let err = stack.net_recv(StubPacket::default()).expect_err("empty packet");
        assert!(!err.is_fatal());
        assert!(!stack.invalidated());

        stack.net_recv(StubPacket::raw(b"\x00hello")).expect("valid packet");
        assert_eq!(stack.io().raw_inbox.len(), 1);
        assert_eq!(stack.io().raw_inbox[0].buffer().as_ref(), b"hello");
    }

    #[test]
    fn encapsulation_failure_is_fatal() {
        let t0 = Instant::now();
        let (mut stack, stats) = stack();
        stack.io_mut().fail_next_encapsulate = true;
        stack.raw_send(StubPacket::raw(b"ping"));

        let err = stack.flush(t0).expect_err("encapsulation must fail");
        assert!(err.is_fatal());
        assert!(stack.invalidated());
        assert_eq!(stats.encapsulation_errors(), 1);
        assert_eq!(stack.io().invalidations, 1);
    }

    #[test]
    fn invalidation_is_sticky_and_fires_callback_once() {
        let t0 = Instant::now();
        let (mut stack, _) = stack();

        stack.invalidate();
        stack.invalidate();
        assert_eq!(stack.io().invalidations, 1);
        assert!(stack.invalidated());
        assert_eq!(stack.next_retransmit(), None);

        // Every entry point is now a no-op.
        stack.raw_send(StubPacket::raw(b"ping"));
        stack.app_send(Bytes::from_static(b"data"));
        stack.flush(t0).expect("no-op flush");
        stack.net_recv(StubPacket::raw(b"\x00hi")).expect("no-op recv");
        stack.send_pending_acks().expect("no-op acks");
        assert!(stack.io().sent.is_empty());
        assert!(stack.io().raw_inbox.is_empty());
    }

    #[test]
    fn full_ack_tracker_forces_standalone_emission() {
        // Two distinct inbound ids with max_ack_list = 2 force a drain.
        let stats = Arc::new(CounterStats::new());
        let mut stack = Stack::new(
            &StubCtx,
            Frame::default(),
            LoopIo::default(),
            stats,
            StackConfig { max_ack_list: 2, ..StackConfig::default() },
        )
        .expect("stub session");

        stack.net_recv(StubPacket::raw(b"\x00a")).expect("first");
        assert!(stack.io().sent.is_empty());
        stack.net_recv(StubPacket::raw(b"\x01b")).expect("second");
        assert_eq!(stack.io().sent.len(), 1, "forced standalone ack");
        assert_eq!(stack.io().sent[0].buffer().as_ref(), &[0u8, 1][..]);

        // Nothing pending afterwards.
        stack.send_pending_acks().expect("acks");
        assert_eq!(stack.io().sent.len(), 1);
    }
}
