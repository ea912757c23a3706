//! Two-peer world for driving a pair of stacks against each other.
//!
//! A [`Link`] owns a client and a server stack, a virtual clock, and the
//! delivery helpers the test suites share. Time never comes from the system
//! after construction — tests advance it explicitly, which makes every
//! schedule (including retransmissions) reproducible.

use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use rand::{seq::SliceRandom, Rng};
use rand_chacha::ChaCha20Rng;
use tether_core::{
    frame::Frame,
    stack::{Stack, StackConfig},
    stats::CounterStats,
};

use crate::{
    packet::TestPacket,
    sim_ssl::{Role, SimSslContext},
    wire::TestWire,
};

/// A stack wired to the harness SSL engine and codec.
pub type TestStack = Stack<TestPacket, SimSslContext, TestWire>;

/// Build one peer stack for `role`, returning its stats counters alongside.
pub fn peer(role: Role, config: StackConfig) -> (TestStack, Arc<CounterStats>) {
    let stats = Arc::new(CounterStats::new());
    let stack =
        Stack::new(&SimSslContext::new(role), Frame::default(), TestWire::new(), stats.clone(), config)
            .expect("sim ssl sessions are infallible to create");
    (stack, stats)
}

/// Client/server pair plus a virtual clock.
pub struct Link {
    /// Client-side stack.
    pub a: TestStack,
    /// Server-side stack.
    pub b: TestStack,
    /// Client-side error counters.
    pub a_stats: Arc<CounterStats>,
    /// Server-side error counters.
    pub b_stats: Arc<CounterStats>,
    /// Current virtual time, advanced explicitly by tests.
    pub now: Instant,
}

impl Link {
    /// Build a pair with the same `config` on both sides.
    pub fn new(config: StackConfig) -> Self {
        let (a, a_stats) = peer(Role::Client, config.clone());
        let (b, b_stats) = peer(Role::Server, config);
        Self { a, b, a_stats, b_stats, now: Instant::now() }
    }

    /// Pair with default configuration.
    pub fn with_defaults() -> Self {
        Self::new(StackConfig::default())
    }

    /// Advance the virtual clock.
    pub fn advance(&mut self, by: Duration) {
        self.now += by;
    }

    /// Deliver everything the client queued for the wire into the server.
    /// Returns the number of packets moved.
    pub fn deliver_a_to_b(&mut self) -> usize {
        let pkts = self.a.io_mut().take_outbox();
        let n = pkts.len();
        for pkt in pkts {
            self.b.net_recv(pkt).expect("server rejected a well-formed packet");
        }
        n
    }

    /// Deliver everything the server queued for the wire into the client.
    /// Returns the number of packets moved.
    pub fn deliver_b_to_a(&mut self) -> usize {
        let pkts = self.b.io_mut().take_outbox();
        let n = pkts.len();
        for pkt in pkts {
            self.a.net_recv(pkt).expect("client rejected a well-formed packet");
        }
        n
    }

    /// Flush and shuttle full duplex until neither side emits traffic.
    pub fn shuttle_until_quiet(&mut self) {
        for _ in 0..64 {
            let now = self.now;
            self.a.flush(now).expect("client flush");
            self.b.flush(now).expect("server flush");
            if self.deliver_a_to_b() + self.deliver_b_to_a() == 0 {
                return;
            }
        }
        panic!("link did not settle; peers keep producing traffic");
    }

    /// Run the SSL handshake to completion on both peers.
    pub fn handshake(&mut self) {
        self.a.start_handshake().expect("client handshake start");
        self.b.start_handshake().expect("server handshake start");
        self.shuttle_until_quiet();
        assert!(self.a.ssl().is_established(), "client did not establish");
        assert!(self.b.ssl().is_established(), "server did not establish");
    }
}

/// Apply a seeded fault schedule to a batch of in-flight packets: every
/// packet may be dropped or duplicated, and the surviving batch is shuffled.
pub fn chaos_schedule(
    rng: &mut ChaCha20Rng,
    pkts: Vec<TestPacket>,
    drop_rate: f64,
    dup_rate: f64,
) -> Vec<TestPacket> {
    let mut out = Vec::with_capacity(pkts.len() * 2);
    for pkt in pkts {
        if rng.gen_bool(drop_rate) {
            continue;
        }
        if rng.gen_bool(dup_rate) {
            out.push(pkt.clone());
        }
        out.push(pkt);
    }
    out.shuffle(rng);
    out
}
