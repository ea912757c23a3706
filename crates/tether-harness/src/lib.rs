//! Deterministic simulation harness for the tether protocol stack.
//!
//! Everything here exists so the engine in `tether-core` can be driven end
//! to end without sockets, system clocks, or a real TLS library:
//!
//! - [`SimSsl`]: in-memory SSL engine with a two-record handshake and
//!   fault-injection switches
//! - [`TestWire`]: a concrete wire codec implementing the stack's hook
//!   contract, capturing all output for assertions
//! - [`TestPacket`]: the byte-buffer packet carrier
//! - [`Link`]: a client/server pair with a virtual clock and seeded chaos
//!   delivery
//!
//! The integration suites under `tests/` cover handshake, loss,
//! reordering, replay, acknowledgement bounds, failure injection, and
//! randomized chaos schedules.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod link;
pub mod packet;
pub mod sim_ssl;
pub mod wire;

pub use link::{chaos_schedule, peer, Link, TestStack};
pub use packet::TestPacket;
pub use sim_ssl::{Role, SimSsl, SimSslContext};
pub use wire::TestWire;
