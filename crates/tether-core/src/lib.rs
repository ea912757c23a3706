//! Reliable-SSL-over-datagram protocol stack.
//!
//! This crate lets a TLS-like secure session run over a transport that may
//! drop, duplicate, or reorder packets (UDP, typically), while also carrying
//! a secondary stream of raw — sequenced but unencrypted — control packets.
//!
//! # Architecture: Sans-IO
//!
//! The engine is pure logic. It reads no clocks, owns no sockets, and knows
//! no wire format; everything protocol- or platform-specific is injected:
//!
//! ```text
//!      ┌─────────────────────────────┐
//!      │ tether-core                 │
//!      │ - reliability windows       │
//!      │ - stack orchestration       │
//!      │ - SSL adapter contract      │
//!      └─────────────────────────────┘
//!         ↓                       ↓
//! ┌──────────────────┐  ┌──────────────────┐
//! │ tether-harness   │  │ production host  │
//! │ - SimSsl         │  │ - real TLS       │
//! │ - test codec     │  │ - real framing   │
//! │ - fault inject   │  │ - sockets, timers│
//! └──────────────────┘  └──────────────────┘
//! ```
//!
//! # Key principles
//!
//! - No I/O in the core: the host's event loop calls [`stack::Stack`]
//!   operations and executes its `net_send`/`app_recv`/`raw_recv` hooks.
//! - Time is a parameter: operations that need the clock take an `Instant`,
//!   so tests freeze and advance time at will.
//! - Deterministic: identical inputs produce identical outputs, including
//!   the retransmission schedule.
//!
//! # Modules
//!
//! - [`stack`]: the engine and its hook contract
//! - [`reliable`]: send/recv windows and acknowledgement tracking
//! - [`ssl`]: the SSL engine adapter contract
//! - [`packet`]: the opaque packet carrier contract
//! - [`frame`]: buffer sizing descriptor
//! - [`error`]: the two-discipline error taxonomy
//! - [`stats`]: error statistics sink

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod error;
pub mod frame;
pub mod packet;
pub mod reliable;
pub mod ssl;
pub mod stack;
pub mod stats;
