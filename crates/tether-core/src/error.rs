//! Error types for the protocol stack.
//!
//! The stack distinguishes two failure disciplines, and keeping them apart is
//! a hard requirement of the engine:
//!
//! - **Per-packet transient** ([`StackError::Packet`]): a single inbound
//!   datagram was malformed or failed its integrity check. The error reaches
//!   the caller of `net_recv` so it can count or log it, but the session
//!   stays fully usable.
//!
//! - **Fatal** ([`StackError::Ssl`], [`StackError::Encapsulation`]): the SSL
//!   engine or the outbound framing failed. The session is invalidated before
//!   the error is returned and performs no further I/O.
//!
//! [`StackError::is_fatal`] is the classifier driver code should branch on.

use thiserror::Error;

/// Errors raised by the wire codec while framing or parsing packets.
///
/// Whether a `WireError` is fatal depends on the direction it came from:
/// decapsulation errors are transient, encapsulation errors kill the session.
/// The [`StackError`] wrapper records that distinction.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WireError {
    /// Packet is shorter than its framing requires.
    #[error("truncated packet: expected at least {expected} bytes, got {actual}")]
    Truncated {
        /// Minimum length the framing calls for.
        expected: usize,
        /// Length actually available.
        actual: usize,
    },

    /// Leading kind byte does not name a known packet kind.
    #[error("unknown packet kind {0:#04x}")]
    UnknownKind(u8),

    /// ACK block claims more entries than the packet carries.
    #[error("bad ack block: {count} acks claimed, {available} bytes available")]
    BadAckBlock {
        /// Number of ACK entries the header claims.
        count: usize,
        /// Bytes remaining after the header.
        available: usize,
    },

    /// Codec-internal failure while building a packet.
    #[error("codec failure: {0}")]
    Internal(String),
}

/// Errors surfaced by an SSL engine behind the [`crate::ssl::SslSession`]
/// adapter. Every one of these is fatal to the session.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SslError {
    /// The handshake could not start or was violated by the peer.
    #[error("handshake failure: {0}")]
    Handshake(String),

    /// A ciphertext or cleartext record could not be processed.
    #[error("record failure: {0}")]
    Record(String),
}

/// Top-level error returned by the stack's public operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StackError {
    /// A single inbound packet was rejected. The session remains usable.
    #[error("packet rejected: {0}")]
    Packet(#[source] WireError),

    /// The SSL engine failed. The session has been invalidated.
    #[error("ssl session failure: {0}")]
    Ssl(#[from] SslError),

    /// Outbound framing failed. The session has been invalidated.
    #[error("encapsulation failure: {0}")]
    Encapsulation(#[source] WireError),
}

impl StackError {
    /// Returns `true` when this error terminated the session.
    ///
    /// Fatal errors leave the stack invalidated: every later operation is a
    /// no-op. Non-fatal errors are per-packet and can simply be counted.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, StackError::Packet(_))
    }
}
