//! SSL engine adapter contract.
//!
//! The stack treats the SSL implementation as a byte pump with four
//! directional streams: cleartext in/out on the application side, ciphertext
//! in/out on the network side. Feeding ciphertext drives the handshake and
//! produces cleartext; writing cleartext produces ciphertext records. The
//! adapter hides whether the engine operates in packet or stream mode — the
//! stack treats each [`SslSession::read_ciphertext`] result as one outgoing
//! record.
//!
//! # Implementations
//!
//! - Production: bindings to a real TLS library, one record per datagram.
//! - Simulation (`tether-harness::SimSsl`): a deterministic in-memory engine
//!   with a two-record handshake, used by every test suite.
//!
//! # Failure model
//!
//! `WouldBlock` values are flow control, not errors: the engine wants more
//! input (or more output drained) before it can make progress. Every `Err`
//! from a session method is fatal — the stack records an SSL error statistic,
//! invalidates itself, and never touches the session again.

use bytes::Bytes;

use crate::error::SslError;

/// Outcome of offering cleartext to the SSL engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SslWrite {
    /// The whole buffer was accepted. Partial writes do not occur.
    Consumed,
    /// The engine is backpressured; retry the same buffer later.
    WouldBlock,
}

/// Outcome of pulling decrypted cleartext out of the SSL engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SslRead {
    /// `n` bytes were written into the output buffer.
    Data(usize),
    /// Nothing is ready yet; retry after more ciphertext arrives.
    WouldBlock,
}

/// Factory for SSL sessions.
///
/// A context carries the long-lived configuration (role, credentials,
/// verification policy); each protocol session gets its own
/// [`SslContext::Session`] from it.
pub trait SslContext {
    /// Session type this context produces.
    type Session: SslSession;

    /// Create a fresh session ready for [`SslSession::start_handshake`].
    ///
    /// # Errors
    ///
    /// Returns [`SslError`] when the underlying engine cannot allocate a
    /// session (bad credentials, exhausted entropy, ...).
    fn new_session(&self) -> Result<Self::Session, SslError>;
}

/// One SSL session: an opaque byte-stream endpoint with a cleartext side and
/// a ciphertext side.
pub trait SslSession {
    /// Begin the handshake. Subsequent ciphertext writes drive it forward.
    ///
    /// # Errors
    ///
    /// Fatal engine failure.
    fn start_handshake(&mut self) -> Result<(), SslError>;

    /// Offer application cleartext for encryption.
    ///
    /// Whole-buffer semantics: the engine either consumes all of `data` or
    /// reports [`SslWrite::WouldBlock`] and consumes nothing.
    ///
    /// # Errors
    ///
    /// Fatal engine failure.
    fn write_cleartext(&mut self, data: &[u8]) -> Result<SslWrite, SslError>;

    /// Pull the next ciphertext record produced by the engine, or `None`
    /// when nothing is ready.
    fn read_ciphertext(&mut self) -> Option<Bytes>;

    /// Feed one ciphertext record received from the peer into the engine.
    ///
    /// # Errors
    ///
    /// Fatal engine failure (malformed record, handshake violation, MAC
    /// failure, ...).
    fn write_ciphertext(&mut self, record: Bytes) -> Result<(), SslError>;

    /// `true` when decrypted cleartext is waiting to be read.
    fn cleartext_ready(&self) -> bool;

    /// Read decrypted cleartext into `out`, returning how many bytes were
    /// produced, or [`SslRead::WouldBlock`] when the engine needs more
    /// ciphertext first.
    ///
    /// # Errors
    ///
    /// Fatal engine failure.
    fn read_cleartext(&mut self, out: &mut [u8]) -> Result<SslRead, SslError>;
}
