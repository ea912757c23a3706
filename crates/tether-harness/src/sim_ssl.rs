//! Deterministic in-memory SSL engine.
//!
//! `SimSsl` simulates the semantics the stack depends on — a handshake
//! driven by ciphertext exchange, backpressure before establishment, one
//! record per outgoing packet — without any real cryptography, the same way
//! the harness simulates transports instead of shipping a real one.
//!
//! Record format on the ciphertext side: `[type: u8][len: u16 BE][body]`.
//! The handshake is a two-record exchange (`ClientHello` → `ServerHello`);
//! data bodies are XOR-masked with a fixed keystream byte so ciphertext
//! visibly differs from cleartext and accidental plaintext passthrough shows
//! up in tests.

use std::collections::VecDeque;

use bytes::{BufMut, Bytes, BytesMut};
use tether_core::{
    error::SslError,
    ssl::{SslContext, SslRead, SslSession, SslWrite},
};

/// Which side of the handshake a session plays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// Initiates the handshake on `start_handshake`.
    Client,
    /// Waits for the client's first record.
    Server,
}

const REC_CLIENT_HELLO: u8 = 1;
const REC_SERVER_HELLO: u8 = 2;
const REC_DATA: u8 = 3;

const HELLO_BODY: &[u8] = b"tether-sim-hs";

/// Keystream byte for the toy record masking.
const MASK: u8 = 0x5c;

/// Deterministic SSL session for tests.
pub struct SimSsl {
    role: Role,
    started: bool,
    established: bool,
    ciphertext_out: VecDeque<Bytes>,
    cleartext_in: VecDeque<Bytes>,
    /// Fail the next `write_cleartext` call with a fatal record error.
    pub fail_next_write_cleartext: bool,
    /// Fail the next `read_cleartext` call with a fatal record error.
    pub fail_next_read_cleartext: bool,
}

impl SimSsl {
    fn new(role: Role) -> Self {
        Self {
            role,
            started: false,
            established: false,
            ciphertext_out: VecDeque::new(),
            cleartext_in: VecDeque::new(),
            fail_next_write_cleartext: false,
            fail_next_read_cleartext: false,
        }
    }

    /// `true` once the handshake completed on this side.
    pub fn is_established(&self) -> bool {
        self.established
    }

    fn record(kind: u8, body: &[u8]) -> Bytes {
        let mut rec = BytesMut::with_capacity(3 + body.len());
        rec.put_u8(kind);
        rec.put_u16(body.len() as u16);
        rec.extend_from_slice(body);
        rec.freeze()
    }

    fn masked(body: &[u8]) -> Vec<u8> {
        body.iter().map(|b| b ^ MASK).collect()
    }
}

impl SslSession for SimSsl {
    fn start_handshake(&mut self) -> Result<(), SslError> {
        if self.started {
            return Ok(());
        }
        self.started = true;
        if self.role == Role::Client {
            self.ciphertext_out.push_back(Self::record(REC_CLIENT_HELLO, HELLO_BODY));
        }
        Ok(())
    }

    fn write_cleartext(&mut self, data: &[u8]) -> Result<SslWrite, SslError> {
        if self.fail_next_write_cleartext {
            self.fail_next_write_cleartext = false;
            return Err(SslError::Record("injected cleartext write failure".into()));
        }
        if !self.established {
            return Ok(SslWrite::WouldBlock);
        }
        if data.len() > usize::from(u16::MAX) {
            return Err(SslError::Record(format!("record body too large: {} bytes", data.len())));
        }
        let masked = Self::masked(data);
        self.ciphertext_out.push_back(Self::record(REC_DATA, &masked));
        Ok(SslWrite::Consumed)
    }

    fn read_ciphertext(&mut self) -> Option<Bytes> {
        self.ciphertext_out.pop_front()
    }

    fn write_ciphertext(&mut self, record: Bytes) -> Result<(), SslError> {
        if record.len() < 3 {
            return Err(SslError::Record(format!("record too short: {} bytes", record.len())));
        }
        let kind = record[0];
        let len = usize::from(u16::from_be_bytes([record[1], record[2]]));
        if record.len() != 3 + len {
            return Err(SslError::Record(format!(
                "record length mismatch: header claims {len}, body is {}",
                record.len() - 3
            )));
        }
        let body = &record[3..];
        match (kind, self.role) {
            (REC_CLIENT_HELLO, Role::Server) => {
                if self.established {
                    return Err(SslError::Handshake("renegotiation is not supported".into()));
                }
                self.ciphertext_out.push_back(Self::record(REC_SERVER_HELLO, HELLO_BODY));
                self.established = true;
                Ok(())
            },
            (REC_SERVER_HELLO, Role::Client) => {
                self.established = true;
                Ok(())
            },
            (REC_DATA, _) if self.established => {
                self.cleartext_in.push_back(Bytes::from(Self::masked(body)));
                Ok(())
            },
            (REC_DATA, _) => {
                Err(SslError::Handshake("data record before handshake completion".into()))
            },
            _ => Err(SslError::Record(format!(
                "unexpected record kind {kind:#04x} for {:?}",
                self.role
            ))),
        }
    }

    fn cleartext_ready(&self) -> bool {
        !self.cleartext_in.is_empty()
    }

    fn read_cleartext(&mut self, out: &mut [u8]) -> Result<SslRead, SslError> {
        if self.fail_next_read_cleartext {
            self.fail_next_read_cleartext = false;
            return Err(SslError::Record("injected cleartext read failure".into()));
        }
        let Some(mut rec) = self.cleartext_in.pop_front() else {
            return Ok(SslRead::WouldBlock);
        };
        let n = rec.len().min(out.len());
        out[..n].copy_from_slice(&rec[..n]);
        if n < rec.len() {
            // Stream semantics: the remainder waits for the next read.
            self.cleartext_in.push_front(rec.split_off(n));
        }
        Ok(SslRead::Data(n))
    }
}

/// Factory producing [`SimSsl`] sessions for one role.
#[derive(Debug, Clone, Copy)]
pub struct SimSslContext {
    role: Role,
}

impl SimSslContext {
    /// Context for `role`.
    pub fn new(role: Role) -> Self {
        Self { role }
    }

    /// Client-side context.
    pub fn client() -> Self {
        Self::new(Role::Client)
    }

    /// Server-side context.
    pub fn server() -> Self {
        Self::new(Role::Server)
    }
}

impl SslContext for SimSslContext {
    type Session = SimSsl;

    fn new_session(&self) -> Result<SimSsl, SslError> {
        Ok(SimSsl::new(self.role))
    }
}
