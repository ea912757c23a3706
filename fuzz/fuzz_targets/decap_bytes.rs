//! Adversarial bytes through the receive path.
//!
//! Feeds arbitrary input to `net_recv` and checks the error-discipline
//! invariant: the session is invalidated exactly when a fatal error was
//! returned, and nothing panics. Malformed framing must stay transient;
//! only input that reaches the SSL engine as a structurally valid packet
//! may kill the session.

#![no_main]

use libfuzzer_sys::fuzz_target;
use tether_core::stack::StackConfig;
use tether_harness::{peer, Role, TestPacket};

fuzz_target!(|data: &[u8]| {
    let (mut stack, _stats) = peer(Role::Server, StackConfig::default());
    stack.start_handshake().expect("sim handshake start");

    let pkt = TestPacket::raw(data.to_vec());
    match stack.net_recv(pkt) {
        Ok(()) => assert!(!stack.invalidated(), "clean input must not invalidate"),
        Err(e) if e.is_fatal() => assert!(stack.invalidated(), "fatal error must invalidate"),
        Err(_) => assert!(!stack.invalidated(), "transient error must not invalidate"),
    }
});
