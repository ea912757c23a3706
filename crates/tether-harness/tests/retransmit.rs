//! Loss recovery: retransmission timers, exactly-once delivery, and the
//! retransmit deadline observer.

use bytes::Bytes;
use tether_core::stack::StackConfig;
use tether_harness::Link;

#[test]
fn dropped_packet_is_retransmitted_and_delivered_once() {
    let mut link = Link::with_defaults();
    link.handshake();

    link.a.app_send(Bytes::from_static(b"hello"));
    link.a.flush(link.now).expect("flush");

    // The transport eats the first transmission.
    let lost = link.a.io_mut().take_outbox();
    assert_eq!(lost.len(), 1);
    drop(lost);
    assert!(link.b.io().app_inbox.is_empty());

    let interval = StackConfig::default().retransmit_interval;
    link.advance(interval);
    link.a.retransmit(link.now);
    link.deliver_a_to_b();
    assert_eq!(link.b.io().app_inbox, vec![Bytes::from_static(b"hello")]);

    // The ACK may be lost too; a further retransmission must not duplicate
    // delivery.
    link.advance(interval);
    link.a.retransmit(link.now);
    link.deliver_a_to_b();
    assert_eq!(link.b.io().app_inbox.len(), 1);

    // Once the acknowledgement arrives the send window drains and no
    // retransmission remains scheduled.
    link.b.send_pending_acks().expect("acks");
    link.deliver_b_to_a();
    link.a.flush(link.now).expect("flush");
    assert_eq!(link.a.next_retransmit(), None);
}

#[test]
fn acks_piggybacked_on_reverse_traffic_cancel_retransmission() {
    let mut link = Link::with_defaults();
    link.handshake();

    link.a.app_send(Bytes::from_static(b"ping"));
    link.a.flush(link.now).expect("flush");
    link.deliver_a_to_b();

    // The server replies with data; its acknowledgement rides along instead
    // of going out standalone.
    link.b.app_send(Bytes::from_static(b"pong"));
    link.b.flush(link.now).expect("flush");
    let reverse = link.b.io_mut().take_outbox();
    assert_eq!(reverse.len(), 1, "ack should piggyback on the data packet");
    for pkt in reverse {
        link.a.net_recv(pkt).expect("recv");
    }

    assert_eq!(link.a.io().app_inbox, vec![Bytes::from_static(b"pong")]);
    link.a.flush(link.now).expect("flush");
    assert_eq!(link.a.next_retransmit(), None);
}

#[test]
fn retransmit_deadline_tracks_the_oldest_in_flight_message() {
    let mut link = Link::with_defaults();
    link.handshake();
    let interval = StackConfig::default().retransmit_interval;

    assert_eq!(link.a.next_retransmit(), None);

    link.a.app_send(Bytes::from_static(b"timed"));
    link.a.flush(link.now).expect("flush");
    assert_eq!(link.a.next_retransmit(), Some(link.now + interval));

    // Before the deadline, retransmit is a no-op.
    let sent_before = link.a.io().outbox.len();
    link.a.retransmit(link.now);
    assert_eq!(link.a.io().outbox.len(), sent_before);
}
