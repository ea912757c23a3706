//! Reordering, replay, and cross-stream sequencing.

use bytes::Bytes;
use proptest::prelude::*;
use tether_core::packet::Packet;
use tether_harness::{Link, TestPacket};

#[test]
fn reordered_packets_deliver_in_original_order() {
    let mut link = Link::with_defaults();
    link.handshake();

    for msg in ["m1", "m2", "m3"] {
        link.a.app_send(Bytes::copy_from_slice(msg.as_bytes()));
    }
    link.a.flush(link.now).expect("flush");
    let mut pkts = link.a.io_mut().take_outbox();
    assert_eq!(pkts.len(), 3);

    // Deliver p2, p3, p1.
    let p1 = pkts.remove(0);
    for pkt in pkts {
        link.b.net_recv(pkt).expect("recv");
    }
    assert!(link.b.io().app_inbox.is_empty(), "nothing may surface before the gap fills");

    link.b.net_recv(p1).expect("recv");
    let expected: Vec<Bytes> =
        ["m1", "m2", "m3"].iter().map(|m| Bytes::copy_from_slice(m.as_bytes())).collect();
    assert_eq!(link.b.io().app_inbox, expected);
}

#[test]
fn replayed_packet_is_dropped_silently() {
    let mut link = Link::with_defaults();
    link.handshake();

    link.a.app_send(Bytes::from_static(b"once"));
    link.a.flush(link.now).expect("flush");
    let pkts = link.a.io_mut().take_outbox();
    assert_eq!(pkts.len(), 1);

    link.b.net_recv(pkts[0].clone()).expect("first copy");
    // The replay is not an error, just a drop.
    link.b.net_recv(pkts[0].clone()).expect("replayed copy");

    assert_eq!(link.b.io().app_inbox, vec![Bytes::from_static(b"once")]);
    assert!(!link.b.invalidated());
}

#[test]
fn raw_and_ssl_streams_share_one_sequence_space() {
    let mut link = Link::with_defaults();
    link.handshake();

    // Within one flush the raw queue drains first, so the control packets
    // take the lower sequence ids regardless of submission order.
    link.a.raw_send(TestPacket::raw(&b"ctl-1"[..]));
    link.a.app_send(Bytes::from_static(b"data"));
    link.a.raw_send(TestPacket::raw(&b"ctl-2"[..]));
    link.a.flush(link.now).expect("flush");
    link.deliver_a_to_b();

    let raw: Vec<&[u8]> = link.b.io().raw_inbox.iter().map(|p| p.buffer().as_ref()).collect();
    assert_eq!(raw, vec![&b"ctl-1"[..], &b"ctl-2"[..]]);
    assert_eq!(link.b.io().app_inbox, vec![Bytes::from_static(b"data")]);
}

#[test]
fn raw_packet_behind_a_gap_waits_for_order() {
    let mut link = Link::with_defaults();
    link.handshake();

    link.a.app_send(Bytes::from_static(b"first"));
    link.a.flush(link.now).expect("flush");
    let data_pkt = link.a.io_mut().take_outbox().remove(0);

    link.a.raw_send(TestPacket::raw(&b"ctl"[..]));
    link.a.flush(link.now).expect("flush");
    let raw_pkt = link.a.io_mut().take_outbox().remove(0);

    // The raw packet arrives ahead of the data packet it was sequenced
    // after: it must wait in the window, not jump the queue.
    link.b.net_recv(raw_pkt).expect("recv");
    assert!(link.b.io().raw_inbox.is_empty());

    link.b.net_recv(data_pkt).expect("recv");
    assert_eq!(link.b.io().app_inbox, vec![Bytes::from_static(b"first")]);
    assert_eq!(link.b.io().raw_inbox.len(), 1);
}

fn delivery_order() -> impl Strategy<Value = Vec<usize>> {
    Just((0..5).collect::<Vec<_>>()).prop_shuffle()
}

proptest! {
    #[test]
    fn any_permutation_within_the_window_delivers_in_order(order in delivery_order()) {
        let mut link = Link::with_defaults();
        link.handshake();

        let msgs: Vec<Bytes> = (0..5).map(|i| Bytes::from(format!("msg-{i}"))).collect();
        for m in &msgs {
            link.a.app_send(m.clone());
        }
        link.a.flush(link.now).expect("flush");
        let pkts = link.a.io_mut().take_outbox();
        prop_assert_eq!(pkts.len(), 5);

        for &i in &order {
            link.b.net_recv(pkts[i].clone()).expect("recv");
        }
        prop_assert_eq!(&link.b.io().app_inbox, &msgs);
    }

    #[test]
    fn duplicated_and_permuted_delivery_is_exactly_once(
        order in delivery_order(),
        dup in 0usize..5,
    ) {
        let mut link = Link::with_defaults();
        link.handshake();

        let msgs: Vec<Bytes> = (0..5).map(|i| Bytes::from(format!("msg-{i}"))).collect();
        for m in &msgs {
            link.a.app_send(m.clone());
        }
        link.a.flush(link.now).expect("flush");
        let pkts = link.a.io_mut().take_outbox();

        for &i in &order {
            link.b.net_recv(pkts[i].clone()).expect("recv");
            if i == dup {
                link.b.net_recv(pkts[i].clone()).expect("duplicate");
            }
        }
        prop_assert_eq!(&link.b.io().app_inbox, &msgs);
    }
}
