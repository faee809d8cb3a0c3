//! DogStatsD client over a real loopback socket.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::net::UdpSocket;
use std::time::Duration;

use reqstat_core::{MetricsClient, Tag, TagSet, TaggedEmitter};
use reqstat_web::statsd::StatsdClient;

fn receiver() -> (UdpSocket, u16) {
    let sock = UdpSocket::bind("127.0.0.1:0").unwrap();
    sock.set_read_timeout(Some(Duration::from_secs(2))).unwrap();
    let port = sock.local_addr().unwrap().port();
    (sock, port)
}

fn recv_line(sock: &UdpSocket) -> String {
    let mut buf = [0u8; 1024];
    let n = sock.recv(&mut buf).unwrap();
    String::from_utf8(buf[..n].to_vec()).unwrap()
}

#[test]
fn timing_goes_out_in_milliseconds_with_default_tags() {
    let (sock, port) = receiver();
    let client = StatsdClient::connect("127.0.0.1", port).unwrap();
    let defaults: TagSet = [Tag::parse("app:myapp").unwrap()].into_iter().collect();
    let emitter = TaggedEmitter::new(client, defaults);

    let extra: TagSet = [Tag::parse("http_method:GET").unwrap()].into_iter().collect();
    emitter.timing("myapp.test", 0.05, 1.0, Some(&extra)).unwrap();

    assert_eq!(recv_line(&sock), "myapp.test:50|ms|#app:myapp,http_method:GET");
}

#[test]
fn counters_and_passthrough_ops() {
    let (sock, port) = receiver();
    let client = StatsdClient::connect("127.0.0.1", port).unwrap();
    assert_eq!(client.peer_addr().port(), port);
    let emitter = TaggedEmitter::new(client, TagSet::new());

    emitter.increment("hits", 1, 1.0, None).unwrap();
    assert_eq!(recv_line(&sock), "hits:1|c");

    emitter.gauge("queue", 2.5, 1.0, None).unwrap();
    assert_eq!(recv_line(&sock), "queue:2.5|g");

    // not tag-aware: reaches the client through the wrapper untouched
    emitter.decrement("hits", 2, 1.0, None).unwrap();
    assert_eq!(recv_line(&sock), "hits:-2|c");

    emitter.set("users", "u42", 1.0, None).unwrap();
    assert_eq!(recv_line(&sock), "users:u42|s");
}

#[test]
fn histogram_and_socket_info_pass_through_without_default_tags() {
    let (sock, port) = receiver();
    let client = StatsdClient::connect("127.0.0.1", port).unwrap();
    let defaults: TagSet = [Tag::parse("app:myapp").unwrap()].into_iter().collect();
    let emitter = TaggedEmitter::new(client, defaults);

    let local = emitter.local_addr().unwrap();
    assert!(local.ip().is_unspecified());
    assert_ne!(local.port(), 0);

    emitter.histogram("payload.bytes", 512.0, 1.0, None).unwrap();
    let mut buf = [0u8; 1024];
    let (n, from) = sock.recv_from(&mut buf).unwrap();
    assert_eq!(&buf[..n], b"payload.bytes:512|h");
    assert_eq!(from.port(), local.port());
}

#[test]
fn invalid_names_are_not_sent() {
    let (_sock, port) = receiver();
    let client = StatsdClient::connect("127.0.0.1", port).unwrap();
    let err = client.count("bad name", 1, 1.0, None).unwrap_err();
    assert_eq!(err.code().as_str(), "INVALID_METRIC_NAME");
}
