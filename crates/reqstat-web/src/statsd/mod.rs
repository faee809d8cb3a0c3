//! DogStatsD UDP transport.
//!
//! One datagram per call, sent on a non-blocking socket: no batching, no
//! retry. A failed send is returned to the caller as
//! `ReqstatError::Transport`. Timings arrive in seconds and go out on the
//! wire in milliseconds.

use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr, ToSocketAddrs, UdpSocket};

use bytes::BytesMut;

use reqstat_core::error::{ReqstatError, Result};
use reqstat_core::{name, MetricsClient, TagSet};

mod formatter;
use formatter::{float_value, format_line, int_value, MetricType};

pub struct StatsdClient {
    socket: UdpSocket,
    peer: SocketAddr,
}

impl StatsdClient {
    /// Resolve `host:port` once and bind an ephemeral local socket of the
    /// same address family.
    pub fn connect(host: &str, port: u16) -> Result<Self> {
        let peer = (host, port)
            .to_socket_addrs()
            .map_err(|e| ReqstatError::BadConfig(format!("resolve statsd {host}:{port}: {e}")))?
            .next()
            .ok_or_else(|| {
                ReqstatError::BadConfig(format!("statsd host {host} has no addresses"))
            })?;

        let local: SocketAddr = if peer.is_ipv4() {
            (Ipv4Addr::UNSPECIFIED, 0).into()
        } else {
            (Ipv6Addr::UNSPECIFIED, 0).into()
        };
        let socket = UdpSocket::bind(local)?;
        socket.set_nonblocking(true)?;

        tracing::info!(%peer, "statsd client ready");
        Ok(Self { socket, peer })
    }

    pub fn peer_addr(&self) -> SocketAddr {
        self.peer
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.socket.local_addr()?)
    }

    pub fn decrement(&self, name: &str, value: i64, sample_rate: f64, tags: Option<&TagSet>) -> Result<()> {
        let v = int_value(value.saturating_neg());
        self.send(name, &v, MetricType::Count, sample_rate, tags)
    }

    pub fn histogram(&self, name: &str, value: f64, sample_rate: f64, tags: Option<&TagSet>) -> Result<()> {
        let v = float_value(value)?;
        self.send(name, &v, MetricType::Histogram, sample_rate, tags)
    }

    /// Count unique occurrences of `value`.
    pub fn set(&self, name: &str, value: &str, sample_rate: f64, tags: Option<&TagSet>) -> Result<()> {
        if value.contains(['|', ':', '\n']) {
            return Err(ReqstatError::Transport(format!("set value {value:?} is not sendable")));
        }
        self.send(name, value, MetricType::Set, sample_rate, tags)
    }

    fn send(
        &self,
        name: &str,
        value: &str,
        metric_type: MetricType,
        sample_rate: f64,
        tags: Option<&TagSet>,
    ) -> Result<()> {
        name::validate(name)?;
        if !sampled(sample_rate) {
            return Ok(());
        }

        let mut buf = BytesMut::with_capacity(128);
        format_line(&mut buf, name, value, metric_type, sample_rate, tags);
        self.socket.send_to(&buf, self.peer)?;
        Ok(())
    }
}

fn sampled(sample_rate: f64) -> bool {
    sample_rate >= 1.0 || rand::random::<f64>() < sample_rate
}

impl MetricsClient for StatsdClient {
    fn timing(&self, name: &str, value: f64, sample_rate: f64, tags: Option<&TagSet>) -> Result<()> {
        let v = float_value(value * 1000.0)?;
        self.send(name, &v, MetricType::Timing, sample_rate, tags)
    }

    fn count(&self, name: &str, value: i64, sample_rate: f64, tags: Option<&TagSet>) -> Result<()> {
        let v = int_value(value);
        self.send(name, &v, MetricType::Count, sample_rate, tags)
    }

    fn gauge(&self, name: &str, value: f64, sample_rate: f64, tags: Option<&TagSet>) -> Result<()> {
        let v = float_value(value)?;
        self.send(name, &v, MetricType::Gauge, sample_rate, tags)
    }

    fn increment(&self, name: &str, value: i64, sample_rate: f64, tags: Option<&TagSet>) -> Result<()> {
        self.count(name, value, sample_rate, tags)
    }
}
