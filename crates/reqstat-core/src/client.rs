//! Metrics transport contract.
//!
//! Anything that can ship a metric (a statsd socket, an in-memory recorder,
//! the default-tag injecting wrapper) implements `MetricsClient`. Emission is
//! fire-and-forget: one call, one downstream send, no buffering or retry.

use std::sync::Arc;

use crate::error::Result;
use crate::tag::TagSet;

/// Sample rate used when the caller has no opinion.
pub const DEFAULT_SAMPLE_RATE: f64 = 1.0;

/// The four tag-aware operations every transport exposes.
///
/// `tags: None` means "no tags argument"; `Some(empty)` is forwarded as-is.
/// Timing values are seconds.
pub trait MetricsClient: Send + Sync {
    fn timing(&self, name: &str, value: f64, sample_rate: f64, tags: Option<&TagSet>) -> Result<()>;

    fn count(&self, name: &str, value: i64, sample_rate: f64, tags: Option<&TagSet>) -> Result<()>;

    fn gauge(&self, name: &str, value: f64, sample_rate: f64, tags: Option<&TagSet>) -> Result<()>;

    fn increment(&self, name: &str, value: i64, sample_rate: f64, tags: Option<&TagSet>) -> Result<()>;
}

impl<C: MetricsClient + ?Sized> MetricsClient for Arc<C> {
    fn timing(&self, name: &str, value: f64, sample_rate: f64, tags: Option<&TagSet>) -> Result<()> {
        (**self).timing(name, value, sample_rate, tags)
    }

    fn count(&self, name: &str, value: i64, sample_rate: f64, tags: Option<&TagSet>) -> Result<()> {
        (**self).count(name, value, sample_rate, tags)
    }

    fn gauge(&self, name: &str, value: f64, sample_rate: f64, tags: Option<&TagSet>) -> Result<()> {
        (**self).gauge(name, value, sample_rate, tags)
    }

    fn increment(&self, name: &str, value: i64, sample_rate: f64, tags: Option<&TagSet>) -> Result<()> {
        (**self).increment(name, value, sample_rate, tags)
    }
}

impl<C: MetricsClient + ?Sized> MetricsClient for Box<C> {
    fn timing(&self, name: &str, value: f64, sample_rate: f64, tags: Option<&TagSet>) -> Result<()> {
        (**self).timing(name, value, sample_rate, tags)
    }

    fn count(&self, name: &str, value: i64, sample_rate: f64, tags: Option<&TagSet>) -> Result<()> {
        (**self).count(name, value, sample_rate, tags)
    }

    fn gauge(&self, name: &str, value: f64, sample_rate: f64, tags: Option<&TagSet>) -> Result<()> {
        (**self).gauge(name, value, sample_rate, tags)
    }

    fn increment(&self, name: &str, value: i64, sample_rate: f64, tags: Option<&TagSet>) -> Result<()> {
        (**self).increment(name, value, sample_rate, tags)
    }
}
