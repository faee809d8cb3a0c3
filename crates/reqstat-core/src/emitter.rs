//! Default-tag injecting wrapper around a metrics transport.
//!
//! `TaggedEmitter` exposes the same four tag-aware operations as the client
//! it wraps and merges the process-wide default tags into each of them.
//! Every other capability of the wrapped client stays reachable through
//! `Deref`, so e.g. `emitter.flush()` calls the client's own `flush` and
//! never sees the default tags.

use std::borrow::Cow;
use std::ops::Deref;

use crate::client::MetricsClient;
use crate::error::Result;
use crate::tag::TagSet;

pub struct TaggedEmitter<C> {
    default_tags: TagSet,
    client: C,
}

impl<C: MetricsClient> TaggedEmitter<C> {
    pub fn new(client: C, default_tags: TagSet) -> Self {
        Self {
            default_tags,
            client,
        }
    }

    pub fn default_tags(&self) -> &TagSet {
        &self.default_tags
    }

    /// Supplied tags are unioned with the defaults; without supplied tags the
    /// defaults alone are sent, and with no defaults nothing is added.
    fn merge_tags<'a>(&'a self, tags: Option<&'a TagSet>) -> Option<Cow<'a, TagSet>> {
        match tags {
            Some(t) => Some(Cow::Owned(self.default_tags.union(t))),
            None if !self.default_tags.is_empty() => Some(Cow::Borrowed(&self.default_tags)),
            None => None,
        }
    }
}

impl<C: MetricsClient> MetricsClient for TaggedEmitter<C> {
    fn timing(&self, name: &str, value: f64, sample_rate: f64, tags: Option<&TagSet>) -> Result<()> {
        let tags = self.merge_tags(tags);
        self.client.timing(name, value, sample_rate, tags.as_deref())
    }

    fn count(&self, name: &str, value: i64, sample_rate: f64, tags: Option<&TagSet>) -> Result<()> {
        let tags = self.merge_tags(tags);
        self.client.count(name, value, sample_rate, tags.as_deref())
    }

    fn gauge(&self, name: &str, value: f64, sample_rate: f64, tags: Option<&TagSet>) -> Result<()> {
        let tags = self.merge_tags(tags);
        self.client.gauge(name, value, sample_rate, tags.as_deref())
    }

    fn increment(&self, name: &str, value: i64, sample_rate: f64, tags: Option<&TagSet>) -> Result<()> {
        let tags = self.merge_tags(tags);
        self.client.increment(name, value, sample_rate, tags.as_deref())
    }
}

impl<C> Deref for TaggedEmitter<C> {
    type Target = C;

    fn deref(&self) -> &C {
        &self.client
    }
}
