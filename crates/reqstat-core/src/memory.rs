//! In-process recording transport.
//!
//! Keeps every emission in memory instead of sending it anywhere. Used by
//! tests and by embedders that want to inspect what the instrumentation
//! produced. A failing mode turns every call into a transport error.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::client::MetricsClient;
use crate::error::{ReqstatError, Result};
use crate::tag::TagSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricKind {
    Timing,
    Count,
    Gauge,
    Increment,
}

/// One recorded call.
#[derive(Debug, Clone, PartialEq)]
pub struct Emission {
    pub kind: MetricKind,
    pub name: String,
    pub value: f64,
    pub sample_rate: f64,
    /// `None` when the caller passed no tags argument.
    pub tags: Option<TagSet>,
}

#[derive(Default)]
pub struct MemoryClient {
    records: Mutex<Vec<Emission>>,
    failing: AtomicBool,
}

impl MemoryClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// A client whose every call fails with a transport error.
    pub fn failing() -> Self {
        let c = Self::default();
        c.set_failing(true);
        c
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::Relaxed);
    }

    /// Snapshot of everything recorded so far, in call order.
    pub fn records(&self) -> Vec<Emission> {
        self.lock().clone()
    }

    /// Recorded metric names, in call order.
    pub fn names(&self) -> Vec<String> {
        self.lock().iter().map(|e| e.name.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    // Records survive a panicking holder; the vec is always consistent.
    fn lock(&self) -> MutexGuard<'_, Vec<Emission>> {
        self.records.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn record(
        &self,
        kind: MetricKind,
        name: &str,
        value: f64,
        sample_rate: f64,
        tags: Option<&TagSet>,
    ) -> Result<()> {
        if self.failing.load(Ordering::Relaxed) {
            return Err(ReqstatError::Transport(format!("memory client refused {name}")));
        }
        self.lock().push(Emission {
            kind,
            name: name.to_string(),
            value,
            sample_rate,
            tags: tags.cloned(),
        });
        Ok(())
    }
}

impl MetricsClient for MemoryClient {
    fn timing(&self, name: &str, value: f64, sample_rate: f64, tags: Option<&TagSet>) -> Result<()> {
        self.record(MetricKind::Timing, name, value, sample_rate, tags)
    }

    fn count(&self, name: &str, value: i64, sample_rate: f64, tags: Option<&TagSet>) -> Result<()> {
        self.record(MetricKind::Count, name, value as f64, sample_rate, tags)
    }

    fn gauge(&self, name: &str, value: f64, sample_rate: f64, tags: Option<&TagSet>) -> Result<()> {
        self.record(MetricKind::Gauge, name, value, sample_rate, tags)
    }

    fn increment(&self, name: &str, value: i64, sample_rate: f64, tags: Option<&TagSet>) -> Result<()> {
        self.record(MetricKind::Increment, name, value as f64, sample_rate, tags)
    }
}
