//! Dual-clock scope timer.
//!
//! A `ScopedTimer` records wall-clock and process CPU readings when it is
//! created and emits two timings when the scope ends:
//!
//! - `<name>`     : elapsed wall time (seconds)
//! - `<name>.cpu` : elapsed process CPU time (seconds)
//!
//! The scope ends either explicitly through [`ScopedTimer::finish`], which
//! hands back the measured [`Timing`], or implicitly when the guard is
//! dropped (early return, `?`, panic unwinding, future cancellation). Either
//! way the pair is emitted exactly once. Elapsed values only exist on
//! `Timing`, so they cannot be read before the scope has ended.

use std::time::{Duration, Instant};

use crate::client::{MetricsClient, DEFAULT_SAMPLE_RATE};
use crate::cpu::process_cpu_time;
use crate::error::Result;
use crate::tag::TagSet;

pub struct ScopedTimer<'a, C: MetricsClient + ?Sized> {
    emitter: &'a C,
    name: String,
    sample_rate: f64,
    /// Tags sent with both timings. Tags added mid-scope are included.
    pub tags: TagSet,
    start_wall: Instant,
    start_cpu: Duration,
    armed: bool,
}

/// Result of a finished scope.
#[derive(Debug, Clone)]
pub struct Timing {
    time: Duration,
    cpu_time: Duration,
    tags: TagSet,
}

impl Timing {
    /// Wall time spent inside the scope.
    pub fn time(&self) -> Duration {
        self.time
    }

    /// Process CPU time spent while the scope was open.
    pub fn cpu_time(&self) -> Duration {
        self.cpu_time
    }

    /// Tags as they were at scope exit.
    pub fn tags(&self) -> &TagSet {
        &self.tags
    }
}

impl<'a, C: MetricsClient + ?Sized> ScopedTimer<'a, C> {
    /// Start timing with sample rate 1 and no tags.
    pub fn start(emitter: &'a C, name: impl Into<String>) -> Self {
        Self::with_options(emitter, name, DEFAULT_SAMPLE_RATE, TagSet::new())
    }

    pub fn with_options(
        emitter: &'a C,
        name: impl Into<String>,
        sample_rate: f64,
        tags: TagSet,
    ) -> Self {
        Self {
            emitter,
            name: name.into(),
            sample_rate,
            tags,
            start_wall: Instant::now(),
            start_cpu: process_cpu_time(),
            armed: true,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// End the scope and emit both timings.
    ///
    /// The measurement is always returned; the second element carries the
    /// first transport error, if any. Both emissions are attempted even if
    /// the first one fails.
    pub fn finish(mut self) -> (Timing, Result<()>) {
        self.close()
    }

    fn close(&mut self) -> (Timing, Result<()>) {
        let end_wall = Instant::now();
        let end_cpu = process_cpu_time();
        self.armed = false;

        let timing = Timing {
            time: end_wall.saturating_duration_since(self.start_wall),
            cpu_time: end_cpu.saturating_sub(self.start_cpu),
            tags: std::mem::take(&mut self.tags),
        };

        let wall = self.emitter.timing(
            &self.name,
            timing.time.as_secs_f64(),
            self.sample_rate,
            Some(&timing.tags),
        );
        let cpu = self.emitter.timing(
            &format!("{}.cpu", self.name),
            timing.cpu_time.as_secs_f64(),
            self.sample_rate,
            Some(&timing.tags),
        );

        (timing, wall.and(cpu))
    }
}

impl<C: MetricsClient + ?Sized> Drop for ScopedTimer<'_, C> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        let (_, res) = self.close();
        if let Err(e) = res {
            tracing::warn!(metric = %self.name, error = %e, "timing emission failed on scope drop");
        }
    }
}
