//! Wall vs CPU clock behaviour.
//!
//! CPU time is process-wide, so this file holds a single test to keep other
//! test threads from adding CPU work to the measurement.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::time::{Duration, Instant};

use reqstat_core::{MemoryClient, ScopedTimer};

#[test]
fn sleep_is_wall_time_and_spin_is_cpu_time() {
    let client = MemoryClient::new();

    // idle scope: ~50ms of wall time, next to no cpu
    let timer = ScopedTimer::start(&client, "idle");
    std::thread::sleep(Duration::from_millis(50));
    let (idle, _) = timer.finish();

    let wall = idle.time().as_secs_f64();
    let cpu = idle.cpu_time().as_secs_f64();
    assert!(wall >= 0.05, "wall={wall}");
    assert!(wall < 1.0, "wall={wall}");
    assert!(cpu < wall / 2.0, "cpu={cpu} wall={wall}");

    // busy scope: spin for ~100ms
    let timer = ScopedTimer::start(&client, "busy");
    let until = Instant::now() + Duration::from_millis(100);
    let mut x = 0u64;
    while Instant::now() < until {
        x = std::hint::black_box(x.wrapping_add(1));
    }
    let (busy, _) = timer.finish();

    assert!(busy.cpu_time() >= Duration::from_millis(20), "cpu={:?}", busy.cpu_time());
    assert_eq!(client.len(), 4);
}
