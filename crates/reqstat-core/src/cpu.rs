//! Process CPU clock (user + system time).

use std::time::Duration;

/// CPU time consumed by the whole process so far, user plus system.
///
/// The reading is process-wide: concurrent requests in the same process
/// see each other's work.
#[cfg(unix)]
pub fn process_cpu_time() -> Duration {
    let mut usage = std::mem::MaybeUninit::<libc::rusage>::zeroed();
    let r = unsafe { libc::getrusage(libc::RUSAGE_SELF, usage.as_mut_ptr()) };
    if r != 0 {
        let e = std::io::Error::last_os_error();
        tracing::warn!(error = %e, "getrusage failed, reporting zero cpu time");
        return Duration::ZERO;
    }
    let usage = unsafe { usage.assume_init() };
    timeval_to_duration(usage.ru_utime) + timeval_to_duration(usage.ru_stime)
}

/// No process CPU clock off unix: every reading is zero, so `.cpu`
/// timings are always 0. Warned about once.
#[cfg(not(unix))]
pub fn process_cpu_time() -> Duration {
    static WARNED: std::sync::Once = std::sync::Once::new();
    WARNED.call_once(|| {
        tracing::warn!("process cpu time is not available on this platform, reporting zero");
    });
    Duration::ZERO
}

#[cfg(unix)]
fn timeval_to_duration(tv: libc::timeval) -> Duration {
    let secs = u64::try_from(tv.tv_sec).unwrap_or(0);
    let micros = u32::try_from(tv.tv_usec).unwrap_or(0);
    Duration::from_secs(secs) + Duration::from_micros(u64::from(micros))
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[test]
    fn clock_is_monotonic() {
        let a = process_cpu_time();
        let mut x = 0u64;
        for i in 0..1_000_000u64 {
            x = x.wrapping_add(i * i);
        }
        std::hint::black_box(x);
        let b = process_cpu_time();
        assert!(b >= a);
    }
}
