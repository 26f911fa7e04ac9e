// timefn — monotonic iteration timing and the wall-clock seed source.

use std::time::{Instant, SystemTime, UNIX_EPOCH};

/// Nanosecond duration type.
pub type DurationNs = u64;

/// Opaque monotonic timestamp; only differences are meaningful.
#[derive(Clone, Copy, Debug)]
pub struct TimeT {
    pub(crate) t: Instant,
}

/// Returns the current monotonic timestamp.
pub fn get_time() -> TimeT {
    TimeT { t: Instant::now() }
}

/// Nanoseconds elapsed since `clock_start`.
pub fn clock_span_ns(clock_start: TimeT) -> DurationNs {
    clock_start.t.elapsed().as_nanos() as DurationNs
}

/// Seconds since the Unix epoch, for seeding the input generator.
///
/// A clock set before 1970 yields 0 rather than failing; any seed is valid.
pub fn seed_from_clock() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
