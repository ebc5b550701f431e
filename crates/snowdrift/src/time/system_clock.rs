use std::time::{SystemTime, UNIX_EPOCH};

use crate::TimeSource;

/// The operating system's wall clock.
///
/// This is the clock [`crate::IdGenerator::new`] uses. It follows every
/// adjustment made to the system time, including backward steps, which the
/// generators report as [`crate::Error::ClockRegression`]. Use
/// [`crate::MonotonicClock`] if backward steps must never surface.
#[derive(Copy, Clone, Debug, Default)]
pub struct SystemClock;

impl TimeSource for SystemClock {
    fn current_millis(&self) -> u64 {
        // A system clock set before 1970 reads as 0, which every generator
        // rejects as out of range.
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |d| d.as_millis() as u64)
    }
}
