use std::{
    sync::Arc,
    time::{Instant, SystemTime, UNIX_EPOCH},
};

use crate::TimeSource;

#[derive(Debug)]
struct Anchor {
    start: Instant,
    unix_millis: u64,
}

/// A wall-clock-aligned time source that never goes backward.
///
/// The Unix time is sampled once at construction; every later reading is that
/// anchor plus the elapsed time of a monotonic [`Instant`]. NTP steps or
/// manual clock changes after construction are ignored, so generators driven
/// by this clock never see a clock regression. The trade-off is drift: the
/// reading slowly diverges from the system clock over long uptimes.
///
/// Clones share the same anchor and therefore agree on the time.
///
/// # Example
///
/// ```
/// use snowdrift::{MonotonicClock, TimeSource};
///
/// let clock = MonotonicClock::new();
/// let a = clock.current_millis();
/// std::thread::sleep(std::time::Duration::from_millis(2));
/// let b = clock.current_millis();
/// assert!(b >= a);
/// ```
#[derive(Clone, Debug)]
pub struct MonotonicClock {
    anchor: Arc<Anchor>,
}

impl MonotonicClock {
    /// Anchors a new clock to the current system time.
    pub fn new() -> Self {
        let start = Instant::now();
        let unix_millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |d| d.as_millis() as u64);
        Self {
            anchor: Arc::new(Anchor { start, unix_millis }),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeSource for MonotonicClock {
    fn current_millis(&self) -> u64 {
        self.anchor.unix_millis + self.anchor.start.elapsed().as_millis() as u64
    }
}
