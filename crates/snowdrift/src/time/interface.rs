use core::time::Duration;
use std::{rc::Rc, sync::Arc};

/// Default epoch: Monday, December 29, 2025 06:58:02 UTC
pub const DEFAULT_EPOCH: Duration = Duration::from_millis(1_766_991_482_000);

/// Twitter epoch: Thursday, November 4, 2010 1:42:54.657 UTC
pub const TWITTER_EPOCH: Duration = Duration::from_millis(1_288_834_974_657);

/// Standard UNIX epoch: Thursday, January 1, 1970 00:00:00 UTC
pub const UNIX_EPOCH_MILLIS: Duration = Duration::from_millis(0);

/// A source of wall-clock time in **milliseconds since the Unix epoch**.
///
/// Generators subtract their own epoch from this value, so a time source
/// never needs to know which epoch it is used with. Implement this trait to
/// plug in a mocked clock for tests.
///
/// # Example
///
/// ```
/// use snowdrift::TimeSource;
///
/// struct FixedTime;
/// impl TimeSource for FixedTime {
///     fn current_millis(&self) -> u64 {
///         1_800_000_000_000
///     }
/// }
///
/// assert_eq!(FixedTime.current_millis(), 1_800_000_000_000);
/// ```
pub trait TimeSource {
    /// Returns the current time in milliseconds since 1970-01-01 UTC.
    fn current_millis(&self) -> u64;
}

impl<T: TimeSource + ?Sized> TimeSource for &T {
    fn current_millis(&self) -> u64 {
        (**self).current_millis()
    }
}

impl<T: TimeSource + ?Sized> TimeSource for Arc<T> {
    fn current_millis(&self) -> u64 {
        (**self).current_millis()
    }
}

impl<T: TimeSource + ?Sized> TimeSource for Rc<T> {
    fn current_millis(&self) -> u64 {
        (**self).current_millis()
    }
}
