use core::time::Duration;

use crate::{IdGenStatus, NodeId, Result, SnowflakeId, TimeSource};

/// A minimal interface shared by the Snowflake generators.
pub trait SnowflakeGenerator<T: TimeSource> {
    /// Creates a generator for `node` that measures time from `epoch` using
    /// `time`.
    fn with_time(node: NodeId, epoch: Duration, time: T) -> Self
    where
        Self: Sized;

    /// Returns the node identity encoded into every ID.
    fn node(&self) -> NodeId;

    /// Returns the epoch, as a duration since the Unix epoch.
    fn epoch(&self) -> Duration;

    /// Generates the next ID, spinning briefly if the current millisecond's
    /// sequence is exhausted.
    ///
    /// # Errors
    ///
    /// Fails with [`crate::Error::ClockRegression`] if the clock went
    /// backwards, [`crate::Error::TimestampOutOfRange`] if the clock cannot be
    /// encoded, or `LockPoisoned` if a lock-based generator's mutex was
    /// poisoned.
    fn next_id(&self) -> Result<SnowflakeId>;

    /// Attempts to generate the next ID without blocking.
    ///
    /// # Errors
    ///
    /// Same as [`SnowflakeGenerator::next_id`].
    fn poll_id(&self) -> Result<IdGenStatus>;
}
