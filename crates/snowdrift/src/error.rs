/// A result type defaulting to this crate's [`Error`].
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// All error variants that `snowdrift` can emit.
///
/// Every variant is terminal for the call that produced it. Generators never
/// retry internally and never mutate their state on an error path, so a later
/// call behaves as if the failed one never happened.
#[derive(Clone, Debug, PartialEq, Eq, Hash, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// A node identity field was negative or wider than its bit field.
    ///
    /// Raised only at construction. Retrying with the same arguments will
    /// fail again.
    #[error("invalid configuration: {field} must be in 0..={max}, got {value}")]
    InvalidConfiguration {
        /// Name of the rejected field (`partition_id` or `worker_id`).
        field: &'static str,
        /// The value supplied by the caller.
        value: i64,
        /// Largest value the field accepts.
        max: u64,
    },

    /// The clock reported a time earlier than the last issued ID.
    ///
    /// Issuing an ID now could repeat a timestamp/sequence pair that was
    /// already handed out, so the generator refuses. The caller decides
    /// whether to wait, alert or abort.
    #[error(
        "clock moved backwards: now {now} ms is before last timestamp {last_timestamp} ms"
    )]
    ClockRegression {
        /// Unix milliseconds of the most recently issued ID.
        last_timestamp: u64,
        /// Unix milliseconds just read from the clock.
        now: u64,
    },

    /// The clock reading cannot be encoded in the 41-bit timestamp field,
    /// either because it precedes the epoch or because the field has run out.
    #[error("timestamp {now} ms cannot be encoded relative to epoch {epoch} ms")]
    TimestampOutOfRange {
        /// Unix milliseconds just read from the clock.
        now: u64,
        /// Unix milliseconds of the generator's epoch.
        epoch: u64,
    },

    /// A string could not be parsed as a [`crate::SnowflakeId`].
    #[error("invalid snowflake id: {input:?}")]
    ParseId {
        /// The rejected input.
        input: String,
    },

    /// A raw value had the reserved top bit set, so it cannot be an ID.
    #[error("invalid snowflake id {raw:#x}: reserved bit 63 is set")]
    ReservedBitSet {
        /// The rejected raw value.
        raw: u64,
    },

    /// The generator's lock was poisoned by a thread that panicked while
    /// holding it.
    ///
    /// `parking_lot` mutexes do not poison, so this variant does not exist
    /// with the `parking-lot` feature.
    #[cfg_attr(docsrs, doc(cfg(not(feature = "parking-lot"))))]
    #[cfg(not(feature = "parking-lot"))]
    #[error("generator lock poisoned")]
    LockPoisoned,
}

#[cfg(not(feature = "parking-lot"))]
use crate::generator::{MutexGuard, PoisonError};
#[cfg(not(feature = "parking-lot"))]
impl<T> From<PoisonError<MutexGuard<'_, T>>> for Error {
    fn from(_: PoisonError<MutexGuard<'_, T>>) -> Self {
        Self::LockPoisoned
    }
}
