use core::time::Duration;

use portable_atomic::{AtomicU64, Ordering};
#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::{
    IdGenStatus, NodeId, Result, SnowflakeGenerator, SnowflakeId, SystemClock, TimeSource,
    generator::{Sequencer, Tick},
};

/// Raw state before the first ID. Generated IDs never set bit 63.
const NO_ID: u64 = u64::MAX;

/// A lock-free Snowflake ID generator suitable for multi-threaded
/// environments.
///
/// The last issued ID is packed into an [`AtomicU64`] and advanced with a
/// compare-and-swap loop. A caller that loses the race simply retries against
/// the newer state, so the IDs handed out still form one total order. When a
/// millisecond's sequence is exhausted, callers spin on the clock without
/// touching the state and retry once it has moved on.
///
/// ## Features
/// - ✅ Thread-safe
/// - ❌ Fair access across threads
/// - ✅ Detects clock regressions
///
/// ## Recommended When
/// - Throughput under contention matters more than fairness
///
/// ## See Also
/// - [`IdGenerator`]
///
/// [`IdGenerator`]: crate::IdGenerator
pub struct AtomicIdGenerator<T = SystemClock>
where
    T: TimeSource,
{
    #[cfg(feature = "cache-padded")]
    state: crossbeam_utils::CachePadded<AtomicU64>,
    #[cfg(not(feature = "cache-padded"))]
    state: AtomicU64,
    sequencer: Sequencer,
    time: T,
}

impl AtomicIdGenerator<SystemClock> {
    /// Creates a generator for the given partition and worker, reading the
    /// system wall clock and measuring time from [`crate::DEFAULT_EPOCH`].
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidConfiguration`] if either id is negative
    /// or greater than 31.
    pub fn new(partition_id: i64, worker_id: i64) -> Result<Self> {
        let node = NodeId::new(partition_id, worker_id)?;
        Ok(Self::with_time(node, crate::DEFAULT_EPOCH, SystemClock))
    }
}

impl<T> AtomicIdGenerator<T>
where
    T: TimeSource,
{
    /// Creates a generator from a validated node identity, an epoch and any
    /// [`TimeSource`].
    ///
    /// # Example
    /// ```
    /// use snowdrift::{AtomicIdGenerator, MonotonicClock, NodeId, DEFAULT_EPOCH};
    ///
    /// let clock = MonotonicClock::new();
    /// let generator = AtomicIdGenerator::with_time(NodeId::default(), DEFAULT_EPOCH, clock);
    /// let a = generator.next_id().unwrap();
    /// let b = generator.next_id().unwrap();
    /// assert!(a < b);
    /// ```
    pub fn with_time(node: NodeId, epoch: Duration, time: T) -> Self {
        Self {
            #[cfg(feature = "cache-padded")]
            state: crossbeam_utils::CachePadded::new(AtomicU64::new(NO_ID)),
            #[cfg(not(feature = "cache-padded"))]
            state: AtomicU64::new(NO_ID),
            sequencer: Sequencer::new(node, epoch),
            time,
        }
    }

    /// Returns the node identity encoded into every ID.
    pub fn node(&self) -> NodeId {
        self.sequencer.node()
    }

    /// Returns the epoch, as a duration since the Unix epoch.
    pub fn epoch(&self) -> Duration {
        self.sequencer.epoch()
    }

    /// Generates the next ID, retrying lost races and waiting out an
    /// exhausted sequence.
    ///
    /// # Errors
    ///
    /// - [`crate::Error::ClockRegression`] if the clock reads earlier than the
    ///   last issued ID. The state is left untouched.
    /// - [`crate::Error::TimestampOutOfRange`] if the clock reads before the
    ///   epoch or beyond the 41-bit timestamp field.
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
    pub fn next_id(&self) -> Result<SnowflakeId> {
        loop {
            // Load before reading the clock: a reading taken first could be
            // older than a state committed in between.
            let (raw, last) = self.load();
            let now = self.time.current_millis();
            match self.sequencer.tick(last, now)? {
                Tick::Ready(id) => {
                    if self.commit(raw, id) {
                        return Ok(id);
                    }
                }
                Tick::Exhausted { last_timestamp } => {
                    Sequencer::wait_past(&self.time, last_timestamp);
                }
            }
        }
    }

    /// Attempts to generate the next ID with a single compare-and-swap.
    ///
    /// Returns [`IdGenStatus::Pending`] when the sequence is exhausted, or
    /// with `yield_for: 0` when another thread won the race.
    ///
    /// # Errors
    ///
    /// Same as [`Self::next_id`].
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
    pub fn poll_id(&self) -> Result<IdGenStatus> {
        let (raw, last) = self.load();
        let now = self.time.current_millis();
        match self.sequencer.tick(last, now)? {
            Tick::Ready(id) if self.commit(raw, id) => Ok(IdGenStatus::Ready { id }),
            Tick::Ready(_) => Ok(IdGenStatus::Pending { yield_for: 0 }),
            Tick::Exhausted { last_timestamp } => Ok(IdGenStatus::Pending {
                yield_for: last_timestamp + 1 - now,
            }),
        }
    }

    fn load(&self) -> (u64, Option<SnowflakeId>) {
        let raw = self.state.load(Ordering::Acquire);
        (raw, (raw != NO_ID).then(|| SnowflakeId::from_raw(raw)))
    }

    fn commit(&self, current: u64, next: SnowflakeId) -> bool {
        self.state
            .compare_exchange(current, next.to_raw(), Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }
}

impl<T> SnowflakeGenerator<T> for AtomicIdGenerator<T>
where
    T: TimeSource,
{
    fn with_time(node: NodeId, epoch: Duration, time: T) -> Self {
        Self::with_time(node, epoch, time)
    }

    fn node(&self) -> NodeId {
        self.node()
    }

    fn epoch(&self) -> Duration {
        self.epoch()
    }

    fn next_id(&self) -> Result<SnowflakeId> {
        self.next_id()
    }

    fn poll_id(&self) -> Result<IdGenStatus> {
        self.poll_id()
    }
}
