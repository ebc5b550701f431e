use core::time::Duration;

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::{
    DEFAULT_EPOCH, IdGenStatus, NodeId, Result, SnowflakeGenerator, SnowflakeId, SystemClock,
    TimeSource,
    generator::{Mutex, MutexGuard, Sequencer, Tick},
};

/// A lock-based Snowflake ID generator suitable for multi-threaded
/// environments.
///
/// The state (the last issued ID) sits behind a [`Mutex`]. The whole
/// generation step, from reading the clock to committing the new state, runs
/// with the lock held, including the spin that waits out an exhausted
/// sequence. Concurrent callers therefore observe a single total order of
/// IDs. Share the generator across threads with an `Arc` or a scoped borrow.
///
/// ## Features
/// - ✅ Thread-safe
/// - ✅ Fair access across threads
/// - ✅ Detects clock regressions
///
/// ## See Also
/// - [`AtomicIdGenerator`]
///
/// [`AtomicIdGenerator`]: crate::AtomicIdGenerator
pub struct IdGenerator<T = SystemClock>
where
    T: TimeSource,
{
    #[cfg(feature = "cache-padded")]
    pub(crate) state: crossbeam_utils::CachePadded<Mutex<Option<SnowflakeId>>>,
    #[cfg(not(feature = "cache-padded"))]
    pub(crate) state: Mutex<Option<SnowflakeId>>,
    sequencer: Sequencer,
    time: T,
}

impl IdGenerator<SystemClock> {
    /// Creates a generator for the given partition and worker, reading the
    /// system wall clock and measuring time from [`DEFAULT_EPOCH`].
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidConfiguration`] if either id is negative
    /// or greater than 31.
    ///
    /// # Example
    /// ```
    /// use snowdrift::{Error, IdGenerator};
    ///
    /// assert!(IdGenerator::new(31, 31).is_ok());
    /// assert!(matches!(IdGenerator::new(32, 0), Err(Error::InvalidConfiguration { .. })));
    /// assert!(matches!(IdGenerator::new(0, -1), Err(Error::InvalidConfiguration { .. })));
    /// ```
    pub fn new(partition_id: i64, worker_id: i64) -> Result<Self> {
        let node = NodeId::new(partition_id, worker_id)?;
        Ok(Self::with_time(node, DEFAULT_EPOCH, SystemClock))
    }
}

impl Default for IdGenerator<SystemClock> {
    /// Partition 1, worker 1, system clock, [`DEFAULT_EPOCH`].
    fn default() -> Self {
        Self::with_time(NodeId::default(), DEFAULT_EPOCH, SystemClock)
    }
}

impl<T> IdGenerator<T>
where
    T: TimeSource,
{
    /// Creates a generator from a validated node identity, an epoch and any
    /// [`TimeSource`].
    ///
    /// No ID has been issued yet, so the first call always starts a fresh
    /// millisecond with sequence 0. An epoch wider than `u64::MAX`
    /// milliseconds saturates, and every call then fails as out of range.
    ///
    /// # Example
    /// ```
    /// use snowdrift::{IdGenerator, MonotonicClock, NodeId, TWITTER_EPOCH};
    ///
    /// let node = NodeId::new(4, 9).unwrap();
    /// let generator = IdGenerator::with_time(node, TWITTER_EPOCH, MonotonicClock::new());
    /// let id = generator.next_id().unwrap();
    /// assert_eq!(id.node(), node);
    /// ```
    pub fn with_time(node: NodeId, epoch: Duration, time: T) -> Self {
        Self {
            #[cfg(feature = "cache-padded")]
            state: crossbeam_utils::CachePadded::new(Mutex::new(None)),
            #[cfg(not(feature = "cache-padded"))]
            state: Mutex::new(None),
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

    /// Generates the next ID.
    ///
    /// If all 4096 sequence values of the current millisecond are taken, this
    /// spins (holding the lock) until the clock moves to a later millisecond
    /// and issues that millisecond's first ID.
    ///
    /// # Errors
    ///
    /// - [`crate::Error::ClockRegression`] if the clock reads earlier than the
    ///   last issued ID. The state is left untouched.
    /// - [`crate::Error::TimestampOutOfRange`] if the clock reads before the
    ///   epoch or beyond the 41-bit timestamp field.
    /// - `LockPoisoned` if another thread panicked while holding the lock
    ///   (never with the `parking-lot` feature).
    ///
    /// # Example
    /// ```
    /// use snowdrift::IdGenerator;
    ///
    /// let generator = IdGenerator::new(0, 1).unwrap();
    /// match generator.next_id() {
    ///     Ok(id) => println!("issued {id}"),
    ///     Err(e) => eprintln!("refused: {e}"),
    /// }
    /// ```
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
    pub fn next_id(&self) -> Result<SnowflakeId> {
        let mut last = self.lock()?;
        let mut now = self.time.current_millis();
        loop {
            match self.sequencer.tick(*last, now)? {
                Tick::Ready(id) => {
                    *last = Some(id);
                    return Ok(id);
                }
                Tick::Exhausted { last_timestamp } => {
                    now = Sequencer::wait_past(&self.time, last_timestamp);
                }
            }
        }
    }

    /// Attempts to generate the next ID without waiting.
    ///
    /// Returns [`IdGenStatus::Pending`] instead of spinning when the
    /// sequence is exhausted; the state is not modified in that case.
    ///
    /// # Errors
    ///
    /// Same as [`Self::next_id`].
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
    pub fn poll_id(&self) -> Result<IdGenStatus> {
        let mut last = self.lock()?;
        let now = self.time.current_millis();
        match self.sequencer.tick(*last, now)? {
            Tick::Ready(id) => {
                *last = Some(id);
                Ok(IdGenStatus::Ready { id })
            }
            Tick::Exhausted { last_timestamp } => Ok(IdGenStatus::Pending {
                yield_for: last_timestamp + 1 - now,
            }),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Option<SnowflakeId>>> {
        #[cfg(feature = "parking-lot")]
        {
            Ok(self.state.lock())
        }
        #[cfg(not(feature = "parking-lot"))]
        {
            Ok(self.state.lock()?)
        }
    }
}

impl<T> SnowflakeGenerator<T> for IdGenerator<T>
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
