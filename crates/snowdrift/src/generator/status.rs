use crate::SnowflakeId;

/// Outcome of a non-blocking generation attempt.
///
/// Returned by `poll_id()`:
///
/// - [`IdGenStatus::Ready`] carries a freshly issued ID.
/// - [`IdGenStatus::Pending`] means no ID can be issued right now, either
///   because all 4096 sequence values of the current millisecond are used or
///   because a lock-free update lost a race. Retry after `yield_for`
///   milliseconds (zero means retry immediately).
///
/// # Example
///
/// ```
/// use snowdrift::{IdGenStatus, IdGenerator, MonotonicClock, NodeId, DEFAULT_EPOCH};
///
/// let generator = IdGenerator::with_time(NodeId::default(), DEFAULT_EPOCH, MonotonicClock::new());
/// let id = loop {
///     match generator.poll_id().unwrap() {
///         IdGenStatus::Ready { id } => break id,
///         IdGenStatus::Pending { .. } => std::thread::yield_now(),
///     }
/// };
/// assert_eq!(id.sequence(), 0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdGenStatus {
    /// A unique ID was generated and committed.
    Ready {
        /// The generated ID.
        id: SnowflakeId,
    },
    /// Nothing was generated and the generator state is unchanged.
    Pending {
        /// Milliseconds to wait before trying again.
        yield_for: u64,
    },
}
