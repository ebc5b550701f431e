use core::{cmp::Ordering, time::Duration};

use crate::{Error, NodeId, Result, SnowflakeId, TimeSource};

/// What a clock reading means for the generator state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Tick {
    /// Commit this ID as the new state and hand it out.
    Ready(SnowflakeId),
    /// Every sequence value of `last_timestamp` is taken. The clock has to
    /// move strictly past it before anything can be issued.
    Exhausted { last_timestamp: u64 },
}

/// The clock-handling state machine shared by every generator.
///
/// The generator state is the last issued ID (`None` before the first one);
/// its timestamp and sequence fields are the last timestamp and sequence.
/// [`Sequencer::tick`] is pure: it decides the next state and never commits
/// it, so the callers are free to store the result under a lock or through a
/// compare-and-swap.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Sequencer {
    node: NodeId,
    epoch_millis: u64,
}

impl Sequencer {
    /// An epoch past `u64::MAX` milliseconds saturates to `u64::MAX`. Every
    /// clock reading is then before the epoch and rejected as out of range.
    pub(crate) fn new(node: NodeId, epoch: Duration) -> Self {
        Self {
            node,
            epoch_millis: u64::try_from(epoch.as_millis()).unwrap_or(u64::MAX),
        }
    }

    pub(crate) fn node(&self) -> NodeId {
        self.node
    }

    pub(crate) fn epoch(&self) -> Duration {
        Duration::from_millis(self.epoch_millis)
    }

    /// Applies the clock reading `now` (Unix ms) to the last issued ID.
    ///
    /// # Errors
    ///
    /// - [`Error::ClockRegression`] if `now` is before the last timestamp.
    /// - [`Error::TimestampOutOfRange`] if `now` is before the epoch or past
    ///   the 41-bit timestamp field.
    pub(crate) fn tick(&self, last: Option<SnowflakeId>, now: u64) -> Result<Tick> {
        if let Some(last) = last {
            let last_timestamp = self.epoch_millis + last.timestamp();
            match now.cmp(&last_timestamp) {
                Ordering::Less => return Err(Self::cold_clock_behind(last_timestamp, now)),
                Ordering::Equal if last.has_sequence_room() => {
                    return Ok(Tick::Ready(last.increment_sequence()));
                }
                Ordering::Equal => return Ok(Self::cold_exhausted(last_timestamp)),
                Ordering::Greater => {}
            }
        }

        let timestamp = now
            .checked_sub(self.epoch_millis)
            .filter(|ts| *ts <= SnowflakeId::TIMESTAMP_MASK)
            .ok_or(Error::TimestampOutOfRange {
                now,
                epoch: self.epoch_millis,
            })?;

        Ok(Tick::Ready(SnowflakeId::for_node(timestamp, self.node, 0)))
    }

    /// Spins on `time` until it reads strictly later than `last_timestamp`
    /// and returns that reading.
    ///
    /// Backward readings while waiting just keep the loop going. The wait is
    /// bounded by the clock granularity, usually well under a millisecond.
    pub(crate) fn wait_past<T: TimeSource>(time: &T, last_timestamp: u64) -> u64 {
        loop {
            let now = time.current_millis();
            if now > last_timestamp {
                return now;
            }
            core::hint::spin_loop();
        }
    }

    #[cold]
    #[inline(never)]
    fn cold_clock_behind(last_timestamp: u64, now: u64) -> Error {
        #[cfg(feature = "tracing")]
        tracing::warn!(
            last_timestamp,
            now,
            behind_ms = last_timestamp - now,
            "clock moved backwards, refusing to generate id"
        );
        Error::ClockRegression {
            last_timestamp,
            now,
        }
    }

    #[cold]
    #[inline(never)]
    fn cold_exhausted(last_timestamp: u64) -> Tick {
        #[cfg(feature = "tracing")]
        tracing::debug!(last_timestamp, "sequence exhausted for current millisecond");
        Tick::Exhausted { last_timestamp }
    }
}
