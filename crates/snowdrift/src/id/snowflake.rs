use core::{fmt, str::FromStr, time::Duration};

use crate::{Error, NodeId};

/// A 64-bit Snowflake ID with a split node identity.
///
/// - 1 bit reserved (always zero, so the value is a non-negative `i64`)
/// - 41 bits timestamp (ms since the generator's epoch)
/// - 5 bits partition ID
/// - 5 bits worker ID
/// - 12 bits sequence
///
/// ```text
///  Bit Index:  63        62            22 21          17 16       12 11             0
///              +----------+----------------+--------------+-----------+---------------+
///  Field:      | reserved | timestamp (41) | partition(5) | worker(5) | sequence (12) |
///              +----------+----------------+--------------+-----------+---------------+
///              |<------------------ MSB ------- 64 bits ------- LSB ------------------>|
/// ```
///
/// Ordering follows the raw integer, so IDs sort by timestamp first.
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "u64", into = "u64")
)]
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SnowflakeId {
    id: u64,
}

impl SnowflakeId {
    pub const TIMESTAMP_BITS: u32 = 41;
    pub const PARTITION_ID_BITS: u32 = 5;
    pub const WORKER_ID_BITS: u32 = 5;
    pub const SEQUENCE_BITS: u32 = 12;

    /// Bitmask for the 41-bit timestamp field. Occupies bits 22 through 62.
    pub const TIMESTAMP_MASK: u64 = (1 << Self::TIMESTAMP_BITS) - 1;

    /// Bitmask for the 5-bit partition ID field. Occupies bits 17 through 21.
    pub const PARTITION_ID_MASK: u64 = (1 << Self::PARTITION_ID_BITS) - 1;

    /// Bitmask for the 5-bit worker ID field. Occupies bits 12 through 16.
    pub const WORKER_ID_MASK: u64 = (1 << Self::WORKER_ID_BITS) - 1;

    /// Bitmask for the 12-bit sequence field. Occupies bits 0 through 11.
    pub const SEQUENCE_MASK: u64 = (1 << Self::SEQUENCE_BITS) - 1;

    pub const SEQUENCE_SHIFT: u32 = 0;
    pub const WORKER_ID_SHIFT: u32 = Self::SEQUENCE_BITS;
    pub const PARTITION_ID_SHIFT: u32 = Self::SEQUENCE_BITS + Self::WORKER_ID_BITS;
    pub const TIMESTAMP_SHIFT: u32 =
        Self::SEQUENCE_BITS + Self::WORKER_ID_BITS + Self::PARTITION_ID_BITS;

    /// Packs the four fields into an ID. Each field is masked to its width.
    pub const fn from(timestamp: u64, partition_id: u64, worker_id: u64, sequence: u64) -> Self {
        let timestamp = (timestamp & Self::TIMESTAMP_MASK) << Self::TIMESTAMP_SHIFT;
        let partition_id = (partition_id & Self::PARTITION_ID_MASK) << Self::PARTITION_ID_SHIFT;
        let worker_id = (worker_id & Self::WORKER_ID_MASK) << Self::WORKER_ID_SHIFT;
        let sequence = (sequence & Self::SEQUENCE_MASK) << Self::SEQUENCE_SHIFT;
        Self {
            id: timestamp | partition_id | worker_id | sequence,
        }
    }

    /// Packs the four fields into an ID.
    ///
    /// Unlike [`Self::from`], overflowing a field is treated as a bug and
    /// trips a debug assertion.
    pub fn from_components(
        timestamp: u64,
        partition_id: u64,
        worker_id: u64,
        sequence: u64,
    ) -> Self {
        debug_assert!(timestamp <= Self::TIMESTAMP_MASK, "timestamp overflow");
        debug_assert!(
            partition_id <= Self::PARTITION_ID_MASK,
            "partition_id overflow"
        );
        debug_assert!(worker_id <= Self::WORKER_ID_MASK, "worker_id overflow");
        debug_assert!(sequence <= Self::SEQUENCE_MASK, "sequence overflow");
        Self::from(timestamp, partition_id, worker_id, sequence)
    }

    pub(crate) fn for_node(timestamp: u64, node: NodeId, sequence: u64) -> Self {
        Self::from_components(
            timestamp,
            u64::from(node.partition_id()),
            u64::from(node.worker_id()),
            sequence,
        )
    }

    /// Wraps a raw value without validation.
    pub const fn from_raw(raw: u64) -> Self {
        Self { id: raw }
    }

    /// Returns the raw packed value.
    pub const fn to_raw(&self) -> u64 {
        self.id
    }

    /// Returns the packed value as a signed 64-bit integer.
    ///
    /// IDs produced by a generator never set the reserved bit, so the result
    /// is non-negative.
    pub const fn to_i64(&self) -> i64 {
        self.id as i64
    }

    /// Extracts the timestamp (ms since epoch) from the packed ID.
    pub const fn timestamp(&self) -> u64 {
        (self.id >> Self::TIMESTAMP_SHIFT) & Self::TIMESTAMP_MASK
    }

    /// Extracts the partition ID from the packed ID.
    pub const fn partition_id(&self) -> u64 {
        (self.id >> Self::PARTITION_ID_SHIFT) & Self::PARTITION_ID_MASK
    }

    /// Extracts the worker ID from the packed ID.
    pub const fn worker_id(&self) -> u64 {
        (self.id >> Self::WORKER_ID_SHIFT) & Self::WORKER_ID_MASK
    }

    /// Extracts the sequence number from the packed ID.
    pub const fn sequence(&self) -> u64 {
        (self.id >> Self::SEQUENCE_SHIFT) & Self::SEQUENCE_MASK
    }

    /// Returns the node identity encoded in the ID.
    pub const fn node(&self) -> NodeId {
        // Both fields are masked to 5 bits, the casts cannot truncate.
        NodeId::from_fields(self.partition_id() as u8, self.worker_id() as u8)
    }

    /// Recovers the absolute Unix millisecond timestamp given the epoch the
    /// ID was generated against.
    ///
    /// Returns `None` if the sum does not fit in a `u64`.
    pub fn unix_millis(&self, epoch: Duration) -> Option<u64> {
        u64::try_from(epoch.as_millis())
            .ok()?
            .checked_add(self.timestamp())
    }

    /// Returns true if the sequence can be incremented within the same
    /// millisecond.
    pub const fn has_sequence_room(&self) -> bool {
        self.sequence() < Self::SEQUENCE_MASK
    }

    /// Returns a new ID with the sequence incremented.
    pub(crate) fn increment_sequence(&self) -> Self {
        Self::from_components(
            self.timestamp(),
            self.partition_id(),
            self.worker_id(),
            self.sequence() + 1,
        )
    }

    /// Returns the ID as a zero-padded 19-digit string, the width of
    /// `i64::MAX`, so that string order matches numeric order.
    pub fn to_padded_string(&self) -> String {
        format!("{:019}", self.id)
    }
}

impl From<SnowflakeId> for u64 {
    fn from(id: SnowflakeId) -> Self {
        id.to_raw()
    }
}

impl From<SnowflakeId> for i64 {
    fn from(id: SnowflakeId) -> Self {
        id.to_i64()
    }
}

impl TryFrom<u64> for SnowflakeId {
    type Error = Error;

    /// Wraps a raw value, rejecting values with the reserved bit set.
    fn try_from(raw: u64) -> Result<Self, Self::Error> {
        if raw >> (Self::TIMESTAMP_SHIFT + Self::TIMESTAMP_BITS) != 0 {
            return Err(Error::ReservedBitSet { raw });
        }
        Ok(Self::from_raw(raw))
    }
}

impl fmt::Display for SnowflakeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)
    }
}

impl fmt::Debug for SnowflakeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SnowflakeId")
            .field("raw", &format_args!("0x{:016x}", self.id))
            .field("timestamp", &self.timestamp())
            .field("partition_id", &self.partition_id())
            .field("worker_id", &self.worker_id())
            .field("sequence", &self.sequence())
            .finish()
    }
}

impl FromStr for SnowflakeId {
    type Err = Error;

    /// Parses a decimal ID. Values with the reserved bit set are rejected.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<i64>()
            .ok()
            .and_then(|raw| u64::try_from(raw).ok())
            .map(Self::from_raw)
            .ok_or_else(|| Error::ParseId {
                input: s.to_owned(),
            })
    }
}
