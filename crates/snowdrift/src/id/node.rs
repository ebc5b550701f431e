use core::fmt;

use crate::{Error, Result, SnowflakeId};

/// The fixed identity of one generator: a partition id and a worker id.
///
/// Both fields are 5 bits wide. Uniqueness across generators is the caller's
/// responsibility; nothing here detects two processes sharing a `NodeId`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId {
    partition_id: u8,
    worker_id: u8,
}

impl NodeId {
    /// Largest accepted partition id.
    pub const MAX_PARTITION_ID: u64 = SnowflakeId::PARTITION_ID_MASK;

    /// Largest accepted worker id.
    pub const MAX_WORKER_ID: u64 = SnowflakeId::WORKER_ID_MASK;

    /// Validates and builds a node identity.
    ///
    /// The arguments are signed so that negative values coming from
    /// configuration can be rejected rather than wrapped.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] if either value is negative or
    /// greater than 31.
    ///
    /// # Example
    ///
    /// ```
    /// use snowdrift::{Error, NodeId};
    ///
    /// assert!(NodeId::new(31, 31).is_ok());
    /// assert!(matches!(
    ///     NodeId::new(32, 0),
    ///     Err(Error::InvalidConfiguration { field: "partition_id", .. })
    /// ));
    /// ```
    pub fn new(partition_id: i64, worker_id: i64) -> Result<Self> {
        Ok(Self {
            partition_id: validate("partition_id", partition_id, Self::MAX_PARTITION_ID)?,
            worker_id: validate("worker_id", worker_id, Self::MAX_WORKER_ID)?,
        })
    }

    pub(crate) const fn from_fields(partition_id: u8, worker_id: u8) -> Self {
        Self {
            partition_id,
            worker_id,
        }
    }

    /// Returns the partition id.
    pub const fn partition_id(&self) -> u8 {
        self.partition_id
    }

    /// Returns the worker id.
    pub const fn worker_id(&self) -> u8 {
        self.worker_id
    }
}

fn validate(field: &'static str, value: i64, max: u64) -> Result<u8> {
    u64::try_from(value)
        .ok()
        .filter(|v| *v <= max)
        .and_then(|v| u8::try_from(v).ok())
        .ok_or(Error::InvalidConfiguration { field, value, max })
}

impl Default for NodeId {
    /// Partition 1, worker 1.
    fn default() -> Self {
        Self::from_fields(1, 1)
    }
}

impl TryFrom<(i64, i64)> for NodeId {
    type Error = Error;

    fn try_from((partition_id, worker_id): (i64, i64)) -> Result<Self> {
        Self::new(partition_id, worker_id)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.partition_id, self.worker_id)
    }
}
