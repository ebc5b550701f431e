//! Coordination-free, time-ordered 64-bit identifiers.
//!
//! Every ID packs a millisecond offset from a fixed epoch, a 5-bit partition
//! id, a 5-bit worker id and a 12-bit per-millisecond sequence:
//!
//! ```text
//!  Bit Index:  63           63 62            22 21         17 16      12 11             0
//!              +--------------+----------------+-------------+----------+---------------+
//!  Field:      | reserved (1) | timestamp (41) | partition(5)| worker(5)| sequence (12) |
//!              +--------------+----------------+-------------+----------+---------------+
//! ```
//!
//! IDs from one generator are unique and non-decreasing. IDs from different
//! generators never collide as long as every running generator was given a
//! distinct `(partition_id, worker_id)` pair.
//!
//! ```
//! use snowdrift::IdGenerator;
//!
//! let generator = IdGenerator::new(3, 7).unwrap();
//! let a = generator.next_id().unwrap();
//! let b = generator.next_id().unwrap();
//!
//! assert!(a < b);
//! assert_eq!(a.partition_id(), 3);
//! assert_eq!(a.worker_id(), 7);
//! ```
#![cfg_attr(docsrs, feature(doc_cfg))]

mod error;
pub mod generator;
pub mod id;
pub mod time;

pub use crate::error::*;
pub use crate::generator::*;
pub use crate::id::*;
pub use crate::time::*;
