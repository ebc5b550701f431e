mod atomic;
mod interface;
mod lock;
mod mutex;
mod sequencer;
mod status;

pub use atomic::*;
pub use interface::*;
pub use lock::*;
pub(crate) use mutex::*;
pub(crate) use sequencer::*;
pub use status::*;
