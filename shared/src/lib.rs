pub mod board;
pub mod device;
pub mod error;
pub mod ledger;
pub mod models;
pub mod samples;
pub mod stats;
pub mod storage;
pub mod store;
pub mod validation;

pub use board::Board;
pub use device::DeviceIdentity;
pub use error::{Error, ErrorCode, Result};
pub use ledger::VoteLedger;
pub use models::*;
pub use stats::{CategoryCounts, Leader, Statistics};
pub use storage::{MemoryStorage, Storage, StorageError};
#[cfg(not(target_arch = "wasm32"))]
pub use storage::FileStorage;
pub use store::EntryStore;
pub use validation::*;

#[cfg(test)]
mod tests;
