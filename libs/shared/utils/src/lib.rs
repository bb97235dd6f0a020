pub mod storage;
pub mod test_utils;

pub use storage::{FileStorage, LocalStorage, MemoryStorage, StorageError};
