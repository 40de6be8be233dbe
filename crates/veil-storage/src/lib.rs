//! Object store backends.

pub mod memory;
pub mod redis;

pub use memory::InMemoryStore;
pub use crate::redis::RedisStore;
pub use veil_core::store::{ObjectStore, PutOptions, ReadStore, Result};
pub use veil_core::StorageError;
