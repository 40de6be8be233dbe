//! Core types and traits for the Veil object drop.
//!
//! This crate provides the shared model (identifiers, metadata, stored
//! objects), the key-value store contract, the clock abstraction and the
//! domain mini-language used by the uploader, viewer and gateway crates.

pub mod clock;
pub mod domain;
pub mod error;
pub mod limits;
pub mod object;
pub mod store;

pub use clock::{Clock, ManualClock, SystemClock};
pub use domain::{DomainEntry, DomainSpec};
pub use error::{CoreError, StorageError};
pub use object::{DeletionCode, FileInfo, ObjectId, ObjectKind, ObjectMetadata, StoredObject};
pub use store::{ObjectStore, PutOptions, ReadStore};
