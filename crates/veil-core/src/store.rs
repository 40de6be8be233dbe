use crate::error::StorageError;
use crate::object::{ObjectId, ObjectMetadata, StoredObject};
use async_trait::async_trait;
use bytes::Bytes;
use std::time::Duration;
use typed_builder::TypedBuilder;

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StorageError>;

/// Options attached to a [`ObjectStore::put`].
#[derive(Debug, Clone, TypedBuilder)]
pub struct PutOptions {
    pub metadata: ObjectMetadata,
    /// After this long the store must stop returning the object.
    #[builder(default)]
    pub expiration_ttl: Option<Duration>,
}

/// A read-only view of an object store.
///
/// The viewer only needs these operations, so it is handed this trait
/// rather than the full [`ObjectStore`].
#[async_trait]
pub trait ReadStore: Send + Sync + 'static {
    /// Returns the payload for `id`, or `None` if absent or expired.
    async fn get(&self, id: &ObjectId) -> Result<Option<Bytes>>;

    /// Returns the payload together with its metadata.
    async fn get_with_metadata(&self, id: &ObjectId) -> Result<Option<StoredObject>>;
}

/// An atomic key-value store holding payloads and their metadata.
///
/// Writes are last-writer-wins: `put` under an existing key replaces the
/// previous object without any check. No operation spans more than one key.
#[async_trait]
pub trait ObjectStore: ReadStore {
    /// Stores `payload` under `id`, replacing whatever was there.
    async fn put(&self, id: &ObjectId, payload: Bytes, options: PutOptions) -> Result<()>;

    /// Deletes the object stored under `id`.
    /// Returns `true` if an object existed and was removed.
    async fn delete(&self, id: &ObjectId) -> Result<bool>;
}
