use async_trait::async_trait;
use bytes::Bytes;
use dashmap::DashMap;
use jiff::Timestamp;
use tracing::trace;
use veil_core::store::{ObjectStore, PutOptions, ReadStore, Result};
use veil_core::{Clock, ObjectId, ObjectMetadata, StoredObject, SystemClock};

/// In-memory storage entry for one object.
#[derive(Debug, Clone)]
struct Entry {
    payload: Bytes,
    metadata: ObjectMetadata,
    expire_at: Option<Timestamp>,
}

impl Entry {
    fn is_expired(&self, now: Timestamp) -> bool {
        self.expire_at.is_some_and(|expire_at| now >= expire_at)
    }
}

/// In-memory implementation of the [`ObjectStore`] trait using DashMap.
///
/// Expiry is enforced lazily: an expired entry is dropped the first time a
/// read finds it. The clock is injectable so expiry can be tested without
/// sleeping.
#[derive(Debug)]
pub struct InMemoryStore<C = SystemClock> {
    storage: DashMap<String, Entry>,
    clock: C,
}

impl InMemoryStore<SystemClock> {
    /// Creates a new in-memory store backed by the system clock.
    pub fn new() -> Self {
        Self::with_clock(SystemClock)
    }
}

impl Default for InMemoryStore<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> InMemoryStore<C> {
    pub fn with_clock(clock: C) -> Self {
        Self {
            storage: DashMap::new(),
            clock,
        }
    }

    /// Number of entries held, including expired ones not yet evicted.
    pub fn len(&self) -> usize {
        self.storage.len()
    }

    pub fn is_empty(&self) -> bool {
        self.storage.is_empty()
    }

    fn live_entry(&self, id: &ObjectId) -> Option<Entry> {
        let key = id.as_str();
        let entry = self.storage.get(key)?;

        if entry.is_expired(self.clock.now()) {
            drop(entry);
            trace!(id = %id, "evicting expired object");
            self.storage.remove(key);
            return None;
        }

        Some(entry.clone())
    }
}

#[async_trait]
impl<C: Clock> ReadStore for InMemoryStore<C> {
    async fn get(&self, id: &ObjectId) -> Result<Option<Bytes>> {
        Ok(self.live_entry(id).map(|entry| entry.payload))
    }

    async fn get_with_metadata(&self, id: &ObjectId) -> Result<Option<StoredObject>> {
        Ok(self.live_entry(id).map(|entry| StoredObject {
            metadata: entry.metadata,
            payload: entry.payload,
        }))
    }
}

#[async_trait]
impl<C: Clock> ObjectStore for InMemoryStore<C> {
    async fn put(&self, id: &ObjectId, payload: Bytes, options: PutOptions) -> Result<()> {
        // An unrepresentable expiry is treated as no expiry.
        let expire_at = options
            .expiration_ttl
            .and_then(|ttl| self.clock.now().checked_add(ttl).ok());

        let entry = Entry {
            payload,
            metadata: options.metadata,
            expire_at,
        };

        self.storage.insert(id.as_str().to_owned(), entry);
        Ok(())
    }

    async fn delete(&self, id: &ObjectId) -> Result<bool> {
        Ok(self.storage.remove(id.as_str()).is_some())
    }
}
