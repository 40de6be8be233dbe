use async_trait::async_trait;
use bytes::Bytes;
use redis::AsyncCommands;
use tracing::{debug, trace, warn};
use veil_core::store::{ObjectStore, PutOptions, ReadStore, Result};
use veil_core::{ObjectId, ObjectMetadata, StorageError, StoredObject};

const PAYLOAD_FIELD: &str = "payload";
const METADATA_FIELD: &str = "metadata";

/// A Redis-backed implementation of [`ObjectStore`].
///
/// Each object is one hash holding the raw payload and its metadata as JSON.
/// Writes replace the whole hash and set the TTL inside a single
/// `MULTI`/`EXEC`, so readers never observe a half-written object and expiry
/// is enforced by Redis itself.
#[derive(Debug, Clone)]
pub struct RedisStore {
    conn: redis::aio::MultiplexedConnection,
    key_prefix: String,
}

fn map_redis_error(operation: &str, err: redis::RedisError) -> StorageError {
    let message = format!("{operation}: {err}");
    if err.is_timeout() {
        StorageError::Timeout(message)
    } else if err.is_connection_refusal() || err.is_connection_dropped() || err.is_io_error() {
        StorageError::Unavailable(message)
    } else {
        StorageError::Operation(message)
    }
}

impl RedisStore {
    /// Creates a new Redis object store.
    ///
    /// # Arguments
    ///
    /// * `conn` - A multiplexed Redis connection
    pub fn new(conn: redis::aio::MultiplexedConnection) -> Self {
        Self::with_prefix(conn, "veil:obj:")
    }

    /// Creates a new Redis object store with a custom key prefix.
    pub fn with_prefix(
        conn: redis::aio::MultiplexedConnection,
        key_prefix: impl Into<String>,
    ) -> Self {
        Self {
            conn,
            key_prefix: key_prefix.into(),
        }
    }

    /// Opens a client for `url` and connects.
    pub async fn connect(url: &str, key_prefix: impl Into<String>) -> Result<Self> {
        let client = redis::Client::open(url)
            .map_err(|e| map_redis_error("invalid Redis connection URL", e))?;
        let conn = client
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| map_redis_error("failed to connect to Redis", e))?;
        Ok(Self::with_prefix(conn, key_prefix))
    }

    fn object_key(&self, id: &ObjectId) -> String {
        object_key(&self.key_prefix, id)
    }
}

/// Generates the Redis key for an object.
fn object_key(prefix: &str, id: &ObjectId) -> String {
    format!("{}{}", prefix, id.as_str())
}

fn decode_metadata(id: &ObjectId, raw: &str) -> Result<ObjectMetadata> {
    serde_json::from_str(raw).map_err(|e| {
        warn!(id = %id, error = %e, "failed to deserialize stored metadata");
        StorageError::InvalidData(format!("invalid metadata for '{id}': {e}"))
    })
}

#[async_trait]
impl ReadStore for RedisStore {
    async fn get(&self, id: &ObjectId) -> Result<Option<Bytes>> {
        let key = self.object_key(id);
        trace!(id = %id, "fetching payload from Redis");

        let mut conn = self.conn.clone();
        let payload = conn
            .hget::<_, _, Option<Vec<u8>>>(&key, PAYLOAD_FIELD)
            .await
            .map_err(|e| map_redis_error("failed to fetch payload from Redis", e))?;

        Ok(payload.map(Bytes::from))
    }

    async fn get_with_metadata(&self, id: &ObjectId) -> Result<Option<StoredObject>> {
        let key = self.object_key(id);
        trace!(id = %id, "fetching object from Redis");

        let mut conn = self.conn.clone();
        let (payload, metadata): (Option<Vec<u8>>, Option<String>) = redis::cmd("HMGET")
            .arg(&key)
            .arg(PAYLOAD_FIELD)
            .arg(METADATA_FIELD)
            .query_async(&mut conn)
            .await
            .map_err(|e| map_redis_error("failed to fetch object from Redis", e))?;

        match (payload, metadata) {
            (Some(payload), Some(metadata)) => {
                debug!(id = %id, "object found in Redis");
                Ok(Some(StoredObject {
                    metadata: decode_metadata(id, &metadata)?,
                    payload: Bytes::from(payload),
                }))
            }
            _ => {
                trace!(id = %id, "object not found in Redis");
                Ok(None)
            }
        }
    }
}

#[async_trait]
impl ObjectStore for RedisStore {
    async fn put(&self, id: &ObjectId, payload: Bytes, options: PutOptions) -> Result<()> {
        let key = self.object_key(id);
        trace!(id = %id, size = payload.len(), "storing object in Redis");

        let metadata = serde_json::to_string(&options.metadata).map_err(|e| {
            warn!(id = %id, error = %e, "failed to serialize metadata");
            StorageError::Serialization(format!("failed to serialize metadata: {e}"))
        })?;

        let mut pipe = redis::pipe();
        pipe.atomic()
            .del(&key)
            .ignore()
            .hset(&key, PAYLOAD_FIELD, payload.as_ref())
            .ignore()
            .hset(&key, METADATA_FIELD, metadata)
            .ignore();
        if let Some(ttl) = options.expiration_ttl {
            let seconds = i64::try_from(ttl.as_secs()).unwrap_or(i64::MAX);
            pipe.expire(&key, seconds).ignore();
        }

        let mut conn = self.conn.clone();
        pipe.query_async::<()>(&mut conn).await.map_err(|e| {
            warn!(id = %id, error = %e, "failed to store object in Redis");
            map_redis_error("failed to write object to Redis", e)
        })?;

        debug!(id = %id, "stored object in Redis");
        Ok(())
    }

    async fn delete(&self, id: &ObjectId) -> Result<bool> {
        let key = self.object_key(id);
        trace!(id = %id, "removing object from Redis");

        let mut conn = self.conn.clone();
        let removed = conn
            .del::<_, usize>(&key)
            .await
            .map_err(|e| map_redis_error("failed to delete object from Redis", e))?;

        Ok(removed > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Round trips against a live server live in tests/redis_store_integration.rs.

    #[test]
    fn object_key_format() {
        let id = ObjectId::new_unchecked("abcdefghij");
        assert_eq!(object_key("veil:obj:", &id), "veil:obj:abcdefghij");
    }
}
