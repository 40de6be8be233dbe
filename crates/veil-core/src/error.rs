use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CoreError {
    #[error("invalid object id: {0}")]
    InvalidObjectId(String),
    #[error("invalid deletion code: {0}")]
    InvalidDeletionCode(String),
    #[error("invalid domain spec: {0}")]
    InvalidDomainSpec(String),
}

/// Errors surfaced by [`ObjectStore`](crate::store::ObjectStore) backends.
#[derive(Debug, Clone, Error)]
pub enum StorageError {
    #[error("storage backend unavailable: {0}")]
    Unavailable(String),
    #[error("storage operation timed out: {0}")]
    Timeout(String),
    #[error("storage serialization failed: {0}")]
    Serialization(String),
    #[error("stored data is invalid: {0}")]
    InvalidData(String),
    #[error("storage operation failed: {0}")]
    Operation(String),
}
