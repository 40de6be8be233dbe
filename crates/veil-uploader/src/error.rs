use thiserror::Error;
use veil_core::StorageError;

/// Reasons an upload is refused.
#[derive(Debug, Clone, Error)]
pub enum CreateError {
    #[error("missing parameters")]
    MissingParameters,
    #[error("invalid ttl: {0}")]
    InvalidTtl(String),
    #[error("invalid url: {0}")]
    InvalidUrl(String),
    #[error("invalid file: {0}")]
    InvalidFile(String),
    #[error("unsupported data type: {0}")]
    UnsupportedType(String),
    #[error("invalid domains: {0}")]
    InvalidDomains(String),
    #[error("client address unknown")]
    MissingClientAddress,
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}

/// Reasons a deletion is refused.
#[derive(Debug, Clone, Error)]
pub enum DeletionError {
    /// The codes in the request do not have the expected shape.
    #[error("malformed deletion or data code")]
    MalformedCodes,
    /// Unknown object, or the code does not match the stored one.
    #[error("deletion code rejected")]
    Rejected,
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}
