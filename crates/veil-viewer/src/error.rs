use thiserror::Error;
use veil_core::StorageError;

#[derive(Debug, Clone, Error)]
pub enum ViewError {
    /// Malformed code on the raw endpoint.
    #[error("invalid file code: {0}")]
    InvalidFileCode(String),
    /// Malformed code on the render endpoint.
    #[error("invalid data code: {0}")]
    InvalidDataCode(String),
    #[error("data not found")]
    NotFound,
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}
