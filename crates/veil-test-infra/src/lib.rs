//! Disposable containers for integration tests.

pub mod redis;

use thiserror::Error;

/// Why a fixture could not be brought up or talked to.
#[derive(Debug, Error)]
pub enum FixtureError {
    #[error("failed to start or inspect the container: {0}")]
    Container(#[from] testcontainers::TestcontainersError),

    #[error("fixture redis rejected a command: {0}")]
    Redis(#[from] ::redis::RedisError),
}

pub type Result<T> = std::result::Result<T, FixtureError>;
