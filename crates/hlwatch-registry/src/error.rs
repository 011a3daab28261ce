//! Registry error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("Not watching address: {0}")]
    NotWatching(String),
}

pub type RegistryResult<T> = Result<T, RegistryError>;
