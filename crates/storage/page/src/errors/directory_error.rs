use crate::errors::header_error::HeaderError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error("Attempted to access an invalid directory entry index: {index}")]
    InvalidEntry { index: usize },
    #[error("Directory page cannot hold {count} entries")]
    CapacityExceeded { count: usize },
    #[error("Error while interpreting binary data.")]
    BinaryError(#[from] binary_helpers::bin_error::BinaryError),
    #[error("Error while accessing header")]
    HeaderError(#[from] HeaderError),
}
