use thiserror::Error;

#[derive(Debug, Error)]
pub enum HeaderError {
    #[error("Header error")]
    BinaryError(#[from] binary_helpers::bin_error::BinaryError),
    #[error("Provided slice length ({actual}) does not match the expected length ({expected})")]
    HeaderSliceSizeMismatch { actual: usize, expected: usize },
}
