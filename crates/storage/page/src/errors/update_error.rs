use crate::errors::header_error::HeaderError;
use crate::errors::slot_error::SlotError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum UpdateError {
    #[error(
        "Replacement record is {actual} bytes but the stored record is {expected} bytes; length-changing updates require delete + insert"
    )]
    LengthMismatch {
        /// Length of the stored record
        expected: usize,
        /// Length of the replacement record
        actual: usize,
    },
    #[error("Error while accessing slot array")]
    SlotError(#[from] SlotError),
    #[error("Error while accessing header")]
    HeaderError(#[from] HeaderError),
}
