use crate::errors::header_error::HeaderError;
use crate::errors::slot_error::SlotError;
use binary_helpers::conversions::ConversionError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum InsertError {
    #[error(
        "Unable to insert record of length {record_len} in page with {page_free_space} free bytes"
    )]
    NotEnoughSpace {
        /// Required number of bytes to insert the record
        record_len: usize,
        /// Actual number of free bytes in the page
        page_free_space: usize,
    },
    #[error("Error while accessing slot array")]
    SlotError(#[from] SlotError),
    #[error("Error while accessing header")]
    HeaderError(#[from] HeaderError),
    #[error("Error while converting between data types")]
    ConversionError(#[from] ConversionError),
}
