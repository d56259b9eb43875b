use crate::errors::header_error::HeaderError;
use crate::errors::slot_error::SlotError;
use binary_helpers::conversions::ConversionError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DeleteError {
    #[error("Error while accessing slot array")]
    SlotError(#[from] SlotError),
    #[error("Error while accessing header")]
    HeaderError(#[from] HeaderError),
    #[error("Error while converting between data types")]
    ConversionError(#[from] ConversionError),
}
