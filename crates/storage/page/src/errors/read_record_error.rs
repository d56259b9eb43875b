use crate::errors::slot_error::SlotError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReadRecordError {
    #[error("Error while reading slot array")]
    SlotError(#[from] SlotError),
}
