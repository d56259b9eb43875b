use crate::errors::delete_error::DeleteError;
use crate::errors::directory_error::DirectoryError;
use crate::errors::header_error::HeaderError;
use crate::errors::insert_error::InsertError;
use crate::errors::read_record_error::ReadRecordError;
use crate::errors::slot_error::SlotError;
use crate::errors::update_error::UpdateError;
use thiserror::Error;

/// Aggregator error type for all possible page related sub-errors
#[derive(Debug, Error)]
pub enum PageOpError {
    #[error("Error while accessing header")]
    Header(#[from] HeaderError),
    #[error("Error while accessing slot array")]
    Slot(#[from] SlotError),
    #[error("Error while reading record")]
    ReadRecord(#[from] ReadRecordError),
    #[error("Error while inserting record")]
    Insert(#[from] InsertError),
    #[error("Error while deleting record")]
    DeleteRecord(#[from] DeleteError),
    #[error("Error while updating record")]
    UpdateRecord(#[from] UpdateError),
    #[error("Error while accessing directory entries")]
    Directory(#[from] DirectoryError),
}
