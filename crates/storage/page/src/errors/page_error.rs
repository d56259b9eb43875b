use crate::errors::delete_error::DeleteError;
use crate::errors::insert_error::InsertError;
use crate::errors::page_op_error::PageOpError;
use crate::errors::read_record_error::ReadRecordError;
use crate::errors::slot_error::SlotError;
use crate::errors::update_error::UpdateError;
use crate::page_id::PageId;

/// Public facing error type returned by the Page module.
#[derive(Debug, thiserror::Error)]
#[error("error on page {page_id}: {source}")]
pub struct PageError {
    /// The page ID on which the error occurred
    pub page_id: PageId,
    /// The source error
    pub source: PageOpError,
}

impl PageError {
    /// Whether the error denotes a slot number that does not address a live
    /// record (out of range, or empty after a deletion).
    pub fn is_invalid_slot(&self) -> bool {
        fn slot_invalid(error: &SlotError) -> bool {
            matches!(error, SlotError::InvalidSlot { .. })
        }

        match &self.source {
            PageOpError::Slot(e) => slot_invalid(e),
            PageOpError::ReadRecord(ReadRecordError::SlotError(e)) => slot_invalid(e),
            PageOpError::Insert(InsertError::SlotError(e)) => slot_invalid(e),
            PageOpError::DeleteRecord(DeleteError::SlotError(e)) => slot_invalid(e),
            PageOpError::UpdateRecord(UpdateError::SlotError(e)) => slot_invalid(e),
            _ => false,
        }
    }

    /// Whether the error denotes an equal-length update contract violation.
    pub fn is_length_mismatch(&self) -> bool {
        matches!(
            &self.source,
            PageOpError::UpdateRecord(UpdateError::LengthMismatch { .. })
        )
    }

    /// Whether the error denotes a record that does not fit in the page's
    /// free space.
    pub fn is_page_full(&self) -> bool {
        matches!(
            &self.source,
            PageOpError::Insert(InsertError::NotEnoughSpace { .. })
        )
    }
}

/// Public facing result type of page operations.
pub type PageResult<T> = Result<T, PageError>;

/// Helper trait to attach page_id context when surfacing errors.
pub(crate) trait WithPageId<T> {
    fn with_page_id(self, page_id: PageId) -> PageResult<T>;
}

impl<T> WithPageId<T> for Result<T, PageOpError> {
    fn with_page_id(self, page_id: PageId) -> PageResult<T> {
        self.map_err(|source| PageError { page_id, source })
    }
}
