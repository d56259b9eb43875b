use buffer::errors::BufferError;
use disk::errors::DiskError;
use page::errors::page_error::PageError;
use page::rid::Rid;
use thiserror::Error;

/// Errors surfaced by heap-file operations.
#[derive(Debug, Error)]
pub enum HeapError {
    /// The record cannot fit on any data page.
    #[error("record of {record_len} bytes exceeds the per-page capacity of {max} bytes")]
    RecordTooLarge { record_len: usize, max: usize },
    /// The record id does not address a live record of this file.
    #[error("record id {0} does not identify a record in this file")]
    InvalidRid(Rid),
    /// The buffer pool failed underneath the heap file.
    #[error(transparent)]
    Buffer(#[from] BufferError),
    /// A page-level operation failed for a reason other than a bad record id.
    #[error(transparent)]
    Page(#[from] PageError),
    /// The disk manager failed underneath the heap file.
    #[error(transparent)]
    Disk(#[from] DiskError),
}
