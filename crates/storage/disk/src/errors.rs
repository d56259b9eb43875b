use page::page_id::PageId;
use thiserror::Error;

/// Errors surfaced by disk-manager implementations.
#[derive(Debug, Error)]
pub enum DiskError {
    #[error("page {0} is not allocated")]
    PageNotAllocated(PageId),
    #[error("run size {0} is not valid")]
    InvalidRunSize(usize),
    #[error("page id space exhausted")]
    OutOfPages,
    #[error("a file entry named {0:?} already exists")]
    DuplicateFileEntry(String),
    #[error("no file entry named {0:?} exists")]
    MissingFileEntry(String),
    #[error("page buffer is {actual} bytes, expected {expected}")]
    BufferSizeMismatch { expected: usize, actual: usize },
    #[error("i/o failure on page {page_id}")]
    Io {
        page_id: PageId,
        source: std::io::Error,
    },
}
