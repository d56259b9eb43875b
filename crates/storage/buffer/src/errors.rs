use disk::errors::DiskError;
use page::page_id::PageId;
use thiserror::Error;

/// Buffer error.
#[derive(Debug, Error)]
pub enum BufferError {
    /// Every frame is pinned; no victim can be chosen.
    #[error("all {pool_size} buffer frames are pinned")]
    BufferExhausted { pool_size: usize },
    /// The operation requires the page to be unpinned.
    #[error("page {0} is pinned")]
    PagePinned(PageId),
    /// The page is not cached in any frame.
    #[error("page {0} is not resident in the buffer pool")]
    PageNotResident(PageId),
    /// The disk manager failed underneath the pool.
    #[error(transparent)]
    Disk(#[from] DiskError),
}
