//! Public API for the `disk` crate

use crate::errors::DiskError;
use page::page_id::PageId;

/// Disk manager public API
///
/// A `DiskManager` owns a flat space of fixed-size pages addressed by
/// `PageId`, hands out ids for freshly allocated pages, and keeps the table
/// mapping heap-file names to their head directory pages. Implementations are
/// free to choose the backing storage layout. The trait itself documents
/// method-level expectations.
pub trait DiskManager {
    /// Definition
    /// Allocate a contiguous run of `run_size` pages.
    ///
    /// Params
    /// - `run_size`: Number of consecutive pages to allocate. Must be at
    ///   least 1.
    ///
    /// Return
    /// - `PageId`: the id of the first page of the run. The remaining pages
    ///   of the run follow consecutively.
    fn allocate_page(&self, run_size: usize) -> Result<PageId, DiskError>;

    /// Definition
    /// Free a single previously allocated page. Its id may be handed out
    /// again by a later allocation.
    ///
    /// Params
    /// - `page_id`: Identifier of the page to free.
    fn deallocate_page(&self, page_id: PageId) -> Result<(), DiskError>;

    /// Definition
    /// Read the page identified by `page_id` into `destination`.
    ///
    /// Params
    /// - `page_id`: Identifier of the page to read.
    /// - `destination`: Caller-provided buffer to receive the page bytes. The
    ///   buffer length must equal the storage page size.
    fn read_page(&self, page_id: PageId, destination: &mut [u8]) -> Result<(), DiskError>;

    /// Definition
    /// Write the contents of `page_data` as the page for `page_id`.
    ///
    /// Params
    /// - `page_id`: Identifier of the page to write.
    /// - `page_data`: Byte slice containing exactly one page worth of data.
    ///   The length must equal the storage page size.
    fn write_page(&self, page_id: PageId, page_data: &[u8]) -> Result<(), DiskError>;

    /// Definition
    /// Register `name` as a heap file whose directory chain starts at
    /// `head_page_id`.
    ///
    /// Params
    /// - `name`: File name to register. Must not be registered yet.
    /// - `head_page_id`: Id of the file's head directory page.
    fn add_file_entry(&self, name: &str, head_page_id: PageId) -> Result<(), DiskError>;

    /// Definition
    /// Resolve a registered file name to its head directory page.
    ///
    /// Params
    /// - `name`: File name to resolve.
    ///
    /// Return
    /// - `Option<PageId>`: the head page id, or `None` when no file of that
    ///   name is registered.
    fn get_file_entry(&self, name: &str) -> Result<Option<PageId>, DiskError>;

    /// Definition
    /// Remove a registered file name, so the name can be reused.
    ///
    /// Params
    /// - `name`: File name to remove. Must currently be registered.
    fn delete_file_entry(&self, name: &str) -> Result<(), DiskError>;
}
