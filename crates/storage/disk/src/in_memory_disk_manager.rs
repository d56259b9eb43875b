//! Defines an in-memory implementation of the [`DiskManager`] trait.
//!
//! Pages live in a hash map instead of a file. Besides backing tests, the
//! implementation exposes a couple of counters (`allocated_page_count`,
//! `pages_written`) that let callers observe allocation and write-back
//! behavior from the outside.

use crate::api::DiskManager;
use crate::errors::DiskError;
use crate::file_entries::FileEntryTable;
use page::PAGE_SIZE;
use page::page_id::PageId;
use std::collections::{BTreeSet, HashMap};
use std::sync::atomic::{AtomicI32, AtomicUsize, Ordering};
use std::sync::{Mutex, RwLock};

/// An in memory disk manager
#[derive(Debug)]
pub struct InMemoryDiskManager {
    pages: RwLock<HashMap<PageId, Box<[u8]>>>,
    /// Ids of deallocated pages, reused before the id space grows.
    free_list: Mutex<BTreeSet<i32>>,
    next_page_id: AtomicI32,
    entries: FileEntryTable,
    writes: AtomicUsize,
}

impl Default for InMemoryDiskManager {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryDiskManager {
    /// Creates an empty manager with no allocated pages and no file entries.
    pub fn new() -> Self {
        Self {
            pages: RwLock::new(HashMap::new()),
            free_list: Mutex::new(BTreeSet::new()),
            next_page_id: AtomicI32::new(0),
            entries: FileEntryTable::new(),
            writes: AtomicUsize::new(0),
        }
    }

    /// Number of pages currently allocated.
    pub fn allocated_page_count(&self) -> usize {
        self.pages.read().unwrap().len()
    }

    /// Total number of page writes performed since construction.
    pub fn pages_written(&self) -> usize {
        self.writes.load(Ordering::Relaxed)
    }

    fn check_buffer(len: usize) -> Result<(), DiskError> {
        if len != PAGE_SIZE {
            return Err(DiskError::BufferSizeMismatch {
                expected: PAGE_SIZE,
                actual: len,
            });
        }
        Ok(())
    }
}

impl DiskManager for InMemoryDiskManager {
    fn allocate_page(&self, run_size: usize) -> Result<PageId, DiskError> {
        if run_size == 0 {
            return Err(DiskError::InvalidRunSize(run_size));
        }

        // Single-page allocations reuse deallocated ids; runs need contiguous
        // ids and always come from the end of the id space.
        let first = if run_size == 1 {
            match self.free_list.lock().unwrap().pop_first() {
                Some(id) => id,
                None => self.next_page_id.fetch_add(1, Ordering::Relaxed),
            }
        } else {
            let run = i32::try_from(run_size).map_err(|_| DiskError::OutOfPages)?;
            let first = self.next_page_id.fetch_add(run, Ordering::Relaxed);
            if first.checked_add(run).is_none() {
                return Err(DiskError::OutOfPages);
            }
            first
        };

        let mut pages = self.pages.write().unwrap();
        for offset in 0..run_size {
            let page_id = PageId::new(first + offset as i32);
            pages.insert(page_id, vec![0u8; PAGE_SIZE].into_boxed_slice());
        }

        Ok(PageId::new(first))
    }

    fn deallocate_page(&self, page_id: PageId) -> Result<(), DiskError> {
        if self.pages.write().unwrap().remove(&page_id).is_none() {
            return Err(DiskError::PageNotAllocated(page_id));
        }
        self.free_list.lock().unwrap().insert(page_id.value());
        Ok(())
    }

    fn read_page(&self, page_id: PageId, destination: &mut [u8]) -> Result<(), DiskError> {
        Self::check_buffer(destination.len())?;
        let pages = self.pages.read().unwrap();
        let page = pages
            .get(&page_id)
            .ok_or(DiskError::PageNotAllocated(page_id))?;
        destination.copy_from_slice(page);
        Ok(())
    }

    fn write_page(&self, page_id: PageId, page_data: &[u8]) -> Result<(), DiskError> {
        Self::check_buffer(page_data.len())?;
        let mut pages = self.pages.write().unwrap();
        let page = pages
            .get_mut(&page_id)
            .ok_or(DiskError::PageNotAllocated(page_id))?;
        page.copy_from_slice(page_data);
        self.writes.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    fn add_file_entry(&self, name: &str, head_page_id: PageId) -> Result<(), DiskError> {
        self.entries.add(name, head_page_id)
    }

    fn get_file_entry(&self, name: &str) -> Result<Option<PageId>, DiskError> {
        Ok(self.entries.get(name))
    }

    fn delete_file_entry(&self, name: &str) -> Result<(), DiskError> {
        self.entries.remove(name)
    }
}
