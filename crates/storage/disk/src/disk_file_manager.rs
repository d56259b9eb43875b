use crate::api::DiskManager;
use crate::errors::DiskError;
use crate::file_entries::FileEntryTable;
use page::PAGE_SIZE;
use page::page_id::PageId;
use std::collections::{BTreeSet, HashSet};
use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicI32, Ordering};
use std::sync::{Mutex, RwLock};

#[cfg(unix)]
use std::os::unix::fs::FileExt;
#[cfg(windows)]
use std::os::windows::fs::FileExt;

/// A disk based manager backed by a single database file.
///
/// Page payloads live in the file at `page_number * PAGE_SIZE`; allocation
/// bookkeeping and the file-entry table are kept in memory for the lifetime
/// of the manager.
#[derive(Debug)]
pub struct DiskFileManager {
    file: File,
    allocated: RwLock<HashSet<i32>>,
    /// Ids of deallocated pages, reused before the id space grows.
    free_list: Mutex<BTreeSet<i32>>,
    next_page_id: AtomicI32,
    entries: FileEntryTable,
}

impl DiskFileManager {
    /// Creates a manager over the database file at `path`, creating the file
    /// (and its parent directory) if needed.
    pub fn new(path: impl Into<PathBuf>) -> std::io::Result<Self> {
        let path = path.into();
        Self::ensure_parent_dir(&path)?;

        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(path)?;

        Ok(Self {
            file,
            allocated: RwLock::new(HashSet::new()),
            free_list: Mutex::new(BTreeSet::new()),
            next_page_id: AtomicI32::new(0),
            entries: FileEntryTable::new(),
        })
    }

    fn ensure_parent_dir(path: &Path) -> std::io::Result<()> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        Ok(())
    }

    fn check_allocated(&self, page_id: PageId) -> Result<(), DiskError> {
        if !self.allocated.read().unwrap().contains(&page_id.value()) {
            return Err(DiskError::PageNotAllocated(page_id));
        }
        Ok(())
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

    fn page_offset(page_id: PageId) -> u64 {
        (page_id.value() as u64) * (PAGE_SIZE as u64)
    }

    fn read_page_at(&self, page_id: PageId, destination: &mut [u8]) -> Result<(), DiskError> {
        let offset = Self::page_offset(page_id);
        let mut read = 0;
        while read < PAGE_SIZE {
            let n = Self::read_at(&self.file, &mut destination[read..], offset + read as u64)
                .map_err(|source| DiskError::Io { page_id, source })?;
            if n == 0 {
                return Err(DiskError::Io {
                    page_id,
                    source: std::io::ErrorKind::UnexpectedEof.into(),
                });
            }
            read += n;
        }
        Ok(())
    }

    fn write_page_at(&self, page_id: PageId, page_data: &[u8]) -> Result<(), DiskError> {
        let offset = Self::page_offset(page_id);
        let mut written = 0;
        while written < PAGE_SIZE {
            let n = Self::write_at(&self.file, &page_data[written..], offset + written as u64)
                .map_err(|source| DiskError::Io { page_id, source })?;
            if n == 0 {
                return Err(DiskError::Io {
                    page_id,
                    source: std::io::ErrorKind::WriteZero.into(),
                });
            }
            written += n;
        }
        Ok(())
    }

    #[inline]
    fn read_at(file: &File, buf: &mut [u8], offset: u64) -> std::io::Result<usize> {
        #[cfg(unix)]
        {
            file.read_at(buf, offset)
        }

        #[cfg(windows)]
        {
            file.seek_read(buf, offset)
        }
    }

    #[inline]
    fn write_at(file: &File, buf: &[u8], offset: u64) -> std::io::Result<usize> {
        #[cfg(unix)]
        {
            file.write_at(buf, offset)
        }

        #[cfg(windows)]
        {
            file.seek_write(buf, offset)
        }
    }
}

impl DiskManager for DiskFileManager {
    fn allocate_page(&self, run_size: usize) -> Result<PageId, DiskError> {
        if run_size == 0 {
            return Err(DiskError::InvalidRunSize(run_size));
        }

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

        // Zero-fill the run so every allocated page is readable right away.
        let zeroed = vec![0u8; PAGE_SIZE];
        let mut allocated = self.allocated.write().unwrap();
        for offset in 0..run_size {
            let page_id = PageId::new(first + offset as i32);
            self.write_page_at(page_id, &zeroed)?;
            allocated.insert(page_id.value());
        }

        Ok(PageId::new(first))
    }

    fn deallocate_page(&self, page_id: PageId) -> Result<(), DiskError> {
        if !self.allocated.write().unwrap().remove(&page_id.value()) {
            return Err(DiskError::PageNotAllocated(page_id));
        }
        self.free_list.lock().unwrap().insert(page_id.value());
        Ok(())
    }

    fn read_page(&self, page_id: PageId, destination: &mut [u8]) -> Result<(), DiskError> {
        Self::check_buffer(destination.len())?;
        self.check_allocated(page_id)?;
        self.read_page_at(page_id, destination)
    }

    fn write_page(&self, page_id: PageId, page_data: &[u8]) -> Result<(), DiskError> {
        Self::check_buffer(page_data.len())?;
        self.check_allocated(page_id)?;
        self.write_page_at(page_id, page_data)
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
