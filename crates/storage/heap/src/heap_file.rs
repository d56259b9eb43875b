//! The heap file: an unordered record collection over a directory-of-pages
//! structure.
//!
//! A heap file is a doubly-linked chain of directory pages starting at a
//! *head* page. Each directory entry describes one data page: its id, its
//! live record count, and its insertable free space. Records live on the data
//! pages; the directory is the map used to find space for inserts and to
//! decide when a data page can be given back to the disk manager.
//!
//! Pin discipline: operations pin one page at a time and release it before
//! pinning the next (only the chain re-link on directory removal briefly
//! touches two neighbors, one after the other), so a heap file works over a
//! single-frame pool. Guards unpin clean on error paths and dirty on success
//! paths.

use crate::errors::HeapError;
use buffer::buffer::{BufferManager, PinMode};
use disk::api::DiskManager;
use page::errors::page_error::PageError;
use page::page::directory::{DirEntry, MAX_ENTRIES};
use page::page_id::PageId;
use page::page_type::PageType;
use page::rid::Rid;
use page::{HEADER_SIZE, PAGE_SIZE};
use std::sync::Arc;

/// Largest record a heap file accepts: a page must fit the header, one slot
/// descriptor, and the record itself.
pub const MAX_RECORD_SIZE: usize = PAGE_SIZE - HEADER_SIZE - 4;

/// Where a data page is recorded in the directory chain.
#[derive(Debug, Clone, Copy)]
struct EntryLocation {
    dir_page_id: PageId,
    entry_index: u16,
    data_page_id: PageId,
}

/// A multi-page unordered collection of variable-length records.
///
/// Named files persist: their name resolves to the head directory page
/// through the disk manager's file-entry table, surviving handle drops.
/// Unnamed files are temporary; dropping the handle deletes the file.
#[derive(Debug)]
pub struct HeapFile<D: DiskManager> {
    pub(crate) buffer: Arc<BufferManager<D>>,
    disk: Arc<D>,
    name: Option<String>,
    pub(crate) head: PageId,
    temporary: bool,
    deleted: bool,
}

impl<D: DiskManager> HeapFile<D> {
    /// Opens the named heap file, creating it if the name is not registered
    /// yet; with no name, creates a temporary file that is deleted when the
    /// handle is dropped.
    pub fn new(
        buffer: Arc<BufferManager<D>>,
        disk: Arc<D>,
        name: Option<&str>,
    ) -> Result<Self, HeapError> {
        if let Some(name) = name
            && let Some(head) = disk.get_file_entry(name)?
        {
            tracing::debug!(file = name, %head, "opened heap file");
            return Ok(Self {
                buffer,
                disk,
                name: Some(name.to_string()),
                head,
                temporary: false,
                deleted: false,
            });
        }

        // Named-but-absent or unnamed: the file starts as a single empty
        // directory page, which stays the head for the file's whole lifetime.
        let head = {
            let (head, mut guard) = buffer.new_page(1)?;
            guard.initialize(head, PageType::Directory)?;
            guard.mark_dirty();
            head
        };

        if let Some(name) = name {
            if let Err(error) = disk.add_file_entry(name, head) {
                if let Err(free_error) = buffer.free_page(head) {
                    tracing::warn!(%head, error = %free_error,
                        "failed to roll back head allocation after registration failure");
                }
                return Err(error.into());
            }
            tracing::debug!(file = name, %head, "created heap file");
        } else {
            tracing::debug!(%head, "created temporary heap file");
        }

        Ok(Self {
            buffer,
            disk,
            name: name.map(str::to_string),
            head,
            temporary: name.is_none(),
            deleted: false,
        })
    }

    /// The id of the head directory page.
    pub fn head(&self) -> PageId {
        self.head
    }

    /// The file's registered name, if it has one.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Whether the file is deleted when the handle is dropped.
    pub fn is_temporary(&self) -> bool {
        self.temporary
    }

    /// Inserts a record and returns its stable record id.
    ///
    /// The directory chain is searched for a data page with enough free
    /// space; when none exists, a fresh data page is allocated and recorded
    /// in the directory first.
    pub fn insert(&self, record: &[u8]) -> Result<Rid, HeapError> {
        if record.len() > MAX_RECORD_SIZE {
            return Err(HeapError::RecordTooLarge {
                record_len: record.len(),
                max: MAX_RECORD_SIZE,
            });
        }

        let location = match self.find_space(record.len())? {
            Some(location) => location,
            None => self.allocate_data_page()?,
        };

        let (rid, free_count) = {
            let mut data = self.buffer.pin_mut(location.data_page_id, PinMode::DiskIo)?;
            let rid = data.insert_record(record)?;
            let free_count = data.free_space()? as u16;
            data.mark_dirty();
            (rid, free_count)
        };

        self.update_dir_entry(location, 1, free_count)?;
        Ok(rid)
    }

    /// Returns a copy of the record stored under `rid`.
    pub fn select(&self, rid: Rid) -> Result<Vec<u8>, HeapError> {
        let page = self.buffer.pin(rid.page_id, PinMode::DiskIo)?;
        let record = page.record(rid.slot_no).map_err(|e| rid_error(e, rid))?;
        Ok(record.to_vec())
    }

    /// Overwrites the record stored under `rid` in place. The replacement
    /// must have the stored record's exact length; length-changing updates
    /// are a delete + insert, which yields a new record id.
    pub fn update(&self, rid: Rid, record: &[u8]) -> Result<(), HeapError> {
        let mut page = self.buffer.pin_mut(rid.page_id, PinMode::DiskIo)?;
        page.update_record(rid.slot_no, record)
            .map_err(|e| rid_error(e, rid))?;
        page.mark_dirty();
        Ok(())
    }

    /// Deletes the record stored under `rid`. When this removes the data
    /// page's last record, the page is given back to the disk manager and its
    /// directory entry disappears with it.
    pub fn delete(&self, rid: Rid) -> Result<(), HeapError> {
        let (location, entry) = self
            .locate_entry(rid.page_id)?
            .ok_or(HeapError::InvalidRid(rid))?;

        let free_count = {
            let mut page = self.buffer.pin_mut(rid.page_id, PinMode::DiskIo)?;
            page.delete_record(rid.slot_no)
                .map_err(|e| rid_error(e, rid))?;
            let free_count = page.free_space()? as u16;
            page.mark_dirty();
            free_count
        };

        if entry.record_count <= 1 {
            self.remove_dir_entry(location)?;
        } else {
            self.update_dir_entry(location, -1, free_count)?;
        }
        Ok(())
    }

    /// Number of records in the file: the sum of the directory entries'
    /// record counts.
    pub fn record_count(&self) -> Result<usize, HeapError> {
        let mut total = 0usize;
        let mut dir_page_id = self.head;

        while dir_page_id.is_valid() {
            let dir = self.buffer.pin(dir_page_id, PinMode::DiskIo)?;
            for index in 0..dir.entry_count()? {
                total += dir.dir_entry(index)?.record_count as usize;
            }
            dir_page_id = dir.next_page()?;
        }

        Ok(total)
    }

    /// Deletes the whole file: every data page, then every directory page,
    /// and for named files the name registration. The handle stays usable
    /// only for `Drop`; the operation is idempotent.
    pub fn delete_file(&mut self) -> Result<(), HeapError> {
        if self.deleted {
            return Ok(());
        }

        let mut dir_page_id = self.head;
        while dir_page_id.is_valid() {
            // Read the forward link before freeing the page under the cursor.
            let (next, data_pages) = {
                let dir = self.buffer.pin(dir_page_id, PinMode::DiskIo)?;
                let mut data_pages = Vec::new();
                for index in 0..dir.entry_count()? {
                    data_pages.push(dir.dir_entry(index)?.page_id);
                }
                (dir.next_page()?, data_pages)
            };

            for data_page_id in data_pages {
                self.buffer.free_page(data_page_id)?;
            }
            self.buffer.free_page(dir_page_id)?;
            dir_page_id = next;
        }

        if let Some(name) = &self.name {
            // Free the name as well, so a file of the same name can be
            // created again later.
            self.disk.delete_file_entry(name)?;
            tracing::debug!(file = name.as_str(), "deleted heap file");
        } else {
            tracing::debug!(head = %self.head, "deleted temporary heap file");
        }

        self.deleted = true;
        Ok(())
    }

    /// Walks the directory chain for an entry whose data page can take
    /// `record_len` more bytes. `free_count` mirrors the data page's
    /// `free_space()`, which already reserves a slot descriptor.
    fn find_space(&self, record_len: usize) -> Result<Option<EntryLocation>, HeapError> {
        let mut dir_page_id = self.head;

        while dir_page_id.is_valid() {
            let dir = self.buffer.pin(dir_page_id, PinMode::DiskIo)?;
            for entry_index in 0..dir.entry_count()? {
                let entry = dir.dir_entry(entry_index)?;
                if entry.free_count as usize >= record_len {
                    return Ok(Some(EntryLocation {
                        dir_page_id,
                        entry_index,
                        data_page_id: entry.page_id,
                    }));
                }
            }
            dir_page_id = dir.next_page()?;
        }

        Ok(None)
    }

    /// Finds the directory entry describing `data_page_id`.
    fn locate_entry(
        &self,
        data_page_id: PageId,
    ) -> Result<Option<(EntryLocation, DirEntry)>, HeapError> {
        let mut dir_page_id = self.head;

        while dir_page_id.is_valid() {
            let dir = self.buffer.pin(dir_page_id, PinMode::DiskIo)?;
            for entry_index in 0..dir.entry_count()? {
                let entry = dir.dir_entry(entry_index)?;
                if entry.page_id == data_page_id {
                    return Ok(Some((
                        EntryLocation {
                            dir_page_id,
                            entry_index,
                            data_page_id,
                        },
                        entry,
                    )));
                }
            }
            dir_page_id = dir.next_page()?;
        }

        Ok(None)
    }

    /// Allocates a fresh data page and appends its directory entry, growing
    /// the directory chain by one page when every directory page is full.
    fn allocate_data_page(&self) -> Result<EntryLocation, HeapError> {
        // Find a directory page with room for one more entry, remembering the
        // chain tail in case a new directory page must be appended.
        let mut dir_page_id = self.head;
        let mut tail = self.head;
        let mut target: Option<(PageId, u16)> = None;

        while dir_page_id.is_valid() {
            let dir = self.buffer.pin(dir_page_id, PinMode::DiskIo)?;
            let entry_count = dir.entry_count()?;
            if (entry_count as usize) < MAX_ENTRIES {
                target = Some((dir_page_id, entry_count));
                break;
            }
            tail = dir_page_id;
            dir_page_id = dir.next_page()?;
        }

        let (dir_page_id, entry_index) = match target {
            Some(target) => target,
            None => {
                // Append a fresh directory page behind the tail.
                let new_dir = {
                    let (new_dir, mut guard) = self.buffer.new_page(1)?;
                    guard.initialize(new_dir, PageType::Directory)?;
                    guard.set_prev_page(tail)?;
                    guard.mark_dirty();
                    new_dir
                };
                {
                    let mut tail_guard = self.buffer.pin_mut(tail, PinMode::DiskIo)?;
                    tail_guard.set_next_page(new_dir)?;
                    tail_guard.mark_dirty();
                }
                tracing::debug!(file = ?self.name, %new_dir, "appended directory page");
                (new_dir, 0)
            }
        };

        // The new data page starts empty; its entry records the full free
        // space of a fresh page.
        let (data_page_id, free_count) = {
            let (data_page_id, mut guard) = self.buffer.new_page(1)?;
            guard.initialize(data_page_id, PageType::Data)?;
            let free_count = guard.free_space()? as u16;
            guard.mark_dirty();
            (data_page_id, free_count)
        };

        {
            let mut dir = self.buffer.pin_mut(dir_page_id, PinMode::DiskIo)?;
            dir.set_entry_count(entry_index + 1)?;
            dir.set_dir_entry(
                entry_index,
                DirEntry {
                    page_id: data_page_id,
                    record_count: 0,
                    free_count,
                },
            )?;
            dir.mark_dirty();
        }

        tracing::debug!(file = ?self.name, %data_page_id, "allocated data page");
        Ok(EntryLocation {
            dir_page_id,
            entry_index,
            data_page_id,
        })
    }

    /// Applies a record-count delta and the new free count to a directory
    /// entry.
    fn update_dir_entry(
        &self,
        location: EntryLocation,
        delta_records: i32,
        free_count: u16,
    ) -> Result<(), HeapError> {
        let mut dir = self.buffer.pin_mut(location.dir_page_id, PinMode::DiskIo)?;
        let mut entry = dir.dir_entry(location.entry_index)?;
        entry.record_count = (entry.record_count as i32 + delta_records) as u16;
        entry.free_count = free_count;
        dir.set_dir_entry(location.entry_index, entry)?;
        dir.mark_dirty();
        Ok(())
    }

    /// Removes a directory entry whose data page ran out of records, freeing
    /// the data page. A directory page left with no entries is unlinked from
    /// the chain and freed as well - unless it is the head, which outlives
    /// every record so the file keeps its identity.
    fn remove_dir_entry(&self, location: EntryLocation) -> Result<(), HeapError> {
        self.buffer.free_page(location.data_page_id)?;

        let (unlink, prev, next) = {
            let mut dir = self.buffer.pin_mut(location.dir_page_id, PinMode::DiskIo)?;
            dir.compact_entry(location.entry_index)?;
            let entry_count = dir.entry_count()? - 1;
            dir.set_entry_count(entry_count)?;

            let unlink = entry_count == 0 && location.dir_page_id != self.head;
            if !unlink {
                dir.mark_dirty();
            }
            // When the page is about to be unlinked its content no longer
            // matters; it is released clean and freed below.
            (unlink, dir.prev_page()?, dir.next_page()?)
        };

        if unlink {
            {
                let mut prev_guard = self.buffer.pin_mut(prev, PinMode::DiskIo)?;
                prev_guard.set_next_page(next)?;
                prev_guard.mark_dirty();
            }
            if next.is_valid() {
                let mut next_guard = self.buffer.pin_mut(next, PinMode::DiskIo)?;
                next_guard.set_prev_page(prev)?;
                next_guard.mark_dirty();
            }
            self.buffer.free_page(location.dir_page_id)?;
            tracing::debug!(file = ?self.name, dir_page = %location.dir_page_id,
                "unlinked empty directory page");
        }

        Ok(())
    }
}

impl<D: DiskManager> Drop for HeapFile<D> {
    fn drop(&mut self) {
        if self.temporary && !self.deleted {
            if let Err(error) = self.delete_file() {
                tracing::warn!(head = %self.head, %error,
                    "failed to delete temporary heap file on drop");
            }
        }
    }
}

/// Maps page-level record addressing failures onto the heap-level invalid-rid
/// error; anything else propagates untouched.
fn rid_error(error: PageError, rid: Rid) -> HeapError {
    if error.is_invalid_slot() || error.is_length_mismatch() {
        HeapError::InvalidRid(rid)
    } else {
        HeapError::Page(error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use buffer::replacer::ReplacementPolicy;
    use disk::in_memory_disk_manager::InMemoryDiskManager;

    fn env(
        pool_size: usize,
    ) -> (
        Arc<InMemoryDiskManager>,
        Arc<BufferManager<InMemoryDiskManager>>,
    ) {
        let disk = Arc::new(InMemoryDiskManager::new());
        let buffer = Arc::new(BufferManager::new(
            disk.clone(),
            pool_size,
            ReplacementPolicy::Clock,
        ));
        (disk, buffer)
    }

    #[test]
    fn insert_select_round_trip() {
        let (disk, buffer) = env(8);
        let file = HeapFile::new(buffer.clone(), disk, Some("f")).unwrap();

        let rid = file.insert(&[0x41, 0x42, 0x43]).unwrap();
        assert_eq!(rid.slot_no, 0);
        assert_eq!(file.select(rid).unwrap(), vec![0x41, 0x42, 0x43]);
        assert_eq!(file.record_count().unwrap(), 1);
        assert_eq!(buffer.pinned_frame_count(), 0);
    }

    #[test]
    fn max_size_record_is_accepted_and_one_byte_more_is_not() {
        let (disk, buffer) = env(8);
        let file = HeapFile::new(buffer.clone(), disk, Some("f")).unwrap();

        let rid = file.insert(&vec![9u8; MAX_RECORD_SIZE]).unwrap();
        assert_eq!(file.select(rid).unwrap().len(), MAX_RECORD_SIZE);

        let error = file.insert(&vec![9u8; MAX_RECORD_SIZE + 1]).unwrap_err();
        assert!(matches!(error, HeapError::RecordTooLarge { .. }));
        assert_eq!(file.record_count().unwrap(), 1);
        assert_eq!(buffer.pinned_frame_count(), 0);
    }

    #[test]
    fn equal_length_update_succeeds_in_place() {
        let (disk, buffer) = env(8);
        let file = HeapFile::new(buffer.clone(), disk, Some("f")).unwrap();

        let rid = file.insert(b"hello world").unwrap();
        file.update(rid, b"HELLO WORLD").unwrap();

        assert_eq!(file.select(rid).unwrap(), b"HELLO WORLD");
        assert_eq!(buffer.pinned_frame_count(), 0);
    }

    #[test]
    fn length_changing_update_is_an_invalid_rid_and_unpins_clean() {
        let (disk, buffer) = env(8);
        let file = HeapFile::new(buffer.clone(), disk.clone(), Some("f")).unwrap();

        let rid = file.insert(b"hello world").unwrap();
        buffer.flush_all_pages().unwrap();
        let writes_before = disk.pages_written();

        let error = file.update(rid, b"too long to fit in place").unwrap_err();
        assert!(matches!(error, HeapError::InvalidRid(r) if r == rid));
        assert_eq!(buffer.pinned_frame_count(), 0);

        // The failed update unpinned clean, so there is nothing to flush.
        buffer.flush_all_pages().unwrap();
        assert_eq!(disk.pages_written(), writes_before);
        assert_eq!(file.select(rid).unwrap(), b"hello world");
    }

    #[test]
    fn operations_on_a_deleted_record_report_invalid_rid() {
        let (disk, buffer) = env(8);
        let file = HeapFile::new(buffer.clone(), disk, Some("f")).unwrap();

        let keep = file.insert(b"keep").unwrap();
        let gone = file.insert(b"gone").unwrap();
        file.delete(gone).unwrap();

        assert!(matches!(
            file.select(gone).unwrap_err(),
            HeapError::InvalidRid(_)
        ));
        assert!(matches!(
            file.update(gone, b"gone").unwrap_err(),
            HeapError::InvalidRid(_)
        ));
        assert_eq!(file.select(keep).unwrap(), b"keep");
        assert_eq!(buffer.pinned_frame_count(), 0);
    }

    #[test]
    fn record_count_follows_inserts_and_deletes() {
        let (disk, buffer) = env(8);
        let file = HeapFile::new(buffer.clone(), disk, Some("f")).unwrap();

        let mut rids = Vec::new();
        for value in 0..10u8 {
            rids.push(file.insert(&[value; 50]).unwrap());
        }
        assert_eq!(file.record_count().unwrap(), 10);

        for rid in rids.drain(..4) {
            file.delete(rid).unwrap();
        }
        assert_eq!(file.record_count().unwrap(), 6);
        assert_eq!(buffer.pinned_frame_count(), 0);
    }

    #[test]
    fn rids_survive_surrounding_mutations() {
        let (disk, buffer) = env(8);
        let file = HeapFile::new(buffer.clone(), disk, Some("f")).unwrap();

        let a = file.insert(b"aaaa").unwrap();
        let b = file.insert(b"bbbb").unwrap();
        let c = file.insert(b"cccc").unwrap();

        file.delete(b).unwrap();
        file.update(c, b"CCCC").unwrap();
        file.insert(b"dddd").unwrap();

        assert_eq!(file.select(a).unwrap(), b"aaaa");
        assert_eq!(file.select(c).unwrap(), b"CCCC");
    }

    #[test]
    fn heap_file_works_over_a_single_frame_pool() {
        let (disk, buffer) = env(1);
        let file = HeapFile::new(buffer.clone(), disk, Some("f")).unwrap();

        let first = file.insert(&[1u8; 200]).unwrap();
        let second = file.insert(&[2u8; 200]).unwrap();

        assert_eq!(file.select(first).unwrap(), vec![1u8; 200]);
        assert_eq!(file.select(second).unwrap(), vec![2u8; 200]);
        assert_eq!(file.record_count().unwrap(), 2);
        file.delete(first).unwrap();
        assert_eq!(file.record_count().unwrap(), 1);
        assert_eq!(buffer.pinned_frame_count(), 0);
    }
}
