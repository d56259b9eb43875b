//! Entry operations for directory pages.
//!
//! A directory page shares the common page header; its payload is a
//! forward-growing array of fixed-size entries, one per data page of the heap
//! file, each recording the data page's id, its live record count, and its
//! insertable free space. The header `slot_count` field doubles as the entry
//! count.

use crate::errors::directory_error::DirectoryError;
use crate::errors::page_error::{PageResult, WithPageId};
use crate::errors::page_op_error::PageOpError;
use crate::page::api::Page;
use crate::page_id::PageId;
use crate::{HEADER_SIZE, PAGE_SIZE};
use binary_helpers::be::{read_be, write_be};

/// Fixed size of a directory entry in bytes.
pub const ENTRY_SIZE: usize = 8;

/// Number of entries a single directory page can hold.
pub const MAX_ENTRIES: usize = (PAGE_SIZE - HEADER_SIZE) / ENTRY_SIZE;

/// One directory entry, describing a single data page of a heap file.
///
/// # Format
/// | Field          | Type | Offset |
/// |----------------|------|--------|
/// | `page_id`      | i32  | 0      |
/// | `record_count` | u16  | 4      |
/// | `free_count`   | u16  | 6      |
///
/// All fields big-endian.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DirEntry {
    /// Id of the data page this entry describes.
    pub page_id: PageId,
    /// Number of live records on the data page.
    pub record_count: u16,
    /// The data page's current insertable free space.
    pub free_count: u16,
}

impl Page {
    /// Returns the number of entries stored on this directory page.
    pub fn entry_count(&self) -> PageResult<u16> {
        let own_id = self.page_id;
        self.header_ref()
            .and_then(|header| header.get_slot_count())
            .map_err(DirectoryError::from)
            .map_err(PageOpError::from)
            .with_page_id(own_id)
    }

    /// Sets the number of entries stored on this directory page.
    pub fn set_entry_count(&mut self, count: u16) -> PageResult<()> {
        let own_id = self.page_id;
        self.set_entry_count_internal(count)
            .map_err(PageOpError::from)
            .with_page_id(own_id)
    }

    /// Reads the entry at the given index.
    pub fn dir_entry(&self, index: u16) -> PageResult<DirEntry> {
        self.dir_entry_internal(index)
            .map_err(PageOpError::from)
            .with_page_id(self.page_id)
    }

    /// Overwrites the entry at the given index. The index must be below the
    /// current entry count; appending therefore bumps the count first.
    pub fn set_dir_entry(&mut self, index: u16, entry: DirEntry) -> PageResult<()> {
        let own_id = self.page_id;
        self.set_dir_entry_internal(index, entry)
            .map_err(PageOpError::from)
            .with_page_id(own_id)
    }

    /// Removes the entry at `index` by shifting the entries after it down by
    /// one position. Does **not** decrement the entry count; the caller does
    /// so once it has finished the surrounding bookkeeping.
    pub fn compact_entry(&mut self, index: u16) -> PageResult<()> {
        let own_id = self.page_id;
        self.compact_entry_internal(index)
            .map_err(PageOpError::from)
            .with_page_id(own_id)
    }

    fn set_entry_count_internal(&mut self, count: u16) -> Result<(), DirectoryError> {
        if count as usize > MAX_ENTRIES {
            return Err(DirectoryError::CapacityExceeded {
                count: count as usize,
            });
        }
        self.header_mut()?.set_slot_count(count)?;
        Ok(())
    }

    fn dir_entry_internal(&self, index: u16) -> Result<DirEntry, DirectoryError> {
        self.check_entry_index(index)?;
        let offset = entry_offset(index);

        Ok(DirEntry {
            page_id: PageId::new(read_be::<i32>(&*self.data, offset)?),
            record_count: read_be::<u16>(&*self.data, offset + 4)?,
            free_count: read_be::<u16>(&*self.data, offset + 6)?,
        })
    }

    fn set_dir_entry_internal(&mut self, index: u16, entry: DirEntry) -> Result<(), DirectoryError> {
        self.check_entry_index(index)?;
        let offset = entry_offset(index);

        write_be::<i32>(&mut *self.data, offset, entry.page_id.value())?;
        write_be::<u16>(&mut *self.data, offset + 4, entry.record_count)?;
        write_be::<u16>(&mut *self.data, offset + 6, entry.free_count)?;
        Ok(())
    }

    fn compact_entry_internal(&mut self, index: u16) -> Result<(), DirectoryError> {
        self.check_entry_index(index)?;
        let count = self.header_ref()?.get_slot_count()?;

        self.data.copy_within(
            entry_offset(index + 1)..entry_offset(count),
            entry_offset(index),
        );

        // Scrub the now-duplicated last entry.
        self.data[entry_offset(count - 1)..entry_offset(count)].fill(0);
        Ok(())
    }

    fn check_entry_index(&self, index: u16) -> Result<(), DirectoryError> {
        let count = self.header_ref()?.get_slot_count()?;
        if index >= count {
            return Err(DirectoryError::InvalidEntry {
                index: index as usize,
            });
        }
        Ok(())
    }
}

fn entry_offset(index: u16) -> usize {
    HEADER_SIZE + index as usize * ENTRY_SIZE
}

#[cfg(test)]
mod directory_tests {
    use super::*;
    use crate::page_type::PageType;

    fn empty_directory_page() -> Page {
        let mut page = Page::new_zeroed(PageId::new(0));
        page.initialize(PageId::new(0), PageType::Directory).unwrap();
        page
    }

    fn entry(page_id: i32, record_count: u16, free_count: u16) -> DirEntry {
        DirEntry {
            page_id: PageId::new(page_id),
            record_count,
            free_count,
        }
    }

    #[test]
    fn max_entries_matches_page_geometry() {
        assert_eq!(MAX_ENTRIES, (PAGE_SIZE - HEADER_SIZE) / ENTRY_SIZE);
        assert_eq!(MAX_ENTRIES, 125);
    }

    #[test]
    fn entries_round_trip() {
        let mut page = empty_directory_page();
        page.set_entry_count(2).unwrap();
        page.set_dir_entry(0, entry(7, 3, 500)).unwrap();
        page.set_dir_entry(1, entry(9, 1, 996)).unwrap();

        assert_eq!(page.dir_entry(0).unwrap(), entry(7, 3, 500));
        assert_eq!(page.dir_entry(1).unwrap(), entry(9, 1, 996));
    }

    #[test]
    fn access_past_entry_count_is_rejected() {
        let mut page = empty_directory_page();
        page.set_entry_count(1).unwrap();

        assert!(page.dir_entry(1).is_err());
        assert!(page.set_dir_entry(1, entry(1, 1, 1)).is_err());
    }

    #[test]
    fn entry_count_is_capped_at_capacity() {
        let mut page = empty_directory_page();
        assert!(page.set_entry_count(MAX_ENTRIES as u16).is_ok());
        assert!(page.set_entry_count(MAX_ENTRIES as u16 + 1).is_err());
    }

    #[test]
    fn compact_shifts_entries_down_and_keeps_count() {
        let mut page = empty_directory_page();
        page.set_entry_count(3).unwrap();
        page.set_dir_entry(0, entry(10, 1, 100)).unwrap();
        page.set_dir_entry(1, entry(20, 2, 200)).unwrap();
        page.set_dir_entry(2, entry(30, 3, 300)).unwrap();

        page.compact_entry(1).unwrap();

        // The caller owns the count decrement.
        assert_eq!(page.entry_count().unwrap(), 3);
        assert_eq!(page.dir_entry(0).unwrap(), entry(10, 1, 100));
        assert_eq!(page.dir_entry(1).unwrap(), entry(30, 3, 300));

        page.set_entry_count(2).unwrap();
        assert_eq!(page.entry_count().unwrap(), 2);
    }

    #[test]
    fn compact_of_last_entry_just_scrubs_it() {
        let mut page = empty_directory_page();
        page.set_entry_count(2).unwrap();
        page.set_dir_entry(0, entry(10, 1, 100)).unwrap();
        page.set_dir_entry(1, entry(20, 2, 200)).unwrap();

        page.compact_entry(1).unwrap();
        page.set_entry_count(1).unwrap();

        assert_eq!(page.dir_entry(0).unwrap(), entry(10, 1, 100));
    }
}
