//! Sequential scan cursors over heap files.

use crate::errors::HeapError;
use crate::heap_file::HeapFile;
use buffer::buffer::PinMode;
use disk::api::DiskManager;
use page::page_id::PageId;
use page::rid::Rid;

/// A cursor yielding every record of a heap file as `(record id, bytes)`
/// pairs, in directory order.
///
/// The cursor tracks a position (directory page, entry index, next slot) and
/// pins pages only inside [`Iterator::next`], so no pin outlives a step and
/// the pool's pin counts are level between items. A failed step finishes the
/// scan after yielding the error.
#[derive(Debug)]
pub struct HeapScan<'f, D: DiskManager> {
    file: &'f HeapFile<D>,
    dir_page_id: PageId,
    entry_index: u16,
    data_page_id: PageId,
    next_slot: u16,
    finished: bool,
}

impl<D: DiskManager> HeapFile<D> {
    /// Opens a scan positioned before the first record of the file.
    pub fn scan(&self) -> HeapScan<'_, D> {
        HeapScan {
            file: self,
            dir_page_id: self.head,
            entry_index: 0,
            data_page_id: PageId::INVALID,
            next_slot: 0,
            finished: false,
        }
    }
}

impl<'f, D: DiskManager> HeapScan<'f, D> {
    /// Positions the cursor on the data page of the current directory entry,
    /// following the chain as entries run out. Returns `false` at the end of
    /// the chain.
    fn advance_to_entry(&mut self) -> Result<bool, HeapError> {
        loop {
            let dir = self.file.buffer.pin(self.dir_page_id, PinMode::DiskIo)?;

            if self.entry_index < dir.entry_count()? {
                self.data_page_id = dir.dir_entry(self.entry_index)?.page_id;
                self.next_slot = 0;
                return Ok(true);
            }

            let next = dir.next_page()?;
            drop(dir);

            if !next.is_valid() {
                return Ok(false);
            }
            self.dir_page_id = next;
            self.entry_index = 0;
        }
    }

    /// Yields the next record of the current data page, or `None` when its
    /// occupied slots are exhausted.
    fn next_record_on_page(&mut self) -> Result<Option<(Rid, Vec<u8>)>, HeapError> {
        let page = self.file.buffer.pin(self.data_page_id, PinMode::DiskIo)?;

        match page.next_occupied_slot(self.next_slot)? {
            Some(slot_no) => {
                let bytes = page.record(slot_no)?.to_vec();
                self.next_slot = slot_no + 1;
                Ok(Some((Rid::new(self.data_page_id, slot_no), bytes)))
            }
            None => Ok(None),
        }
    }
}

impl<'f, D: DiskManager> Iterator for HeapScan<'f, D> {
    type Item = Result<(Rid, Vec<u8>), HeapError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.finished {
                return None;
            }

            if !self.data_page_id.is_valid() {
                match self.advance_to_entry() {
                    Ok(true) => {}
                    Ok(false) => {
                        self.finished = true;
                        return None;
                    }
                    Err(error) => {
                        self.finished = true;
                        return Some(Err(error));
                    }
                }
            }

            match self.next_record_on_page() {
                Ok(Some(item)) => return Some(Ok(item)),
                Ok(None) => {
                    // Data page exhausted; move on to the next entry.
                    self.data_page_id = PageId::INVALID;
                    self.entry_index += 1;
                }
                Err(error) => {
                    self.finished = true;
                    return Some(Err(error));
                }
            }
        }
    }
}
