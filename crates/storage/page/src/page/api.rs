use crate::PAGE_SIZE;
use crate::errors::page_error::{PageResult, WithPageId};
use crate::errors::page_op_error::PageOpError;
use crate::page_id::PageId;
use crate::page_type::PageType;
use crate::rid::Rid;

/// Wrapper around a fixed-size byte array representing a page.
#[derive(Debug)]
pub struct Page {
    /// Unique identifier of the page, mirrored from the `current_page` header field.
    pub(crate) page_id: PageId,
    /// Main binary array holding the `PAGE_SIZE` bytes of data for the page. Boxed and owned by this struct.
    pub(crate) data: Box<[u8; PAGE_SIZE]>,
}

/// Public APIs for the Page struct.
/// All public APIs use the `PageResult` type
impl Page {
    /// Creates a new page with all bytes initialized to zero.
    pub fn new_zeroed(page_id: PageId) -> Self {
        Self {
            page_id,
            data: Box::new([0; PAGE_SIZE]),
        }
    }

    /// Initializes a page for the given `PageId` and `PageType`
    /// Beware, this method will wipe out the contents of the internal byte array, zero-ing them out.
    pub fn initialize(&mut self, page_id: PageId, page_type: PageType) -> PageResult<()> {
        // Completely wipe the page by zero-ing it out.
        (&mut *self.data)[..].fill(0);
        self.page_id = page_id;

        let mut header = self
            .header_mut()
            .map_err(PageOpError::from)
            .with_page_id(page_id)?;

        // And reset the header for a fresh page.
        header
            .reset(page_id, page_type)
            .map_err(PageOpError::from)
            .with_page_id(page_id)?;

        Ok(())
    }

    /// Retrieves a record from the page by its slot number.
    ///
    /// # Arguments
    ///
    /// * `slot_no` - The slot number of the record. Indexing starts from 0.
    ///
    /// # Returns
    ///
    /// * `PageResult<&[u8]>` - A reference to the record bytes if successful.
    ///
    /// # Errors
    ///
    /// Fails with an invalid-slot error when the slot number is out of range
    /// or the slot is empty. The error is augmented with the `page_id` of the
    /// current page for better traceability.
    pub fn record(&self, slot_no: u16) -> PageResult<&[u8]> {
        self.read_record_internal(slot_no)
            .map_err(PageOpError::from)
            .with_page_id(self.page_id)
    }

    /// Inserts a record into the page, reusing the lowest-numbered empty slot
    /// if one exists and appending a new slot otherwise. The record bytes are
    /// placed at the highest unused offset of the record region.
    ///
    /// # Arguments
    ///
    /// * `record` - The record bytes to be inserted.
    ///
    /// # Returns
    ///
    /// * `PageResult<Rid>` - The record id assigned to the new record.
    ///
    /// # Errors
    ///
    /// Fails with a not-enough-space error when the record does not fit in
    /// the page's free space (which always reserves room for one more slot).
    pub fn insert_record(&mut self, record: &[u8]) -> PageResult<Rid> {
        self.insert_record_internal(record)
            .map_err(PageOpError::from)
            .with_page_id(self.page_id)
    }

    /// Overwrites a record in place. The replacement must have exactly the
    /// length of the stored record; length-changing updates are answered with
    /// a length-mismatch error and require a delete + insert instead.
    ///
    /// # Arguments
    ///
    /// * `slot_no`: the slot number of the record being updated
    /// * `record`: the new content of the record.
    pub fn update_record(&mut self, slot_no: u16, record: &[u8]) -> PageResult<()> {
        self.update_record_internal(slot_no, record)
            .map_err(PageOpError::from)
            .with_page_id(self.page_id)
    }

    /// Deletes a record from the page at the specified slot number.
    ///
    /// The record region is compacted: records stored below the deleted one
    /// shift up by its length and their slots are re-pointed, keeping the
    /// free-space region contiguous. The slot itself is marked empty and is
    /// retained unless it is the highest-numbered slot, in which case the
    /// slot count shrinks past it (and past any empty slots preceding it).
    pub fn delete_record(&mut self, slot_no: u16) -> PageResult<()> {
        self.delete_record_internal(slot_no)
            .map_err(PageOpError::from)
            .with_page_id(self.page_id)
    }

    /// Returns the number of bytes an inserted record may occupy, already
    /// reserving space for one additional slot descriptor.
    pub fn free_space(&self) -> PageResult<usize> {
        self.free_space_internal()
            .map_err(PageOpError::from)
            .with_page_id(self.page_id)
    }

    /// Returns the lowest occupied slot number that is `start` or higher, or
    /// `None` when no such slot exists. Scan cursors use this to step through
    /// the live records of a page.
    pub fn next_occupied_slot(&self, start: u16) -> PageResult<Option<u16>> {
        self.next_occupied_slot_internal(start)
            .map_err(PageOpError::from)
            .with_page_id(self.page_id)
    }

    /// Returns an immutable reference to the underlying data of the page.
    pub fn data(&self) -> &[u8; PAGE_SIZE] {
        &self.data
    }

    /// Returns a mutable reference to the underlying byte array of the page
    pub fn data_mut(&mut self) -> &mut [u8; PAGE_SIZE] {
        &mut self.data
    }
}
