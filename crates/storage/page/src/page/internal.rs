use crate::errors::header_error::HeaderError;
use crate::errors::slot_error::SlotError;
use crate::page::api::Page;
use crate::slot::SLOT_SIZE;
use crate::slot_array::{SlotArrayMut, SlotArrayRef};
use crate::{HEADER_SIZE, PAGE_SIZE};

/// Internal methods for the `Page` struct.
impl Page {
    /// Returns an immutable view of the slot array.
    #[inline]
    pub(crate) fn slot_array_ref(&'_ self) -> Result<SlotArrayRef<'_>, SlotError> {
        let slot_count = self.header_ref()?.get_slot_count()?;
        let region_end = slot_region_end(slot_count)?;
        SlotArrayRef::new(&self.data[HEADER_SIZE..region_end], slot_count)
    }

    /// Returns a mutable view of the slot array.
    pub(crate) fn slot_array_mut(&'_ mut self) -> Result<SlotArrayMut<'_>, SlotError> {
        let slot_count = self.header_ref()?.get_slot_count()?;
        let region_end = slot_region_end(slot_count)?;
        SlotArrayMut::new(&mut self.data[HEADER_SIZE..region_end], slot_count)
    }

    /// The size of the gap between the slot array and the record region.
    /// Unlike [`Page::free_space_internal`], this does not reserve room for a
    /// further slot descriptor.
    #[inline]
    pub(super) fn raw_free_space(&self) -> Result<usize, HeaderError> {
        let header = self.header_ref()?;
        let free_space_ptr = header.get_free_space_ptr()? as usize;
        let slot_count = header.get_slot_count()? as usize;
        Ok(free_space_ptr.saturating_sub(HEADER_SIZE + slot_count * SLOT_SIZE))
    }

    /// The insertable size of the page: the free-space gap minus the 4 bytes
    /// reserved for one additional slot descriptor.
    #[inline]
    pub(super) fn free_space_internal(&self) -> Result<usize, HeaderError> {
        Ok(self.raw_free_space()?.saturating_sub(SLOT_SIZE))
    }

    /// Finds the lowest-numbered empty slot, if any. Insertions prefer such a
    /// slot over growing the slot array.
    pub(super) fn find_reusable_slot(&self) -> Result<Option<u16>, SlotError> {
        let slot_count = self.header_ref()?.get_slot_count()?;
        let slot_array = self.slot_array_ref()?;

        for slot_no in 0..slot_count {
            let slot = slot_array.slot_ref(slot_no)?;
            if slot.is_empty()? {
                return Ok(Some(slot.slot_no()));
            }
        }

        Ok(None)
    }
}

/// End offset of the slot array region, bounds-checked against the page so a
/// corrupted `slot_count` surfaces as an error instead of an out-of-bounds
/// slice.
fn slot_region_end(slot_count: u16) -> Result<usize, SlotError> {
    let region_end = HEADER_SIZE + slot_count as usize * SLOT_SIZE;
    if region_end > PAGE_SIZE {
        return Err(SlotError::SlotRegionSizeMismatch {
            expected_size: region_end - HEADER_SIZE,
            actual_size: PAGE_SIZE - HEADER_SIZE,
        });
    }
    Ok(region_end)
}
