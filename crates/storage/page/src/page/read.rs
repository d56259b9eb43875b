use crate::errors::read_record_error::ReadRecordError;
use crate::errors::slot_error::SlotError;
use crate::page::api::Page;

/// Internal record access methods for the `Page` struct.
impl Page {
    /// Retrieves a record by its slot number.
    /// Returns a slice of bytes representing the record data.
    /// Empty slots are reported as invalid, the same as out-of-range ones.
    pub(super) fn read_record_internal(&self, slot_no: u16) -> Result<&[u8], ReadRecordError> {
        let slot = self.slot_array_ref()?.slot_ref(slot_no)?;

        if slot.is_empty()? {
            return Err(SlotError::InvalidSlot {
                slot_no: slot_no as usize,
            }
            .into());
        }

        let (offset, length) = (slot.offset()? as usize, slot.length()? as usize);

        Ok(&self.data[offset..offset + length])
    }

    /// Finds the lowest occupied slot with number `start` or higher.
    pub(super) fn next_occupied_slot_internal(
        &self,
        start: u16,
    ) -> Result<Option<u16>, ReadRecordError> {
        let slot_count = self
            .header_ref()
            .map_err(SlotError::from)?
            .get_slot_count()
            .map_err(SlotError::from)?;
        let slot_array = self.slot_array_ref()?;

        for slot_no in start..slot_count {
            if !slot_array.slot_ref(slot_no)?.is_empty()? {
                return Ok(Some(slot_no));
            }
        }

        Ok(None)
    }
}
