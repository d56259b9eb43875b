use crate::errors::delete_error::DeleteError;
use crate::errors::slot_error::SlotError;
use crate::page::api::Page;
use binary_helpers::conversions::UsizeConversion;

impl Page {
    pub(super) fn delete_record_internal(&mut self, slot_no: u16) -> Result<(), DeleteError> {
        // First check if the slot is valid before doing anything. Attempts to
        // delete an out-of-range or already-empty slot must not touch the page.
        let (deleted_offset, deleted_len) = {
            let slot_array = self.slot_array_ref()?;
            let slot = slot_array.slot_ref(slot_no)?;
            if slot.is_empty()? {
                return Err(SlotError::InvalidSlot {
                    slot_no: slot_no as usize,
                }
                .into());
            }
            (slot.offset()? as usize, slot.length()? as usize)
        };

        let free_space_ptr = self.header_ref()?.get_free_space_ptr()? as usize;
        let slot_count = self.header_ref()?.get_slot_count()?;

        // Close the gap: every record stored below the deleted one shifts up
        // by its length, keeping the record region contiguous.
        self.data.copy_within(
            free_space_ptr..deleted_offset,
            free_space_ptr + deleted_len,
        );

        let shift = deleted_len.to_u16()?;
        {
            let mut slot_array = self.slot_array_mut()?;

            // Re-point the slots of the shifted records.
            for index in 0..slot_count {
                let slot = slot_array.slot_ref(index)?;
                if slot.is_empty()? {
                    continue;
                }
                let offset = slot.offset()?;
                if (offset as usize) < deleted_offset {
                    slot_array.slot_mut(index)?.set_offset(offset + shift)?;
                }
            }

            slot_array.slot_mut(slot_no)?.clear()?;
        }

        self.header_mut()?
            .set_free_space_ptr((free_space_ptr + deleted_len).to_u16()?)?;

        // If the highest-numbered slot became empty, shrink the slot array
        // past it (and past any empty slots right below it). The freed bytes
        // rejoin the free-space gap.
        let mut new_slot_count = slot_count;
        {
            let slot_array = self.slot_array_ref()?;
            while new_slot_count > 0 && slot_array.slot_ref(new_slot_count - 1)?.is_empty()? {
                new_slot_count -= 1;
            }
        }
        if new_slot_count != slot_count {
            self.header_mut()?.set_slot_count(new_slot_count)?;
        }

        Ok(())
    }
}
