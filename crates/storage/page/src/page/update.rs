use crate::errors::slot_error::SlotError;
use crate::errors::update_error::UpdateError;
use crate::page::api::Page;

impl Page {
    pub(super) fn update_record_internal(
        &mut self,
        slot_no: u16,
        record: &[u8],
    ) -> Result<(), UpdateError> {
        let (offset, length) = {
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

        // The record region is never re-arranged by an update, so only an
        // exact-length replacement is possible. Anything else is a delete +
        // insert, which yields a fresh record id.
        if record.len() != length {
            return Err(UpdateError::LengthMismatch {
                expected: length,
                actual: record.len(),
            });
        }

        self.data[offset..offset + length].copy_from_slice(record);

        Ok(())
    }
}
