use crate::errors::insert_error::InsertError;
use crate::page::api::Page;
use crate::rid::Rid;
use binary_helpers::conversions::UsizeConversion;

impl Page {
    pub(super) fn insert_record_internal(&mut self, record: &[u8]) -> Result<Rid, InsertError> {
        let record_len = record.len();

        // free_space already reserves one slot descriptor, so appending a new
        // slot can never collide with the record bytes placed here.
        let page_free_space = self.free_space_internal()?;
        if record_len > page_free_space {
            return Err(InsertError::NotEnoughSpace {
                record_len,
                page_free_space,
            });
        }

        let reusable_slot = self.find_reusable_slot()?;

        let (start_offset, slot_no) = {
            let mut header = self.header_mut()?;

            // The record goes at the highest unused offset: right below the
            // current start of the record region.
            let free_space_ptr = header.get_free_space_ptr()? as usize;
            let start_offset = free_space_ptr - record_len;
            header.set_free_space_ptr(start_offset.to_u16()?)?;

            let slot_no = match reusable_slot {
                Some(slot_no) => slot_no,
                None => {
                    let old_slot_count = header.get_slot_count()?;
                    header.set_slot_count(old_slot_count + 1)?;
                    old_slot_count
                }
            };

            (start_offset, slot_no)
        };

        // Write the record bytes
        self.data[start_offset..(start_offset + record_len)].copy_from_slice(record);

        // Write/update the slot entry
        self.slot_array_mut()?
            .set_slot(slot_no, start_offset.to_u16()?, record_len.to_i16()?)?;

        Ok(Rid::new(self.page_id, slot_no))
    }
}
