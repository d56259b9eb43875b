use crate::errors::slot_error::SlotError;
use binary_helpers::be::{read_be, write_be};

/// Fixed-size of a slot in bytes.
pub(crate) const SLOT_SIZE: usize = 4;

/// Length value marking a slot whose record was deleted. The slot itself is
/// retained so the slot numbers of the records after it stay stable.
pub(crate) const EMPTY_SLOT_LENGTH: i16 = -1;

/// A zero-copy read-only view into a 4-byte slot (offset: u16, length: i16) in the byte array of a data page.
#[derive(Debug)]
pub(crate) struct SlotRef<'a> {
    /// Logical index of the slot within the page.
    slot_no: u16,
    /// View into the raw bytes of the slot.
    /// # Format
    /// | Offset | Length |
    /// |--------|--------|
    /// | 0      | 2      |
    ///
    /// Both fields are stored in big-endian format.
    /// - Offset: The starting byte position of the record within the page (u16).
    /// - Length: The size of the record in bytes (i16); `-1` marks an empty slot.
    bytes: &'a [u8; SLOT_SIZE],
}

impl<'a> SlotRef<'a> {
    /// Create a new SlotRef from raw bytes and slot number.
    /// If the byte slice is not exactly 4 bytes, it returns a SizeMismatchError.
    /// Otherwise, return Ok(SlotRef).
    #[inline]
    pub(super) fn from_raw(slot_no: u16, bytes: &'a [u8]) -> Result<Self, SlotError> {
        if bytes.len() != SLOT_SIZE {
            return Err(SlotError::SlotSizeMismatch {
                expected_size: SLOT_SIZE,
                actual_size: bytes.len(),
            });
        }

        // This conversion is now infallible after the length check.
        let bytes_array: &[u8; SLOT_SIZE] = match bytes.try_into() {
            Ok(arr) => arr,
            Err(_) => unreachable!("bytes.len() == SLOT_SIZE but try_into() failed"),
        };

        Ok(Self {
            slot_no,
            bytes: bytes_array,
        })
    }

    /// Get the logical slot number.
    #[inline]
    pub(crate) fn slot_no(&self) -> u16 {
        self.slot_no
    }

    /// Read the offset (u16) from the slot (big-endian).
    #[inline]
    pub(crate) fn offset(&self) -> Result<u16, SlotError> {
        Ok(read_be::<u16>(self.bytes, 0)?)
    }

    /// Read the length (i16) from the slot (big-endian).
    #[inline]
    pub(crate) fn length(&self) -> Result<i16, SlotError> {
        Ok(read_be::<i16>(self.bytes, 2)?)
    }

    /// Whether the slot holds no record.
    #[inline]
    pub(crate) fn is_empty(&self) -> Result<bool, SlotError> {
        Ok(self.length()? < 0)
    }
}

/// A zero-copy mutable view into a 4-byte slot (offset: u16, length: i16) in the byte array of a data page.
#[derive(Debug)]
pub(crate) struct SlotMut<'a> {
    /// Mutable view into the raw bytes of the slot, same format as [`SlotRef`].
    bytes: &'a mut [u8; SLOT_SIZE],
}

impl<'a> SlotMut<'a> {
    /// Create a new SlotMut from raw bytes.
    /// If the byte slice is not exactly 4 bytes, it returns a SizeMismatchError.
    /// Otherwise, return Ok(SlotMut).
    #[inline]
    pub(super) fn from_raw(bytes: &'a mut [u8]) -> Result<Self, SlotError> {
        if bytes.len() != SLOT_SIZE {
            return Err(SlotError::SlotSizeMismatch {
                expected_size: SLOT_SIZE,
                actual_size: bytes.len(),
            });
        }

        // After checking length, this should never fail; treat failure as unreachable.
        let bytes_array: &mut [u8; SLOT_SIZE] = match bytes.try_into() {
            Ok(arr) => arr,
            Err(_) => unreachable!("bytes.len() == SLOT_SIZE but try_into() failed"),
        };

        Ok(Self { bytes: bytes_array })
    }

    /// Write the offset (u16) into the slot (big-endian).
    #[inline]
    pub(crate) fn set_offset(&mut self, offset: u16) -> Result<(), SlotError> {
        Ok(write_be::<u16>(self.bytes, 0, offset)?)
    }

    /// Write the length (i16) into the slot (big-endian).
    #[inline]
    pub(crate) fn set_length(&mut self, length: i16) -> Result<(), SlotError> {
        Ok(write_be::<i16>(self.bytes, 2, length)?)
    }

    /// Mark the slot as empty, keeping the slot itself in place.
    #[inline]
    pub(crate) fn clear(&mut self) -> Result<(), SlotError> {
        self.set_offset(0)?;
        self.set_length(EMPTY_SLOT_LENGTH)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slot_size_constant_is_four() {
        assert_eq!(SLOT_SIZE, 4);
    }

    #[test]
    fn slot_ref_from_raw_with_valid_bytes_reads_fields_correctly() {
        let bytes = [0x00, 0x01, 0x00, 0x02];
        let slot = SlotRef::from_raw(5, &bytes).unwrap();
        assert_eq!(slot.slot_no(), 5);
        assert_eq!(slot.offset().unwrap(), 1);
        assert_eq!(slot.length().unwrap(), 2);
        assert!(!slot.is_empty().unwrap());
    }

    #[test]
    fn slot_ref_from_raw_with_invalid_size_returns_size_mismatch() {
        let bytes = [0x01, 0x02, 0x03];
        let res = SlotRef::from_raw(1, &bytes);
        assert!(matches!(
            res,
            Err(SlotError::SlotSizeMismatch {
                expected_size: 4,
                actual_size: 3
            })
        ));
    }

    #[test]
    fn empty_marker_is_negative_length() {
        let bytes = [0x00, 0x00, 0xFF, 0xFF];
        let slot = SlotRef::from_raw(0, &bytes).unwrap();
        assert_eq!(slot.length().unwrap(), EMPTY_SLOT_LENGTH);
        assert!(slot.is_empty().unwrap());
    }

    #[test]
    fn zero_length_record_is_not_empty() {
        let bytes = [0x00, 0x40, 0x00, 0x00];
        let slot = SlotRef::from_raw(0, &bytes).unwrap();
        assert!(!slot.is_empty().unwrap());
    }

    #[test]
    fn slot_mut_set_offset_and_length_updates_underlying_bytes() {
        let mut bytes = [0x00, 0x00, 0x00, 0x00];
        {
            let mut slot = SlotMut::from_raw(&mut bytes).unwrap();
            slot.set_offset(0x0102).unwrap();
            slot.set_length(0x0304).unwrap();
        }
        assert_eq!(bytes, [0x01, 0x02, 0x03, 0x04]);
    }

    #[test]
    fn slot_mut_clear_marks_slot_empty() {
        let mut bytes = [0x01, 0x02, 0x00, 0x64];
        {
            let mut slot = SlotMut::from_raw(&mut bytes).unwrap();
            slot.clear().unwrap();
        }
        assert_eq!(bytes, [0x00, 0x00, 0xFF, 0xFF]);
    }

    #[test]
    fn slot_mut_from_raw_with_invalid_size_returns_size_mismatch() {
        let mut bytes = [0x01, 0x02, 0x03];
        let res = SlotMut::from_raw(&mut bytes);
        assert!(matches!(
            res,
            Err(SlotError::SlotSizeMismatch {
                expected_size: 4,
                actual_size: 3
            })
        ));
    }
}
