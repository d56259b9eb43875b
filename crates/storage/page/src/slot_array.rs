//! Slot Array Handling for Data Pages
//! ----------------------------------
//!
//! This module provides zero-copy immutable and mutable views
//! (`SlotArrayRef` and `SlotArrayMut`) into the *slot array region* of a
//! slotted data page. The slot array is a compact structure containing
//! fixed-size slots, each describing the offset and length of a record stored
//! elsewhere on the page.
//!
//! The slot array starts right after the page header and grows **forward**,
//! toward the end of the page; the record region grows backward from the page
//! end to meet it. Slot number 0 is therefore the first `SLOT_SIZE` chunk of
//! the region:
//!
//! ```text
//!     physical_start = slot_no * SLOT_SIZE
//!     physical_end   = physical_start + SLOT_SIZE
//! ```
//!
//! # Zero-Copy Access
//!
//! These types never own memory. They merely borrow a slice of the page:
//!
//! - `SlotArrayRef<'a>`: borrows `&'a [u8]`
//! - `SlotArrayMut<'a>`: borrows `&'a mut [u8]`
//!
//! Slot access returns lightweight zero-copy views:
//!
//! - `SlotRef<'a>` for reading a slot
//! - `SlotMut<'a>` for modifying it
//!
//! The module performs strict length and bounds verification at construction,
//! ensuring the provided byte region is exactly `slot_count * SLOT_SIZE`.

use crate::errors::slot_error::SlotError;
use crate::slot::{SLOT_SIZE, SlotMut, SlotRef};
use std::ops::Range;

/// Immutable zero-copy view into the slot array of a data page.
#[derive(Debug)]
pub(crate) struct SlotArrayRef<'a> {
    /// View into the raw bytes of the slot array.
    /// Each slot is of length `SLOT_SIZE` bytes.
    bytes: &'a [u8],
}

impl<'a> SlotArrayRef<'a> {
    /// Creates a new SlotArrayRef.
    /// Validates that the slice length matches the expected slot count.
    pub(super) fn new(bytes: &'a [u8], slot_count: u16) -> Result<Self, SlotError> {
        let expected_len = slot_count as usize * SLOT_SIZE;

        if bytes.len() != expected_len {
            return Err(SlotError::SlotRegionSizeMismatch {
                expected_size: expected_len,
                actual_size: bytes.len(),
            });
        }

        Ok(Self { bytes })
    }

    /// Gets an immutable view of the slot at the given slot number.
    /// Slots are zero-indexed.
    /// Returns an error if the slot number is out of bounds.
    pub(crate) fn slot_ref(&self, slot_no: u16) -> Result<SlotRef<'a>, SlotError> {
        let range = get_slot_range(self.bytes.len(), slot_no)?;

        let slot_bytes = self.bytes.get(range).ok_or(SlotError::InvalidSlot {
            slot_no: slot_no as usize,
        })?;

        SlotRef::from_raw(slot_no, slot_bytes)
    }
}

/// Mutable zero-copy view into the slot array of a data page.
#[derive(Debug)]
pub(crate) struct SlotArrayMut<'a> {
    /// View into the raw bytes of the slot array.
    /// Each slot is of length `SLOT_SIZE` bytes.
    bytes: &'a mut [u8],
}

impl<'a> SlotArrayMut<'a> {
    /// Creates a new SlotArrayMut.
    /// Validates that the slice length matches the expected slot count.
    pub(super) fn new(bytes: &'a mut [u8], slot_count: u16) -> Result<Self, SlotError> {
        let expected_len = slot_count as usize * SLOT_SIZE;

        if bytes.len() != expected_len {
            return Err(SlotError::SlotRegionSizeMismatch {
                expected_size: expected_len,
                actual_size: bytes.len(),
            });
        }

        Ok(Self { bytes })
    }

    /// Gets an immutable view of the slot at the given slot number.
    /// Slots are zero-indexed.
    /// Returns an error if the slot number is out of bounds.
    pub(crate) fn slot_ref(&self, slot_no: u16) -> Result<SlotRef<'_>, SlotError> {
        let range = get_slot_range(self.bytes.len(), slot_no)?;

        let slot_bytes = self.bytes.get(range).ok_or(SlotError::InvalidSlot {
            slot_no: slot_no as usize,
        })?;

        SlotRef::from_raw(slot_no, slot_bytes)
    }

    /// Gets a mutable view of the slot at the given slot number.
    /// Slots are zero-indexed.
    /// Returns an error if the slot number is out of bounds.
    pub(crate) fn slot_mut(&mut self, slot_no: u16) -> Result<SlotMut<'_>, SlotError> {
        let range = get_slot_range(self.bytes.len(), slot_no)?;

        let slot_bytes = self.bytes.get_mut(range).ok_or(SlotError::InvalidSlot {
            slot_no: slot_no as usize,
        })?;

        SlotMut::from_raw(slot_bytes)
    }

    /// Sets the values of a slot in the slot array.
    pub(crate) fn set_slot(
        &mut self,
        slot_no: u16,
        slot_offset: u16,
        slot_length: i16,
    ) -> Result<(), SlotError> {
        let mut slot_mut = self.slot_mut(slot_no)?;
        slot_mut.set_length(slot_length)?;
        slot_mut.set_offset(slot_offset)?;
        Ok(())
    }
}

fn get_slot_range(slot_array_size: usize, slot_no: u16) -> Result<Range<usize>, SlotError> {
    let start = slot_no as usize * SLOT_SIZE;
    let end = start + SLOT_SIZE;

    if end > slot_array_size {
        return Err(SlotError::InvalidSlot {
            slot_no: slot_no as usize,
        });
    }

    Ok(start..end)
}

#[cfg(test)]
mod slot_array_ref_test {
    use super::*;

    #[test]
    fn slot_array_ref_new_invalid_size() {
        let bytes = vec![0u8; 10]; // Not a multiple of SLOT_SIZE
        let result = SlotArrayRef::new(&bytes, 3); // Expecting 3 slots (12 bytes)
        assert!(matches!(
            result,
            Err(SlotError::SlotRegionSizeMismatch {
                expected_size: 12,
                actual_size: 10
            })
        ));
    }

    #[test]
    fn slot_array_ref_new_valid() {
        let bytes = vec![0u8; SLOT_SIZE * 2]; // 2 slots
        let result = SlotArrayRef::new(&bytes, 2);
        assert!(result.is_ok());
    }

    #[test]
    fn slot_array_ref_slot_ref_invalid_index() {
        let bytes = vec![0u8; SLOT_SIZE * 2]; // 2 slots
        let slot_array = SlotArrayRef::new(&bytes, 2).unwrap();
        let result = slot_array.slot_ref(3); // Invalid slot number
        assert!(matches!(result, Err(SlotError::InvalidSlot { slot_no: 3 })));
    }

    #[test]
    fn slot_array_ref_slot_ref_valid() {
        let mut bytes = vec![0u8; SLOT_SIZE * 2]; // 2 slots
        // Initialize first slot
        bytes[0..4].copy_from_slice(&[0, 1, 0, 2]); // offset=1, length=2
        // Initialize second slot
        bytes[4..8].copy_from_slice(&[0, 3, 0, 4]); // offset=3, length=4

        let slot_array = SlotArrayRef::new(&bytes, 2).unwrap();

        let slot0 = slot_array.slot_ref(0).unwrap();
        assert_eq!(slot0.offset().unwrap(), 1);
        assert_eq!(slot0.length().unwrap(), 2);

        let slot1 = slot_array.slot_ref(1).unwrap();
        assert_eq!(slot1.offset().unwrap(), 3);
        assert_eq!(slot1.length().unwrap(), 4);
    }
}
