//! Module defining the layout and accessors for the page header shared by
//! every page type.
//!
//! # Page Header Layout
//!
//! The page header occupies the first **20 bytes** of every page and contains
//! the metadata needed to manage the page and its position within a page
//! chain. All fields are stored in **big-endian** binary format, inherited
//! from the on-disk image.
//!
//! The layout is as follows:
//!
//! | Field            | Type  | Offset | Description |
//! |------------------|-------|--------|-------------|
//! | `prev_page`      | i32   | [`PREV_PAGE`]      | Backward chain link (`-1` terminator). |
//! | `next_page`      | i32   | [`NEXT_PAGE`]      | Forward chain link (`-1` terminator). |
//! | `current_page`   | i32   | [`CURRENT_PAGE`]   | The page's own id. |
//! | `free_space_ptr` | u16   | [`FREE_SPACE_PTR`] | Byte offset of the first byte of the record region. |
//! | `slot_count`     | u16   | [`SLOT_COUNT`]     | Number of slots (entries on directory pages). |
//! | `page_type`      | u16   | [`PAGE_TYPE`]      | Page classification (data or directory). |
//!
//! Bytes 18..20 are reserved.
//!
//! ## Memory Diagram
//!
//! ```text
//! +----------------------+---------------------+-------------------+
//! |      Header          |      Slot Array     |   Record Region   |
//! |       (20B)          |    (grows right)    |   (grows left)    |
//! +----------------------+---------------------+-------------------+
//! ```
//!
//! Each constant below defines the byte offset where its corresponding field
//! is stored within the header.

use crate::PAGE_SIZE;
use crate::errors::header_error::HeaderError;
use crate::page_id::PageId;
use crate::page_type::PageType;
use binary_helpers::be::{read_be, write_be};
use paste::paste;

/// Size of the header in bytes.
pub const HEADER_SIZE: usize = 20;

/// The `HeaderRef` struct provides an immutable view into the header of a page.
#[derive(Debug)]
pub struct HeaderRef<'a> {
    bytes: &'a [u8; HEADER_SIZE],
}

impl<'a> HeaderRef<'a> {
    /// Creates a new `HeaderRef` from a slice of bytes if it matches the required size.
    ///
    /// # Parameters
    /// - `bytes`: A reference to a slice of bytes that will be used to initialize the `HeaderRef`.
    ///
    /// # Returns
    /// - `Ok(HeaderRef)` if the length of the `bytes` slice is equal to `HEADER_SIZE`.
    /// - `Err(HeaderError)` if the length of the `bytes` slice does not match `HEADER_SIZE`.
    pub fn new(bytes: &'a [u8]) -> Result<Self, HeaderError> {
        let actual = bytes.len();
        let bytes = bytes
            .try_into()
            .map_err(|_| HeaderError::HeaderSliceSizeMismatch {
                actual,
                expected: HEADER_SIZE,
            })?;
        Ok(HeaderRef { bytes })
    }
}

/// The `HeaderMut` struct provides a mutable view into the header of a page.
#[derive(Debug)]
pub struct HeaderMut<'a> {
    bytes: &'a mut [u8; HEADER_SIZE],
}

impl<'a> HeaderMut<'a> {
    /// Creates a new `HeaderMut` instance if the provided byte slice's length matches the expected `HEADER_SIZE`.
    ///
    /// # Parameters
    /// - `bytes`: A mutable reference to a byte slice (`[u8]`) that will be used to construct a `HeaderMut`.
    ///
    /// # Returns
    /// - `Ok(HeaderMut)` if the length of the provided byte slice matches `HEADER_SIZE`.
    /// - `Err(HeaderError)` if the length of the provided byte slice does not match `HEADER_SIZE`.
    pub fn new(bytes: &'a mut [u8]) -> Result<Self, HeaderError> {
        let actual = bytes.len();
        let bytes = bytes
            .try_into()
            .map_err(|_| HeaderError::HeaderSliceSizeMismatch {
                actual,
                expected: HEADER_SIZE,
            })?;
        Ok(HeaderMut { bytes })
    }

    /// Resets every header field to the state of a freshly initialized page:
    /// no neighbors, no slots, and a record region starting at the page end.
    pub fn reset(&mut self, page_id: PageId, page_type: PageType) -> Result<(), HeaderError> {
        self.set_prev_page(PageId::INVALID.value())?;
        self.set_next_page(PageId::INVALID.value())?;
        self.set_current_page(page_id.value())?;
        self.set_free_space_ptr(PAGE_SIZE as u16)?;
        self.set_slot_count(0)?;
        self.set_page_type(u16::from(page_type))?;
        Ok(())
    }
}

/// Defines header field constants and getter/setter methods.
///
/// Pattern: `field_id(identifier): field_type(type) = field_offset(usize)`
macro_rules! impl_header_accessors {
    ( $( $field_name:ident : $field_type:ty = $field_offset:expr ; )* ) => {
        paste! {
            $(
                #[doc = concat!("Offset of ", stringify!($field_name), " - type ", stringify!($field_type))]
                pub const [<$field_name:upper>] : usize = $field_offset;

                impl<'a> HeaderRef<'a> {
                    #[doc = concat!(
                        "Getter for field `", stringify!($field_name), "`.\n",
                        "Type: `", stringify!($field_type), "`.\n",
                        "Offset: ", stringify!($field_offset), "."
                    )]
                    pub fn [<get_ $field_name>](&self)
                        -> Result<$field_type, HeaderError>
                    {
                        Ok(read_be::<$field_type>(self.bytes, $field_offset)?)
                    }
                }

                impl<'a> HeaderMut<'a> {
                    #[doc = concat!(
                        "Getter for field `", stringify!($field_name), "`.\n",
                        "Type: `", stringify!($field_type), "`.\n",
                        "Offset: ", stringify!($field_offset), "."
                    )]
                    pub fn [<get_ $field_name>](&self)
                        -> Result<$field_type, HeaderError>
                    {
                        Ok(read_be::<$field_type>(self.bytes, $field_offset)?)
                    }

                    #[doc = concat!(
                        "Setter for field `", stringify!($field_name), "`.\n",
                        "Type: `", stringify!($field_type), "`.\n",
                        "Offset: ", stringify!($field_offset), "."
                    )]
                    pub fn [<set_ $field_name>](&mut self, val: $field_type)
                        -> Result<(), HeaderError>
                    {
                        write_be::<$field_type>(self.bytes, $field_offset, val)?;
                        Ok(())
                    }
                }
            )*
        }
    };
}

impl_header_accessors! {
    prev_page : i32 = 0;
    next_page : i32 = 4;
    current_page : i32 = 8;
    free_space_ptr : u16 = 12;
    slot_count : u16 = 14;
    page_type : u16 = 16;
    // Bytes 18..20 are reserved.
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_rejects_wrong_slice_size() {
        let bytes = [0u8; HEADER_SIZE - 1];
        assert!(matches!(
            HeaderRef::new(&bytes),
            Err(HeaderError::HeaderSliceSizeMismatch {
                actual: 19,
                expected: HEADER_SIZE
            })
        ));
    }

    #[test]
    fn reset_initializes_all_fields() {
        let mut bytes = [0xFFu8; HEADER_SIZE];
        let mut header = HeaderMut::new(&mut bytes).unwrap();
        header.reset(PageId::new(9), PageType::Data).unwrap();

        assert_eq!(header.get_prev_page().unwrap(), -1);
        assert_eq!(header.get_next_page().unwrap(), -1);
        assert_eq!(header.get_current_page().unwrap(), 9);
        assert_eq!(header.get_free_space_ptr().unwrap(), PAGE_SIZE as u16);
        assert_eq!(header.get_slot_count().unwrap(), 0);
        assert_eq!(header.get_page_type().unwrap(), u16::from(PageType::Data));
    }

    #[test]
    fn fields_are_stored_big_endian() {
        let mut bytes = [0u8; HEADER_SIZE];
        {
            let mut header = HeaderMut::new(&mut bytes).unwrap();
            header.set_current_page(0x0102_0304).unwrap();
            header.set_slot_count(0x0506).unwrap();
        }
        assert_eq!(bytes[CURRENT_PAGE..CURRENT_PAGE + 4], [0x01, 0x02, 0x03, 0x04]);
        assert_eq!(bytes[SLOT_COUNT..SLOT_COUNT + 2], [0x05, 0x06]);
    }

    #[test]
    fn chain_links_hold_the_terminator() {
        let mut bytes = [0u8; HEADER_SIZE];
        let mut header = HeaderMut::new(&mut bytes).unwrap();
        header.set_prev_page(-1).unwrap();
        header.set_next_page(-1).unwrap();
        assert_eq!(header.get_prev_page().unwrap(), -1);
        assert_eq!(header.get_next_page().unwrap(), -1);
    }
}
