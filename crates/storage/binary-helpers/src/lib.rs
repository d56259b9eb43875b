//! Helpers for reading and writing fixed-width integer fields inside page
//! buffers. The on-disk page format is big-endian; this crate is the only
//! place where endianness appears.

/// Big-endian integer serialization.
pub mod be;

/// Errors raised while interpreting binary data.
pub mod bin_error;

/// Checked narrowing conversions used when writing `usize` quantities into
/// fixed-width page fields.
pub mod conversions;
