//! Buffer management module for the storage system.

pub mod buffer;
pub mod errors;
pub mod frame;

/// Replacement policies deciding which frame a miss may reuse.
pub mod replacer;

/// Exposes `guard`-like structs that provide access to the `Page` instances
/// from the buffer via `&Page`, releasing the pin on drop.
pub mod guards;
