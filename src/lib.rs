//! # heapdb
//!
//! This is the main crate for the **heapdb** storage engine.
//!
//! The engine is composed of multiple internal components organized under
//! the `/crates` directory of this workspace:
//!
//! - `/storage/binary-helpers`: Big-endian field codec for page buffers.
//! - `/storage/page`: Slotted data pages and directory pages.
//! - `/storage/disk`: Disk-manager interface and implementations.
//! - `/storage/buffer`: Buffer pool with clock replacement.
//! - `/storage/heap`: Heap files and sequential scans.
