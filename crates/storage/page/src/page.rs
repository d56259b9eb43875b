//! Module defining a fixed-size slotted page structure with its associated methods.
//!
//! # Memory Layout Overview
//!
//! A data page has this physical structure:
//!
//! ```text
//!   ┌───────────────────────────────────────────────────────────────┐
//!   │ Page Header (chain links, free_space_ptr, slot_count, type)   │
//!   ├───────────────────────────────────────────────────────────────┤
//!   │ Slot Array Region (grows downward)                            │
//!   │   fixed-size SLOT_SIZE entries, indexed from 0                │
//!   ├───────────────────────────────────────────────────────────────┤
//!   │ Free Space                                                    │
//!   ├───────────────────────────────────────────────────────────────┤
//!   │ Record Region (grows upward)                                  │
//!   │   variable-length records, newest at the lowest offset        │
//!   └───────────────────────────────────────────────────────────────┘
//!
//!                     ↑ page_start                        page_end ↑
//! ```
//!
//! # Why This Design?
//!
//! - Appending a slot does **not** require moving existing records.
//! - A record keeps its slot number across updates and deletions of other
//!   records, so record ids stay stable.
//! - Both read and write operations are zero-copy and O(1).
//!
//! Directory pages share the same header but replace the slot array and
//! record region with a forward-growing array of fixed-size entries; those
//! operations live in the `directory` submodule.
//!
//! Header access is provided via `header::HeaderRef` and `header::HeaderMut` types.
//! Slot array access is provided via `slot_array::SlotArrayRef` and `slot_array::SlotArrayMut` types.

pub(crate) mod accessors;
pub(crate) mod delete;
pub(crate) mod insert;
pub(crate) mod internal;
pub(crate) mod read;
pub(crate) mod update;

/// Directory-page entry operations.
pub mod directory;

/// Public API for the `Page` struct
pub mod api;
