use crate::frame::Frame;
use page::page::api::Page;
use std::ops::{Deref, DerefMut};
use std::sync::{RwLockReadGuard, RwLockWriteGuard};

/// Provides read access to a `Page` instance stored in one of the buffer's
/// frames. Holds one pin on the frame and releases it (clean) when dropped,
/// so a pinned page can never leak across an early return.
#[derive(Debug)]
pub struct PageReadGuard<'a> {
    /// The underlying `RwLockReadGuard` which will be dereferenced to `&Page`
    pub(crate) guard: RwLockReadGuard<'a, Page>,
    /// The frame whose pin this guard owns.
    pub(crate) frame: &'a Frame,
}

impl<'a> Deref for PageReadGuard<'a> {
    type Target = Page;
    fn deref(&self) -> &Self::Target {
        &self.guard
    }
}

impl<'a> Drop for PageReadGuard<'a> {
    fn drop(&mut self) {
        self.frame.release(false);
    }
}

/// Provides write access to a `Page` instance stored in one of the buffer's
/// frames. Holds one pin on the frame and releases it when dropped.
///
/// The guard starts *clean*; callers that mutated the page call
/// [`PageWriteGuard::mark_dirty`] so the drop ORs the dirty bit into the
/// frame. Error paths that return before marking therefore unpin clean, which
/// is exactly the propagation contract of the heap layer.
#[derive(Debug)]
pub struct PageWriteGuard<'a> {
    /// The underlying `RwLockWriteGuard` which will be dereferenced to `&mut Page`
    pub(crate) guard: RwLockWriteGuard<'a, Page>,
    /// The frame whose pin this guard owns.
    pub(crate) frame: &'a Frame,
    /// Whether the drop must record the page as modified.
    pub(crate) dirty: bool,
}

impl<'a> PageWriteGuard<'a> {
    /// Records that the page content was modified; the frame's dirty bit is
    /// set when the guard is released.
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }
}

impl<'a> Deref for PageWriteGuard<'a> {
    type Target = Page;
    fn deref(&self) -> &Self::Target {
        &self.guard
    }
}

impl<'a> DerefMut for PageWriteGuard<'a> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.guard
    }
}

impl<'a> Drop for PageWriteGuard<'a> {
    fn drop(&mut self) {
        self.frame.release(self.dirty);
    }
}
