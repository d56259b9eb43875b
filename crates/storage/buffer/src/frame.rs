use page::page::api::Page;
use page::page_id::PageId;
use std::sync::RwLock;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};

/// The ID of a frame is basically just its index in the buffer's frame table
pub type FrameId = usize;

/// A buffer frame is a memory allocation designed to store the contents of a
/// disk page in memory, along with the metadata needed by the buffer manager.
///
/// A frame is *free* when `page_id` is `None`; otherwise it caches the disk
/// page named there. `pin_count` counts the logical holders of the page;
/// `dirty` records that the frame content diverges from disk and must be
/// written back before the frame is reused; `ref_bit` is the clock
/// replacement reference bit, set whenever the last pin is released.
///
/// Access to the frame content is not allowed outside the `BufferManager` -
/// instead, `guard`-like structs provide references to the underlying page.
///
/// The `Frame` is the owner of the `Page`. Frames are created once, when the
/// pool is built, and are reused for the pool's whole lifetime.
#[derive(Debug)]
pub struct Frame {
    /// The `PageId` corresponding to the `Page` stored in the `page` field.
    /// `None` marks a free frame.
    pub(crate) page_id: RwLock<Option<PageId>>,

    /// The actual `Page` instance.
    pub(crate) page: RwLock<Page>,

    /// Number of logical holders currently pinning the page.
    pub(crate) pin_count: AtomicU32,

    /// Dirtiness of the page flag. Sticky: only a flush or an eviction
    /// write-back clears it.
    pub(crate) dirty: AtomicBool,

    /// Clock replacement reference bit.
    pub(crate) ref_bit: AtomicBool,
}

impl Default for Frame {
    fn default() -> Self {
        Self {
            page_id: RwLock::new(None),
            page: RwLock::new(Page::new_zeroed(PageId::INVALID)),
            pin_count: AtomicU32::new(0),
            dirty: AtomicBool::new(false),
            ref_bit: AtomicBool::new(false),
        }
    }
}

impl Frame {
    /// Whether the frame currently caches a disk page.
    pub fn is_valid(&self) -> bool {
        self.page_id.read().unwrap().is_some()
    }

    /// Whether the frame has at least one pin outstanding.
    pub fn is_pinned(&self) -> bool {
        self.pin_count.load(Ordering::Relaxed) > 0
    }

    /// Clears the reference bit, returning whether it was set.
    pub fn clear_ref_bit(&self) -> bool {
        self.ref_bit.swap(false, Ordering::Relaxed)
    }

    /// Releases one pin, recording `dirty` first. Releasing the last pin
    /// marks the frame recently used for the replacement policy.
    pub(crate) fn release(&self, dirty: bool) {
        if dirty {
            self.dirty.store(true, Ordering::Relaxed);
        }

        let previous = self.pin_count.fetch_sub(1, Ordering::Relaxed);
        debug_assert!(previous > 0, "frame released with no pins outstanding");

        if previous == 1 {
            self.ref_bit.store(true, Ordering::Relaxed);
        }
    }
}
