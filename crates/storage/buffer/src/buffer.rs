//! Provides the implementation for the buffer pool leveraged by the engine

use crate::errors::BufferError;
use crate::frame::{Frame, FrameId};
use crate::guards::{PageReadGuard, PageWriteGuard};
use crate::replacer::{Replacer, ReplacementPolicy};
use disk::api::DiskManager;
use page::PAGE_SIZE;
use page::page_id::PageId;
use std::collections::HashMap;
use std::sync::atomic::Ordering;
use std::sync::{Arc, Mutex, RwLock};

/// The zeroed image installed into the frame backing a freshly allocated page.
static ZEROED_PAGE: [u8; PAGE_SIZE] = [0u8; PAGE_SIZE];

/// How a cache miss materializes the page image in the chosen frame.
#[derive(Debug, Clone, Copy)]
pub enum PinMode<'a> {
    /// Read the page image from disk.
    DiskIo,
    /// Install the provided image. Pinning a page that is resident *and*
    /// pinned this way is refused: it means some client failed to unpin a
    /// page whose id was reallocated.
    MemCopy(&'a [u8; PAGE_SIZE]),
    /// Leave the frame contents undefined; the caller overwrites them.
    NoOp,
}

/// The buffer manager responsible for handling the cache pool of pages.
///
/// Every page access of the storage engine goes through `pin`/`pin_mut`; the
/// returned guards hold a pin on the backing frame, which keeps the
/// replacement policy from reusing it, and release that pin on drop. The
/// page-to-frame map and the frame table are always updated together, in the
/// same step of `pin`.
///
/// The pool is process-wide shared state: it is built once, every heap file
/// works against it, and it is torn down after all files are closed and
/// flushed.
#[derive(Debug)]
pub struct BufferManager<D: DiskManager> {
    disk: Arc<D>,
    frames: Vec<Frame>,
    page_map: RwLock<HashMap<PageId, FrameId>>,
    replacer: Mutex<Box<dyn Replacer + Send + Sync>>,
}

impl<D: DiskManager> BufferManager<D> {
    /// Creates a new empty buffer manager.
    /// Allocates a predefined number of buffer frames and the replacer for
    /// the requested policy. Frames are initialized once and reused for the
    /// pool's lifetime.
    pub fn new(disk: Arc<D>, pool_size: usize, policy: ReplacementPolicy) -> Self {
        let mut frames = Vec::with_capacity(pool_size);
        for _ in 0..pool_size {
            frames.push(Frame::default());
        }
        Self {
            disk,
            frames,
            page_map: RwLock::new(HashMap::new()),
            replacer: Mutex::new(policy.build()),
        }
    }

    /// Pins `page_id` for reading and returns a guard over the frame's page.
    ///
    /// On a hit the resident frame gains a pin; on a miss the replacer picks
    /// a victim, a dirty victim is written back, and the frame is filled
    /// according to `mode`.
    pub fn pin(&self, page_id: PageId, mode: PinMode<'_>) -> Result<PageReadGuard<'_>, BufferError> {
        let frame_id = self.acquire_frame(page_id, mode)?;
        Ok(self.read_guard_from_frame(frame_id))
    }

    /// Pins `page_id` for writing and returns a guard over the frame's page.
    ///
    /// Same residency behavior as [`BufferManager::pin`]. A caller that
    /// already holds a guard for this page must not pin it again for writing;
    /// the guards map onto a frame-level read-write latch.
    pub fn pin_mut(
        &self,
        page_id: PageId,
        mode: PinMode<'_>,
    ) -> Result<PageWriteGuard<'_>, BufferError> {
        let frame_id = self.acquire_frame(page_id, mode)?;
        Ok(self.write_guard_from_frame(frame_id))
    }

    /// Allocates a run of `run_size` consecutive disk pages and pins the
    /// first one, installed as a zeroed image for the caller to initialize.
    ///
    /// The caller owns the content: initialize the page through the guard and
    /// mark it dirty so the image reaches disk. If no frame can be pinned,
    /// the freshly allocated run is deallocated again before the error is
    /// returned, so the failed call leaks no disk pages.
    pub fn new_page(
        &self,
        run_size: usize,
    ) -> Result<(PageId, PageWriteGuard<'_>), BufferError> {
        let page_id = self.disk.allocate_page(run_size)?;

        match self.pin_mut(page_id, PinMode::MemCopy(&ZEROED_PAGE)) {
            Ok(guard) => {
                tracing::debug!(%page_id, run_size, "allocated new page run");
                Ok((page_id, guard))
            }
            Err(pin_error) => {
                for offset in 0..run_size {
                    let id = PageId::new(page_id.value() + offset as i32);
                    if let Err(dealloc_error) = self.disk.deallocate_page(id) {
                        tracing::warn!(page_id = %id, error = %dealloc_error,
                            "failed to roll back page allocation after pin failure");
                    }
                }
                Err(pin_error)
            }
        }
    }

    /// Frees a disk page. Fails with a pinned-page error if the page is
    /// resident and pinned; otherwise the caching frame (if any) is
    /// invalidated before the disk manager deallocates the id, so a later
    /// reallocation of the same id can never observe stale frame contents.
    pub fn free_page(&self, page_id: PageId) -> Result<(), BufferError> {
        let resident = self.page_map.read().unwrap().get(&page_id).copied();

        if let Some(frame_id) = resident {
            let frame = &self.frames[frame_id];
            if frame.is_pinned() {
                return Err(BufferError::PagePinned(page_id));
            }

            self.page_map.write().unwrap().remove(&page_id);
            *frame.page_id.write().unwrap() = None;
            frame.dirty.store(false, Ordering::Relaxed);
        }

        self.disk.deallocate_page(page_id)?;
        tracing::debug!(%page_id, "freed page");
        Ok(())
    }

    /// Writes the page back to disk if it is resident and dirty, then clears
    /// the dirty bit so an immediately repeated flush writes nothing.
    /// Does not unpin or invalidate the frame.
    pub fn flush_page(&self, page_id: PageId) -> Result<(), BufferError> {
        let frame_id = self
            .page_map
            .read()
            .unwrap()
            .get(&page_id)
            .copied()
            .ok_or(BufferError::PageNotResident(page_id))?;

        let frame = &self.frames[frame_id];
        if frame.dirty.load(Ordering::Relaxed) {
            let page = frame.page.read().unwrap();
            self.disk.write_page(page_id, page.data())?;
            frame.dirty.store(false, Ordering::Relaxed);
            tracing::trace!(%page_id, "flushed page");
        }
        Ok(())
    }

    /// Writes every dirty resident page back to disk, clearing the dirty
    /// bits. Clean and free frames are skipped.
    pub fn flush_all_pages(&self) -> Result<(), BufferError> {
        for frame in &self.frames {
            let page_id = *frame.page_id.read().unwrap();
            let Some(page_id) = page_id else { continue };

            if !frame.dirty.load(Ordering::Relaxed) {
                continue;
            }

            let page = frame.page.read().unwrap();
            self.disk.write_page(page_id, page.data())?;
            frame.dirty.store(false, Ordering::Relaxed);
            tracing::trace!(%page_id, "flushed page");
        }
        Ok(())
    }

    /// Number of frames in the pool.
    pub fn pool_size(&self) -> usize {
        self.frames.len()
    }

    /// Whether `page_id` is currently cached in some frame.
    pub fn is_resident(&self, page_id: PageId) -> bool {
        self.page_map.read().unwrap().contains_key(&page_id)
    }

    /// Number of resident pages.
    pub fn resident_page_count(&self) -> usize {
        self.page_map.read().unwrap().len()
    }

    /// Number of frames with at least one pin outstanding. Zero whenever the
    /// storage layer above is quiescent; heap operations restore it on every
    /// exit path.
    pub fn pinned_frame_count(&self) -> usize {
        self.frames.iter().filter(|frame| frame.is_pinned()).count()
    }

    /// Resolves `page_id` to a pinned frame, loading the page on a miss.
    ///
    /// Hit: the frame simply gains a pin (plus the `MemCopy` image install
    /// and its leak check). Miss: the replacer picks a victim; a valid and
    /// dirty victim is written back; the map and the frame metadata are
    /// swapped to the new page together; finally `mode` decides how the page
    /// image materializes.
    fn acquire_frame(&self, page_id: PageId, mode: PinMode<'_>) -> Result<FrameId, BufferError> {
        // Check if there is a frame that already holds this page
        let resident = self.page_map.read().unwrap().get(&page_id).copied();
        if let Some(frame_id) = resident {
            let frame = &self.frames[frame_id];

            if matches!(mode, PinMode::MemCopy(_)) && frame.is_pinned() {
                // A new image for a page id someone still pins means that id
                // was recycled while a stale pin leaked.
                return Err(BufferError::PagePinned(page_id));
            }

            if let PinMode::MemCopy(contents) = mode {
                let mut page = frame.page.write().unwrap();
                page.data_mut().copy_from_slice(contents);
                page.set_page_id(page_id);
            }

            frame.pin_count.fetch_add(1, Ordering::Relaxed);
            return Ok(frame_id);
        }

        // From this point, we only have logic for cache miss.
        let frame_id = {
            let mut replacer = self.replacer.lock().unwrap();
            replacer
                .pick_victim(&self.frames)
                .ok_or(BufferError::BufferExhausted {
                    pool_size: self.frames.len(),
                })?
        };
        let frame = &self.frames[frame_id];

        {
            let mut page = frame.page.write().unwrap();

            // A valid victim with unflushed modifications must reach disk
            // before its frame is reused.
            let evicted = *frame.page_id.read().unwrap();
            if let Some(old_page_id) = evicted {
                if frame.dirty.load(Ordering::Relaxed) {
                    self.disk.write_page(old_page_id, page.data())?;
                }
                tracing::debug!(old = %old_page_id, new = %page_id, frame_id, "evicting page");
            }

            // Swap the mapping and the frame metadata over to the new page.
            {
                let mut map = self.page_map.write().unwrap();
                if let Some(old_page_id) = evicted {
                    map.remove(&old_page_id);
                }
                map.insert(page_id, frame_id);
            }
            *frame.page_id.write().unwrap() = Some(page_id);
            frame.pin_count.store(1, Ordering::Relaxed);
            frame.dirty.store(false, Ordering::Relaxed);
            frame.ref_bit.store(false, Ordering::Relaxed);

            match mode {
                PinMode::DiskIo => {
                    if let Err(error) = self.disk.read_page(page_id, page.data_mut()) {
                        // Roll back the claim so the frame stays reusable.
                        self.page_map.write().unwrap().remove(&page_id);
                        *frame.page_id.write().unwrap() = None;
                        frame.pin_count.store(0, Ordering::Relaxed);
                        return Err(error.into());
                    }
                }
                PinMode::MemCopy(contents) => page.data_mut().copy_from_slice(contents),
                PinMode::NoOp => {}
            }

            // Also update the page's internal `page_id` field.
            page.set_page_id(page_id);
        }

        Ok(frame_id)
    }

    /// Computes a `PageReadGuard` for a frame.
    fn read_guard_from_frame(&self, frame_id: FrameId) -> PageReadGuard<'_> {
        let frame = &self.frames[frame_id];
        let guard = frame.page.read().unwrap();
        PageReadGuard { guard, frame }
    }

    /// Computes a `PageWriteGuard` for a frame.
    fn write_guard_from_frame(&self, frame_id: FrameId) -> PageWriteGuard<'_> {
        let frame = &self.frames[frame_id];
        let guard = frame.page.write().unwrap();
        PageWriteGuard {
            guard,
            frame,
            dirty: false,
        }
    }
}
