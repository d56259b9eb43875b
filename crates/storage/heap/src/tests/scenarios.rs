//! End-to-end scenarios exercising the heap file, the directory chain, the
//! buffer pool, and the disk manager together.

use crate::errors::HeapError;
use crate::heap_file::{HeapFile, MAX_RECORD_SIZE};
use buffer::buffer::{BufferManager, PinMode};
use buffer::replacer::ReplacementPolicy;
use disk::api::DiskManager;
use disk::in_memory_disk_manager::InMemoryDiskManager;
use page::page::directory::MAX_ENTRIES;
use page::page_id::PageId;
use std::sync::Arc;

fn env(
    pool_size: usize,
) -> (
    Arc<InMemoryDiskManager>,
    Arc<BufferManager<InMemoryDiskManager>>,
) {
    let disk = Arc::new(InMemoryDiskManager::new());
    let buffer = Arc::new(BufferManager::new(
        disk.clone(),
        pool_size,
        ReplacementPolicy::Clock,
    ));
    (disk, buffer)
}

#[test]
fn records_spill_onto_a_second_data_page() {
    let (disk, buffer) = env(8);
    let file = HeapFile::new(buffer.clone(), disk, Some("spill")).unwrap();

    // Two 400-byte records leave less than 400 insertable bytes on the first
    // data page, so the third must open a second one.
    let first = file.insert(&[1u8; 400]).unwrap();
    let second = file.insert(&[2u8; 400]).unwrap();
    let third = file.insert(&[3u8; 400]).unwrap();

    assert_eq!(first.page_id, second.page_id);
    assert_ne!(first.page_id, third.page_id);

    // Both data pages are recorded on the head directory page.
    let head = buffer.pin(file.head(), PinMode::DiskIo).unwrap();
    assert_eq!(head.entry_count().unwrap(), 2);
    assert_eq!(head.dir_entry(0).unwrap().page_id, first.page_id);
    assert_eq!(head.dir_entry(1).unwrap().page_id, third.page_id);
    assert_eq!(head.dir_entry(0).unwrap().record_count, 2);
    assert_eq!(head.dir_entry(1).unwrap().record_count, 1);
}

#[test]
fn deleting_the_last_record_frees_entry_and_data_page() {
    let (disk, buffer) = env(8);
    let file = HeapFile::new(buffer.clone(), disk.clone(), Some("cycle")).unwrap();

    // Only the head directory page exists at first.
    assert_eq!(disk.allocated_page_count(), 1);

    let rid = file.insert(&[7u8; 100]).unwrap();
    assert_eq!(disk.allocated_page_count(), 2);
    {
        let head = buffer.pin(file.head(), PinMode::DiskIo).unwrap();
        assert_eq!(head.entry_count().unwrap(), 1);
    }

    // Removing the only record removes the entry and the data page with it;
    // the head stays, even empty.
    file.delete(rid).unwrap();
    assert_eq!(disk.allocated_page_count(), 1);
    {
        let head = buffer.pin(file.head(), PinMode::DiskIo).unwrap();
        assert_eq!(head.entry_count().unwrap(), 0);
    }

    // A new insert rebuilds the structure on a freshly allocated data page.
    let rid = file.insert(&[8u8; 100]).unwrap();
    assert_eq!(disk.allocated_page_count(), 2);
    assert_eq!(file.record_count().unwrap(), 1);
    assert_eq!(file.select(rid).unwrap(), vec![8u8; 100]);
}

#[test]
fn named_file_contents_survive_a_reopen_through_a_cold_pool() {
    let disk = Arc::new(InMemoryDiskManager::new());

    let stored_rid = {
        let buffer = Arc::new(BufferManager::new(
            disk.clone(),
            4,
            ReplacementPolicy::Clock,
        ));
        let file = HeapFile::new(buffer.clone(), disk.clone(), Some("persisted")).unwrap();
        file.insert(b"one").unwrap();
        file.insert(b"two").unwrap();
        let rid = file.insert(b"three").unwrap();

        // Everything must be on disk before the pool goes away.
        buffer.flush_all_pages().unwrap();
        rid
    };

    // A brand-new pool has no cached state; every page comes from disk.
    let buffer = Arc::new(BufferManager::new(
        disk.clone(),
        4,
        ReplacementPolicy::Clock,
    ));
    let file = HeapFile::new(buffer, disk, Some("persisted")).unwrap();

    assert_eq!(file.record_count().unwrap(), 3);
    assert_eq!(file.select(stored_rid).unwrap(), b"three");
}

#[test]
fn directory_chain_grows_and_shrinks_with_its_entries() {
    let (disk, buffer) = env(8);
    let file = HeapFile::new(buffer.clone(), disk.clone(), Some("chained")).unwrap();

    // Full-page records occupy one data page each, so MAX_ENTRIES + 1 inserts
    // overflow the head directory page.
    let mut rids = Vec::new();
    for _ in 0..=MAX_ENTRIES {
        rids.push(file.insert(&vec![5u8; MAX_RECORD_SIZE]).unwrap());
    }

    let second_dir = {
        let head = buffer.pin(file.head(), PinMode::DiskIo).unwrap();
        assert_eq!(head.entry_count().unwrap() as usize, MAX_ENTRIES);
        head.next_page().unwrap()
    };
    assert!(second_dir.is_valid());
    {
        let second = buffer.pin(second_dir, PinMode::DiskIo).unwrap();
        assert_eq!(second.entry_count().unwrap(), 1);
        assert_eq!(second.prev_page().unwrap(), file.head());
    }

    // Deleting the overflow record empties the second directory page, which
    // is unlinked and freed.
    let overflow_rid = *rids.last().unwrap();
    file.delete(overflow_rid).unwrap();

    {
        let head = buffer.pin(file.head(), PinMode::DiskIo).unwrap();
        assert_eq!(head.next_page().unwrap(), PageId::INVALID);
    }
    assert_eq!(file.record_count().unwrap(), MAX_ENTRIES);
    assert_eq!(buffer.pinned_frame_count(), 0);
}

#[test]
fn temporary_file_is_deleted_when_the_handle_drops() {
    let (disk, buffer) = env(8);

    {
        let file = HeapFile::new(buffer.clone(), disk.clone(), None).unwrap();
        assert!(file.is_temporary());
        file.insert(&[1u8; 600]).unwrap();
        file.insert(&[2u8; 600]).unwrap();
        assert!(disk.allocated_page_count() > 1);
    }

    // Head, data pages, everything: gone.
    assert_eq!(disk.allocated_page_count(), 0);
    assert_eq!(buffer.pinned_frame_count(), 0);
}

#[test]
fn named_file_survives_its_handle() {
    let (disk, buffer) = env(8);

    {
        let file = HeapFile::new(buffer.clone(), disk.clone(), Some("durable")).unwrap();
        file.insert(b"still here").unwrap();
    }

    assert!(disk.get_file_entry("durable").unwrap().is_some());
    let file = HeapFile::new(buffer, disk, Some("durable")).unwrap();
    assert_eq!(file.record_count().unwrap(), 1);
}

#[test]
fn delete_file_releases_pages_and_the_name() {
    let (disk, buffer) = env(8);
    let mut file = HeapFile::new(buffer.clone(), disk.clone(), Some("doomed")).unwrap();

    for value in 0..5u8 {
        file.insert(&vec![value; 400]).unwrap();
    }
    assert!(disk.allocated_page_count() > 1);

    file.delete_file().unwrap();

    assert_eq!(disk.allocated_page_count(), 0);
    assert_eq!(disk.get_file_entry("doomed").unwrap(), None);
    assert_eq!(buffer.pinned_frame_count(), 0);

    // The name is free again.
    drop(file);
    let recreated = HeapFile::new(buffer, disk.clone(), Some("doomed")).unwrap();
    assert_eq!(recreated.record_count().unwrap(), 0);
}

#[test]
fn failed_operations_leave_no_pins_behind() {
    let (disk, buffer) = env(8);
    let file = HeapFile::new(buffer.clone(), disk, Some("tidy")).unwrap();

    assert!(file.insert(&vec![0u8; MAX_RECORD_SIZE + 10]).is_err());
    assert_eq!(buffer.pinned_frame_count(), 0);

    // The keeper holds the data page alive once its neighbor is deleted.
    file.insert(b"keeper").unwrap();
    let rid = file.insert(b"present").unwrap();
    file.delete(rid).unwrap();

    assert!(matches!(
        file.select(rid).unwrap_err(),
        HeapError::InvalidRid(_)
    ));
    assert_eq!(buffer.pinned_frame_count(), 0);

    assert!(file.update(rid, b"present").is_err());
    assert_eq!(buffer.pinned_frame_count(), 0);
}
