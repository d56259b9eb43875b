//! The table mapping heap-file names to their head directory pages

use crate::errors::DiskError;
use page::page_id::PageId;
use std::collections::HashMap;
use std::sync::RwLock;

/// Table holding the mappings between a heap-file name and the `PageId` of
/// its head directory page. Shared by the disk-manager implementations.
#[derive(Debug)]
pub struct FileEntryTable {
    mappings: RwLock<HashMap<String, PageId>>,
}

impl Default for FileEntryTable {
    fn default() -> Self {
        Self::new()
    }
}

impl FileEntryTable {
    /// Creates a new empty `FileEntryTable`
    pub fn new() -> Self {
        Self {
            mappings: RwLock::new(HashMap::new()),
        }
    }

    /// Registers a new mapping in the table.
    ///
    /// # Params
    /// - `name`: the name of the file to register
    /// - `head_page_id`: the id of the file's head directory page
    pub fn add(&self, name: &str, head_page_id: PageId) -> Result<(), DiskError> {
        let mut guard = self
            .mappings
            .write()
            .expect("FileEntryTable poisoned: another thread panicked while holding the lock");
        if guard.contains_key(name) {
            return Err(DiskError::DuplicateFileEntry(name.to_string()));
        }
        guard.insert(name.to_string(), head_page_id);
        Ok(())
    }

    /// Resolve a file name to the id of its head directory page.
    ///
    /// # Returns
    /// `Option<PageId>` containing the head page id, if the provided name was
    /// registered in the table.
    pub fn get(&self, name: &str) -> Option<PageId> {
        let guard = self
            .mappings
            .read()
            .expect("FileEntryTable poisoned: another thread panicked while holding the lock");
        guard.get(name).copied()
    }

    /// Removes a mapping from the table.
    pub fn remove(&self, name: &str) -> Result<(), DiskError> {
        let mut guard = self
            .mappings
            .write()
            .expect("FileEntryTable poisoned: another thread panicked while holding the lock");
        guard
            .remove(name)
            .map(|_| ())
            .ok_or_else(|| DiskError::MissingFileEntry(name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_then_get_round_trips() {
        let table = FileEntryTable::new();
        table.add("orders", PageId::new(3)).unwrap();
        assert_eq!(table.get("orders"), Some(PageId::new(3)));
        assert_eq!(table.get("missing"), None);
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let table = FileEntryTable::new();
        table.add("orders", PageId::new(3)).unwrap();
        assert!(matches!(
            table.add("orders", PageId::new(9)),
            Err(DiskError::DuplicateFileEntry(_))
        ));
        // The original mapping survives.
        assert_eq!(table.get("orders"), Some(PageId::new(3)));
    }

    #[test]
    fn remove_frees_the_name_for_reuse() {
        let table = FileEntryTable::new();
        table.add("orders", PageId::new(3)).unwrap();
        table.remove("orders").unwrap();
        assert_eq!(table.get("orders"), None);
        table.add("orders", PageId::new(5)).unwrap();
    }

    #[test]
    fn remove_of_unknown_name_fails() {
        let table = FileEntryTable::new();
        assert!(matches!(
            table.remove("orders"),
            Err(DiskError::MissingFileEntry(_))
        ));
    }
}
