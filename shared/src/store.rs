use std::collections::HashSet;
use tracing::warn;
use uuid::Uuid;

use crate::models::{CategoryFilter, Entry};
use crate::storage::{load_json, save_json, Storage, StorageError, ENTRIES_KEY};

/// Submitted entries in insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntryStore {
    entries: Vec<Entry>,
}

impl EntryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads the persisted collection. The flag reports whether any record had
    /// to be repaired (duplicate ids, duplicate voters or a stale vote count).
    pub fn load(storage: &impl Storage) -> Result<(Self, bool), StorageError> {
        let raw: Vec<Entry> = load_json(storage, ENTRIES_KEY)?.unwrap_or_default();
        let total = raw.len();

        let mut seen = HashSet::with_capacity(total);
        let mut repaired = false;
        let mut entries = Vec::with_capacity(total);

        for mut entry in raw {
            if !seen.insert(entry.id.clone()) {
                warn!("Dropping entry with duplicate id {}", entry.id);
                repaired = true;
                continue;
            }
            if entry.normalize() {
                warn!("Repaired vote count of entry {} to {}", entry.id, entry.votes);
                repaired = true;
            }
            entries.push(entry);
        }

        Ok((Self { entries }, repaired))
    }

    pub fn persist(&self, storage: &mut impl Storage) -> Result<(), StorageError> {
        save_json(storage, ENTRIES_KEY, &self.entries)
    }

    pub fn list(&self) -> &[Entry] {
        &self.entries
    }

    pub fn filter(&self, filter: CategoryFilter) -> impl Iterator<Item = &Entry> + '_ {
        self.entries.iter().filter(move |entry| filter.matches(entry))
    }

    pub fn find_by_id(&self, id: &str) -> Option<&Entry> {
        self.entries.iter().find(|entry| entry.id == id)
    }

    pub(crate) fn find_mut(&mut self, id: &str) -> Option<&mut Entry> {
        self.entries.iter_mut().find(|entry| entry.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.find_by_id(id).is_some()
    }

    /// Time-ordered id that is not yet taken in this store.
    pub fn next_id(&self) -> String {
        loop {
            let id = Uuid::now_v7().to_string();
            if !self.contains(&id) {
                return id;
            }
        }
    }

    pub(crate) fn push(&mut self, entry: Entry) {
        self.entries.push(entry);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
