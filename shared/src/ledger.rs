use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

use crate::models::Entry;
use crate::storage::{load_json, save_json, Storage, StorageError, LEDGER_KEY};

/// Which entries each device has voted for, in voting order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VoteLedger {
    by_device: BTreeMap<String, Vec<String>>,
}

// Browsers stored a bare array of ids for the local device.
#[derive(Deserialize)]
#[serde(untagged)]
enum LedgerRecord {
    Devices(BTreeMap<String, Vec<String>>),
    Legacy(Vec<String>),
}

impl VoteLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// The flag is set when the record was in the legacy single-device form
    /// and needs rewriting.
    pub fn load(storage: &impl Storage, local_device: &str) -> Result<(Self, bool), StorageError> {
        let (by_device, legacy) = match load_json::<LedgerRecord>(storage, LEDGER_KEY)? {
            None => (BTreeMap::new(), false),
            Some(LedgerRecord::Devices(map)) => (map, false),
            Some(LedgerRecord::Legacy(ids)) => (BTreeMap::from([(local_device.to_string(), ids)]), true),
        };
        Ok((Self { by_device }, legacy))
    }

    pub fn persist(&self, storage: &mut impl Storage) -> Result<(), StorageError> {
        save_json(storage, LEDGER_KEY, self)
    }

    /// The ledger implied by the voters recorded on each entry.
    pub fn from_entries(entries: &[Entry]) -> Self {
        let mut ledger = Self::new();
        for entry in entries {
            for voter in &entry.voted_by {
                ledger.record(voter, &entry.id);
            }
        }
        ledger
    }

    pub fn is_consistent_with(&self, entries: &[Entry]) -> bool {
        let expected = Self::from_entries(entries);
        let devices = |ledger: &Self| -> HashSet<String> {
            ledger.by_device.iter()
                .filter(|(_, ids)| !ids.is_empty())
                .map(|(device, _)| device.clone())
                .collect()
        };

        devices(self) == devices(&expected)
            && expected.by_device.iter().all(|(device, ids)| {
                let actual: HashSet<&String> = self.entries_for(device).iter().collect();
                actual.len() == self.entries_for(device).len()
                    && actual == ids.iter().collect::<HashSet<_>>()
            })
    }

    /// Returns false when the vote was already on record.
    pub fn record(&mut self, device_id: &str, entry_id: &str) -> bool {
        let ids = self.by_device.entry(device_id.to_string()).or_default();
        if ids.iter().any(|id| id == entry_id) {
            return false;
        }
        ids.push(entry_id.to_string());
        true
    }

    pub fn entries_for(&self, device_id: &str) -> &[String] {
        self.by_device.get(device_id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn contains(&self, device_id: &str, entry_id: &str) -> bool {
        self.entries_for(device_id).iter().any(|id| id == entry_id)
    }

    pub fn count(&self, device_id: &str) -> usize {
        self.entries_for(device_id).len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_device.values().all(Vec::is_empty)
    }
}
