//! The board service: one owned handle over storage, entries, ledger and
//! device identity. Every mutation writes through to storage before it is
//! visible in memory.

use time::OffsetDateTime;
use tracing::{debug, error, info, instrument, warn};

use crate::device::DeviceIdentity;
use crate::error::Result;
use crate::ledger::VoteLedger;
use crate::models::{CategoryFilter, Entry, EntryInput, ExportSnapshot, VoteOutcome};
use crate::samples::sample_entries;
use crate::stats::Statistics;
use crate::storage::{Storage, StorageError, ENTRIES_KEY, LEDGER_KEY};
use crate::store::EntryStore;
use crate::validation::{validate_entry_input, ValidationError};

pub struct Board<S: Storage> {
    storage: S,
    entries: EntryStore,
    ledger: VoteLedger,
    device: DeviceIdentity,
}

impl<S: Storage> Board<S> {
    /// Loads persisted state, creating the device identity on first use and
    /// writing back any repaired records.
    pub fn open(mut storage: S) -> Result<Self> {
        let device = DeviceIdentity::load_or_create(&mut storage)?;
        let (entries, entries_repaired) = EntryStore::load(&storage)?;
        let (mut ledger, ledger_migrated) = VoteLedger::load(&storage, device.as_str())?;

        let ledger_repaired = !ledger.is_consistent_with(entries.list());
        if ledger_repaired {
            warn!("Vote ledger disagrees with entry voters, rebuilding it");
            ledger = VoteLedger::from_entries(entries.list());
        }

        let mut board = Self { storage, entries, ledger, device };
        if entries_repaired || ledger_repaired || ledger_migrated {
            board.entries.persist(&mut board.storage)?;
            board.ledger.persist(&mut board.storage)?;
        }

        info!(
            "📋 Board loaded: {} entries, {} votes from this device",
            board.entries.len(),
            board.ledger.count(board.device.as_str())
        );
        Ok(board)
    }

    pub fn device(&self) -> &DeviceIdentity {
        &self.device
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn into_storage(self) -> S {
        self.storage
    }

    pub fn ledger(&self) -> &VoteLedger {
        &self.ledger
    }

    #[instrument(skip(self, input), fields(title = %input.title))]
    pub fn submit(&mut self, input: EntryInput) -> Result<Entry> {
        validate_entry_input(&input)?;
        let category = input.category.ok_or(ValidationError::MissingCategory)?;

        let blank_to_none = |url: Option<String>| url.filter(|u| !u.trim().is_empty());
        let entry = Entry {
            id: self.entries.next_id(),
            title: input.title,
            team_name: input.team_name,
            description: input.description,
            image_url: blank_to_none(input.image_url),
            demo_url: blank_to_none(input.demo_url),
            github_url: blank_to_none(input.github_url),
            category,
            votes: 0,
            submitted_at: OffsetDateTime::now_utc(),
            voted_by: Vec::new(),
        };

        let mut entries = self.entries.clone();
        entries.push(entry.clone());
        entries.persist(&mut self.storage)?;
        self.entries = entries;

        info!("✓ Submitted entry {} ({})", entry.id, entry.category);
        Ok(entry)
    }

    pub fn list(&self) -> &[Entry] {
        self.entries.list()
    }

    pub fn filter(&self, filter: CategoryFilter) -> Vec<&Entry> {
        self.entries.filter(filter).collect()
    }

    pub fn find_by_id(&self, id: &str) -> Option<&Entry> {
        self.entries.find_by_id(id)
    }

    #[instrument(skip(self))]
    pub fn cast_vote(&mut self, entry_id: &str, device_id: &str) -> Result<VoteOutcome> {
        let Some(entry) = self.entries.find_by_id(entry_id) else {
            debug!("Vote for unknown entry ignored");
            return Ok(VoteOutcome::NotFound);
        };
        if entry.has_voter(device_id) {
            warn!("Device already voted for this entry");
            return Ok(VoteOutcome::AlreadyVoted);
        }

        let mut entries = self.entries.clone();
        let mut ledger = self.ledger.clone();
        if let Some(entry) = entries.find_mut(entry_id) {
            entry.record_vote(device_id);
        }
        ledger.record(device_id, entry_id);

        self.commit(entries, ledger)?;
        info!("❤️ Vote recorded");
        Ok(VoteOutcome::Cast)
    }

    /// Votes as this board's own device.
    pub fn vote(&mut self, entry_id: &str) -> Result<VoteOutcome> {
        let device_id = self.device.as_str().to_string();
        self.cast_vote(entry_id, &device_id)
    }

    pub fn has_voted(&self, entry_id: &str, device_id: &str) -> bool {
        self.ledger.contains(device_id, entry_id)
    }

    pub fn device_votes(&self) -> &[String] {
        self.ledger.entries_for(self.device.as_str())
    }

    pub fn statistics(&self) -> Statistics {
        Statistics::compute(self.entries.list(), self.device_votes().len())
    }

    pub fn export(&self) -> ExportSnapshot {
        ExportSnapshot {
            projects: self.entries.list().to_vec(),
            votes: self.device_votes().to_vec(),
            export_date: OffsetDateTime::now_utc(),
        }
    }

    pub fn export_json(&self) -> Result<String> {
        serde_json::to_string_pretty(&self.export())
            .map_err(|e| StorageError::from(e).into())
    }

    /// Clears entries and ledger. The device identity is kept.
    ///
    /// The ledger goes first: if the entries record then survives a failed
    /// removal, the next `open` rebuilds the ledger from its voters.
    pub fn reset(&mut self) -> Result<()> {
        self.storage.remove(LEDGER_KEY)?;
        self.storage.remove(ENTRIES_KEY)?;
        self.entries = EntryStore::new();
        self.ledger = VoteLedger::new();
        info!("🗑️ All board data cleared");
        Ok(())
    }

    /// Adds the demonstration entries when the board is empty. Returns how
    /// many were added.
    pub fn seed_samples(&mut self) -> Result<usize> {
        if !self.entries.is_empty() {
            debug!("Board not empty, skipping sample entries");
            return Ok(0);
        }

        let mut entries = EntryStore::new();
        for sample in sample_entries(OffsetDateTime::now_utc()) {
            entries.push(sample);
        }
        let mut ledger = self.ledger.clone();
        for entry in entries.list() {
            for voter in &entry.voted_by {
                ledger.record(voter, &entry.id);
            }
        }

        let added = entries.len();
        self.commit(entries, ledger)?;
        info!("🌱 Seeded {} sample entries", added);
        Ok(added)
    }

    fn commit(&mut self, entries: EntryStore, ledger: VoteLedger) -> Result<()> {
        self.write_both(&entries, &ledger)?;
        self.entries = entries;
        self.ledger = ledger;
        Ok(())
    }

    // Restores the previous entries record if the ledger write fails.
    fn write_both(&mut self, entries: &EntryStore, ledger: &VoteLedger) -> Result<()> {
        entries.persist(&mut self.storage)?;
        if let Err(e) = ledger.persist(&mut self.storage) {
            if let Err(rollback) = self.entries.persist(&mut self.storage) {
                error!("Failed to restore entries after ledger write error: {}", rollback);
            }
            return Err(e.into());
        }
        Ok(())
    }
}
