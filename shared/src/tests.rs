#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::collections::HashSet;
    use std::rc::Rc;

    use crate::board::Board;
    use crate::error::ErrorCode;
    use crate::ledger::VoteLedger;
    use crate::models::{Category, CategoryFilter, Entry, EntryInput, VoteOutcome};
    use crate::stats::{leader, Statistics, NO_ENTRIES_PLACEHOLDER};
    use crate::storage::{
        load_json, FileStorage, MemoryStorage, Storage, StorageError, DEVICE_ID_KEY, ENTRIES_KEY, LEDGER_KEY,
    };
    use crate::validation::ValidationError;

    fn input(title: &str, category: Category) -> EntryInput {
        EntryInput {
            title: title.into(),
            team_name: format!("{title} Team"),
            description: format!("{title} description"),
            category: Some(category),
            ..Default::default()
        }
    }

    fn board() -> Board<MemoryStorage> {
        Board::open(MemoryStorage::new()).unwrap()
    }

    fn assert_ledger_consistent<S: Storage>(board: &Board<S>, devices: &[&str]) {
        for device in devices {
            for entry in board.list() {
                assert_eq!(
                    board.ledger().contains(device, &entry.id),
                    entry.has_voter(device),
                    "ledger and voters disagree for {device} on {}", entry.id
                );
            }
        }
        assert!(board.ledger().is_consistent_with(board.list()));
    }

    /// Fails writes and removals of one key while the shared flag is set.
    struct FlakyStorage {
        inner: MemoryStorage,
        fail_key: &'static str,
        failing: Rc<Cell<bool>>,
    }

    impl Storage for FlakyStorage {
        fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
            self.inner.get(key)
        }

        fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
            if self.failing.get() && key == self.fail_key {
                return Err(StorageError::Unavailable("quota exceeded".into()));
            }
            self.inner.set(key, value)
        }

        fn remove(&mut self, key: &str) -> Result<(), StorageError> {
            if self.failing.get() && key == self.fail_key {
                return Err(StorageError::Unavailable("storage locked".into()));
            }
            self.inner.remove(key)
        }
    }

    #[test]
    fn test_submit_assigns_unique_ids_in_order() {
        let mut b = board();
        let titles = ["Alpha", "Beta", "Gamma", "Delta", "Epsilon"];
        for title in titles {
            let entry = b.submit(input(title, Category::Project)).unwrap();
            assert_eq!(entry.votes, 0);
            assert!(entry.voted_by.is_empty());
        }

        let listed: Vec<_> = b.list().iter().map(|e| e.title.as_str()).collect();
        assert_eq!(listed, titles);

        let ids: HashSet<_> = b.list().iter().map(|e| e.id.clone()).collect();
        assert_eq!(ids.len(), titles.len());
    }

    #[test]
    fn test_submit_requires_fields() {
        let mut b = board();

        let mut missing_title = input("x", Category::Photo);
        missing_title.title = "   ".into();
        let err = b.submit(missing_title).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidInput);
        assert_eq!(err.message, ValidationError::MissingTitle.to_string());

        let mut missing_category = input("x", Category::Photo);
        missing_category.category = None;
        assert!(b.submit(missing_category).is_err());

        assert!(b.list().is_empty());
        assert_eq!(b.storage().get(ENTRIES_KEY).unwrap(), None);
    }

    #[test]
    fn test_urls_are_not_validated() {
        let mut b = board();
        let mut with_urls = input("Links", Category::Video);
        with_urls.image_url = Some("not a url".into());
        with_urls.demo_url = Some("".into());
        with_urls.github_url = Some("https://github.com/example/links".into());

        let entry = b.submit(with_urls).unwrap();
        assert_eq!(entry.image_url.as_deref(), Some("not a url"));
        assert_eq!(entry.demo_url, None);
        assert_eq!(entry.github_url.as_deref(), Some("https://github.com/example/links"));
    }

    #[test]
    fn test_find_by_id() {
        let mut b = board();
        let entry = b.submit(input("Findable", Category::Project)).unwrap();
        assert_eq!(b.find_by_id(&entry.id).map(|e| e.title.as_str()), Some("Findable"));
        assert!(b.find_by_id("missing").is_none());
    }

    #[test]
    fn test_votes_match_voters() {
        let mut b = board();
        let a = b.submit(input("A", Category::Project)).unwrap().id;
        let c = b.submit(input("C", Category::Photo)).unwrap().id;

        let devices = ["device_one", "device_two", "device_three"];
        for device in devices {
            assert_eq!(b.cast_vote(&a, device).unwrap(), VoteOutcome::Cast);
        }
        assert_eq!(b.cast_vote(&c, "device_two").unwrap(), VoteOutcome::Cast);
        assert_eq!(b.cast_vote(&c, "device_two").unwrap(), VoteOutcome::AlreadyVoted);

        for entry in b.list() {
            assert_eq!(entry.votes as usize, entry.voted_by.len());
        }
        assert_eq!(b.find_by_id(&a).unwrap().votes, 3);
        assert_eq!(b.find_by_id(&c).unwrap().votes, 1);
        assert_ledger_consistent(&b, &devices);
    }

    #[test]
    fn test_double_vote_is_rejected() {
        let mut b = board();
        let id = b.submit(input("Once", Category::Video)).unwrap().id;

        assert_eq!(b.vote(&id).unwrap(), VoteOutcome::Cast);
        let after_first = b.list().to_vec();
        let stored = b.storage().get(ENTRIES_KEY).unwrap();

        assert_eq!(b.vote(&id).unwrap(), VoteOutcome::AlreadyVoted);
        assert_eq!(b.list(), after_first.as_slice());
        assert_eq!(b.storage().get(ENTRIES_KEY).unwrap(), stored);
        assert_eq!(b.find_by_id(&id).unwrap().votes, 1);
        assert_eq!(b.device_votes(), [id.clone()]);
        assert!(b.has_voted(&id, b.device().as_str()));
    }

    #[test]
    fn test_vote_on_unknown_entry() {
        let mut b = board();
        b.submit(input("Present", Category::Project)).unwrap();
        let before = b.list().to_vec();

        assert_eq!(b.vote("stale-id").unwrap(), VoteOutcome::NotFound);
        assert_eq!(b.list(), before.as_slice());
        assert!(b.ledger().is_empty());
        assert_eq!(b.storage().get(LEDGER_KEY).unwrap(), None);
    }

    #[test]
    fn test_sample_statistics() {
        let mut b = board();
        assert_eq!(b.seed_samples().unwrap(), 6);

        let votes: Vec<u32> = b.list().iter().map(|e| e.votes).collect();
        assert_eq!(votes, [15, 23, 31, 18, 27, 35]);

        let stats = b.statistics();
        assert_eq!(stats.total_entries, 6);
        assert_eq!(stats.total_votes, 149);
        assert_eq!(stats.leader_votes(), 35);
        assert_eq!(stats.leader_title(), "CineMagic AI");
        assert_eq!(stats.category_breakdown.project, 2);
        assert_eq!(stats.category_breakdown.photo, 2);
        assert_eq!(stats.category_breakdown.video, 2);
        assert_eq!(stats.device_vote_count, 0);

        assert_ledger_consistent(&b, &["seed-voter-1", "seed-voter-35"]);
        assert_eq!(b.ledger().count("seed-voter-1"), 6);
        assert_eq!(b.ledger().count("seed-voter-35"), 1);
    }

    #[test]
    fn test_seed_skipped_when_not_empty() {
        let mut b = board();
        b.submit(input("Mine", Category::Photo)).unwrap();
        assert_eq!(b.seed_samples().unwrap(), 0);
        assert_eq!(b.list().len(), 1);
    }

    #[test]
    fn test_leader_tie_goes_to_first() {
        let mut b = board();
        let first = b.submit(input("First", Category::Project)).unwrap().id;
        let second = b.submit(input("Second", Category::Photo)).unwrap().id;
        b.cast_vote(&second, "d1").unwrap();
        b.cast_vote(&first, "d2").unwrap();

        let stats = b.statistics();
        assert_eq!(stats.leader.as_ref().map(|l| l.id.as_str()), Some(first.as_str()));

        b.cast_vote(&second, "d3").unwrap();
        assert_eq!(b.statistics().leader_title(), "Second");
    }

    #[test]
    fn test_leader_without_votes() {
        let entries: Vec<Entry> = Vec::new();
        assert!(leader(&entries).is_none());

        let stats = Statistics::compute(&entries, 0);
        assert_eq!(stats.leader_title(), NO_ENTRIES_PLACEHOLDER);
        assert_eq!(stats.leader_votes(), 0);

        let mut b = board();
        b.submit(input("Lonely", Category::Video)).unwrap();
        assert_eq!(b.statistics().leader_title(), "Lonely");
    }

    #[test]
    fn test_category_counts_include_empty_categories() {
        let mut b = board();
        b.submit(input("P", Category::Project)).unwrap();
        let stats = b.statistics();
        for category in Category::ALL {
            let expected = usize::from(category == Category::Project);
            assert_eq!(stats.category_breakdown.get(category), expected);
        }
    }

    #[test]
    fn test_filter_by_category() {
        let mut b = board();
        b.seed_samples().unwrap();
        let photos: Vec<_> = b.filter(CategoryFilter::Only(Category::Photo))
            .into_iter()
            .map(|e| e.id.as_str())
            .collect();
        assert_eq!(photos, ["sample2", "sample5"]);
        assert_eq!(b.filter(CategoryFilter::All).len(), 6);
        assert_eq!(b.filter(CategoryFilter::from(None::<Category>)).len(), 6);
    }

    #[test]
    fn test_reset() {
        let mut b = board();
        b.seed_samples().unwrap();
        b.vote("sample1").unwrap();
        let device = b.device().clone();

        b.reset().unwrap();
        let stats = b.statistics();
        assert_eq!(stats.total_entries, 0);
        assert_eq!(stats.total_votes, 0);
        assert_eq!(stats.device_vote_count, 0);
        assert!(b.ledger().is_empty());

        let storage = b.into_storage();
        assert_eq!(storage.get(ENTRIES_KEY).unwrap(), None);
        assert_eq!(storage.get(LEDGER_KEY).unwrap(), None);

        let reopened = Board::open(storage).unwrap();
        assert!(reopened.list().is_empty());
        assert_eq!(reopened.device(), &device);
    }

    #[test]
    fn test_state_survives_reopen() {
        let mut b = board();
        let id = b.submit(input("Persisted", Category::Photo)).unwrap().id;
        b.vote(&id).unwrap();
        let device = b.device().clone();

        let reopened = Board::open(b.into_storage()).unwrap();
        assert_eq!(reopened.device(), &device);
        assert_eq!(reopened.list().len(), 1);
        assert_eq!(reopened.find_by_id(&id).unwrap().votes, 1);
        assert_eq!(reopened.device_votes(), [id]);
    }

    #[test]
    fn test_file_storage_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let id = {
            let mut b = Board::open(FileStorage::new(dir.path())).unwrap();
            let id = b.submit(input("On disk", Category::Project)).unwrap().id;
            assert_eq!(b.vote(&id).unwrap(), VoteOutcome::Cast);
            id
        };

        assert!(dir.path().join("hackathon_projects.json").exists());
        assert!(dir.path().join("user_votes.json").exists());
        assert!(dir.path().join("device_id.json").exists());

        let mut b = Board::open(FileStorage::new(dir.path())).unwrap();
        assert_eq!(b.vote(&id).unwrap(), VoteOutcome::AlreadyVoted);
        assert_eq!(b.statistics().total_votes, 1);
    }

    #[test]
    fn test_file_storage_rejects_path_keys() {
        let dir = tempfile::tempdir().unwrap();
        let mut storage = FileStorage::new(dir.path());
        assert!(matches!(storage.set("../escape", "x"), Err(StorageError::InvalidKey(_))));
        assert!(matches!(storage.get(""), Err(StorageError::InvalidKey(_))));
        assert_eq!(storage.get("absent").unwrap(), None);
        storage.remove("absent").unwrap();
    }

    #[test]
    fn test_loads_browser_records() {
        let mut storage = MemoryStorage::new();
        storage.set(DEVICE_ID_KEY, "device_abc123").unwrap();
        storage.set(ENTRIES_KEY, r#"[
            {
                "id": "1700000000000",
                "title": "Browser Entry",
                "teamName": "Old Team",
                "description": "Submitted from the web form",
                "imageUrl": "",
                "demoUrl": "",
                "githubUrl": "https://github.com/old/team",
                "category": "photo",
                "votes": 1,
                "submittedAt": "2024-05-01T12:00:00.000Z",
                "votedBy": ["device_abc123"]
            }
        ]"#).unwrap();
        storage.set(LEDGER_KEY, r#"["1700000000000"]"#).unwrap();

        let b = Board::open(storage).unwrap();
        let entry = b.find_by_id("1700000000000").unwrap();
        assert_eq!(entry.image_url, None);
        assert_eq!(entry.demo_url, None);
        assert_eq!(entry.category, Category::Photo);
        assert_eq!(b.device().as_str(), "device_abc123");
        assert_eq!(b.device_votes(), ["1700000000000".to_string()]);

        let stored: VoteLedger = load_json(b.storage(), LEDGER_KEY).unwrap().unwrap();
        assert_eq!(stored.count("device_abc123"), 1);
    }

    #[test]
    fn test_repairs_inconsistent_records() {
        let mut storage = MemoryStorage::new();
        storage.set(DEVICE_ID_KEY, "device_local").unwrap();
        storage.set(ENTRIES_KEY, r#"[
            {"id": "a", "title": "A", "teamName": "T", "description": "D", "category": "project",
             "votes": 15, "submittedAt": "2024-05-01T12:00:00Z", "votedBy": []},
            {"id": "b", "title": "B", "teamName": "T", "description": "D", "category": "video",
             "votes": 2, "submittedAt": "2024-05-02T12:00:00Z", "votedBy": ["device_local", "device_local"]},
            {"id": "a", "title": "Dup", "teamName": "T", "description": "D", "category": "photo",
             "votes": 0, "submittedAt": "2024-05-03T12:00:00Z", "votedBy": []}
        ]"#).unwrap();
        storage.set(LEDGER_KEY, r#"["a"]"#).unwrap();

        let b = Board::open(storage).unwrap();
        assert_eq!(b.list().len(), 2);
        assert_eq!(b.find_by_id("a").unwrap().votes, 0);
        assert_eq!(b.find_by_id("b").unwrap().voted_by, ["device_local".to_string()]);
        assert_eq!(b.find_by_id("b").unwrap().votes, 1);
        assert_eq!(b.device_votes(), ["b".to_string()]);
        assert_ledger_consistent(&b, &["device_local"]);

        let stored: Vec<Entry> = load_json(b.storage(), ENTRIES_KEY).unwrap().unwrap();
        assert_eq!(stored.len(), 2);
    }

    #[test]
    fn test_corrupt_record_is_an_error() {
        let mut storage = MemoryStorage::new();
        storage.set(ENTRIES_KEY, "{not json").unwrap();
        let err = Board::open(storage).err().unwrap();
        assert_eq!(err.code, ErrorCode::CorruptData);
    }

    #[test]
    fn test_failed_ledger_write_rolls_back_vote() {
        let failing = Rc::new(Cell::new(false));
        let storage = FlakyStorage {
            inner: MemoryStorage::new(),
            fail_key: LEDGER_KEY,
            failing: failing.clone(),
        };
        let mut b = Board::open(storage).unwrap();
        let id = b.submit(input("Fragile", Category::Project)).unwrap().id;

        failing.set(true);
        let err = b.vote(&id).unwrap_err();
        assert_eq!(err.code, ErrorCode::StorageError);
        assert_eq!(b.find_by_id(&id).unwrap().votes, 0);
        assert!(b.device_votes().is_empty());

        let stored: Vec<Entry> = load_json(b.storage(), ENTRIES_KEY).unwrap().unwrap();
        assert_eq!(stored[0].votes, 0);
        assert!(stored[0].voted_by.is_empty());

        failing.set(false);
        assert_eq!(b.vote(&id).unwrap(), VoteOutcome::Cast);
        assert_ledger_consistent(&b, &[b.device().as_str()]);
    }

    #[test]
    fn test_failed_reset_keeps_entries() {
        let failing = Rc::new(Cell::new(false));
        let storage = FlakyStorage {
            inner: MemoryStorage::new(),
            fail_key: ENTRIES_KEY,
            failing: failing.clone(),
        };
        let mut b = Board::open(storage).unwrap();
        let id = b.submit(input("Sticky", Category::Photo)).unwrap().id;
        assert_eq!(b.vote(&id).unwrap(), VoteOutcome::Cast);
        let device = b.device().clone();

        failing.set(true);
        let err = b.reset().unwrap_err();
        assert_eq!(err.code, ErrorCode::StorageError);
        assert_eq!(b.list().len(), 1);
        assert_eq!(b.storage().get(LEDGER_KEY).unwrap(), None);
        let stored: Vec<Entry> = load_json(b.storage(), ENTRIES_KEY).unwrap().unwrap();
        assert_eq!(stored[0].voted_by, [device.as_str()]);

        failing.set(false);
        let reopened = Board::open(b.into_storage()).unwrap();
        assert_eq!(reopened.device(), &device);
        assert_eq!(reopened.list().len(), 1);
        assert_eq!(reopened.device_votes(), [id.clone()]);
        assert_ledger_consistent(&reopened, &[device.as_str()]);
    }

    #[test]
    fn test_export_snapshot() {
        let mut b = board();
        b.seed_samples().unwrap();
        b.vote("sample3").unwrap();

        let json = b.export_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["projects"].as_array().unwrap().len(), 6);
        assert_eq!(value["votes"], serde_json::json!(["sample3"]));
        assert_eq!(value["projects"][2]["teamName"], "Media Innovators");
        assert!(value["exportDate"].as_str().unwrap().contains('T'));
    }

    #[test]
    fn test_device_identity() {
        let mut storage = MemoryStorage::new();
        let first = Board::open(&mut storage).unwrap().device().clone();
        assert!(first.as_str().starts_with("device_"));
        assert_eq!(storage.get(DEVICE_ID_KEY).unwrap().as_deref(), Some(first.as_str()));

        let second = Board::open(&mut storage).unwrap().device().clone();
        assert_eq!(first, second);

        let other = Board::open(MemoryStorage::new()).unwrap().device().clone();
        assert_ne!(first, other);
    }

    #[test]
    fn test_stored_device_id_is_loaded_unchanged() {
        let mut storage = MemoryStorage::new();
        storage.set(DEVICE_ID_KEY, " device_padded ").unwrap();
        let b = Board::open(&mut storage).unwrap();
        assert_eq!(b.device().as_str(), " device_padded ");
        drop(b);
        assert_eq!(storage.get(DEVICE_ID_KEY).unwrap().as_deref(), Some(" device_padded "));

        let mut blank = MemoryStorage::new();
        blank.set(DEVICE_ID_KEY, "").unwrap();
        let regenerated = Board::open(&mut blank).unwrap().device().clone();
        assert!(regenerated.as_str().starts_with("device_"));
    }

    #[test]
    fn test_category_parsing() {
        assert_eq!("Photo".parse::<Category>(), Ok(Category::Photo));
        assert_eq!(" video ".parse::<Category>(), Ok(Category::Video));
        assert!("audio".parse::<Category>().is_err());
        assert_eq!(Category::Project.display_name(), "Project Upload");
    }
}
