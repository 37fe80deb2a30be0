//! In-memory record store backed by a JSON file.
//!
//! The store owns the record collection and the id counter. Every
//! mutation that changes something is written through to disk by the
//! store itself before the call returns.

use std::path::{Path, PathBuf};

use crate::error::{BugtrackError, Notice, Result};
use crate::export::{self, Headers};
use crate::json;
use crate::model::{self, Priority, Record, RecordId, Status, Timestamp};
use crate::query::{RecordFilter, RecordUpdate};

/// Outcome of [`RecordStore::mark_done`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// Status moved to Done.
    Completed,
    /// Status was already Done; nothing changed.
    AlreadyDone,
}

/// File-backed bug record store.
///
/// Records are kept in insertion order. Use `open()` to load from a
/// JSON file; mutations persist automatically.
pub struct RecordStore {
    records: Vec<Record>,
    next_id: RecordId,
    path: PathBuf,
    notices: Vec<Notice>,
    clock: fn() -> Timestamp,
}

impl RecordStore {
    // ========================================================================
    // Lifecycle
    // ========================================================================

    /// Open the store at `path`, loading any existing records.
    ///
    /// Never fails. A missing file gives an empty store; an unreadable or
    /// corrupt one gives an empty store plus a queued [`Notice::Corrupt`].
    pub fn open(path: impl AsRef<Path>) -> Self {
        let mut store = Self {
            records: Vec::new(),
            next_id: 1,
            path: path.as_ref().to_path_buf(),
            notices: Vec::new(),
            clock: model::now,
        };
        store.load();
        store
    }

    fn load(&mut self) {
        match json::load(&self.path) {
            Ok(Some(records)) => {
                self.next_id = records.iter().map(|r| r.id).max().map_or(1, |max| max + 1);
                self.records = records;
            }
            Ok(None) => {
                tracing::debug!(path = %self.path.display(), "No data file yet; starting empty");
            }
            Err(e) => {
                let reason = match e {
                    BugtrackError::Corrupt { reason, .. } => reason,
                    other => other.to_string(),
                };
                let backup = match json::backup_corrupt(&self.path) {
                    Ok(backup) => Some(backup),
                    Err(e) => {
                        tracing::warn!(path = %self.path.display(), error = %e, "Could not back up data file");
                        None
                    }
                };
                tracing::warn!(path = %self.path.display(), %reason, "Discarding unreadable data file");
                self.records.clear();
                self.next_id = 1;
                self.notices.push(Notice::Corrupt {
                    path: self.path.clone(),
                    reason,
                    backup,
                });
            }
        }
    }

    /// Path of the backing data file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The id the next created record will receive.
    #[must_use]
    pub const fn next_id(&self) -> RecordId {
        self.next_id
    }

    /// Take all queued notices, oldest first.
    pub fn drain_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    /// Queued notices, without consuming them.
    #[must_use]
    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    /// Write the full collection to the data file.
    ///
    /// # Errors
    ///
    /// Returns `Io` on write failure.
    pub fn save(&self) -> Result<()> {
        json::save(&self.path, &self.records)
    }

    /// Post-mutation hook: persist, downgrading failure to a notice.
    fn after_mutation(&mut self) {
        if let Err(e) = self.save() {
            tracing::error!(path = %self.path.display(), error = %e, "Failed to save records");
            self.notices.push(Notice::SaveFailed {
                path: self.path.clone(),
                reason: e.to_string(),
            });
        }
    }

    // ========================================================================
    // CRUD
    // ========================================================================

    /// Create a record and persist it.
    ///
    /// # Errors
    ///
    /// Returns `Validation` if the description is empty after trimming.
    pub fn create(
        &mut self,
        description: &str,
        priority: Priority,
        status: Status,
    ) -> Result<Record> {
        let description = description.trim();
        if description.is_empty() {
            return Err(BugtrackError::validation("description", "cannot be empty"));
        }

        let record = Record::new(self.next_id, description, priority, status, (self.clock)());
        self.next_id += 1;
        self.records.push(record.clone());

        tracing::info!(id = record.id, "Created record");
        self.after_mutation();
        Ok(record)
    }

    /// Get a single record by id.
    #[must_use]
    pub fn get(&self, id: RecordId) -> Option<&Record> {
        self.records.iter().find(|r| r.id == id)
    }

    /// Apply the fields of `update` that differ from the stored record.
    ///
    /// A description that trims to empty is ignored. Returns whether any
    /// field changed; `updated_at` is refreshed and the store persisted
    /// only in that case.
    ///
    /// # Errors
    ///
    /// Returns `RecordNotFound` if no record has this id.
    pub fn update(&mut self, id: RecordId, update: &RecordUpdate) -> Result<bool> {
        let clock = self.clock;
        let record = self
            .records
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or(BugtrackError::RecordNotFound { id })?;

        let mut changed = false;

        if let Some(description) = update.description.as_deref().map(str::trim) {
            if !description.is_empty() && description != record.description {
                record.description = description.to_string();
                changed = true;
            }
        }
        if let Some(priority) = update.priority {
            if priority != record.priority {
                record.priority = priority;
                changed = true;
            }
        }
        if let Some(status) = update.status {
            if status != record.status {
                record.status = status;
                changed = true;
            }
        }

        if !changed {
            tracing::debug!(id, "Update left record unchanged");
            return Ok(false);
        }

        record.updated_at = clock().max(record.created_at);
        tracing::info!(id, "Updated record");
        self.after_mutation();
        Ok(true)
    }

    /// Move a record to Done.
    ///
    /// # Errors
    ///
    /// Returns `RecordNotFound` if no record has this id.
    pub fn mark_done(&mut self, id: RecordId) -> Result<Completion> {
        let record = self.get(id).ok_or(BugtrackError::RecordNotFound { id })?;
        if record.status.is_done() {
            return Ok(Completion::AlreadyDone);
        }

        self.update(id, &RecordUpdate::status(Status::Done))?;
        Ok(Completion::Completed)
    }

    /// Delete a record. Returns whether one was removed.
    pub fn delete(&mut self, id: RecordId) -> bool {
        let before = self.records.len();
        self.records.retain(|r| r.id != id);
        if self.records.len() == before {
            return false;
        }

        tracing::info!(id, "Deleted record");
        self.after_mutation();
        true
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Copy of every record, in insertion order.
    #[must_use]
    pub fn list(&self) -> Vec<Record> {
        self.records.clone()
    }

    /// Records matching `filter`, sorted by ascending id.
    #[must_use]
    pub fn filter(&self, filter: &RecordFilter) -> Vec<Record> {
        let mut results: Vec<Record> = self
            .records
            .iter()
            .filter(|r| filter.matches(r))
            .cloned()
            .collect();
        results.sort_by_key(|r| r.id);
        results
    }

    /// Markdown table of every record, sorted by id.
    #[must_use]
    pub fn render_as_table(&self, headers: &Headers<'_>) -> String {
        export::render_table(&self.records, headers)
    }

    /// Number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the store holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::DEFAULT_HEADERS;
    use chrono::{Duration, NaiveDate};
    use std::fs;
    use std::sync::atomic::{AtomicI64, Ordering};

    static TICKS: AtomicI64 = AtomicI64::new(0);

    /// Each call is one second after the previous one.
    fn ticking_clock() -> Timestamp {
        let base = NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap();
        base + Duration::seconds(TICKS.fetch_add(1, Ordering::SeqCst))
    }

    fn open_in(dir: &tempfile::TempDir) -> RecordStore {
        let mut store = RecordStore::open(dir.path().join("bugs.json"));
        store.clock = ticking_clock;
        store
    }

    #[test]
    fn test_open_missing_file_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = open_in(&dir);
        assert!(store.is_empty());
        assert_eq!(store.next_id(), 1);
        assert!(store.drain_notices().is_empty());
        assert!(!store.path().exists());
    }

    #[test]
    fn test_create_and_get() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = open_in(&dir);

        let created = store
            .create("  Fix crash  ", Priority::High, Status::Open)
            .unwrap();
        assert_eq!(created.id, 1);
        assert_eq!(created.description, "Fix crash");

        let fetched = store.get(created.id).unwrap();
        assert_eq!(fetched, &created);
        assert_eq!(fetched.created_at, fetched.updated_at);
        assert!(store.path().exists());
    }

    #[test]
    fn test_create_empty_description_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = open_in(&dir);

        for blank in ["", "   ", "\t\n"] {
            let err = store.create(blank, Priority::Low, Status::Open).unwrap_err();
            assert!(matches!(err, BugtrackError::Validation { .. }));
        }
        assert!(store.is_empty());
        assert_eq!(store.next_id(), 1);
        assert!(!store.path().exists());
    }

    #[test]
    fn test_update_changes_fields_and_timestamp() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = open_in(&dir);
        let created = store.create("Typo", Priority::Low, Status::Open).unwrap();

        let changed = store
            .update(
                created.id,
                &RecordUpdate {
                    description: Some(" Typo in header ".to_string()),
                    priority: Some(Priority::Medium),
                    status: None,
                },
            )
            .unwrap();
        assert!(changed);

        let record = store.get(created.id).unwrap();
        assert_eq!(record.description, "Typo in header");
        assert_eq!(record.priority, Priority::Medium);
        assert_eq!(record.status, Status::Open);
        assert_eq!(record.created_at, created.created_at);
        assert!(record.updated_at > record.created_at);
    }

    #[test]
    fn test_update_same_value_is_no_change() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = open_in(&dir);
        let created = store.create("Done already", Priority::Low, Status::Done).unwrap();
        let before = fs::read_to_string(store.path()).unwrap();

        let changed = store
            .update(created.id, &RecordUpdate::status(Status::Done))
            .unwrap();
        assert!(!changed);
        assert_eq!(store.get(created.id).unwrap().updated_at, created.updated_at);
        assert_eq!(fs::read_to_string(store.path()).unwrap(), before);
    }

    #[test]
    fn test_update_blank_description_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = open_in(&dir);
        let created = store.create("Keep me", Priority::Low, Status::Open).unwrap();

        let update = RecordUpdate {
            description: Some("   ".to_string()),
            ..Default::default()
        };
        assert!(!store.update(created.id, &update).unwrap());
        assert_eq!(store.get(created.id).unwrap().description, "Keep me");
    }

    #[test]
    fn test_update_trimmed_equal_description_is_no_change() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = open_in(&dir);
        let created = store.create("Same", Priority::Low, Status::Open).unwrap();

        let update = RecordUpdate {
            description: Some("  Same ".to_string()),
            ..Default::default()
        };
        assert!(!store.update(created.id, &update).unwrap());
    }

    #[test]
    fn test_update_nonexistent() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = open_in(&dir);
        let err = store
            .update(42, &RecordUpdate::status(Status::Done))
            .unwrap_err();
        assert!(matches!(err, BugtrackError::RecordNotFound { id: 42 }));
        assert!(!store.path().exists());
    }

    #[test]
    fn test_mark_done() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = open_in(&dir);
        let created = store.create("Finish me", Priority::Medium, Status::InProgress).unwrap();

        assert_eq!(store.mark_done(created.id).unwrap(), Completion::Completed);
        let stamped = store.get(created.id).unwrap().updated_at;
        assert_eq!(store.mark_done(created.id).unwrap(), Completion::AlreadyDone);
        assert_eq!(store.get(created.id).unwrap().updated_at, stamped);
        assert!(store.mark_done(99).is_err());
    }

    #[test]
    fn test_delete() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = open_in(&dir);
        let created = store.create("Remove me", Priority::Low, Status::Open).unwrap();

        assert!(store.delete(created.id));
        assert!(store.get(created.id).is_none());
        let on_disk = fs::read_to_string(store.path()).unwrap();

        assert!(!store.delete(created.id));
        assert!(!store.delete(1234));
        assert_eq!(fs::read_to_string(store.path()).unwrap(), on_disk);
    }

    #[test]
    fn test_ids_never_reused() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = open_in(&dir);
        for name in ["one", "two", "three"] {
            store.create(name, Priority::Low, Status::Open).unwrap();
        }
        assert!(store.delete(2));
        let fourth = store.create("four", Priority::Low, Status::Open).unwrap();
        assert_eq!(fourth.id, 4);

        assert!(store.delete(4));
        let fifth = store.create("five", Priority::Low, Status::Open).unwrap();
        assert_eq!(fifth.id, 5);
    }

    #[test]
    fn test_list_is_a_copy_in_insertion_order() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = open_in(&dir);
        store.create("first", Priority::Low, Status::Open).unwrap();
        store.create("second", Priority::High, Status::Open).unwrap();

        let mut listed = store.list();
        assert_eq!(
            listed.iter().map(|r| r.id).collect::<Vec<_>>(),
            vec![1, 2]
        );
        listed[0].description = "tampered".to_string();
        listed.clear();

        assert_eq!(store.len(), 2);
        assert_eq!(store.get(1).unwrap().description, "first");
    }

    #[test]
    fn test_filter_keyword_sorted_by_id() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = open_in(&dir);
        store.create("Crash on save", Priority::High, Status::Open).unwrap();
        store.create("Slow startup", Priority::Low, Status::Open).unwrap();
        store.create("CRASH when idle", Priority::Low, Status::Done).unwrap();

        let hits = store.filter(&RecordFilter::keyword("crash"));
        assert_eq!(hits.iter().map(|r| r.id).collect::<Vec<_>>(), vec![1, 3]);

        let open_crashes = store.filter(&RecordFilter {
            keyword: Some("crash".to_string()),
            priority: None,
            status: Some(Status::Open),
        });
        assert_eq!(open_crashes.len(), 1);
        assert_eq!(open_crashes[0].id, 1);

        let low = store.filter(&RecordFilter {
            priority: Some(Priority::Low),
            ..Default::default()
        });
        assert_eq!(low.iter().map(|r| r.id).collect::<Vec<_>>(), vec![2, 3]);
    }

    #[test]
    fn test_roundtrip_save_load() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = open_in(&dir);
        store.create("Pipe | in text", Priority::High, Status::Open).unwrap();
        store.create("Second", Priority::Low, Status::InProgress).unwrap();
        store.create("Third", Priority::Medium, Status::Done).unwrap();
        assert!(store.delete(2));

        let reopened = RecordStore::open(store.path());
        assert_eq!(reopened.list(), store.list());
        assert_eq!(reopened.next_id(), 4);
        assert_eq!(reopened.get(1).unwrap().description, "Pipe | in text");

        let raw = fs::read_to_string(store.path()).unwrap();
        assert!(raw.contains("\"Pipe | in text\""));
        assert!(store.render_as_table(&DEFAULT_HEADERS).contains("Pipe \\| in text"));
    }

    #[test]
    fn test_corrupt_file_resets_with_notice() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bugs.json");
        fs::write(&path, "{ not json").unwrap();

        let mut store = RecordStore::open(&path);
        assert!(store.is_empty());
        assert_eq!(store.next_id(), 1);

        let notices = store.drain_notices();
        assert_eq!(notices.len(), 1);
        assert!(matches!(notices[0], Notice::Corrupt { .. }));
        assert!(store.drain_notices().is_empty());

        // The store keeps working and overwrites the bad file.
        store.create("Fresh start", Priority::Low, Status::Open).unwrap();
        assert_eq!(RecordStore::open(&path).len(), 1);
    }

    #[test]
    fn test_rejected_file_is_backed_up_before_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bugs.json");
        let raw = r#"[{"id": 1, "description": "  ", "priority": "Low", "status": "Open",
            "created_at": "2024-01-01T00:00:00", "updated_at": "2024-01-01T00:00:00"}]"#;
        fs::write(&path, raw).unwrap();

        let mut store = RecordStore::open(&path);
        let backup = dir.path().join("bugs.json.corrupt");
        match store.drain_notices().as_slice() {
            [Notice::Corrupt { reason, backup: Some(kept), .. }] => {
                assert!(reason.contains("empty description"), "{reason}");
                assert_eq!(kept, &backup);
            }
            other => panic!("unexpected notices: {other:?}"),
        }

        store.create("Replacement", Priority::Low, Status::Open).unwrap();
        assert_eq!(fs::read_to_string(&backup).unwrap(), raw);
    }

    #[test]
    fn test_save_failure_is_a_notice() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("not-a-dir");
        fs::write(&blocker, "").unwrap();

        let mut store = RecordStore::open(blocker.join("bugs.json"));
        let created = store.create("Unsaved", Priority::Low, Status::Open).unwrap();

        assert_eq!(store.get(created.id).unwrap().description, "Unsaved");
        assert!(matches!(store.notices(), [Notice::SaveFailed { .. }]));

        // Later operations still work in memory.
        assert!(store.update(created.id, &RecordUpdate::status(Status::Done)).unwrap());
        assert_eq!(store.notices().len(), 2);
        assert!(store.save().is_err());
    }

    #[test]
    fn test_render_as_table_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = open_in(&dir);
        assert!(store
            .render_as_table(&DEFAULT_HEADERS)
            .ends_with("| (empty) | - | - | - | - | - |"));
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;
        use std::collections::HashSet;

        #[derive(Debug, Clone)]
        enum Op {
            Create(String, Priority),
            Update(usize, Option<String>, Option<Priority>, Option<Status>),
            Delete(usize),
        }

        fn op() -> impl Strategy<Value = Op> {
            let priority = prop::sample::select(Priority::ALL.to_vec());
            let status = prop::sample::select(Status::ALL.to_vec());
            prop_oneof![
                ("[ a-z]{0,8}", priority.clone()).prop_map(|(d, p)| Op::Create(d, p)),
                (
                    0usize..12,
                    proptest::option::of("[ a-z]{0,8}"),
                    proptest::option::of(priority),
                    proptest::option::of(status),
                )
                    .prop_map(|(i, d, p, s)| Op::Update(i, d, p, s)),
                (0usize..12).prop_map(Op::Delete),
            ]
        }

        proptest! {
            #![proptest_config(ProptestConfig::with_cases(48))]

            #[test]
            fn ids_stay_unique_and_positive(ops in prop::collection::vec(op(), 0..40)) {
                let dir = tempfile::tempdir().unwrap();
                let mut store = RecordStore::open(dir.path().join("bugs.json"));
                let mut highest = 0;

                for op in ops {
                    match op {
                        Op::Create(text, priority) => {
                            if let Ok(record) = store.create(&text, priority, Status::Open) {
                                prop_assert!(record.id > highest);
                                highest = record.id;
                            }
                        }
                        Op::Update(index, description, priority, status) => {
                            let id = index as RecordId + 1;
                            let update = RecordUpdate { description, priority, status };
                            let _ = store.update(id, &update);
                        }
                        Op::Delete(index) => {
                            store.delete(index as RecordId + 1);
                        }
                    }
                }

                let ids: Vec<RecordId> = store.list().iter().map(|r| r.id).collect();
                let unique: HashSet<RecordId> = ids.iter().copied().collect();
                prop_assert_eq!(unique.len(), ids.len());
                prop_assert!(ids.iter().all(|&id| id > 0));
                prop_assert!(store.list().iter().all(|r| !r.description.trim().is_empty()));
                prop_assert!(store.list().iter().all(|r| r.updated_at >= r.created_at));
            }
        }
    }
}
