//! The record store: a growable, ordered, in-memory log of [`Record`]s.
//!
//! Records are kept in insertion order. Lookups scan linearly and honour
//! first-match (by tag) or most-recent (by type) semantics. Deleting a record
//! shifts every later record down one slot, so indices are not stable across
//! deletions; use [`RecordId`] when a stable handle is needed.
//!
//! Capacity is tracked explicitly: it starts at
//! [`StoreConfig::initial_capacity`] and doubles whenever a save finds the
//! store full. It never shrinks.

pub mod record;
pub mod stats;

pub use record::Record;
pub use stats::StoreStats;

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use chrono::Duration;
use tracing::{debug, info, warn};

use crate::config::StoreConfig;
use crate::error::{KuramaError, Result};
use crate::expiry;
use crate::types::{Clock, RecordId, RecordType, SystemClock, truncate_to};

/// Growable in-memory collection of tagged, typed, timestamped records.
pub struct RecordStore {
    records: Vec<Record>,
    capacity: usize,
    total_saved: u64,
    total_recalled: u64,
    config: StoreConfig,
    clock: Arc<dyn Clock>,
}

impl RecordStore {
    /// Create an empty store with the default limits and the system clock.
    #[must_use]
    pub fn new() -> Self {
        let config = StoreConfig::default();
        Self {
            records: Vec::with_capacity(config.initial_capacity),
            capacity: config.initial_capacity,
            total_saved: 0,
            total_recalled: 0,
            config,
            clock: Arc::new(SystemClock),
        }
    }

    /// Create an empty store with explicit limits and time source.
    ///
    /// # Errors
    /// Returns [`KuramaError::Config`] if `initial_capacity` is zero, or
    /// [`KuramaError::AllocationFailure`] if the initial slots cannot be
    /// allocated.
    pub fn with_config(config: &StoreConfig, clock: Arc<dyn Clock>) -> Result<Self> {
        if config.initial_capacity == 0 {
            return Err(KuramaError::Config(
                "store.initial_capacity must be at least 1".to_string(),
            ));
        }
        let mut records = Vec::new();
        records
            .try_reserve_exact(config.initial_capacity)
            .map_err(|_| KuramaError::AllocationFailure {
                capacity: 0,
                requested: config.initial_capacity,
            })?;

        info!(capacity = config.initial_capacity, "Record store initialized");

        Ok(Self {
            records,
            capacity: config.initial_capacity,
            total_saved: 0,
            total_recalled: 0,
            config: config.clone(),
            clock,
        })
    }

    // ------------------------------------------------------------------
    // Insertion
    // ------------------------------------------------------------------

    /// Append a record, cutting `text` and `tag` to the configured bounds.
    ///
    /// # Errors
    /// Returns [`KuramaError::InvalidArgument`] for an empty tag, or
    /// [`KuramaError::AllocationFailure`] if the store is full and cannot
    /// grow. In both cases nothing is inserted.
    pub fn save(
        &mut self,
        text: &str,
        tag: &str,
        record_type: RecordType,
        importance: i32,
    ) -> Result<RecordId> {
        if tag.is_empty() {
            return Err(KuramaError::InvalidArgument("record tag must not be empty"));
        }
        if self.records.len() >= self.capacity {
            self.grow()?;
        }

        let record = Record::new(
            truncate_to(text, self.config.max_text_len),
            truncate_to(tag, self.config.max_tag_len),
            record_type,
            self.clock.now(),
            importance,
        );
        let id = record.id;

        debug!(
            id = %id,
            record_type = %record_type,
            text = %record.preview(),
            "Record saved"
        );

        self.records.push(record);
        self.total_saved += 1;
        Ok(id)
    }

    /// Double the logical capacity, reserving the backing slots up front.
    fn grow(&mut self) -> Result<()> {
        let failure = KuramaError::AllocationFailure {
            capacity: self.capacity,
            requested: self.capacity.saturating_mul(2),
        };
        let Some(requested) = self.capacity.checked_mul(2) else {
            warn!(capacity = self.capacity, "Record store cannot grow further");
            return Err(failure);
        };
        if self
            .records
            .try_reserve_exact(requested - self.records.len())
            .is_err()
        {
            warn!(
                capacity = self.capacity,
                requested, "Record store resize failed"
            );
            return Err(failure);
        }

        self.capacity = requested;
        info!(capacity = requested, "Record store resized");
        Ok(())
    }

    // ------------------------------------------------------------------
    // Recall
    // ------------------------------------------------------------------

    /// Return the first record (in insertion order) whose tag is exactly `tag`.
    ///
    /// A hit bumps the record's `access_count` and the store's
    /// `total_recalled`; a miss changes nothing.
    pub fn recall_by_tag(&mut self, tag: &str) -> Option<&Record> {
        let Some(index) = self.records.iter().position(|r| r.tag == tag) else {
            debug!(tag, "No record found with tag");
            return None;
        };
        let record = self.touch(index);
        debug!(tag, text = %record.preview(), "Record recalled by tag");
        Some(record)
    }

    /// Return the most recent record of `record_type`.
    ///
    /// Equal timestamps resolve to the later insertion. A hit bumps the
    /// access counters as in [`recall_by_tag`](Self::recall_by_tag).
    pub fn recall_by_type(&mut self, record_type: RecordType) -> Option<&Record> {
        // `max_by_key` keeps the last of several equal maxima.
        let Some(index) = self
            .records
            .iter()
            .enumerate()
            .filter(|(_, r)| r.record_type == record_type)
            .max_by_key(|(_, r)| r.timestamp)
            .map(|(i, _)| i)
        else {
            debug!(record_type = %record_type, "No record found of type");
            return None;
        };
        let record = self.touch(index);
        debug!(record_type = %record_type, text = %record.preview(), "Record recalled by type");
        Some(record)
    }

    /// Return the last `min(n, count)` records, oldest of the window first.
    ///
    /// Every returned record's `access_count` is bumped and `total_recalled`
    /// grows by the window length. `n == 0` or an empty store yields an
    /// empty slice and changes nothing.
    pub fn recall_recent(&mut self, n: usize) -> &[Record] {
        let window = n.min(self.records.len());
        if window == 0 {
            return &[];
        }
        let start = self.records.len() - window;
        for record in &mut self.records[start..] {
            record.record_access();
        }
        self.total_recalled += window as u64;
        debug!(window, "Recent records recalled");
        &self.records[start..]
    }

    fn touch(&mut self, index: usize) -> &Record {
        self.records[index].record_access();
        self.total_recalled += 1;
        &self.records[index]
    }

    /// Look up a record by id without counting it as a recall.
    #[must_use]
    pub fn get(&self, id: RecordId) -> Option<&Record> {
        self.records.iter().find(|r| r.id == id)
    }

    // ------------------------------------------------------------------
    // Removal
    // ------------------------------------------------------------------

    /// Remove and return the first record whose tag is exactly `tag`.
    ///
    /// Later records shift down one slot. Counters and capacity are untouched.
    ///
    /// # Errors
    /// Returns [`KuramaError::InvalidArgument`] for an empty tag, or
    /// [`KuramaError::NotFound`] if no record carries the tag.
    pub fn delete_by_tag(&mut self, tag: &str) -> Result<Record> {
        if tag.is_empty() {
            return Err(KuramaError::InvalidArgument("record tag must not be empty"));
        }
        let Some(index) = self.records.iter().position(|r| r.tag == tag) else {
            debug!(tag, "No record found with tag to delete");
            return Err(KuramaError::NotFound(format!("record with tag '{tag}'")));
        };
        let removed = self.records.remove(index);
        debug!(tag, index, "Record deleted");
        Ok(removed)
    }

    /// Remove every record older than `max_age`, keeping the rest in order.
    ///
    /// A record aged exactly `max_age` survives. Returns how many were removed.
    pub fn cleanup_old(&mut self, max_age: Duration) -> usize {
        let now = self.clock.now();
        let before = self.records.len();
        self.records
            .retain(|r| !expiry::is_expired(r.timestamp, now, max_age));
        let removed = before - self.records.len();

        if removed > 0 {
            info!(
                removed,
                max_age_secs = max_age.num_seconds(),
                "Cleaned up old records"
            );
        }
        removed
    }

    /// Drop every record, keeping capacity and the running counters.
    pub fn clear(&mut self) {
        info!(count = self.records.len(), "Clearing record store");
        self.records.clear();
    }

    // ------------------------------------------------------------------
    // Read-only views
    // ------------------------------------------------------------------

    /// All records in insertion order. Does not count as a recall.
    #[must_use]
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Records currently held.
    #[must_use]
    pub fn count(&self) -> usize {
        self.records.len()
    }

    /// Whether the store holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Slots currently allocated.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Records ever saved.
    #[must_use]
    pub fn total_saved(&self) -> u64 {
        self.total_saved
    }

    /// Records ever returned by a lookup.
    #[must_use]
    pub fn total_recalled(&self) -> u64 {
        self.total_recalled
    }

    /// Snapshot of the store's counters and per-type breakdown.
    #[must_use]
    pub fn stats(&self) -> StoreStats {
        let mut by_type = BTreeMap::new();
        for record in &self.records {
            *by_type.entry(record.record_type).or_insert(0) += 1;
        }
        StoreStats {
            count: self.records.len(),
            capacity: self.capacity,
            total_saved: self.total_saved,
            total_recalled: self.total_recalled,
            by_type,
        }
    }
}

impl Default for RecordStore {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for RecordStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordStore")
            .field("count", &self.records.len())
            .field("capacity", &self.capacity)
            .field("total_saved", &self.total_saved)
            .field("total_recalled", &self.total_recalled)
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ManualClock;
    use chrono::{DateTime, Utc};

    fn start() -> DateTime<Utc> {
        DateTime::from_timestamp(1_700_000_000, 0).expect("valid timestamp")
    }

    fn store_with_clock() -> (RecordStore, ManualClock) {
        let clock = ManualClock::new(start());
        let store = RecordStore::with_config(&StoreConfig::default(), Arc::new(clock.clone()))
            .expect("store");
        (store, clock)
    }

    #[test]
    fn new_store_is_empty() {
        let store = RecordStore::new();
        assert_eq!(store.count(), 0);
        assert_eq!(store.capacity(), 10);
        assert_eq!(store.total_saved(), 0);
        assert_eq!(store.total_recalled(), 0);
    }

    #[test]
    fn save_stamps_and_counts() {
        let (mut store, _clock) = store_with_clock();
        let id = store
            .save("Kurama brain initialized", "init", RecordType::Evolution, 10)
            .expect("save");

        let record = store.get(id).expect("record exists");
        assert_eq!(record.text, "Kurama brain initialized");
        assert_eq!(record.tag, "init");
        assert_eq!(record.timestamp, start());
        assert_eq!(record.importance, 10);
        assert_eq!(record.access_count, 0);
        assert_eq!(store.count(), 1);
        assert_eq!(store.total_saved(), 1);
    }

    #[test]
    fn empty_tag_is_rejected() {
        let (mut store, _clock) = store_with_clock();
        let err = store.save("text", "", RecordType::Pattern, 1);
        assert!(matches!(err, Err(KuramaError::InvalidArgument(_))));
        assert_eq!(store.count(), 0);
        assert_eq!(store.total_saved(), 0);
    }

    #[test]
    fn capacity_doubles_when_full() {
        let (mut store, _clock) = store_with_clock();
        for i in 0..10 {
            store
                .save(&format!("turn {i}"), "conversation", RecordType::Conversation, 3)
                .expect("save");
        }
        assert_eq!(store.capacity(), 10);
        store
            .save("turn 10", "conversation", RecordType::Conversation, 3)
            .expect("save");
        assert_eq!(store.capacity(), 20);
        assert_eq!(store.count(), 11);
    }

    #[test]
    fn long_text_and_tag_are_truncated() {
        let (mut store, _clock) = store_with_clock();
        let text = "a".repeat(2_000);
        let tag = "t".repeat(100);
        let id = store
            .save(&text, &tag, RecordType::LearnedFact, 1)
            .expect("save");
        let record = store.get(id).expect("record exists");
        assert_eq!(record.text.len(), 511);
        assert_eq!(record.tag.len(), 63);
    }

    #[test]
    fn recall_by_tag_returns_first_match() {
        let (mut store, _clock) = store_with_clock();
        let first = store.save("one", "a", RecordType::Conversation, 1).expect("save");
        store.save("two", "b", RecordType::Conversation, 1).expect("save");
        store.save("three", "a", RecordType::Conversation, 1).expect("save");

        let hit = store.recall_by_tag("a").expect("hit");
        assert_eq!(hit.id, first);
        assert_eq!(hit.access_count, 1);

        let hit = store.recall_by_tag("a").expect("hit");
        assert_eq!(hit.access_count, 2);
        assert_eq!(store.total_recalled(), 2);
        assert_eq!(store.records()[2].access_count, 0);
    }

    #[test]
    fn recall_by_tag_is_case_sensitive_and_miss_is_silent() {
        let (mut store, _clock) = store_with_clock();
        store.save("one", "Init", RecordType::Evolution, 1).expect("save");
        assert!(store.recall_by_tag("init").is_none());
        assert_eq!(store.total_recalled(), 0);
        assert_eq!(store.records()[0].access_count, 0);
    }

    #[test]
    fn recall_by_type_returns_most_recent() {
        let (mut store, clock) = store_with_clock();
        store.save("t1", "e1", RecordType::Evolution, 1).expect("save");
        clock.advance(Duration::seconds(5));
        store.save("t3", "p", RecordType::Pattern, 1).expect("save");
        clock.advance(Duration::seconds(5));
        let newest = store.save("t2", "e2", RecordType::Evolution, 1).expect("save");

        let hit = store.recall_by_type(RecordType::Evolution).expect("hit");
        assert_eq!(hit.id, newest);
        assert_eq!(hit.access_count, 1);
        assert!(store.recall_by_type(RecordType::EmotionalState).is_none());
        assert_eq!(store.total_recalled(), 1);
    }

    #[test]
    fn recall_by_type_ties_go_to_later_insertion() {
        let (mut store, _clock) = store_with_clock();
        store.save("first", "x", RecordType::Pattern, 1).expect("save");
        let second = store.save("second", "y", RecordType::Pattern, 1).expect("save");
        let hit = store.recall_by_type(RecordType::Pattern).expect("hit");
        assert_eq!(hit.id, second);
    }

    #[test]
    fn recall_recent_returns_window_in_order() {
        let (mut store, _clock) = store_with_clock();
        for i in 0..5 {
            store
                .save(&format!("turn {i}"), "conversation", RecordType::Conversation, 1)
                .expect("save");
        }
        let window: Vec<String> = store.recall_recent(3).iter().map(|r| r.text.clone()).collect();
        assert_eq!(window, vec!["turn 2", "turn 3", "turn 4"]);
        assert_eq!(store.total_recalled(), 3);
        assert_eq!(store.records()[1].access_count, 0);
        assert_eq!(store.records()[4].access_count, 1);

        // Asking for more than exists clamps to the whole store.
        assert_eq!(store.recall_recent(50).len(), 5);
        assert_eq!(store.total_recalled(), 8);
    }

    #[test]
    fn recall_recent_of_zero_or_empty_store_is_empty() {
        let (mut store, _clock) = store_with_clock();
        assert!(store.recall_recent(3).is_empty());
        store.save("x", "x", RecordType::Pattern, 1).expect("save");
        assert!(store.recall_recent(0).is_empty());
        assert_eq!(store.total_recalled(), 0);
    }

    #[test]
    fn delete_shifts_later_records_down() {
        let (mut store, _clock) = store_with_clock();
        store.save("one", "first", RecordType::Conversation, 1).expect("save");
        store.save("two", "middle", RecordType::Conversation, 1).expect("save");
        store.save("three", "last", RecordType::Conversation, 1).expect("save");

        let removed = store.delete_by_tag("middle").expect("deleted");
        assert_eq!(removed.text, "two");
        assert_eq!(store.count(), 2);
        let texts: Vec<&str> = store.records().iter().map(|r| r.text.as_str()).collect();
        assert_eq!(texts, vec!["one", "three"]);
        assert_eq!(store.total_saved(), 3);
        assert_eq!(store.capacity(), 10);
    }

    #[test]
    fn delete_missing_tag_is_not_found() {
        let (mut store, _clock) = store_with_clock();
        store.save("one", "a", RecordType::Conversation, 1).expect("save");
        assert!(matches!(store.delete_by_tag("zzz"), Err(KuramaError::NotFound(_))));
        assert!(matches!(store.delete_by_tag(""), Err(KuramaError::InvalidArgument(_))));
        assert_eq!(store.count(), 1);
    }

    #[test]
    fn cleanup_boundary_is_exclusive() {
        let (mut store, clock) = store_with_clock();
        store.save("oldest", "a", RecordType::Conversation, 1).expect("save");
        clock.advance(Duration::seconds(1));
        store.save("boundary", "b", RecordType::Conversation, 1).expect("save");
        clock.advance(Duration::seconds(60));

        // "oldest" is 61s old, "boundary" exactly 60s old.
        let removed = store.cleanup_old(Duration::seconds(60));
        assert_eq!(removed, 1);
        assert_eq!(store.count(), 1);
        assert_eq!(store.records()[0].text, "boundary");
    }

    #[test]
    fn cleanup_keeps_order_and_ignores_future_records() {
        let (mut store, clock) = store_with_clock();
        store.save("old 1", "a", RecordType::Conversation, 1).expect("save");
        clock.advance(Duration::seconds(100));
        store.save("fresh", "b", RecordType::Conversation, 1).expect("save");
        clock.advance(Duration::seconds(-200));
        store.save("rewound", "c", RecordType::Conversation, 1).expect("save");
        clock.advance(Duration::seconds(300));
        store.save("fresh 2", "d", RecordType::Conversation, 1).expect("save");

        // Now = start + 200. Ages: 200, 100, 300, 0.
        let removed = store.cleanup_old(Duration::seconds(150));
        assert_eq!(removed, 2);
        let texts: Vec<&str> = store.records().iter().map(|r| r.text.as_str()).collect();
        assert_eq!(texts, vec!["fresh", "fresh 2"]);

        // Winding the clock back makes every record "future" and untouchable.
        clock.set(start() - Duration::days(1));
        assert_eq!(store.cleanup_old(Duration::zero()), 0);
    }

    #[test]
    fn stats_break_down_by_type() {
        let (mut store, _clock) = store_with_clock();
        store.save("a", "a", RecordType::Conversation, 1).expect("save");
        store.save("b", "b", RecordType::Conversation, 1).expect("save");
        store.save("c", "c", RecordType::Evolution, 1).expect("save");
        store.recall_by_tag("a");

        let stats = store.stats();
        assert_eq!(stats.count, 3);
        assert_eq!(stats.capacity, 10);
        assert_eq!(stats.total_saved, 3);
        assert_eq!(stats.total_recalled, 1);
        assert_eq!(stats.by_type.get(&RecordType::Conversation), Some(&2));
        assert_eq!(stats.by_type.get(&RecordType::Evolution), Some(&1));
        assert_eq!(stats.by_type.get(&RecordType::Pattern), None);
        assert!((stats.usage_percent() - 30.0).abs() < f64::EPSILON);

        let rendered = stats.to_string();
        assert!(rendered.contains("Records: 3/10"));
        assert!(rendered.contains("Conversation: 2"));
    }

    #[test]
    fn clear_keeps_counters_and_capacity() {
        let (mut store, _clock) = store_with_clock();
        for i in 0..11 {
            store.save(&i.to_string(), "n", RecordType::Pattern, 1).expect("save");
        }
        store.clear();
        assert!(store.is_empty());
        assert_eq!(store.capacity(), 20);
        assert_eq!(store.total_saved(), 11);
    }

    #[test]
    fn zero_initial_capacity_is_a_config_error() {
        let config = StoreConfig {
            initial_capacity: 0,
            ..StoreConfig::default()
        };
        let err = RecordStore::with_config(&config, Arc::new(SystemClock));
        assert!(matches!(err, Err(KuramaError::Config(_))));
    }

    #[test]
    fn oversized_initial_capacity_is_an_allocation_failure() {
        let config = StoreConfig {
            initial_capacity: usize::MAX / 2,
            ..StoreConfig::default()
        };
        let err = RecordStore::with_config(&config, Arc::new(SystemClock));
        assert!(matches!(
            err,
            Err(KuramaError::AllocationFailure { capacity: 0, requested })
                if requested == usize::MAX / 2
        ));
    }

    /// A store holding two records whose logical capacity is forced to `capacity`.
    fn store_near_limit(capacity: usize) -> RecordStore {
        let (mut store, _clock) = store_with_clock();
        store.save("kept", "a", RecordType::Pattern, 1).expect("save");
        store.save("kept", "b", RecordType::Pattern, 1).expect("save");
        store.capacity = capacity;
        store
    }

    #[test]
    fn growth_overflow_leaves_store_unchanged() {
        let mut store = store_near_limit(usize::MAX);
        let err = store.grow();
        assert!(matches!(
            err,
            Err(KuramaError::AllocationFailure { capacity: usize::MAX, .. })
        ));
        assert_eq!(store.count(), 2);
        assert_eq!(store.capacity(), usize::MAX);
        assert_eq!(store.total_saved(), 2);
    }

    #[test]
    fn failed_reservation_leaves_store_unchanged() {
        let huge = usize::MAX / 4;
        let mut store = store_near_limit(huge);
        let err = store.grow();
        assert!(matches!(
            err,
            Err(KuramaError::AllocationFailure { capacity, requested })
                if capacity == huge && requested == huge * 2
        ));
        assert_eq!(store.count(), 2);
        assert_eq!(store.capacity(), huge);
        assert_eq!(store.total_saved(), 2);

        // Still usable: the next save has room without growing.
        store.save("after", "c", RecordType::Pattern, 1).expect("save");
        assert_eq!(store.count(), 3);
        assert_eq!(store.capacity(), huge);
    }
}
