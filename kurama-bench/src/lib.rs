//! Shared fixtures for the Kurama benchmark suite.

use std::sync::Arc;

use chrono::DateTime;
use kurama_core::config::StoreConfig;
use kurama_core::store::RecordStore;
use kurama_core::types::{ManualClock, RecordType};

/// A store pre-filled with `n` conversation records, one second apart.
///
/// Every tenth record is tagged `fact-<i>` and typed as a learned fact so
/// tag and type lookups have something to find mid-log.
#[must_use]
pub fn filled_store(n: usize) -> (RecordStore, ManualClock) {
    let clock = ManualClock::new(DateTime::from_timestamp(1_700_000_000, 0).unwrap_or_default());
    let mut store = RecordStore::with_config(&StoreConfig::default(), Arc::new(clock.clone()))
        .expect("default store config is valid");
    for i in 0..n {
        let (tag, record_type) = if i % 10 == 0 {
            (format!("fact-{i}"), RecordType::LearnedFact)
        } else {
            ("conversation".to_string(), RecordType::Conversation)
        };
        store
            .save(&format!("Turn {i} of a long-running chat"), &tag, record_type, 3)
            .expect("bench store has room");
        clock.advance(chrono::Duration::seconds(1));
    }
    (store, clock)
}
