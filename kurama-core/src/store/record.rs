//! A single stored record: one tagged, typed, timestamped piece of text.

use std::fmt;

use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{RecordId, RecordType};

/// A record held by the [`RecordStore`](super::RecordStore).
///
/// Text and tag are already cut to the store's bounds when the record is
/// created. Only the owning store changes `access_count`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Stable identifier, unaffected by deletions of other records.
    pub id: RecordId,
    /// The remembered content.
    pub text: String,
    /// Lookup tag. Not unique; lookups return the first match.
    pub tag: String,
    /// What kind of content this is.
    pub record_type: RecordType,
    /// When the record was saved.
    pub timestamp: DateTime<Utc>,
    /// Caller-supplied score, for display only.
    pub importance: i32,
    /// How many lookups have returned this record.
    pub access_count: u32,
}

impl Record {
    pub(crate) fn new(
        text: String,
        tag: String,
        record_type: RecordType,
        timestamp: DateTime<Utc>,
        importance: i32,
    ) -> Self {
        Self {
            id: RecordId::new(),
            text,
            tag,
            record_type,
            timestamp,
            importance,
            access_count: 0,
        }
    }

    /// Record a successful lookup.
    pub(crate) fn record_access(&mut self) {
        self.access_count = self.access_count.saturating_add(1);
    }

    /// Shortened text for log lines.
    #[must_use]
    pub fn preview(&self) -> String {
        crate::types::preview(&self.text)
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let local = self.timestamp.with_timezone(&Local);
        writeln!(
            f,
            "{} ({}) [{}] (accessed {} times, importance {})",
            self.tag,
            self.record_type,
            local.format("%Y-%m-%d %H:%M:%S"),
            self.access_count,
            self.importance,
        )?;
        write!(f, "    \"{}\"", self.text)
    }
}
