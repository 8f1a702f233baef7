//! Point-in-time statistics for a record store.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::types::RecordType;

/// Snapshot of a [`RecordStore`](super::RecordStore)'s counters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoreStats {
    /// Records currently held.
    pub count: usize,
    /// Slots currently allocated.
    pub capacity: usize,
    /// Records ever saved.
    pub total_saved: u64,
    /// Records ever returned by a lookup.
    pub total_recalled: u64,
    /// Records currently held, per type. Types with no records are absent.
    pub by_type: BTreeMap<RecordType, usize>,
}

impl StoreStats {
    /// Share of allocated slots in use, as a percentage.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn usage_percent(&self) -> f64 {
        if self.capacity == 0 {
            return 0.0;
        }
        self.count as f64 / self.capacity as f64 * 100.0
    }
}

impl fmt::Display for StoreStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "═══ RECORD STORE STATISTICS ═══")?;
        writeln!(f, "Records: {}/{}", self.count, self.capacity)?;
        writeln!(f, "Total saved: {}", self.total_saved)?;
        writeln!(f, "Total recalled: {}", self.total_recalled)?;
        writeln!(f, "Record types:")?;
        for (record_type, n) in &self.by_type {
            writeln!(f, "  - {record_type}: {n}")?;
        }
        writeln!(f, "Usage: {:.1}%", self.usage_percent())?;
        write!(f, "═══════════════════════════════")
    }
}
