//! Bounded, time-ordered buffer of past engine snapshots.

use std::collections::VecDeque;

use crate::types::Snapshot;

/// Maximum snapshots retained before the oldest is evicted.
pub const HISTORY_CAPACITY: usize = 1000;

/// Append-only ring of snapshots for trend queries.
#[derive(Debug, Default)]
pub struct HistoryBuffer {
    entries: VecDeque<Snapshot>,
}

impl HistoryBuffer {
    pub fn new() -> Self {
        Self { entries: VecDeque::with_capacity(HISTORY_CAPACITY) }
    }

    /// Append a snapshot, evicting the oldest entry at capacity.
    pub fn push(&mut self, snapshot: Snapshot) {
        if self.entries.len() >= HISTORY_CAPACITY {
            self.entries.pop_front();
        }
        self.entries.push_back(snapshot);
    }

    /// Most recent snapshot, if any.
    pub fn latest(&self) -> Option<&Snapshot> {
        self.entries.back()
    }

    /// The most recent `limit` snapshots, oldest-to-newest.
    pub fn last_n(&self, limit: usize) -> Vec<Snapshot> {
        let skip = self.entries.len().saturating_sub(limit);
        self.entries.iter().skip(skip).cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{AnomalyContext, Severity, Snapshot};

    fn snapshot(ts: i64) -> Snapshot {
        Snapshot {
            timestamp: ts,
            readings: Vec::new(),
            risk_index: 0,
            anomaly: AnomalyContext::ambient(false, Severity::Low),
        }
    }

    #[test]
    fn test_capacity_bound_and_eviction() {
        let mut buf = HistoryBuffer::new();
        for i in 0..(HISTORY_CAPACITY as i64 + 1) {
            buf.push(snapshot(i));
        }
        assert_eq!(buf.len(), HISTORY_CAPACITY);
        // Entry 0 was evicted; the newest entry is present.
        assert_eq!(buf.last_n(HISTORY_CAPACITY)[0].timestamp, 1);
        assert_eq!(buf.latest().unwrap().timestamp, HISTORY_CAPACITY as i64);
    }

    #[test]
    fn test_last_n_order_and_limit() {
        let mut buf = HistoryBuffer::new();
        for i in 0..10 {
            buf.push(snapshot(i));
        }
        let last3 = buf.last_n(3);
        assert_eq!(last3.iter().map(|s| s.timestamp).collect::<Vec<_>>(), vec![7, 8, 9]);
        // A limit beyond the length returns everything.
        assert_eq!(buf.last_n(100).len(), 10);
    }
}
