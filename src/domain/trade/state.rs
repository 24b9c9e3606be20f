//! Trade history container.

use super::TradeRecord;
use std::collections::{HashSet, VecDeque};

/// Trade records for the page session, newest first.
///
/// Mined records are deduplicated by [`TradeRecord::id`], so a redelivered
/// log is recorded once. Pending records carry no usable id and are always
/// kept. Without a `max_size` the history grows for the whole session.
#[derive(Debug, Clone, Default)]
pub struct TradeHistory {
    records: VecDeque<TradeRecord>,
    seen: HashSet<String>,
    max_size: Option<usize>,
}

impl TradeHistory {
    pub fn new(max_size: Option<usize>) -> Self {
        Self {
            records: VecDeque::new(),
            seen: HashSet::new(),
            max_size,
        }
    }

    /// Prepend a record, evicting the oldest if at capacity.
    /// Returns `false` if a mined record with the same id was already seen.
    pub fn push(&mut self, record: TradeRecord) -> bool {
        if !record.is_pending() && !self.seen.insert(record.id.clone()) {
            return false;
        }
        self.records.push_front(record);
        if let Some(max) = self.max_size {
            while self.records.len() > max {
                if let Some(evicted) = self.records.pop_back() {
                    self.seen.remove(&evicted.id);
                }
            }
        }
        true
    }

    /// Record one batch in delivery order; the last record of the batch ends
    /// up first. Returns how many records were new.
    pub fn record_batch(&mut self, batch: impl IntoIterator<Item = TradeRecord>) -> usize {
        batch.into_iter().map(|r| self.push(r)).filter(|added| *added).count()
    }

    pub fn records(&self) -> &VecDeque<TradeRecord> {
        &self.records
    }

    pub fn latest(&self) -> Option<&TradeRecord> {
        self.records.front()
    }

    pub fn max_size(&self) -> Option<usize> {
        self.max_size
    }

    pub fn clear(&mut self) {
        self.records.clear();
        self.seen.clear();
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
