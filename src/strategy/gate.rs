//! Version-keyed trade de-duplication

use std::collections::HashMap;

use super::types::{TradeKey, TradeRecord};

/// Trade history doubling as the de-duplication gate
///
/// One record per `(market, participant, direction)`. A key is open again as
/// soon as the leaderboard version differs from the one its last successful
/// trade was made under. Records are written only through [`TradeGate::record`]
/// so gate state and history never diverge.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TradeGate {
    records: HashMap<TradeKey, TradeRecord>,
}

impl TradeGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn admit(&self, key: &TradeKey, current_version: &str) -> bool {
        match self.records.get(key) {
            Some(record) => record.leaderboard_version != current_version,
            None => true,
        }
    }

    /// Store a confirmed trade, replacing any earlier record for its key
    pub fn record(&mut self, record: TradeRecord) {
        self.records.insert(record.key(), record);
    }

    pub fn get(&self, key: &TradeKey) -> Option<&TradeRecord> {
        self.records.get(key)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records sorted by key, for summaries
    pub fn records(&self) -> Vec<&TradeRecord> {
        let mut records: Vec<&TradeRecord> = self.records.values().collect();
        records.sort_by_key(|r| r.key());
        records
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }
}
