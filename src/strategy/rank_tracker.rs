//! Top-N rank slot tracking

use serde::Serialize;
use tracing::debug;

use super::types::Transition;
use crate::leaderboard::{CompanyResolver, Entry};

/// Who held a tracked rank at the last observation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankSlot {
    /// Resolved company, `None` when the model name was not recognised
    pub company: Option<String>,
    pub model: String,
    pub score: f64,
}

impl RankSlot {
    fn from_entry(entry: &Entry, resolver: &CompanyResolver) -> Self {
        Self {
            company: resolver.resolve(&entry.display_name),
            model: entry.display_name.clone(),
            score: entry.score,
        }
    }
}

/// Holds the top-N slots and reports what changed between observations
///
/// The first observation only establishes a baseline. Later observations
/// compare every incoming entry against the stored slots and then overwrite
/// all slots at once.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankStateTracker {
    slots: Vec<Option<RankSlot>>,
    initialized: bool,
}

impl RankStateTracker {
    pub fn new(tracked_ranks: usize) -> Self {
        Self {
            slots: vec![None; tracked_ranks],
            initialized: false,
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn slots(&self) -> &[Option<RankSlot>] {
        &self.slots
    }

    pub fn tracked_ranks(&self) -> usize {
        self.slots.len()
    }

    /// Feed the effective top-N of a snapshot
    ///
    /// `top[i]` is the entry now holding rank `i + 1`. Entries beyond the
    /// tracked count are ignored; slots with no incoming entry keep their
    /// previous value.
    pub fn observe(&mut self, top: &[&Entry], resolver: &CompanyResolver) -> Vec<Transition> {
        let incoming: Vec<RankSlot> = top
            .iter()
            .take(self.slots.len())
            .map(|entry| RankSlot::from_entry(entry, resolver))
            .collect();

        if !self.initialized {
            self.write_slots(incoming);
            self.initialized = true;
            return Vec::new();
        }

        let transitions: Vec<Transition> = incoming
            .iter()
            .enumerate()
            .filter_map(|(index, new)| compare(index + 1, self.slots[index].as_ref(), new))
            .collect();

        self.write_slots(incoming);
        transitions
    }

    fn write_slots(&mut self, incoming: Vec<RankSlot>) {
        for (index, slot) in incoming.into_iter().enumerate() {
            self.slots[index] = Some(slot);
        }
    }
}

fn compare(rank: usize, old: Option<&RankSlot>, new: &RankSlot) -> Option<Transition> {
    let Some(new_company) = new.company.as_ref() else {
        debug!(rank, model = %new.model, "Unknown company at tracked rank, skipping");
        return None;
    };

    // Nothing stored yet, or the stored holder was unrecognised: baseline only
    let old = old?;
    let Some(old_company) = old.company.as_ref() else {
        return None;
    };

    if old_company != new_company {
        Some(Transition::Promotion {
            rank,
            new_company: new_company.clone(),
            old_company: old_company.clone(),
            new_model: new.model.clone(),
            old_model: old.model.clone(),
        })
    } else if old.score != new.score {
        Some(Transition::ScoreChange {
            rank,
            company: new_company.clone(),
            old_score: old.score,
            new_score: new.score,
        })
    } else {
        None
    }
}
