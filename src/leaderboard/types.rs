//! Leaderboard observation types

use serde::{Deserialize, Serialize};
use std::collections::hash_map::DefaultHasher;
use std::collections::BTreeMap;
use std::hash::{Hash, Hasher};

/// One competitor row of a polled leaderboard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entry {
    /// 1-based rank as published; 0 when the scraper could not read it
    #[serde(default)]
    pub rank: u32,
    pub display_name: String,
    #[serde(default)]
    pub score: f64,
    /// Organization as printed on the leaderboard (informational)
    #[serde(default)]
    pub organization: String,
    #[serde(default)]
    pub votes: u64,
    #[serde(default)]
    pub confidence_interval: String,
    /// Per-category scores for multi-metric benchmarks (e.g. "coding")
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub category_scores: BTreeMap<String, f64>,
}

impl Entry {
    pub fn new(rank: u32, display_name: impl Into<String>, score: f64) -> Self {
        Self {
            rank,
            display_name: display_name.into(),
            score,
            organization: String::new(),
            votes: 0,
            confidence_interval: String::new(),
            category_scores: BTreeMap::new(),
        }
    }

    pub fn with_organization(mut self, organization: impl Into<String>) -> Self {
        self.organization = organization.into();
        self
    }

    pub fn with_category(mut self, category: impl Into<String>, score: f64) -> Self {
        self.category_scores.insert(category.into(), score);
        self
    }
}

/// Which score of an entry a policy reads
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScoreMetric {
    /// The headline `score` column
    Overall,
    /// A named category; entries without it score 0
    Category(String),
}

impl ScoreMetric {
    pub fn category(name: impl Into<String>) -> Self {
        Self::Category(name.into())
    }

    pub fn score_of(&self, entry: &Entry) -> f64 {
        match self {
            ScoreMetric::Overall => entry.score,
            ScoreMetric::Category(name) => entry.category_scores.get(name).copied().unwrap_or(0.0),
        }
    }
}

/// One polled observation of a leaderboard
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardSnapshot {
    /// Version label published with the leaderboard (e.g. "Dec 17, 2025")
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub total_votes: u64,
    #[serde(default)]
    pub total_models: u64,
    #[serde(default)]
    pub entries: Vec<Entry>,
}

impl LeaderboardSnapshot {
    pub fn new(version: impl Into<String>, entries: Vec<Entry>) -> Self {
        let entries_len = entries.len() as u64;
        Self {
            version: version.into(),
            total_votes: 0,
            total_models: entries_len,
            entries,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Version used for trade de-duplication
    ///
    /// The trimmed label when one is published, otherwise a fingerprint of
    /// the entry names and scores so identical boards share a token.
    pub fn version_token(&self) -> String {
        let label = self.version.trim();
        if !label.is_empty() {
            return label.to_string();
        }

        let mut hasher = DefaultHasher::new();
        for entry in &self.entries {
            entry.display_name.hash(&mut hasher);
            entry.score.to_bits().hash(&mut hasher);
            for (category, score) in &entry.category_scores {
                category.hash(&mut hasher);
                score.to_bits().hash(&mut hasher);
            }
        }
        format!("content-{:016x}", hasher.finish())
    }

    /// Entries sorted by `metric`, highest first
    pub fn sorted_by(&self, metric: &ScoreMetric) -> Vec<&Entry> {
        let mut sorted: Vec<&Entry> = self.entries.iter().collect();
        sorted.sort_by(|a, b| metric.score_of(b).total_cmp(&metric.score_of(a)));
        sorted
    }

    /// The top `n` entries
    ///
    /// Uses published ranks when ranks 1..=n are all present, otherwise
    /// falls back to the first `n` entries in snapshot order.
    pub fn effective_top(&self, n: usize) -> Vec<&Entry> {
        let by_rank: Option<Vec<&Entry>> = (1..=n as u32)
            .map(|rank| self.entries.iter().find(|e| e.rank == rank))
            .collect();

        match by_rank {
            Some(top) if n > 0 => top,
            _ => self.entries.iter().take(n).collect(),
        }
    }
}
