//! New-model detection

use regex::Regex;
use serde::Serialize;
use std::collections::BTreeSet;

use super::types::NewEntrant;
use crate::common::errors::{BotError, Result};
use crate::leaderboard::{CompanyResolver, Entry, ScoreMetric};

/// Model-name patterns whose appearance matters even when they fail to lead
#[derive(Debug, Clone, Default)]
pub struct SignificanceMatcher {
    patterns: Vec<Regex>,
}

impl SignificanceMatcher {
    /// Compile case-insensitive patterns
    pub fn new<I, S>(patterns: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let patterns = patterns
            .into_iter()
            .map(|p| {
                Regex::new(&format!("(?i){}", p.as_ref()))
                    .map_err(|e| BotError::Configuration(format!("invalid pattern {:?}: {}", p.as_ref(), e)))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { patterns })
    }

    pub fn is_significant(&self, model_name: &str) -> bool {
        self.patterns.iter().any(|p| p.is_match(model_name))
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

/// Every distinct model name observed so far; only ever grows
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NewEntrantDetector {
    known: BTreeSet<String>,
}

impl NewEntrantDetector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn known_count(&self) -> usize {
        self.known.len()
    }

    pub fn is_known(&self, name: &str) -> bool {
        self.known.contains(name)
    }

    /// Report entries never seen before and remember them
    ///
    /// A name repeated within one snapshot is reported once.
    pub fn scan(
        &mut self,
        entries: &[Entry],
        resolver: &CompanyResolver,
        matcher: &SignificanceMatcher,
        metric: &ScoreMetric,
    ) -> Vec<NewEntrant> {
        entries
            .iter()
            .filter(|entry| self.known.insert(entry.display_name.clone()))
            .map(|entry| NewEntrant {
                name: entry.display_name.clone(),
                score: metric.score_of(entry),
                company: resolver.resolve(&entry.display_name),
                significant: matcher.is_significant(&entry.display_name),
            })
            .collect()
    }

    /// Remember entries without reporting them
    pub fn absorb(&mut self, entries: &[Entry]) {
        self.known
            .extend(entries.iter().map(|entry| entry.display_name.clone()));
    }
}
