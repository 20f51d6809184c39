//! Leaderboard version label validation

use chrono::{DateTime, NaiveDate};
use serde::Serialize;
use tracing::warn;

/// Accepted date layouts for version labels, in `chrono` format syntax
pub const DEFAULT_VERSION_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%b %d, %Y",
    "%B %d, %Y",
    "%m/%d/%Y",
    "%d %b %Y",
];

/// Checks that a version label is a full calendar date
///
/// RFC 3339 timestamps are always accepted; other labels must match one of
/// the configured layouts exactly.
#[derive(Debug, Clone)]
pub struct VersionValidator {
    formats: Vec<String>,
}

impl VersionValidator {
    pub fn new<I, S>(formats: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            formats: formats.into_iter().map(Into::into).collect(),
        }
    }

    pub fn is_valid(&self, label: &str) -> bool {
        let label = label.trim();
        if label.is_empty() {
            return false;
        }
        if DateTime::parse_from_rfc3339(label).is_ok() {
            return true;
        }
        self.formats
            .iter()
            .any(|format| NaiveDate::parse_from_str(label, format).is_ok())
    }
}

impl Default for VersionValidator {
    fn default() -> Self {
        Self::new(DEFAULT_VERSION_FORMATS.iter().copied())
    }
}

/// Outcome of checking one snapshot's version label
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationOutcome {
    Valid,
    /// Invalid, with the running count of consecutive failures
    Invalid { failures: u32 },
    /// Invalid and the consecutive-failure threshold was reached
    Escalate { failures: u32 },
}

/// Counts consecutive invalid version labels
///
/// A valid label resets the count to zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ValidationCounter {
    pub consecutive_failures: u32,
}

impl ValidationCounter {
    pub fn check(&mut self, validator: &VersionValidator, label: &str, threshold: u32) -> ValidationOutcome {
        if validator.is_valid(label) {
            self.consecutive_failures = 0;
            return ValidationOutcome::Valid;
        }

        self.consecutive_failures += 1;
        warn!(
            label = %label,
            failures = self.consecutive_failures,
            threshold,
            "Invalid leaderboard version label"
        );

        if self.consecutive_failures >= threshold {
            ValidationOutcome::Escalate {
                failures: self.consecutive_failures,
            }
        } else {
            ValidationOutcome::Invalid {
                failures: self.consecutive_failures,
            }
        }
    }
}
