//! Leaderboard observations and the primitives that interpret them
//!
//! - [`LeaderboardSnapshot`] / [`Entry`]: one polled observation
//! - [`CompanyResolver`]: model name to organization
//! - [`EventPeriodSelector`]: which market period is live right now
//! - [`VersionValidator`]: whether a version label looks like a date
//! - [`HttpSnapshotSource`]: polls snapshots over HTTP

pub mod company;
pub mod period;
pub mod source;
pub mod types;
pub mod version;

pub use company::{CompanyResolver, MatchMode};
pub use period::{EventPeriod, EventPeriodSelector};
pub use source::HttpSnapshotSource;
pub use types::{Entry, LeaderboardSnapshot, ScoreMetric};
pub use version::{ValidationCounter, ValidationOutcome, VersionValidator, DEFAULT_VERSION_FORMATS};
