//! Job posting stats and cache records

use serde::{Deserialize, Serialize};

/// Displayable stats for one job posting.
///
/// All four required fields must be present before a value of this type
/// exists; partial endpoint responses never become a `JobStats`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobStats {
    /// Numeric posting identifier, kept as an opaque string.
    pub job_id: String,
    pub applies: u64,
    pub views: u64,
    /// Posting expiration instant, epoch milliseconds.
    pub expire_at: i64,
    /// Tri-state remote flag: the endpoint may omit it entirely.
    pub is_remote_allowed: Option<bool>,
}

/// One cached entry in the session store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobRecord {
    pub stats: JobStats,
    /// Instant the stats were captured, epoch milliseconds.
    pub fetched_at: i64,
    /// Set once the usage ping for this job has gone out.
    pub analytics_sent: bool,
}

impl JobRecord {
    pub fn new(stats: JobStats, fetched_at: i64) -> Self {
        Self {
            stats,
            fetched_at,
            analytics_sent: false,
        }
    }
}

/// A detected change of the page's logical location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationEvent {
    pub url: String,
    /// `None` when the new location is not a job page.
    pub job_id: Option<String>,
}
