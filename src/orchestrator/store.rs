//! Session-scoped job cache

use std::collections::HashMap;

use crate::models::{JobRecord, JobStats};

/// Result of one insert attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    Inserted,
    AlreadyCached,
}

/// In-memory cache of every job viewed this session.
///
/// First write wins: stats for an already-cached job id are never
/// overwritten, which is what guarantees "no refetch for an already-viewed
/// job". No eviction; the store dies with the browsing context. Only the
/// orchestrator holds one.
#[derive(Debug, Default)]
pub struct JobStore {
    entries: HashMap<String, JobRecord>,
}

impl JobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cache `stats` unless the job id is already present.
    pub fn insert(&mut self, stats: JobStats, fetched_at: i64) -> InsertOutcome {
        if self.entries.contains_key(&stats.job_id) {
            return InsertOutcome::AlreadyCached;
        }
        self.entries
            .insert(stats.job_id.clone(), JobRecord::new(stats, fetched_at));
        InsertOutcome::Inserted
    }

    pub fn get(&self, job_id: &str) -> Option<&JobRecord> {
        self.entries.get(job_id)
    }

    pub fn contains(&self, job_id: &str) -> bool {
        self.entries.contains_key(job_id)
    }

    /// Flag the usage ping for this job as sent so it never repeats.
    pub fn mark_analytics_sent(&mut self, job_id: &str) {
        if let Some(record) = self.entries.get_mut(job_id) {
            record.analytics_sent = true;
        }
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
    use pretty_assertions::assert_eq;

    fn stats(job_id: &str, applies: u64) -> JobStats {
        JobStats {
            job_id: job_id.to_string(),
            applies,
            views: 100,
            expire_at: 1_785_542_400_000,
            is_remote_allowed: None,
        }
    }

    #[test]
    fn test_first_write_wins() {
        let mut store = JobStore::new();
        assert_eq!(store.insert(stats("42", 10), 1_000), InsertOutcome::Inserted);
        // Different values for the same job id must not replace the entry.
        assert_eq!(
            store.insert(stats("42", 999), 2_000),
            InsertOutcome::AlreadyCached
        );

        let record = store.get("42").unwrap();
        assert_eq!(record.stats.applies, 10);
        assert_eq!(record.fetched_at, 1_000);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_analytics_flag_sticks_across_reinsert_attempts() {
        let mut store = JobStore::new();
        store.insert(stats("7", 1), 0);
        assert!(!store.get("7").unwrap().analytics_sent);

        store.mark_analytics_sent("7");
        store.insert(stats("7", 2), 5);
        assert!(store.get("7").unwrap().analytics_sent);
    }

    #[test]
    fn test_miss() {
        let store = JobStore::new();
        assert!(store.get("404").is_none());
        assert!(!store.contains("404"));
        assert!(store.is_empty());
    }
}
