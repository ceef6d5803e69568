//! # Event Store
//! In-memory, deduplicated collection of match records keyed by event id.
//!
//! First insertion wins: a record whose id is already present is skipped with a
//! warning, both within one batch and across batches. Every operation runs under a
//! single mutex, so a snapshot never observes a half-applied batch.

use chrono::{DateTime, Utc};
use metrics::{counter, gauge};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::config::keywords::KeywordSets;
use crate::error::StoreError;
use crate::matcher::MatchRecord;
use crate::scoring::{self, ScoredRecord};

/// Result of one `insert_batch` call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InsertOutcome {
    pub inserted: usize,
    /// Ids skipped because they were already stored (or earlier in the batch).
    pub duplicates: Vec<String>,
}

#[derive(Debug, Default)]
pub struct EventStore {
    inner: Mutex<HashMap<String, MatchRecord>>,
}

impl EventStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn guard(&self) -> MutexGuard<'_, HashMap<String, MatchRecord>> {
        // poisoned lock: each insert is a single map operation, data stays usable
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Insert records in iteration order, skipping ids already present.
    ///
    /// Each record is checked before it is inserted; the first invalid record aborts
    /// the call with `StoreError::InvalidRecord`. Records inserted before it are
    /// not rolled back.
    pub fn insert_batch<I>(&self, records: I) -> Result<InsertOutcome, StoreError>
    where
        I: IntoIterator<Item = MatchRecord>,
    {
        let mut map = self.guard();
        let mut outcome = InsertOutcome::default();

        let result = records.into_iter().try_for_each(|rec| {
            check_record(&rec)?;
            let id = rec.event.id.clone();
            if map.contains_key(&id) {
                tracing::warn!(%id, "duplicate event id, ignoring");
                outcome.duplicates.push(id);
                return Ok(());
            }
            map.insert(id, rec);
            outcome.inserted += 1;
            Ok(())
        });

        counter!("feed_store_inserted_total").increment(outcome.inserted as u64);
        gauge!("feed_store_events").set(map.len() as f64);
        result.map(|()| outcome)
    }

    /// Score every stored record against `sets` at `now`, highest total first,
    /// ties by ascending id.
    pub fn ranked_snapshot(&self, sets: &KeywordSets, now: DateTime<Utc>) -> Vec<ScoredRecord> {
        let map = self.guard();
        let ranked = scoring::rank(map.values(), sets, now);
        for r in &ranked {
            tracing::debug!(id = %r.event.id, total = r.total_score, "scored");
        }
        ranked
    }

    pub fn has_event(&self, id: &str) -> bool {
        self.guard().contains_key(id)
    }

    pub fn count(&self) -> usize {
        self.guard().len()
    }

    /// Drop everything (tests / reset).
    pub fn clear(&self) {
        let mut map = self.guard();
        map.clear();
        gauge!("feed_store_events").set(0.0);
    }
}

fn check_record(rec: &MatchRecord) -> Result<(), StoreError> {
    let invalid = |reason| StoreError::InvalidRecord {
        id: rec.event.id.clone(),
        reason,
    };
    if rec.event.id.is_empty() {
        return Err(invalid("empty event id"));
    }
    if !rec.is_match() {
        return Err(invalid("no keyword hits"));
    }
    let all = rec.title_counts.iter().chain(&rec.body_counts);
    for (kw, n) in all {
        if *n == 0 {
            return Err(invalid("zero count entry"));
        }
        if kw.chars().any(char::is_uppercase) {
            return Err(invalid("keyword not lower-cased"));
        }
    }
    Ok(())
}
