//! Ingest / retrieve orchestration: matcher → store on the way in, store → scorer
//! on the way out. Keyword configuration is loaded fresh on every call.

use chrono::{DateTime, Utc};
use metrics::{counter, histogram};
use serde::Serialize;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{info, warn};

use crate::config::keywords::{KeywordSets, KeywordSource};
use crate::error::FeedError;
use crate::ingest::{self, types::Event};
use crate::matcher;
use crate::scoring::ScoredRecord;
use crate::store::EventStore;

/// Acknowledgment returned by `ingest`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IngestReport {
    pub message: &'static str,
    pub status: &'static str,
    pub received: usize,
    pub stored: usize,
    pub duplicates: Vec<String>,
    pub unmatched: usize,
}

#[derive(Clone)]
pub struct Newsfeed {
    store: Arc<EventStore>,
    keywords: Arc<dyn KeywordSource>,
}

impl Newsfeed {
    pub fn new(store: Arc<EventStore>, keywords: Arc<dyn KeywordSource>) -> Self {
        ingest::ensure_metrics_described();
        Self { store, keywords }
    }

    pub fn store(&self) -> &Arc<EventStore> {
        &self.store
    }

    fn keyword_sets(&self) -> Result<KeywordSets, FeedError> {
        self.keywords
            .load()
            .map(|cfg| cfg.sets())
            .map_err(FeedError::Keywords)
    }

    /// Validate, drop ids already seen (in this batch or stored), keep events with
    /// keyword hits, and insert them.
    pub fn ingest(&self, events: Vec<Event>) -> Result<IngestReport, FeedError> {
        ingest::validate_batch(&events).map_err(FeedError::Validation)?;
        let sets = self.keyword_sets()?;

        let received = events.len();
        counter!("feed_ingest_events_total").increment(received as u64);
        info!(received, "ingest");

        let mut seen: HashSet<String> = HashSet::with_capacity(received);
        let mut duplicates = Vec::new();
        let mut fresh = Vec::with_capacity(received);
        for ev in events {
            if !seen.insert(ev.id.clone()) || self.store.has_event(&ev.id) {
                warn!(id = %ev.id, "duplicate event id, skipping");
                duplicates.push(ev.id);
                continue;
            }
            fresh.push(ev);
        }

        let candidates = fresh.len();
        let records = matcher::filter_events(fresh, &sets.union());
        let unmatched = candidates - records.len();

        // a concurrent ingest may have stored some of these ids in the meantime
        let outcome = self.store.insert_batch(records)?;
        duplicates.extend(outcome.duplicates);

        counter!("feed_ingest_duplicates_total").increment(duplicates.len() as u64);
        counter!("feed_ingest_unmatched_total").increment(unmatched as u64);
        info!(
            stored = outcome.inserted,
            duplicates = duplicates.len(),
            unmatched,
            "ingest done"
        );

        Ok(IngestReport {
            message: "ACK",
            status: "successful exit",
            received,
            stored: outcome.inserted,
            duplicates,
            unmatched,
        })
    }

    /// Ranked records with their score breakdown, as of `now`.
    pub fn retrieve_scored_at(&self, now: DateTime<Utc>) -> Result<Vec<ScoredRecord>, FeedError> {
        let t0 = std::time::Instant::now();
        let sets = self.keyword_sets()?;
        let ranked = self.store.ranked_snapshot(&sets, now);
        histogram!("feed_retrieve_ms").record(t0.elapsed().as_secs_f64() * 1_000.0);
        info!(count = ranked.len(), "retrieve");
        Ok(ranked)
    }

    /// Ranked events as of `now`: total score descending, ties by id ascending.
    pub fn retrieve_at(&self, now: DateTime<Utc>) -> Result<Vec<Event>, FeedError> {
        Ok(self
            .retrieve_scored_at(now)?
            .into_iter()
            .map(|r| r.event)
            .collect())
    }

    pub fn retrieve(&self) -> Result<Vec<Event>, FeedError> {
        self.retrieve_at(Utc::now())
    }

    pub fn retrieve_scored(&self) -> Result<Vec<ScoredRecord>, FeedError> {
        self.retrieve_scored_at(Utc::now())
    }
}
