//! Importance × recency scoring.
//!
//! - `importance` counts *distinct* matched keywords per (tier × location) cell,
//!   weighted by tier (high 3, medium 2, low 1) and location (title 2, body 1).
//! - `recency` = 1 / (0.1 × age_hours + 1): 1.0 when fresh, decays towards 0.
//! - `total` = importance × recency.
//!
//! Scores depend on `now`, so they are recomputed for every retrieval and never stored.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::cmp::Ordering;

use crate::config::keywords::{KeywordSets, Priority};
use crate::ingest::types::Event;
use crate::matcher::{KeywordCounts, MatchRecord};

pub const HIGH_WEIGHT: f64 = 3.0;
pub const MEDIUM_WEIGHT: f64 = 2.0;
pub const LOW_WEIGHT: f64 = 1.0;

pub const TITLE_MULTIPLIER: f64 = 2.0;
pub const BODY_MULTIPLIER: f64 = 1.0;

/// Smaller is slower decay.
pub const RECENCY_DECAY: f64 = 0.1;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredRecord {
    pub event: Event,
    pub total_score: f64,
    pub importance_score: f64,
    pub recency_score: f64,
    pub age_hours: f64,
    pub title_counts: KeywordCounts,
    pub body_counts: KeywordCounts,
}

/// Distinct matched keywords per tier for one location.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TierHits {
    pub high: u32,
    pub medium: u32,
    pub low: u32,
}

impl TierHits {
    pub fn classify(counts: &KeywordCounts, sets: &KeywordSets) -> Self {
        let mut hits = Self::default();
        // one unit per distinct keyword, occurrence count does not matter
        for kw in counts.keys() {
            match sets.priority_of(kw) {
                Some(Priority::High) => hits.high += 1,
                Some(Priority::Medium) => hits.medium += 1,
                Some(Priority::Low) => hits.low += 1,
                None => {}
            }
        }
        hits
    }

    fn weighted(&self) -> f64 {
        HIGH_WEIGHT * f64::from(self.high)
            + MEDIUM_WEIGHT * f64::from(self.medium)
            + LOW_WEIGHT * f64::from(self.low)
    }
}

pub fn importance_score(title: TierHits, body: TierHits) -> f64 {
    TITLE_MULTIPLIER * title.weighted() + BODY_MULTIPLIER * body.weighted()
}

/// Hours elapsed between `published_at` and `now`. Negative for future timestamps.
pub fn age_hours(published_at: DateTime<Utc>, now: DateTime<Utc>) -> f64 {
    (now - published_at).num_milliseconds() as f64 / 3_600_000.0
}

/// Time decay in (0, 1]. Future timestamps count as age 0.
pub fn recency_score(age_hours: f64) -> f64 {
    let age = if age_hours.is_finite() { age_hours.max(0.0) } else { 0.0 };
    1.0 / (RECENCY_DECAY * age + 1.0)
}

pub fn score(record: &MatchRecord, sets: &KeywordSets, now: DateTime<Utc>) -> ScoredRecord {
    let title = TierHits::classify(&record.title_counts, sets);
    let body = TierHits::classify(&record.body_counts, sets);
    let importance = importance_score(title, body);

    let age = age_hours(record.event.published_at, now);
    let recency = recency_score(age);

    ScoredRecord {
        event: record.event.clone(),
        total_score: importance * recency,
        importance_score: importance,
        recency_score: recency,
        age_hours: age,
        title_counts: record.title_counts.clone(),
        body_counts: record.body_counts.clone(),
    }
}

/// Total score descending, then event id ascending.
pub fn compare_ranked(a: &ScoredRecord, b: &ScoredRecord) -> Ordering {
    b.total_score
        .total_cmp(&a.total_score)
        .then_with(|| a.event.id.cmp(&b.event.id))
}

/// Score every record against `sets` at `now` and sort with `compare_ranked`.
pub fn rank<'a, I>(records: I, sets: &KeywordSets, now: DateTime<Utc>) -> Vec<ScoredRecord>
where
    I: IntoIterator<Item = &'a MatchRecord>,
{
    let mut scored: Vec<ScoredRecord> = records
        .into_iter()
        .map(|r| score(r, sets, now))
        .collect();
    scored.sort_by(compare_ranked);
    scored
}

/// Newest first; ties by id for a stable order.
pub fn sort_by_date(mut events: Vec<Event>) -> Vec<Event> {
    events.sort_by(|a, b| {
        b.published_at
            .cmp(&a.published_at)
            .then_with(|| a.id.cmp(&b.id))
    });
    events
}
