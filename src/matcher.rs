// src/matcher.rs
//! Keyword matcher: word tokenizer and per-keyword hit counts for title and body.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};

use crate::ingest::types::Event;

/// keyword → occurrences. Only keywords that actually occur are present.
pub type KeywordCounts = BTreeMap<String, usize>;

// \b\w+\b over Unicode word characters
static WORD_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?u)\b\w+\b").expect("word regex"));

/// An event that matched at least one keyword, with the hits found in each location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchRecord {
    pub event: Event,
    pub title_counts: KeywordCounts,
    pub body_counts: KeywordCounts,
}

impl MatchRecord {
    pub fn is_match(&self) -> bool {
        !self.title_counts.is_empty() || !self.body_counts.is_empty()
    }
}

/// Lower-cased word tokens of `text`, in order.
pub fn tokenize(text: &str) -> Vec<String> {
    let folded = text.to_lowercase();
    WORD_RE
        .find_iter(&folded)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Count occurrences of each keyword of `keywords` (already lower-cased) in `text`.
pub fn count_keywords(text: &str, keywords: &HashSet<String>) -> KeywordCounts {
    let folded = text.to_lowercase();
    let mut counts = KeywordCounts::new();
    for m in WORD_RE.find_iter(&folded) {
        let word = m.as_str();
        if keywords.contains(word) {
            *counts.entry(word.to_string()).or_insert(0) += 1;
        }
    }
    counts
}

/// Title and body hit counts for one event. A missing body yields empty body counts.
pub fn match_event(event: &Event, keywords: &HashSet<String>) -> (KeywordCounts, KeywordCounts) {
    let title_counts = count_keywords(&event.title, keywords);
    let body_counts = event
        .body
        .as_deref()
        .map(|b| count_keywords(b, keywords))
        .unwrap_or_default();
    (title_counts, body_counts)
}

/// Keep only events with at least one keyword hit, preserving input order.
pub fn filter_events<I>(events: I, keywords: &HashSet<String>) -> Vec<MatchRecord>
where
    I: IntoIterator<Item = Event>,
{
    events
        .into_iter()
        .filter_map(|event| {
            let (title_counts, body_counts) = match_event(&event, keywords);
            let rec = MatchRecord {
                event,
                title_counts,
                body_counts,
            };
            rec.is_match().then_some(rec)
        })
        .collect()
}
