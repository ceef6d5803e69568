// src/ingest/mod.rs
pub mod config;
pub mod providers;
pub mod scheduler;
pub mod types;

use crate::ingest::types::{Event, SourceProvider};
use metrics::{counter, describe_counter, describe_gauge, describe_histogram, histogram};
use once_cell::sync::{Lazy, OnceCell};
use regex::Regex;

/// One-time metrics registration (so series show up on /metrics).
pub fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!(
            "feed_ingest_events_total",
            "Raw events received by ingest."
        );
        describe_counter!(
            "feed_ingest_duplicates_total",
            "Events skipped because their id was already seen."
        );
        describe_counter!(
            "feed_ingest_unmatched_total",
            "Events dropped for having no keyword hits."
        );
        describe_counter!(
            "feed_store_inserted_total",
            "Match records inserted into the store."
        );
        describe_counter!(
            "feed_provider_errors_total",
            "Provider fetch/parse errors."
        );
        describe_counter!("feed_poll_runs_total", "Background poller ticks.");
        describe_gauge!("feed_store_events", "Events currently held in the store.");
        describe_gauge!("feed_poll_last_run_ts", "Unix time of the last poller tick.");
        describe_histogram!("feed_retrieve_ms", "Retrieve (score + sort) time in milliseconds.");
        describe_histogram!("feed_provider_fetch_ms", "Provider fetch time in milliseconds.");
    });
}

static RE_TAGS: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?is)</?[^>]+>").expect("tag regex"));
static RE_WS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("whitespace regex"));

/// Normalize feed text: decode entities, strip tags, collapse whitespace.
pub fn normalize_text(s: &str) -> String {
    // 1) HTML entity decode
    let out = html_escape::decode_html_entities(s);

    // 2) Strip HTML tags (replaced by a space so words don't glue together)
    let out = RE_TAGS.replace_all(&out, " ");

    // 3) Normalize “ ” ‘ ’ « » to ASCII quotes
    let out = out
        .replace(['\u{201C}', '\u{201D}', '\u{00AB}', '\u{00BB}'], "\"")
        .replace(['\u{2018}', '\u{2019}'], "'");

    // 4) Collapse whitespace
    RE_WS.replace_all(&out, " ").trim().to_string()
}

/// Boundary checks the type system doesn't cover. Any failure rejects the whole batch.
pub fn validate_batch(events: &[Event]) -> Result<(), String> {
    for (i, ev) in events.iter().enumerate() {
        if ev.id.is_empty() {
            return Err(format!("event #{i}: `id` must be a non-empty string"));
        }
    }
    Ok(())
}

/// Fetch every provider in order and concatenate the results.
/// A failing provider is logged and counted; it never aborts the run.
pub async fn aggregate(providers: &[Box<dyn SourceProvider>]) -> Vec<Event> {
    ensure_metrics_described();

    let mut all = Vec::new();
    for p in providers {
        let t0 = std::time::Instant::now();
        match p.fetch_latest().await {
            Ok(mut v) => {
                tracing::debug!(provider = p.name(), count = v.len(), "provider fetched");
                all.append(&mut v);
            }
            Err(e) => {
                tracing::warn!(error = ?e, provider = p.name(), "provider error");
                counter!("feed_provider_errors_total").increment(1);
            }
        }
        histogram!("feed_provider_fetch_ms").record(t0.elapsed().as_secs_f64() * 1_000.0);
    }
    all
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn normalize_text_strips_markup() {
        let s = "  <p>Hello,&nbsp;&nbsp;<b>world</b></p>\n\n &ldquo;ok&rdquo; ";
        assert_eq!(normalize_text(s), r#"Hello, world "ok""#);
    }

    #[test]
    fn tags_do_not_glue_words() {
        assert_eq!(normalize_text("patch<br/>released"), "patch released");
    }

    #[test]
    fn empty_id_fails_validation() {
        let now = Utc::now();
        let ok = Event::new("a", "s", "t", None, now);
        let bad = Event::new("", "s", "t", None, now);
        assert!(validate_batch(&[ok.clone()]).is_ok());
        let err = validate_batch(&[ok, bad]).unwrap_err();
        assert!(err.contains("#1"));
    }

    #[test]
    fn blank_id_is_still_an_id() {
        let blank = Event::new(" ", "s", "t", None, Utc::now());
        assert!(validate_batch(&[blank]).is_ok());
    }
}
