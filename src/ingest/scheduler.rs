// src/ingest/scheduler.rs
use metrics::{counter, gauge};
use std::time::Duration;
use tokio::task::JoinHandle;

use crate::feed::Newsfeed;
use crate::ingest::types::SourceProvider;

pub const ENV_POLL_SECS: &str = "NEWSFEED_POLL_SECS";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PollerCfg {
    pub interval_secs: u64,
}

impl PollerCfg {
    /// `NEWSFEED_POLL_SECS`; unset, unparseable or 0 disables polling.
    pub fn from_env() -> Option<Self> {
        Self::parse(std::env::var(ENV_POLL_SECS).ok())
    }

    fn parse(raw: Option<String>) -> Option<Self> {
        raw.and_then(|s| s.trim().parse::<u64>().ok())
            .filter(|&n| n > 0)
            .map(|interval_secs| Self { interval_secs })
    }
}

/// Run one fetch → ingest cycle. Returns the number of newly stored events.
pub async fn poll_once(feed: &Newsfeed, providers: &[Box<dyn SourceProvider>]) -> usize {
    let events = crate::ingest::aggregate(providers).await;
    let fetched = events.len();
    match feed.ingest(events) {
        Ok(report) => {
            tracing::info!(
                target: "ingest",
                fetched,
                stored = report.stored,
                duplicates = report.duplicates.len(),
                unmatched = report.unmatched,
                "poll tick"
            );
            report.stored
        }
        Err(e) => {
            tracing::warn!(target: "ingest", error = %e, fetched, "poll ingest failed");
            0
        }
    }
}

/// Spawn a background task that polls `providers` every `cfg.interval_secs` and
/// feeds the results into `feed`.
pub fn spawn_poller(
    cfg: PollerCfg,
    feed: Newsfeed,
    providers: Vec<Box<dyn SourceProvider>>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(Duration::from_secs(cfg.interval_secs));
        loop {
            ticker.tick().await;
            poll_once(&feed, &providers).await;
            counter!("feed_poll_runs_total").increment(1);
            gauge!("feed_poll_last_run_ts").set(chrono::Utc::now().timestamp() as f64);
        }
    })
}
