//! Newsfeed ranking service: binary entrypoint.
//! Boots the Axum HTTP server with a process-wide event store, file-backed keyword
//! configuration and, optionally, a background source poller.

use shuttle_axum::ShuttleAxum;
use std::sync::Arc;

use newsfeed_ranker::ingest::config::{build_providers, load_sources_default};
use newsfeed_ranker::ingest::scheduler::{spawn_poller, PollerCfg};
use newsfeed_ranker::metrics::Metrics;
use newsfeed_ranker::{api, init_tracing, AppState, EventStore, FileKeywords, Newsfeed};

#[shuttle_runtime::main]
async fn axum() -> ShuttleAxum {
    // Load .env in local/dev; no-op in prod environments.
    let _ = dotenvy::dotenv();
    init_tracing();

    // Keywords are re-read from this file on every ingest/retrieve.
    let keywords = FileKeywords::from_env()?;
    tracing::info!(path = %keywords.path().display(), "keyword config");

    let store = Arc::new(EventStore::new());
    let feed = Newsfeed::new(store, Arc::new(keywords));

    if let Some(cfg) = PollerCfg::from_env() {
        match load_sources_default() {
            Ok(sources) => {
                let providers = build_providers(&sources);
                tracing::info!(
                    interval_secs = cfg.interval_secs,
                    providers = providers.len(),
                    "starting source poller"
                );
                spawn_poller(cfg, feed.clone(), providers);
            }
            Err(e) => tracing::warn!(error = ?e, "sources config unavailable, poller disabled"),
        }
    }

    let mut router = api::router(AppState::new(feed));
    match Metrics::init() {
        Ok(m) => router = router.merge(m.router()),
        Err(e) => tracing::warn!(error = ?e, "prometheus recorder not installed"),
    }

    Ok(router.into())
}
