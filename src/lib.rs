// src/lib.rs
// Public library surface for the server binary, the CLI and integration tests.

pub mod api;
pub mod config;
pub mod error;
pub mod feed;
pub mod ingest;
pub mod matcher;
pub mod metrics;
pub mod scoring;
pub mod store;

// ---- Re-exports for stable public API ----
pub use crate::api::{router, AppState};
pub use crate::config::keywords::{FileKeywords, KeywordConfig, KeywordSource};
pub use crate::feed::{IngestReport, Newsfeed};
pub use crate::ingest::types::Event;
pub use crate::store::EventStore;

use std::sync::Arc;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

pub const ENV_LOG_JSON: &str = "NEWSFEED_LOG_JSON";

/// Install the tracing subscriber: `RUST_LOG` filter (default `newsfeed_ranker=info,warn`),
/// compact output, or JSON lines when `NEWSFEED_LOG_JSON=1`.
/// Leaves an already-installed subscriber in place.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("newsfeed_ranker=info,warn"));
    let json = std::env::var(ENV_LOG_JSON).is_ok_and(|v| v == "1");

    let res = if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json())
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().compact())
            .try_init()
    };
    if res.is_err() {
        tracing::debug!("tracing subscriber already installed");
    }
}

/// Build the app router around a fresh store, reading keywords from `keywords`
/// on every request.
pub fn app(keywords: Arc<dyn KeywordSource>) -> axum::Router {
    let feed = Newsfeed::new(Arc::new(EventStore::new()), keywords);
    router(AppState::new(feed))
}
