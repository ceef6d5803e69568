// src/ingest/providers/mod.rs
pub mod reddit;
pub mod rss;

use std::time::Duration;

pub const ENV_USER_AGENT: &str = "NEWSFEED_USER_AGENT";
const DEFAULT_USER_AGENT: &str = concat!("newsfeed-ranker/", env!("CARGO_PKG_VERSION"));

/// Where a provider reads its document from.
pub(crate) enum Mode {
    /// Own copy of an already-fetched document (tests, offline runs).
    Fixture(String),
    Http(String),
}

pub(crate) fn http_client() -> anyhow::Result<reqwest::Client> {
    let ua = std::env::var(ENV_USER_AGENT).unwrap_or_else(|_| DEFAULT_USER_AGENT.to_string());
    let client = reqwest::Client::builder()
        .user_agent(ua)
        .timeout(Duration::from_secs(15))
        .build()?;
    Ok(client)
}
