// src/ingest/providers/reddit.rs
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::ingest::types::{Event, SourceProvider};

use super::{http_client, Mode};

#[derive(Debug, Deserialize)]
struct Listing {
    data: ListingData,
}

#[derive(Debug, Deserialize)]
struct ListingData {
    #[serde(default)]
    children: Vec<Child>,
}

#[derive(Debug, Deserialize)]
struct Child {
    data: Post,
}

#[derive(Debug, Deserialize)]
struct Post {
    id: String,
    title: String,
    #[serde(default)]
    selftext: String,
    created_utc: f64,
}

fn epoch_to_utc(secs: f64) -> Option<DateTime<Utc>> {
    if !secs.is_finite() {
        return None;
    }
    let whole = secs.trunc() as i64;
    let nanos = ((secs - secs.trunc()) * 1e9).round().clamp(0.0, 999_999_999.0) as u32;
    DateTime::from_timestamp(whole, nanos)
}

/// Parse a `/r/<sub>/new.json` listing. Empty self-text becomes an absent body.
pub fn parse_listing(source: &str, json: &str, limit: Option<usize>) -> Result<Vec<Event>> {
    let listing: Listing =
        serde_json::from_str(json).with_context(|| format!("parsing reddit listing for {source}"))?;

    let take = limit.unwrap_or(usize::MAX);
    let mut out = Vec::new();
    for child in listing.data.children.into_iter().take(take) {
        let post = child.data;
        let Some(published_at) = epoch_to_utc(post.created_utc) else {
            tracing::debug!(source, id = %post.id, "reddit post with bad created_utc, skipping");
            continue;
        };
        let body = Some(post.selftext).filter(|s| !s.trim().is_empty());
        out.push(Event {
            id: post.id,
            source: source.to_string(),
            title: post.title,
            body,
            published_at,
        });
    }
    Ok(out)
}

pub struct RedditProvider {
    name: String,
    subreddit: String,
    limit: Option<usize>,
    mode: Mode,
}

impl RedditProvider {
    pub fn new(name: &str, subreddit: &str, limit: Option<usize>) -> Self {
        let url = match limit {
            Some(n) => format!("https://www.reddit.com/r/{subreddit}/new.json?limit={n}"),
            None => format!("https://www.reddit.com/r/{subreddit}/new.json"),
        };
        Self {
            name: name.to_string(),
            subreddit: subreddit.to_string(),
            limit,
            mode: Mode::Http(url),
        }
    }

    pub fn from_fixture(name: &str, subreddit: &str, content: &str) -> Self {
        Self {
            name: name.to_string(),
            subreddit: subreddit.to_string(),
            limit: None,
            mode: Mode::Fixture(content.to_string()),
        }
    }

    pub fn subreddit(&self) -> &str {
        &self.subreddit
    }
}

#[async_trait]
impl SourceProvider for RedditProvider {
    async fn fetch_latest(&self) -> Result<Vec<Event>> {
        match &self.mode {
            Mode::Fixture(s) => parse_listing(&self.name, s, self.limit),
            Mode::Http(url) => {
                tracing::info!(provider = %self.name, subreddit = %self.subreddit, "fetching subreddit");
                let body = http_client()?
                    .get(url)
                    .send()
                    .await
                    .and_then(|r| r.error_for_status())
                    .with_context(|| format!("reddit http get {url}"))?
                    .text()
                    .await
                    .context("reddit http .text()")?;
                parse_listing(&self.name, &body, self.limit)
            }
        }
    }

    fn name(&self) -> &str {
        &self.name
    }
}
