// src/ingest/providers/rss.rs
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use quick_xml::de::from_str;
use serde::Deserialize;
use time::{format_description::well_known::Rfc2822, OffsetDateTime};

use crate::ingest::normalize_text;
use crate::ingest::types::{utc_timestamp, Event, SourceProvider};

use super::{http_client, Mode};

pub const DEFAULT_RSS_LIMIT: usize = 5;

#[derive(Debug, Deserialize)]
struct Rss {
    channel: Channel,
}

#[derive(Debug, Deserialize)]
struct Channel {
    #[serde(rename = "item", default)]
    item: Vec<Item>,
}

// Element keys are local names, so `media:title`, `atom:link`, `media:description`
// land next to the plain RSS fields. Every text field is a list; the first
// non-blank node wins.
#[derive(Debug, Deserialize)]
struct Item {
    #[serde(default)]
    title: Vec<TextNode>,
    #[serde(default)]
    link: Vec<TextNode>,
    // <guid isPermaLink="false">…</guid>: attributes ignored
    guid: Option<TextNode>,
    #[serde(rename = "pubDate")]
    pub_date: Option<String>,
    #[serde(default)]
    description: Vec<TextNode>,
    // content:encoded
    #[serde(default)]
    encoded: Vec<TextNode>,
    // dc:content, media:content, ...
    #[serde(default)]
    content: Vec<TextNode>,
}

#[derive(Debug, Deserialize)]
struct TextNode {
    #[serde(rename = "$text", default)]
    value: String,
}

/// First node with non-blank text. Attribute-only nodes (`<media:content url=".."/>`)
/// are skipped.
fn first_text(nodes: Vec<TextNode>) -> Option<String> {
    nodes.into_iter().find_map(|n| non_empty(Some(n.value)))
}

fn parse_pub_date(ts: &str) -> Option<DateTime<Utc>> {
    OffsetDateTime::parse(ts.trim(), &Rfc2822)
        .ok()
        .and_then(|dt| DateTime::from_timestamp(dt.unix_timestamp(), dt.nanosecond()))
        .or_else(|| utc_timestamp::parse(ts))
}

fn non_empty(s: Option<String>) -> Option<String> {
    s.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

/// Parse an RSS 2.0 document into events, taking at most `limit` entries.
///
/// Body preference: `content:encoded`, then the first non-blank `*:content`
/// (`dc:content`, `media:content`), then `description`.
/// Entries without an id (guid or link) or a parseable `pubDate` are skipped.
pub fn parse_feed(source: &str, xml: &str, limit: usize) -> Result<Vec<Event>> {
    let rss: Rss = from_str(xml).with_context(|| format!("parsing rss xml for {source}"))?;

    let mut out = Vec::with_capacity(rss.channel.item.len().min(limit));
    for it in rss.channel.item.into_iter().take(limit) {
        let Some(id) = non_empty(it.guid.map(|g| g.value)).or_else(|| first_text(it.link)) else {
            tracing::debug!(source, "rss item without guid/link, skipping");
            continue;
        };
        let Some(published_at) = it.pub_date.as_deref().and_then(parse_pub_date) else {
            tracing::debug!(source, %id, "rss item without usable pubDate, skipping");
            continue;
        };
        let body = first_text(it.encoded)
            .or_else(|| first_text(it.content))
            .or_else(|| first_text(it.description))
            .map(|b| normalize_text(&b))
            .filter(|b| !b.is_empty());

        out.push(Event {
            id,
            source: source.to_string(),
            title: normalize_text(&first_text(it.title).unwrap_or_default()),
            body,
            published_at,
        });
    }
    Ok(out)
}

pub struct RssProvider {
    name: String,
    limit: usize,
    mode: Mode,
}

impl RssProvider {
    pub fn from_fixture(name: &str, content: &str) -> Self {
        Self {
            name: name.to_string(),
            limit: DEFAULT_RSS_LIMIT,
            mode: Mode::Fixture(content.to_string()),
        }
    }

    pub fn from_url(name: &str, url: &str) -> Self {
        Self {
            name: name.to_string(),
            limit: DEFAULT_RSS_LIMIT,
            mode: Mode::Http(url.to_string()),
        }
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }
}

#[async_trait]
impl SourceProvider for RssProvider {
    async fn fetch_latest(&self) -> Result<Vec<Event>> {
        match &self.mode {
            Mode::Fixture(s) => parse_feed(&self.name, s, self.limit),
            Mode::Http(url) => {
                let body = http_client()?
                    .get(url)
                    .send()
                    .await
                    .and_then(|r| r.error_for_status())
                    .with_context(|| format!("rss http get {url}"))?
                    .text()
                    .await
                    .context("rss http .text()")?;
                parse_feed(&self.name, &body, self.limit)
            }
        }
    }

    fn name(&self) -> &str {
        &self.name
    }
}
