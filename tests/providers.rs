// tests/providers.rs
use chrono::{TimeZone, Utc};

use newsfeed_ranker::ingest::providers::reddit::RedditProvider;
use newsfeed_ranker::ingest::providers::rss::RssProvider;
use newsfeed_ranker::ingest::types::SourceProvider;

const RSS_XML: &str = include_str!("fixtures/rss_feed.xml");
const RSS_MEDIA_XML: &str = include_str!("fixtures/rss_media.xml");
const REDDIT_JSON: &str = include_str!("fixtures/reddit_new.json");

#[tokio::test]
async fn rss_fixture_parses_and_yields_events() {
    let provider = RssProvider::from_fixture("Example", RSS_XML);
    assert_eq!(provider.name(), "Example");

    let items = provider.fetch_latest().await.expect("rss parse ok");
    assert_eq!(items.len(), 3);
    assert!(items.iter().all(|e| e.source == "Example"));

    // content:encoded preferred, markup stripped
    assert_eq!(items[0].id, "ex-1001");
    assert_eq!(
        items[0].body.as_deref(),
        Some("Attackers are actively exploiting the flaw. Apply the patch now.")
    );

    // dc:content when no content:encoded, entities decoded
    assert_eq!(
        items[1].body.as_deref(),
        Some("Retailers report more stock & lower prices.")
    );

    // no guid → link as id; description fallback; offset normalized to UTC
    assert_eq!(items[2].id, "https://news.example.test/outage");
    assert_eq!(
        items[2].body.as_deref(),
        Some(r#"Customers saw "503" errors for two hours."#)
    );
    assert_eq!(
        items[2].published_at,
        Utc.with_ymd_and_hms(2025, 7, 21, 0, 30, 0).unwrap()
    );
}

#[tokio::test]
async fn rss_limit_defaults_to_five_and_can_be_lowered() {
    let provider = RssProvider::from_fixture("Example", RSS_XML).with_limit(2);
    let items = provider.fetch_latest().await.unwrap();
    assert_eq!(items.len(), 2);
}

#[tokio::test]
async fn rss_garbage_is_an_error() {
    let provider = RssProvider::from_fixture("Broken", "not xml at all <");
    assert!(provider.fetch_latest().await.is_err());
}

#[tokio::test]
async fn rss_media_elements_do_not_break_the_feed() {
    let provider = RssProvider::from_fixture("Gallery", RSS_MEDIA_XML);
    let items = provider.fetch_latest().await.expect("rss parse ok");
    assert_eq!(items.len(), 2);

    // attribute-only media:content is skipped, description is used
    assert_eq!(items[0].id, "https://gallery.example.test/outage");
    assert_eq!(items[0].title, "Data center outage in pictures");
    assert_eq!(
        items[0].body.as_deref(),
        Some("A cooling failure caused a critical outage.")
    );

    assert_eq!(items[1].id, "gal-2");
    assert_eq!(items[1].title, "Second item survives");
    assert_eq!(items[1].body.as_deref(), Some("Patch notes"));
}

#[tokio::test]
async fn reddit_fixture_parses_and_yields_events() {
    let provider = RedditProvider::from_fixture("Sysadmin", "sysadmin", REDDIT_JSON);
    assert_eq!(provider.subreddit(), "sysadmin");

    let items = provider.fetch_latest().await.expect("reddit parse ok");
    assert_eq!(items.len(), 2);
    assert_eq!(items[0].id, "1m6u9sx");
    assert_eq!(items[0].source, "Sysadmin");
    assert!(items[0].body.as_deref().unwrap().contains("Authentication"));
    assert_eq!(items[1].body, None);
    assert_eq!(
        items[0].published_at,
        Utc.with_ymd_and_hms(2025, 7, 22, 16, 57, 6).unwrap()
    );
}
