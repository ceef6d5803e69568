// tests/metrics_ingest.rs
use axum::body::{self, Body};
use axum::http::{Request, StatusCode};
use std::sync::Arc;
use tower::ServiceExt;

use newsfeed_ranker::ingest::aggregate;
use newsfeed_ranker::ingest::providers::rss::RssProvider;
use newsfeed_ranker::ingest::types::SourceProvider;
use newsfeed_ranker::metrics::Metrics;
use newsfeed_ranker::{EventStore, KeywordConfig, Newsfeed};

#[tokio::test]
async fn metrics_exposed_after_ingest_and_retrieve() {
    // Own test binary, so this is the only recorder install in the process
    let metrics = Metrics::init().expect("recorder");

    let feed = Newsfeed::new(
        Arc::new(EventStore::new()),
        Arc::new(KeywordConfig::new(["vulnerability"], [], [])),
    );
    let xml = include_str!("fixtures/rss_feed.xml");
    let providers: Vec<Box<dyn SourceProvider>> =
        vec![Box::new(RssProvider::from_fixture("Example", xml))];
    let events = aggregate(&providers).await;
    feed.ingest(events).expect("ingest");
    feed.retrieve().expect("retrieve");

    let resp = metrics
        .router::<()>()
        .oneshot(Request::get("/metrics").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body::to_bytes(resp.into_body(), 1_048_576).await.unwrap();
    let text = String::from_utf8(body.to_vec()).unwrap();

    for needle in [
        "feed_ingest_events_total",
        "feed_ingest_unmatched_total",
        "feed_store_inserted_total",
        "feed_store_events",
        "feed_retrieve_ms",
        "feed_provider_fetch_ms",
    ] {
        assert!(text.contains(needle), "missing series {needle}\n{text}");
    }
}
