//! Fetch configured sources (or read a JSON dump), filter by keywords and print the
//! top-ranked events with their score breakdown.

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use std::path::PathBuf;
use std::time::Instant;

use newsfeed_ranker::config::keywords::KeywordConfig;
use newsfeed_ranker::ingest::config::{build_providers, load_sources_default, load_sources_from};
use newsfeed_ranker::ingest::{aggregate, types::Event};
use newsfeed_ranker::{init_tracing, matcher, scoring};

#[derive(Parser)]
#[command(
    name = "newsfeed_cli",
    about = "Rank news events by keyword importance x recency",
    version
)]
struct Cli {
    /// Number of events to display
    #[arg(short, long, default_value_t = 10)]
    top: usize,

    /// Keyword config (TOML/JSON); defaults to $NEWSFEED_KEYWORDS_PATH or config/keywords.toml
    #[arg(short, long)]
    keywords: Option<PathBuf>,

    /// Sources config (TOML/JSON); defaults to $NEWSFEED_SOURCES_PATH or config/sources.toml
    #[arg(short, long)]
    sources: Option<PathBuf>,

    /// Read events from a JSON array file instead of fetching sources
    #[arg(short, long)]
    input: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();
    init_tracing();
    let cli = Cli::parse();
    tracing::info!("CLI started");

    let events = match &cli.input {
        Some(path) => read_events(path)?,
        None => fetch_events(cli.sources.as_deref()).await?,
    };

    let keywords = match &cli.keywords {
        Some(p) => KeywordConfig::load_from(p)?,
        None => KeywordConfig::load_default()?,
    };
    let sets = keywords.sets();

    println!("\nFiltering events...");
    let t0 = Instant::now();
    let total = events.len();
    let matched = matcher::filter_events(events, &sets.union());
    println!(
        "Time taken to filter events: {:.3} seconds",
        t0.elapsed().as_secs_f64()
    );
    println!(
        "Number of retained (filtered) events: ({}/{})\n",
        matched.len(),
        total
    );

    println!("Ranking filtered events with scoring...");
    let ranked = scoring::rank(&matched, &sets, Utc::now());

    println!("\n===============================");
    println!("Top {} events, ranked by score (importance x recency):", cli.top);
    println!("===============================");
    for (i, r) in ranked.iter().take(cli.top).enumerate() {
        println!("Rank {}", i + 1);
        println!("Title: {}", r.event.title);
        println!("Source: {}", r.event.source);
        println!(
            "Published at: {} (age_hours: {:.2})",
            r.event.published_at.to_rfc3339(),
            r.age_hours
        );
        println!(
            "Score: {:.3} (importance: {:.3} x recency: {:.3})",
            r.total_score, r.importance_score, r.recency_score
        );
        println!("Keywords in title: {:?}", r.title_counts);
        println!("Keywords in body:  {:?}", r.body_counts);
        println!("\n{}\n", "-".repeat(68));
    }
    Ok(())
}

fn read_events(path: &std::path::Path) -> Result<Vec<Event>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading events from {}", path.display()))?;
    let events: Vec<Event> = serde_json::from_str(&raw)
        .with_context(|| format!("parsing events from {}", path.display()))?;
    newsfeed_ranker::ingest::validate_batch(&events).map_err(anyhow::Error::msg)?;
    Ok(events)
}

async fn fetch_events(sources: Option<&std::path::Path>) -> Result<Vec<Event>> {
    let sources = match sources {
        Some(p) => load_sources_from(p)?,
        None => load_sources_default()?,
    };

    println!("\n=============");
    println!("News sources");
    println!("=============");
    for s in &sources {
        println!("{} ({})", s.name, s.kind);
    }

    let providers = build_providers(&sources);
    let t0 = Instant::now();
    let events = aggregate(&providers).await;
    println!(
        "\nTime taken to fetch and aggregate events: {:.3} seconds",
        t0.elapsed().as_secs_f64()
    );
    println!("Number of events fetched: {}", events.len());
    Ok(events)
}
