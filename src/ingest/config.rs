// src/ingest/config.rs
use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::ingest::providers::{reddit::RedditProvider, rss::RssProvider};
use crate::ingest::types::SourceProvider;

const ENV_PATH: &str = "NEWSFEED_SOURCES_PATH";

/// One configured news source.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct SourceConfig {
    pub name: String,
    /// "rss" | "reddit"; anything else is skipped.
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub subreddit_name: Option<String>,
    #[serde(default)]
    pub limit: Option<usize>,
}

#[derive(Debug, Deserialize)]
struct SourcesFile {
    #[serde(default)]
    sources: Vec<SourceConfig>,
}

/// Load sources from an explicit path. Supports TOML (`[[sources]]`) or a JSON array.
pub fn load_sources_from(path: &Path) -> Result<Vec<SourceConfig>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("reading sources from {}", path.display()))?;
    let ext = path
        .extension()
        .and_then(|s| s.to_str())
        .unwrap_or_default()
        .to_ascii_lowercase();
    parse_sources(&content, ext.as_str())
}

/// Load sources using env var + fallbacks:
/// 1) $NEWSFEED_SOURCES_PATH
/// 2) config/sources.toml
/// 3) config/sources.json
pub fn load_sources_default() -> Result<Vec<SourceConfig>> {
    if let Ok(p) = std::env::var(ENV_PATH) {
        let pb = PathBuf::from(p);
        if pb.exists() {
            return load_sources_from(&pb);
        } else {
            return Err(anyhow!("{ENV_PATH} points to non-existent path"));
        }
    }
    let toml_p = PathBuf::from("config/sources.toml");
    if toml_p.exists() {
        return load_sources_from(&toml_p);
    }
    let json_p = PathBuf::from("config/sources.json");
    if json_p.exists() {
        return load_sources_from(&json_p);
    }
    Ok(Vec::new())
}

fn parse_sources(s: &str, hint_ext: &str) -> Result<Vec<SourceConfig>> {
    if hint_ext != "json" {
        if let Ok(f) = toml::from_str::<SourcesFile>(s) {
            return Ok(f.sources);
        }
    }
    if let Ok(v) = serde_json::from_str::<Vec<SourceConfig>>(s) {
        return Ok(v);
    }
    if let Ok(f) = serde_json::from_str::<SourcesFile>(s) {
        return Ok(f.sources);
    }
    Err(anyhow!("unsupported sources format"))
}

/// Build providers for the configured sources. Unknown types and incomplete
/// entries are skipped with a warning.
pub fn build_providers(sources: &[SourceConfig]) -> Vec<Box<dyn SourceProvider>> {
    let mut out: Vec<Box<dyn SourceProvider>> = Vec::with_capacity(sources.len());
    for src in sources {
        match (src.kind.to_ascii_lowercase().as_str(), &src.url, &src.subreddit_name) {
            ("rss", Some(url), _) => {
                let mut p = RssProvider::from_url(&src.name, url);
                if let Some(n) = src.limit {
                    p = p.with_limit(n);
                }
                out.push(Box::new(p));
            }
            ("reddit", _, Some(sub)) => {
                out.push(Box::new(RedditProvider::new(&src.name, sub, src.limit)));
            }
            (kind, _, _) => {
                tracing::warn!(source = %src.name, kind, "unsupported or incomplete source, skipping");
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOML: &str = r#"
[[sources]]
name = "Ars Technica"
type = "rss"
url = "https://feeds.arstechnica.com/arstechnica/technology-lab"
limit = 3

[[sources]]
name = "Sysadmin"
type = "reddit"
subreddit_name = "sysadmin"

[[sources]]
name = "Mystery"
type = "carrier-pigeon"
"#;

    #[test]
    fn toml_and_json_formats_parse() {
        let v = parse_sources(TOML, "toml").unwrap();
        assert_eq!(v.len(), 3);
        assert_eq!(v[0].kind, "rss");
        assert_eq!(v[0].limit, Some(3));
        assert_eq!(v[1].subreddit_name.as_deref(), Some("sysadmin"));

        let json = r#"[{"name":"Feed","type":"rss","url":"https://example.test/rss"}]"#;
        let v = parse_sources(json, "json").unwrap();
        assert_eq!(v.len(), 1);
        assert_eq!(v[0].limit, None);
    }

    #[test]
    fn unknown_kinds_are_skipped() {
        let v = parse_sources(TOML, "toml").unwrap();
        let providers = build_providers(&v);
        let names: Vec<_> = providers.iter().map(|p| p.name().to_string()).collect();
        assert_eq!(names, vec!["Ars Technica", "Sysadmin"]);
    }

    #[test]
    fn rss_without_url_is_skipped() {
        let v = vec![SourceConfig {
            name: "NoUrl".into(),
            kind: "rss".into(),
            url: None,
            subreddit_name: None,
            limit: None,
        }];
        assert!(build_providers(&v).is_empty());
    }
}
