// src/config/keywords.rs
//! Keyword configuration: three priority-labelled lists loaded from TOML or JSON.
//!
//! Raw lists are kept as written; `KeywordSets` is the lower-cased, deduplicated
//! view the matcher and scorer work with.

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

pub const ENV_KEYWORDS_PATH: &str = "NEWSFEED_KEYWORDS_PATH";
pub const DEFAULT_KEYWORDS_TOML: &str = "config/keywords.toml";
pub const DEFAULT_KEYWORDS_JSON: &str = "config/keywords.json";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordConfig {
    #[serde(default)]
    pub high_priority_keywords: Vec<String>,
    #[serde(default)]
    pub medium_priority_keywords: Vec<String>,
    #[serde(default)]
    pub low_priority_keywords: Vec<String>,
}

impl KeywordConfig {
    pub fn new<S: Into<String>>(
        high: impl IntoIterator<Item = S>,
        medium: impl IntoIterator<Item = S>,
        low: impl IntoIterator<Item = S>,
    ) -> Self {
        Self {
            high_priority_keywords: high.into_iter().map(Into::into).collect(),
            medium_priority_keywords: medium.into_iter().map(Into::into).collect(),
            low_priority_keywords: low.into_iter().map(Into::into).collect(),
        }
    }

    /// Concatenation high + medium + low, as configured (not normalized).
    pub fn all_keywords(&self) -> Vec<String> {
        self.high_priority_keywords
            .iter()
            .chain(&self.medium_priority_keywords)
            .chain(&self.low_priority_keywords)
            .cloned()
            .collect()
    }

    pub fn sets(&self) -> KeywordSets {
        KeywordSets::from_config(self)
    }

    /// Load from an explicit path. Supports TOML or JSON formats.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading keywords from {}", path.display()))?;
        let ext = path
            .extension()
            .and_then(|s| s.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();
        parse_keywords(&content, &ext)
            .with_context(|| format!("parsing keywords from {}", path.display()))
    }

    /// Load using env var + fallbacks:
    /// 1) $NEWSFEED_KEYWORDS_PATH
    /// 2) config/keywords.toml
    /// 3) config/keywords.json
    pub fn load_default() -> Result<Self> {
        Self::load_from(&resolve_default_path()?)
    }
}

/// Resolve the keyword file path without reading it.
pub fn resolve_default_path() -> Result<PathBuf> {
    if let Ok(p) = std::env::var(ENV_KEYWORDS_PATH) {
        let pb = PathBuf::from(p);
        if pb.exists() {
            return Ok(pb);
        }
        return Err(anyhow!("{ENV_KEYWORDS_PATH} points to non-existent path"));
    }
    [DEFAULT_KEYWORDS_TOML, DEFAULT_KEYWORDS_JSON]
        .into_iter()
        .map(PathBuf::from)
        .find(|p| p.exists())
        .ok_or_else(|| anyhow!("no keyword config found (set {ENV_KEYWORDS_PATH})"))
}

fn parse_keywords(s: &str, hint_ext: &str) -> Result<KeywordConfig> {
    if hint_ext == "json" {
        return Ok(serde_json::from_str(s)?);
    }
    match toml::from_str(s) {
        Ok(cfg) => Ok(cfg),
        Err(toml_err) => serde_json::from_str(s)
            .map_err(|_| anyhow!("unsupported keyword config format: {toml_err}")),
    }
}

/// Where keyword configuration comes from. Called once per ingest/retrieve so edits
/// take effect without a restart.
pub trait KeywordSource: Send + Sync {
    fn load(&self) -> Result<KeywordConfig>;
}

impl KeywordSource for KeywordConfig {
    fn load(&self) -> Result<KeywordConfig> {
        Ok(self.clone())
    }
}

/// Re-reads its file on every `load`.
#[derive(Debug, Clone)]
pub struct FileKeywords {
    path: PathBuf,
}

impl FileKeywords {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn from_env() -> Result<Self> {
        Ok(Self::new(resolve_default_path()?))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl KeywordSource for FileKeywords {
    fn load(&self) -> Result<KeywordConfig> {
        KeywordConfig::load_from(&self.path)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

/// Lower-cased, deduplicated keyword sets.
#[derive(Debug, Clone, Default)]
pub struct KeywordSets {
    pub high: HashSet<String>,
    pub medium: HashSet<String>,
    pub low: HashSet<String>,
}

impl KeywordSets {
    pub fn from_config(cfg: &KeywordConfig) -> Self {
        Self {
            high: lowercase_set(&cfg.high_priority_keywords),
            medium: lowercase_set(&cfg.medium_priority_keywords),
            low: lowercase_set(&cfg.low_priority_keywords),
        }
    }

    /// Union of all three tiers, what the matcher looks for.
    pub fn union(&self) -> HashSet<String> {
        self.high
            .iter()
            .chain(&self.medium)
            .chain(&self.low)
            .cloned()
            .collect()
    }

    /// Tier of a lower-cased keyword. A keyword listed in several tiers resolves
    /// high → medium → low.
    pub fn priority_of(&self, keyword: &str) -> Option<Priority> {
        if self.high.contains(keyword) {
            Some(Priority::High)
        } else if self.medium.contains(keyword) {
            Some(Priority::Medium)
        } else if self.low.contains(keyword) {
            Some(Priority::Low)
        } else {
            None
        }
    }

    pub fn is_empty(&self) -> bool {
        self.high.is_empty() && self.medium.is_empty() && self.low.is_empty()
    }
}

fn lowercase_set(items: &[String]) -> HashSet<String> {
    items
        .iter()
        .map(|k| k.trim().to_lowercase())
        .filter(|k| !k.is_empty())
        .collect()
}
