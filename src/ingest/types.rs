// src/ingest/types.rs
use anyhow::Result;
use chrono::{DateTime, Utc};

/// A single news item as it arrives from a source (RSS entry, Reddit post, HTTP body).
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize, PartialEq, Eq)]
pub struct Event {
    pub id: String,     // unique across all sources
    pub source: String, // e.g. "reddit" or "ars-technica"
    pub title: String,
    #[serde(default)]
    pub body: Option<String>,
    /// RFC 3339 on the wire; naive timestamps are read as UTC.
    #[serde(with = "utc_timestamp")]
    pub published_at: DateTime<Utc>,
}

impl Event {
    pub fn new(
        id: impl Into<String>,
        source: impl Into<String>,
        title: impl Into<String>,
        body: Option<String>,
        published_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            source: source.into(),
            title: title.into(),
            body,
            published_at,
        }
    }
}

#[async_trait::async_trait]
pub trait SourceProvider: Send + Sync {
    async fn fetch_latest(&self) -> Result<Vec<Event>>;
    fn name(&self) -> &str;
}

/// Serde adapter: accepts RFC 3339 (any offset) or a naive `YYYY-MM-DD[T ]HH:MM:SS[.f]`
/// which is taken as UTC. Always emits RFC 3339 with a `Z` suffix.
pub mod utc_timestamp {
    use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

    pub fn parse(raw: &str) -> Option<DateTime<Utc>> {
        let s = raw.trim();
        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Some(dt.with_timezone(&Utc));
        }
        NAIVE_FORMATS
            .iter()
            .find_map(|f| NaiveDateTime::parse_from_str(s, f).ok())
            .map(|naive| naive.and_utc())
    }

    pub fn serialize<S: Serializer>(dt: &DateTime<Utc>, ser: S) -> Result<S::Ok, S::Error> {
        ser.serialize_str(&dt.to_rfc3339_opts(SecondsFormat::AutoSi, true))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(de: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(de)?;
        parse(&raw).ok_or_else(|| {
            serde::de::Error::custom(format!("unparseable timestamp `{raw}`"))
        })
    }
}
