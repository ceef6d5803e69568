// tests/keywords_config.rs
use chrono::{TimeZone, Utc};
use std::{env, fs, sync::Arc};

use newsfeed_ranker::config::keywords::{resolve_default_path, ENV_KEYWORDS_PATH};
use newsfeed_ranker::{Event, EventStore, FileKeywords, KeywordConfig, Newsfeed};

#[test]
fn parse_toml_and_json_paths() {
    let dir = tempfile::tempdir().unwrap();

    let p_toml = dir.path().join("keywords.toml");
    fs::write(
        &p_toml,
        r#"
high_priority_keywords = ["Outage", "breach"]
medium_priority_keywords = ["patch"]
low_priority_keywords = []
"#,
    )
    .unwrap();
    let cfg = KeywordConfig::load_from(&p_toml).unwrap();
    assert_eq!(cfg.high_priority_keywords, vec!["Outage", "breach"]);
    assert!(cfg.sets().high.contains("outage"));

    let p_json = dir.path().join("keywords.json");
    fs::write(&p_json, r#"{"low_priority_keywords": ["update"]}"#).unwrap();
    let cfg = KeywordConfig::load_from(&p_json).unwrap();
    assert_eq!(cfg.low_priority_keywords, vec!["update"]);
    assert!(cfg.high_priority_keywords.is_empty());

    let p_bad = dir.path().join("keywords.toml.bak");
    fs::write(&p_bad, "high_priority_keywords = 5").unwrap();
    assert!(KeywordConfig::load_from(&p_bad).is_err());
}

#[serial_test::serial]
#[test]
fn default_uses_env_then_fallbacks() {
    // Isolate CWD so the repo's own config/ is not picked up
    let old = env::current_dir().unwrap();
    let tmp = tempfile::tempdir().unwrap();
    env::set_current_dir(tmp.path()).unwrap();
    env::remove_var(ENV_KEYWORDS_PATH);

    // 1) Nothing anywhere → error
    assert!(KeywordConfig::load_default().is_err());

    // 2) Fallback TOML in ./config/
    let cfg_dir = tmp.path().join("config");
    fs::create_dir_all(&cfg_dir).unwrap();
    fs::write(
        cfg_dir.join("keywords.toml"),
        r#"high_priority_keywords = ["outage"]"#,
    )
    .unwrap();
    let cfg = KeywordConfig::load_default().unwrap();
    assert_eq!(cfg.high_priority_keywords, vec!["outage"]);

    // 3) Env takes precedence
    let p_env = tmp.path().join("other.json");
    fs::write(&p_env, r#"{"medium_priority_keywords": ["patch"]}"#).unwrap();
    env::set_var(ENV_KEYWORDS_PATH, p_env.display().to_string());
    assert_eq!(resolve_default_path().unwrap(), p_env);
    let cfg = KeywordConfig::load_default().unwrap();
    assert_eq!(cfg.medium_priority_keywords, vec!["patch"]);

    // 4) Env pointing nowhere is an error, not a silent fallback
    env::set_var(ENV_KEYWORDS_PATH, tmp.path().join("nope.toml").display().to_string());
    assert!(KeywordConfig::load_default().is_err());
    env::remove_var(ENV_KEYWORDS_PATH);

    env::set_current_dir(&old).unwrap();
}

#[test]
fn keyword_edits_apply_on_next_retrieve() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("keywords.toml");
    fs::write(
        &path,
        r#"
high_priority_keywords = ["outage"]
low_priority_keywords = ["patch"]
"#,
    )
    .unwrap();

    let feed = Newsfeed::new(
        Arc::new(EventStore::new()),
        Arc::new(FileKeywords::new(&path)),
    );
    let t = Utc.with_ymd_and_hms(2025, 5, 1, 8, 0, 0).unwrap();
    feed.ingest(vec![
        Event::new("o", "s", "outage", None, t),
        Event::new("p", "s", "patch", None, t),
    ])
    .unwrap();
    let order: Vec<_> = feed.retrieve_at(t).unwrap().into_iter().map(|e| e.id).collect();
    assert_eq!(order, ["o", "p"]);

    // swap tiers without restarting
    fs::write(
        &path,
        r#"
high_priority_keywords = ["patch"]
low_priority_keywords = ["outage"]
"#,
    )
    .unwrap();
    let order: Vec<_> = feed.retrieve_at(t).unwrap().into_iter().map(|e| e.id).collect();
    assert_eq!(order, ["p", "o"]);
}
