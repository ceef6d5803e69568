// src/config/mod.rs
pub mod keywords;

pub use keywords::{FileKeywords, KeywordConfig, KeywordSets, KeywordSource, Priority};
