// src/classify.rs
//! Keyword classifier: literal, case-insensitive occurrence counting per topic.
//!
//! - Search text is `title + " " + summary`, lower-cased.
//! - A topic's score is the sum of overlapping occurrence counts of its keywords.
//! - Topics are scanned in declaration order; a later topic only takes over on a
//!   strictly greater score, so ties go to the earlier topic.
//! - An item scoring zero everywhere lands in the table's default topic.

use anyhow::{anyhow, bail, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::ingest::RawItem;

/// A classification bucket.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Topic {
    pub key: String,
    pub display_name: String,
    #[serde(default)]
    pub keywords: Vec<String>,
}

impl Topic {
    pub fn new(key: &str, display_name: &str, keywords: &[&str]) -> Self {
        Self {
            key: key.to_string(),
            display_name: display_name.to_string(),
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
        }
    }
}

/// Topics in declaration order plus the designated catch-all.
#[derive(Debug, Clone)]
pub struct TopicTable {
    topics: Vec<Topic>,
    default_key: String,
    // lower-cased, trimmed, non-empty keywords; parallel to `topics`
    needles: Vec<Vec<String>>,
}

impl TopicTable {
    pub fn new(topics: Vec<Topic>, default_key: &str) -> Result<Self> {
        if topics.is_empty() {
            bail!("topic table is empty");
        }
        let mut seen = HashSet::new();
        for t in &topics {
            if t.key.trim().is_empty() {
                bail!("topic with empty key ({:?})", t.display_name);
            }
            if !seen.insert(t.key.as_str()) {
                bail!("duplicate topic key `{}`", t.key);
            }
        }
        if !seen.contains(default_key) {
            return Err(anyhow!("default topic `{default_key}` is not in the topic table"));
        }

        let needles = topics
            .iter()
            .map(|t| {
                t.keywords
                    .iter()
                    .map(|k| k.trim().to_lowercase())
                    .filter(|k| !k.is_empty())
                    .collect()
            })
            .collect();

        Ok(Self {
            default_key: default_key.to_string(),
            topics,
            needles,
        })
    }

    pub fn topics(&self) -> &[Topic] {
        &self.topics
    }

    pub fn default_key(&self) -> &str {
        &self.default_key
    }

    pub fn get(&self, key: &str) -> Option<&Topic> {
        self.topics.iter().find(|t| t.key == key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Per-topic scores in declaration order.
    pub fn scores(&self, item: &RawItem) -> Vec<(&str, usize)> {
        let text = search_text(item);
        self.topics
            .iter()
            .zip(&self.needles)
            .map(|(t, kws)| {
                let score = kws.iter().map(|k| count_overlapping(&text, k)).sum();
                (t.key.as_str(), score)
            })
            .collect()
    }

    /// Best-matching topic key for `item`.
    pub fn classify(&self, item: &RawItem) -> &str {
        let mut best = self.default_key.as_str();
        let mut highest = 0usize;
        for (key, score) in self.scores(item) {
            if score > highest {
                highest = score;
                best = key;
            }
        }
        best
    }
}

/// Free-function form of [`TopicTable::classify`].
pub fn classify<'t>(item: &RawItem, table: &'t TopicTable) -> &'t str {
    table.classify(item)
}

fn search_text(item: &RawItem) -> String {
    format!("{} {}", item.title, item.summary).to_lowercase()
}

/// Occurrences of `needle` in `haystack`, overlapping matches included.
pub fn count_overlapping(haystack: &str, needle: &str) -> usize {
    if needle.is_empty() {
        return 0;
    }
    haystack
        .char_indices()
        .filter(|(i, _)| haystack[*i..].starts_with(needle))
        .count()
}

/// A classified feed item. Built only through [`Item::classified`], so the
/// topic always comes from the table it was classified against.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Item {
    pub title: String,
    pub summary: String,
    pub url: String,
    pub published_at: DateTime<Utc>,
    pub source_label: String,
    pub topic: String,
}

impl Item {
    pub fn classified(raw: RawItem, source_label: &str, table: &TopicTable) -> Self {
        let topic = table.classify(&raw).to_string();
        tracing::debug!(title = %raw.title, source = source_label, %topic, "classified");
        Self {
            title: raw.title,
            summary: raw.summary,
            url: raw.url,
            published_at: raw.published_at,
            source_label: source_label.to_string(),
            topic,
        }
    }
}
