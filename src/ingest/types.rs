// src/ingest/types.rs
use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One configured feed. Loaded at startup and never mutated.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FeedSource {
    pub label: String,   // display name, e.g. "UXmatters"
    pub address: String, // fetch endpoint
    pub default_topic: String,
}

impl FeedSource {
    pub fn new(label: &str, address: &str, default_topic: &str) -> Self {
        Self {
            label: label.to_string(),
            address: address.to_string(),
            default_topic: default_topic.to_string(),
        }
    }
}

/// A normalized feed entry, before classification.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RawItem {
    pub title: String,   // never empty
    pub summary: String, // plain text, capped
    pub url: String,     // may be empty
    pub published_at: DateTime<Utc>,
}

/// Retrieves a feed document body. Connection pooling, redirects and TLS live
/// behind this seam.
#[async_trait::async_trait]
pub trait FeedTransport: Send + Sync {
    async fn get(&self, address: &str) -> Result<String>;
}
