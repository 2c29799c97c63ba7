// src/config/mod.rs
//! Digest configuration: feeds, topics, pipeline knobs and report settings.
//!
//! Resolution order for [`DigestConfig::load_default`]:
//! 1. `$DIGEST_CONFIG_PATH` (must exist)
//! 2. `config/digest.toml`
//! 3. the built-in seed compiled into the binary

pub mod publish;

use anyhow::{anyhow, bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::aggregate::{DEFAULT_FEED_DELAY, DEFAULT_RECENCY_DAYS};
use crate::classify::{Topic, TopicTable};
use crate::ingest::fetcher::DEFAULT_MAX_ITEMS_PER_FEED;
use crate::ingest::FeedSource;
use crate::report::{DEFAULT_MAX_ITEMS_PER_TOPIC, DEFAULT_REPORT_TITLE};

pub use publish::PublishSettings;

pub const ENV_DIGEST_CONFIG_PATH: &str = "DIGEST_CONFIG_PATH";
pub const DEFAULT_DIGEST_CONFIG_PATH: &str = "config/digest.toml";

/// Upper bound for `pipeline.recency_days` (ten years).
pub const MAX_RECENCY_DAYS: i64 = 3_650;

const BUILTIN_CONFIG: &str = include_str!("../../config/digest.toml");

fn default_delay_ms() -> u64 {
    DEFAULT_FEED_DELAY.as_millis() as u64
}
fn default_max_items_per_feed() -> usize {
    DEFAULT_MAX_ITEMS_PER_FEED
}
fn default_recency_days() -> i64 {
    DEFAULT_RECENCY_DAYS
}
fn default_fetch_timeout_secs() -> u64 {
    30
}
fn default_publish_timeout_secs() -> u64 {
    30
}
fn default_report_title() -> String {
    DEFAULT_REPORT_TITLE.to_string()
}
fn default_max_items_per_topic() -> usize {
    DEFAULT_MAX_ITEMS_PER_TOPIC
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineSettings {
    /// Pause between two feed requests.
    #[serde(default = "default_delay_ms")]
    pub delay_ms: u64,
    #[serde(default = "default_max_items_per_feed")]
    pub max_items_per_feed: usize,
    #[serde(default = "default_recency_days")]
    pub recency_days: i64,
    #[serde(default = "default_fetch_timeout_secs")]
    pub fetch_timeout_secs: u64,
    #[serde(default = "default_publish_timeout_secs")]
    pub publish_timeout_secs: u64,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            delay_ms: default_delay_ms(),
            max_items_per_feed: default_max_items_per_feed(),
            recency_days: default_recency_days(),
            fetch_timeout_secs: default_fetch_timeout_secs(),
            publish_timeout_secs: default_publish_timeout_secs(),
        }
    }
}

impl PipelineSettings {
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }

    pub fn publish_timeout(&self) -> Duration {
        Duration::from_secs(self.publish_timeout_secs)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportSettings {
    #[serde(default = "default_report_title")]
    pub title: String,
    #[serde(default)]
    pub tagline: Option<String>,
    #[serde(default = "default_max_items_per_topic")]
    pub max_items_per_topic: usize,
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            title: default_report_title(),
            tagline: None,
            max_items_per_topic: default_max_items_per_topic(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DigestConfig {
    /// Catch-all topic for items that match no keyword.
    pub default_topic: String,
    #[serde(default)]
    pub pipeline: PipelineSettings,
    #[serde(default)]
    pub report: ReportSettings,
    pub topics: Vec<Topic>,
    #[serde(default)]
    pub feeds: Vec<FeedSource>,
}

impl DigestConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let cfg: DigestConfig = toml::from_str(s).context("parsing digest config toml")?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading digest config from {}", path.display()))?;
        Self::from_toml_str(&content)
            .with_context(|| format!("invalid digest config at {}", path.display()))
    }

    /// Configuration shipped with the crate (`config/digest.toml`).
    pub fn builtin() -> Result<Self> {
        Self::from_toml_str(BUILTIN_CONFIG).context("built-in digest config")
    }

    /// Env path, then `config/digest.toml`, then the built-in seed.
    pub fn load_default() -> Result<Self> {
        if let Ok(p) = std::env::var(ENV_DIGEST_CONFIG_PATH) {
            let pb = PathBuf::from(p);
            if !pb.exists() {
                return Err(anyhow!(
                    "{ENV_DIGEST_CONFIG_PATH} points to non-existent path {}",
                    pb.display()
                ));
            }
            return Self::load_from(&pb);
        }
        let local = PathBuf::from(DEFAULT_DIGEST_CONFIG_PATH);
        if local.exists() {
            return Self::load_from(&local);
        }
        tracing::info!("no digest config file found; using built-in feeds and topics");
        Self::builtin()
    }

    pub fn topic_table(&self) -> Result<TopicTable> {
        TopicTable::new(self.topics.clone(), &self.default_topic)
    }

    fn validate(&self) -> Result<()> {
        let table = self.topic_table()?;

        let mut labels = HashSet::new();
        for f in &self.feeds {
            if f.address.trim().is_empty() {
                bail!("feed `{}` has an empty address", f.label);
            }
            if !table.contains(&f.default_topic) {
                bail!(
                    "feed `{}` refers to unknown topic `{}`",
                    f.label,
                    f.default_topic
                );
            }
            if !labels.insert(f.label.as_str()) {
                tracing::warn!(label = %f.label, "duplicate feed label");
            }
        }
        let days = self.pipeline.recency_days;
        if !(1..=MAX_RECENCY_DAYS).contains(&days) {
            bail!("pipeline.recency_days must be within 1..={MAX_RECENCY_DAYS}, got {days}");
        }
        Ok(())
    }
}
