// src/ingest/fetcher.rs
use anyhow::{bail, Result};
use chrono::{DateTime, Utc};
use metrics::{counter, histogram};

use crate::ingest::parse::parse_feed;
use crate::ingest::types::{FeedTransport, RawItem};

/// Entries taken from the top of each feed.
pub const DEFAULT_MAX_ITEMS_PER_FEED: usize = 5;

/// Fetches one feed and normalizes its entries. Failures never escape:
/// a bad feed is logged, counted and reported as zero items.
pub struct FeedFetcher {
    transport: Box<dyn FeedTransport>,
    max_items: usize,
}

impl FeedFetcher {
    pub fn new(transport: Box<dyn FeedTransport>) -> Self {
        Self {
            transport,
            max_items: DEFAULT_MAX_ITEMS_PER_FEED,
        }
    }

    pub fn with_max_items(mut self, max_items: usize) -> Self {
        self.max_items = max_items;
        self
    }

    /// `fetched_at` stands in for entries without a usable date.
    pub async fn fetch(&self, address: &str, fetched_at: DateTime<Utc>) -> Vec<RawItem> {
        crate::metrics::ensure_described();
        counter!("digest_feed_fetches_total").increment(1);

        let t0 = std::time::Instant::now();
        match self.try_fetch(address, fetched_at).await {
            Ok(items) => {
                histogram!("digest_fetch_ms").record(t0.elapsed().as_secs_f64() * 1_000.0);
                counter!("digest_items_fetched_total").increment(items.len() as u64);
                tracing::debug!(address, items = items.len(), "feed fetched");
                items
            }
            Err(e) => {
                tracing::warn!(error = ?e, address, "feed fetch failed; skipping");
                counter!("digest_feed_errors_total").increment(1);
                Vec::new()
            }
        }
    }

    async fn try_fetch(&self, address: &str, fetched_at: DateTime<Utc>) -> Result<Vec<RawItem>> {
        if address.trim().is_empty() {
            bail!("empty feed address");
        }
        let body = self.transport.get(address).await?;
        parse_feed(&body, fetched_at, self.max_items)
    }
}
