// src/aggregate.rs
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use metrics::counter;
use std::time::Duration;
use tracing::info;

use crate::classify::{Item, TopicTable};
use crate::ingest::{FeedFetcher, FeedSource};

/// Politeness pause between two feed requests.
pub const DEFAULT_FEED_DELAY: Duration = Duration::from_secs(1);

/// Trailing window, in days, an item must fall inside to be kept.
pub const DEFAULT_RECENCY_DAYS: i64 = 7;

/// Injected pause between feed fetches.
#[async_trait]
pub trait Delay: Send + Sync {
    async fn pause(&self, period: Duration);
}

pub struct TokioDelay;

#[async_trait]
impl Delay for TokioDelay {
    async fn pause(&self, period: Duration) {
        tokio::time::sleep(period).await;
    }
}

/// Skips the pause entirely (tests, fixtures).
pub struct NoDelay;

#[async_trait]
impl Delay for NoDelay {
    async fn pause(&self, _period: Duration) {}
}

/// Visits feeds one at a time, classifies their items and keeps the recent ones.
pub struct Aggregator {
    fetcher: FeedFetcher,
    delay: Box<dyn Delay>,
    pause: Duration,
    window: chrono::Duration,
}

impl Aggregator {
    pub fn new(fetcher: FeedFetcher, delay: Box<dyn Delay>) -> Self {
        Self {
            fetcher,
            delay,
            pause: DEFAULT_FEED_DELAY,
            window: chrono::Duration::days(DEFAULT_RECENCY_DAYS),
        }
    }

    pub fn with_pause(mut self, pause: Duration) -> Self {
        self.pause = pause;
        self
    }

    /// Out-of-range day counts saturate instead of panicking.
    pub fn with_recency_days(mut self, days: i64) -> Self {
        self.window = chrono::Duration::try_days(days).unwrap_or(chrono::Duration::MAX);
        self
    }

    /// Fetch every feed in order, tag and classify items, then drop stale ones.
    ///
    /// Order of the result is feed order, then document order within a feed.
    /// `now` doubles as the fetch time for entries without a date.
    pub async fn aggregate(
        &self,
        feeds: &[FeedSource],
        topics: &TopicTable,
        now: DateTime<Utc>,
    ) -> Vec<Item> {
        let mut all = Vec::new();
        for (i, feed) in feeds.iter().enumerate() {
            if i > 0 && !self.pause.is_zero() {
                self.delay.pause(self.pause).await;
            }
            let raw = self.fetcher.fetch(&feed.address, now).await;
            info!(feed = %feed.label, items = raw.len(), "feed processed");
            all.extend(
                raw.into_iter()
                    .map(|r| Item::classified(r, &feed.label, topics)),
            );
        }

        let (kept, stale) = filter_recent(all, now, self.window);
        counter!("digest_items_kept_total").increment(kept.len() as u64);
        counter!("digest_items_stale_total").increment(stale as u64);
        info!(feeds = feeds.len(), kept = kept.len(), stale, "aggregation done");
        kept
    }
}

/// Keep items published strictly after `now - window`; returns (kept, dropped).
pub fn filter_recent(
    items: Vec<Item>,
    now: DateTime<Utc>,
    window: chrono::Duration,
) -> (Vec<Item>, usize) {
    // A window reaching past the calendar's start keeps everything.
    let cutoff = now.checked_sub_signed(window);
    let before = items.len();
    let kept: Vec<Item> = items
        .into_iter()
        .filter(|it| cutoff.map_or(true, |c| it.published_at > c))
        .collect();
    let dropped = before - kept.len();
    (kept, dropped)
}
