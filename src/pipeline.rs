// src/pipeline.rs
//! One digest run: aggregate → render → publish (or print).

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use metrics::counter;
use tracing::info;

use crate::aggregate::{Aggregator, Delay};
use crate::classify::TopicTable;
use crate::config::DigestConfig;
use crate::ingest::{FeedFetcher, FeedSource, FeedTransport};
use crate::publish::{PublishReceipt, Publisher};
use crate::report::ReportBuilder;

/// A rendered report, not yet published.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Digest {
    pub title: String,
    pub document: String,
    pub item_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    Published { digest: Digest, receipt: PublishReceipt },
    /// No publisher configured: the caller shows the document instead.
    GeneratedOnly { digest: Digest },
}

impl RunOutcome {
    pub fn digest(&self) -> &Digest {
        match self {
            RunOutcome::Published { digest, .. } | RunOutcome::GeneratedOnly { digest } => digest,
        }
    }
}

pub struct Pipeline {
    feeds: Vec<FeedSource>,
    topics: TopicTable,
    aggregator: Aggregator,
    report: ReportBuilder,
}

impl Pipeline {
    pub fn new(
        config: DigestConfig,
        transport: Box<dyn FeedTransport>,
        delay: Box<dyn Delay>,
    ) -> Result<Self> {
        let topics = config.topic_table().context("building topic table")?;
        let fetcher =
            FeedFetcher::new(transport).with_max_items(config.pipeline.max_items_per_feed);
        let aggregator = Aggregator::new(fetcher, delay)
            .with_pause(config.pipeline.delay())
            .with_recency_days(config.pipeline.recency_days);
        let report = ReportBuilder::new(&config.report.title)
            .with_tagline(config.report.tagline.clone())
            .with_max_items_per_topic(config.report.max_items_per_topic);

        Ok(Self {
            feeds: config.feeds,
            topics,
            aggregator,
            report,
        })
    }

    /// Fetch, classify, filter and render. Never fails: bad feeds are skipped.
    pub async fn generate(&self, now: DateTime<Utc>) -> Digest {
        info!(feeds = self.feeds.len(), "fetching articles from feeds");
        let items = self.aggregator.aggregate(&self.feeds, &self.topics, now).await;
        let document = self.report.build(&items, &self.topics, now);
        Digest {
            title: self.report.title_for(now),
            document,
            item_count: items.len(),
        }
    }

    /// Full run. A publish failure is the only error path.
    pub async fn run(
        &self,
        publisher: Option<&dyn Publisher>,
        now: DateTime<Utc>,
    ) -> Result<RunOutcome> {
        let digest = self.generate(now).await;

        let Some(publisher) = publisher else {
            info!(items = digest.item_count, "no publisher configured; content generated only");
            return Ok(RunOutcome::GeneratedOnly { digest });
        };

        let receipt = publisher
            .publish(&digest.title, &digest.document)
            .await
            .with_context(|| format!("publishing digest via {}", publisher.name()))?;
        counter!("digest_publish_total").increment(1);
        info!(id = %receipt.id, publisher = publisher.name(), "digest published");
        Ok(RunOutcome::Published { digest, receipt })
    }
}
