// src/lib.rs
// Public library surface for the binary and integration tests.

pub mod aggregate;
pub mod classify;
pub mod config;
pub mod ingest;
pub mod metrics;
pub mod pipeline;
pub mod publish;
pub mod report;

// ---- Re-exports for stable public API ----
pub use crate::aggregate::{Aggregator, Delay, NoDelay, TokioDelay};
pub use crate::classify::{classify, Item, Topic, TopicTable};
pub use crate::config::{DigestConfig, PublishSettings};
pub use crate::ingest::{FeedFetcher, FeedSource, FeedTransport, HttpTransport, RawItem};
pub use crate::pipeline::{Digest, Pipeline, RunOutcome};
pub use crate::publish::{PublishReceipt, Publisher, WordPressPublisher};
pub use crate::report::ReportBuilder;
