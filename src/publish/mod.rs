// src/publish/mod.rs
pub mod wordpress;

use anyhow::Result;

pub use wordpress::WordPressPublisher;

/// Identifier returned by the remote system for a stored report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishReceipt {
    pub id: String,
}

/// Persists a rendered report somewhere outside the process.
#[async_trait::async_trait]
pub trait Publisher: Send + Sync {
    async fn publish(&self, title: &str, content: &str) -> Result<PublishReceipt>;
    fn name(&self) -> &'static str;
}
