// src/ingest/transport.rs
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

use crate::ingest::types::FeedTransport;

pub const USER_AGENT: &str = concat!("media-digest/", env!("CARGO_PKG_VERSION"));

/// Plain HTTP GET via reqwest. Non-2xx responses are errors.
#[derive(Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .context("building feed http client")?;
        Ok(Self { client })
    }
}

#[async_trait]
impl FeedTransport for HttpTransport {
    async fn get(&self, address: &str) -> Result<String> {
        let rsp = self
            .client
            .get(address)
            .send()
            .await
            .with_context(|| format!("feed http get {address}"))?
            .error_for_status()
            .with_context(|| format!("feed http status {address}"))?;
        rsp.text().await.context("feed http .text()")
    }
}
