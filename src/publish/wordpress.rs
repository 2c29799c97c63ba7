// src/publish/wordpress.rs
use anyhow::{anyhow, bail, Context, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::{PublishReceipt, Publisher};
use crate::config::PublishSettings;

/// Creates posts through the WordPress REST API (`/wp-json/wp/v2/posts`)
/// using HTTP basic auth. One attempt; any non-2xx status is an error.
#[derive(Clone)]
pub struct WordPressPublisher {
    endpoint: String,
    username: String,
    password: String,
    category: String,
    client: Client,
    timeout: Duration,
}

impl WordPressPublisher {
    pub fn new(settings: PublishSettings) -> Self {
        Self {
            endpoint: posts_endpoint(&settings.base_url),
            username: settings.username,
            password: settings.password,
            category: settings.category,
            client: Client::new(),
            timeout: Duration::from_secs(30),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

pub fn posts_endpoint(base_url: &str) -> String {
    format!("{}/wp-json/wp/v2/posts", base_url.trim_end_matches('/'))
}

/// Request body of `POST /wp/v2/posts`.
#[derive(Debug, Serialize)]
struct PostRequest<'a> {
    title: &'a str,
    content: &'a str,
    status: &'static str,
    categories: Vec<&'a str>,
}

#[derive(Debug, Deserialize)]
struct PostCreated {
    id: serde_json::Value,
}

#[async_trait::async_trait]
impl Publisher for WordPressPublisher {
    async fn publish(&self, title: &str, content: &str) -> Result<PublishReceipt> {
        let payload = PostRequest {
            title,
            content,
            status: "publish",
            categories: vec![self.category.as_str()],
        };

        let rsp = self
            .client
            .post(&self.endpoint)
            .timeout(self.timeout)
            .basic_auth(&self.username, Some(&self.password))
            .json(&payload)
            .send()
            .await
            .context("wordpress post")?;

        let status = rsp.status();
        if !status.is_success() {
            bail!("WordPress API error: {}", status.as_u16());
        }

        let created: PostCreated = rsp.json().await.context("wordpress response json")?;
        let id = match created.id {
            serde_json::Value::Number(n) => n.to_string(),
            serde_json::Value::String(s) if !s.is_empty() => s,
            other => return Err(anyhow!("WordPress response has unusable id: {other}")),
        };
        tracing::info!(post_id = %id, "posted to WordPress");
        Ok(PublishReceipt { id })
    }

    fn name(&self) -> &'static str {
        "wordpress"
    }
}
