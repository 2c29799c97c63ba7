// tests/common/mod.rs
#![allow(dead_code)]

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use media_digest::{FeedSource, FeedTransport, PublishReceipt, Publisher};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub const LAW_RSS: &str = include_str!("../fixtures/law_rss.xml");
pub const UX_ATOM: &str = include_str!("../fixtures/ux_atom.xml");

pub const LAW_URL: &str = "https://law.example.test/feed";
pub const UX_URL: &str = "https://ux.example.test/atom";
pub const DOWN_URL: &str = "https://down.example.test/feed";

/// Fixed clock for reproducible runs.
pub fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 20, 12, 0, 0).unwrap()
}

pub fn feed(label: &str, address: &str) -> FeedSource {
    FeedSource::new(label, address, "media-survey")
}

/// Serves canned bodies by address; unknown addresses fail like a dead host.
#[derive(Clone, Default)]
pub struct FixtureTransport {
    bodies: HashMap<String, String>,
    pub requests: Arc<Mutex<Vec<String>>>,
}

impl FixtureTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, address: &str, body: &str) -> Self {
        self.bodies.insert(address.to_string(), body.to_string());
        self
    }

    pub fn standard() -> Self {
        Self::new().with(LAW_URL, LAW_RSS).with(UX_URL, UX_ATOM)
    }
}

#[async_trait]
impl FeedTransport for FixtureTransport {
    async fn get(&self, address: &str) -> Result<String> {
        self.requests.lock().unwrap().push(address.to_string());
        self.bodies
            .get(address)
            .cloned()
            .ok_or_else(|| anyhow!("connection refused: {address}"))
    }
}

/// Records requested pauses instead of sleeping.
#[derive(Clone, Default)]
pub struct RecordingDelay {
    pub pauses: Arc<Mutex<Vec<Duration>>>,
}

#[async_trait]
impl media_digest::Delay for RecordingDelay {
    async fn pause(&self, period: Duration) {
        self.pauses.lock().unwrap().push(period);
    }
}

/// Captures publish calls; optionally fails them.
#[derive(Clone, Default)]
pub struct RecordingPublisher {
    pub calls: Arc<Mutex<Vec<(String, String)>>>,
    pub fail: bool,
}

impl RecordingPublisher {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }
}

#[async_trait]
impl Publisher for RecordingPublisher {
    async fn publish(&self, title: &str, content: &str) -> Result<PublishReceipt> {
        self.calls
            .lock()
            .unwrap()
            .push((title.to_string(), content.to_string()));
        if self.fail {
            return Err(anyhow!("WordPress API error: 500"));
        }
        Ok(PublishReceipt { id: "42".into() })
    }

    fn name(&self) -> &'static str {
        "recording"
    }
}
