// src/metrics.rs
use anyhow::{Context, Result};
use metrics::{describe_counter, describe_histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use once_cell::sync::OnceCell;

/// One-time metrics registration (so series carry descriptions).
pub fn ensure_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!("digest_feed_fetches_total", "Feed fetch attempts.");
        describe_counter!(
            "digest_feed_errors_total",
            "Feed fetch/parse failures (feed skipped)."
        );
        describe_counter!(
            "digest_items_fetched_total",
            "Entries normalized from fetched feeds."
        );
        describe_counter!(
            "digest_items_kept_total",
            "Classified items inside the recency window."
        );
        describe_counter!(
            "digest_items_stale_total",
            "Items dropped by the recency window."
        );
        describe_counter!("digest_publish_total", "Successful report publishes.");
        describe_histogram!("digest_fetch_ms", "Feed fetch + parse time in milliseconds.");
    });
}

/// Prometheus recorder for a single batch run; rendered into the log at the end.
pub struct MetricsDump {
    handle: PrometheusHandle,
}

impl MetricsDump {
    pub fn install() -> Result<Self> {
        let handle = PrometheusBuilder::new()
            .install_recorder()
            .context("prometheus: install recorder")?;
        ensure_described();
        Ok(Self { handle })
    }

    pub fn render(&self) -> String {
        self.handle.render()
    }
}
