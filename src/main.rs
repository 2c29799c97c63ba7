//! Weekly media digest batch entrypoint.
//! Fetches the configured feeds, renders the report and posts it to WordPress,
//! or prints it when no credentials are configured. Meant to be run by cron.

use anyhow::Result;
use chrono::Utc;
use media_digest::metrics::MetricsDump;
use media_digest::{
    DigestConfig, HttpTransport, Pipeline, PublishSettings, Publisher, RunOutcome, TokioDelay,
    WordPressPublisher,
};
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Compact logs by default; `DIGEST_LOG_JSON=1` switches to JSON lines.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let json = std::env::var("DIGEST_LOG_JSON").ok().is_some_and(|v| v == "1");

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(fmt::layer().json()).init();
    } else {
        registry.with(fmt::layer().compact()).init();
    }
}

async fn run() -> Result<()> {
    let metrics = if std::env::var("DIGEST_METRICS_DUMP").ok().as_deref() == Some("1") {
        Some(MetricsDump::install()?)
    } else {
        None
    };

    info!("starting weekly digest generation");
    let config = DigestConfig::load_default()?;
    let transport = HttpTransport::new(config.pipeline.fetch_timeout())?;
    let publish_timeout = config.pipeline.publish_timeout();
    let pipeline = Pipeline::new(config, Box::new(transport), Box::new(TokioDelay))?;

    let publisher = PublishSettings::from_env()
        .map(|s| WordPressPublisher::new(s).with_timeout(publish_timeout));
    let outcome = pipeline
        .run(publisher.as_ref().map(|p| p as &dyn Publisher), Utc::now())
        .await?;

    match outcome {
        RunOutcome::Published { receipt, digest } => {
            info!(post_id = %receipt.id, title = %digest.title, "weekly digest posted");
        }
        RunOutcome::GeneratedOnly { digest } => {
            info!("WordPress credentials not provided, content generated only");
            println!("{}", digest.document);
        }
    }

    if let Some(m) = metrics {
        info!(target: "metrics", "run metrics:\n{}", m.render());
    }
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    // Load .env in local/dev; no-op when absent.
    let _ = dotenvy::dotenv();
    init_tracing();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = ?e, "weekly digest run failed");
            ExitCode::FAILURE
        }
    }
}
