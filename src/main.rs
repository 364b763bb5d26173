use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use chartname_core::constants::REVIEW_QUEUE_FILENAME;
use chartname_core::{
    dir_from_env_value, format_from_env_value, list_documents, write_review_queue,
    ConfigOverrides, CoreConfig, DocumentPipeline,
};

/// Main entry point for the chartname batch runner
///
/// Renames every document in the inbox once and exits:
/// - confident documents are renamed in place, or moved to the output folder
/// - documents needing review stay in the inbox and are listed in `review-queue.yaml`
/// - failing documents are logged with their error label and left untouched
///
/// # Environment Variables
/// - `CHARTNAME_INBOX_DIR`: Directory holding the exported documents (required)
/// - `CHARTNAME_OUTPUT_DIR`: Output folder (default: rename in place)
/// - `CHARTNAME_FORMAT`: Output format id (default: "appt_billing")
/// - `CHARTNAME_ANCHOR`: Anchor line preceding the patient name (default: "Chart")
/// - `CHARTNAME_CONFIG`: Optional YAML config file; the variables above take precedence
/// - `CHARTNAME_TODAY`: Fixed current date (YYYY-MM-DD) for current-date formats
fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("chartname=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let inbox: PathBuf = dir_from_env_value(std::env::var("CHARTNAME_INBOX_DIR").ok())
        .context("CHARTNAME_INBOX_DIR must be set")?;

    let cfg = Arc::new(config_from_env()?);
    tracing::info!(
        format = cfg.format().id(),
        in_place = cfg.output_dir().is_none(),
        "++ Starting chartname batch"
    );

    let mut pipeline = DocumentPipeline::from_config(cfg.clone());
    if let Some(today) = non_blank_var("CHARTNAME_TODAY") {
        let today = chrono::NaiveDate::parse_from_str(&today, "%Y-%m-%d")
            .context("CHARTNAME_TODAY must be YYYY-MM-DD")?;
        pipeline = pipeline.with_today(today);
    }

    let documents = list_documents(&inbox)?;
    tracing::info!("++ Found {} documents", documents.len());

    let report = pipeline.process_batch(&documents);

    let queue_path = inbox.join(REVIEW_QUEUE_FILENAME);
    if report.pending.is_empty() {
        if queue_path.exists() {
            std::fs::remove_file(&queue_path)
                .with_context(|| format!("failed to remove stale {}", REVIEW_QUEUE_FILENAME))?;
        }
    } else {
        write_review_queue(&queue_path, &report.review_queue(cfg.format()))?;
        tracing::info!(
            pending = report.pending.len(),
            "review queue written to {}",
            queue_path.display()
        );
    }

    if !report.failed.is_empty() {
        anyhow::bail!("{} of {} documents failed", report.failed.len(), report.total());
    }

    Ok(())
}

/// Builds the core config from `CHARTNAME_*` variables and the optional YAML file.
fn config_from_env() -> anyhow::Result<CoreConfig> {
    let config_file = dir_from_env_value(std::env::var("CHARTNAME_CONFIG").ok());

    let overrides = ConfigOverrides {
        output_dir: dir_from_env_value(std::env::var("CHARTNAME_OUTPUT_DIR").ok()),
        format: non_blank_var("CHARTNAME_FORMAT")
            .map(|v| format_from_env_value(Some(v)))
            .transpose()?,
        anchor_marker: non_blank_var("CHARTNAME_ANCHOR"),
    };

    Ok(CoreConfig::resolve(config_file.as_deref(), overrides)?)
}

fn non_blank_var(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
}
