//! Prometheus metrics for a batch run.
//!
//! A run is a short-lived job, so metrics are not scraped. They are written
//! once to a text file for the node_exporter textfile collector.

use std::path::Path;

use anyhow::{Context, Result};
use once_cell::sync::Lazy;
use prometheus::{self, Encoder, Gauge, IntGauge, Registry, TextEncoder};

use admit_core::BatchReport;

/// Global metrics registry.
pub static REGISTRY: Lazy<Registry> = Lazy::new(|| {
    let registry = Registry::new();
    register_metrics(&registry);
    registry
});

// =============================================================================
// Run Metrics
// =============================================================================

/// Wall-clock duration of the last run.
pub static BATCH_DURATION: Lazy<Gauge> = Lazy::new(|| {
    Gauge::new(
        "admit_batch_duration_seconds",
        "Duration of the last batch run in seconds",
    )
    .unwrap()
});

/// Completion time of the last successful run.
pub static BATCH_LAST_SUCCESS: Lazy<IntGauge> = Lazy::new(|| {
    IntGauge::new(
        "admit_batch_last_success_timestamp_seconds",
        "Unix time the last batch run completed",
    )
    .unwrap()
});

/// Roster rows seen by the last run.
pub static BATCH_ROWS: Lazy<IntGauge> = Lazy::new(|| {
    IntGauge::new("admit_batch_rows", "Roster rows in the last batch run").unwrap()
});

fn register_metrics(registry: &Registry) {
    registry.register(Box::new(BATCH_DURATION.clone())).unwrap();
    registry
        .register(Box::new(BATCH_LAST_SUCCESS.clone()))
        .unwrap();
    registry.register(Box::new(BATCH_ROWS.clone())).unwrap();

    for metric in admit_core::metrics::all_metrics() {
        registry.register(metric).unwrap();
    }
}

/// Update run gauges from a finished batch.
pub fn record_report(report: &BatchReport) {
    let elapsed = report.finished_at - report.started_at;
    BATCH_DURATION.set(elapsed.num_milliseconds() as f64 / 1000.0);
    BATCH_LAST_SUCCESS.set(report.finished_at.timestamp());
    BATCH_ROWS.set(report.rows.len() as i64);
}

/// Encode all metrics as Prometheus text format.
pub fn encode_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer).unwrap();
    String::from_utf8(buffer).unwrap()
}

/// Write the exposition to `path` via a temp file and rename, so the
/// collector never reads a partial file.
pub fn write_textfile(path: &Path) -> Result<()> {
    let tmp = path.with_extension("prom.tmp");
    std::fs::write(&tmp, encode_metrics())
        .with_context(|| format!("Failed to write metrics to {:?}", tmp))?;
    std::fs::rename(&tmp, path)
        .with_context(|| format!("Failed to move metrics into {:?}", path))?;
    Ok(())
}
