//! Prometheus metrics for core components.
//!
//! This module provides metrics for:
//! - Row outcomes (issued, or skipped with a reason)
//! - Rendering and delivery latency

use once_cell::sync::Lazy;
use prometheus::{Histogram, HistogramOpts, IntCounterVec, Opts};

// =============================================================================
// Batch Metrics
// =============================================================================

/// Rows processed, by outcome.
pub static ROWS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("admit_rows_total", "Roster rows processed"),
        &["outcome"], // "issued", "missing_fields", "resource_not_found", "render_failed", "delivery_failed"
    )
    .unwrap()
});

/// Time spent rendering one ticket.
pub static RENDER_DURATION: Lazy<Histogram> = Lazy::new(|| {
    Histogram::with_opts(
        HistogramOpts::new(
            "admit_render_duration_seconds",
            "Duration of ticket rendering",
        )
        .buckets(vec![0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5]),
    )
    .unwrap()
});

/// Time spent handing one message to the mail transport.
pub static DELIVERY_DURATION: Lazy<Histogram> = Lazy::new(|| {
    Histogram::with_opts(
        HistogramOpts::new(
            "admit_delivery_duration_seconds",
            "Duration of ticket mail delivery",
        )
        .buckets(vec![0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0]),
    )
    .unwrap()
});

// =============================================================================
// Helper functions
// =============================================================================

/// Get all core metrics for registration in a registry.
pub fn all_metrics() -> Vec<Box<dyn prometheus::core::Collector>> {
    vec![
        Box::new(ROWS_TOTAL.clone()),
        Box::new(RENDER_DURATION.clone()),
        Box::new(DELIVERY_DURATION.clone()),
    ]
}
