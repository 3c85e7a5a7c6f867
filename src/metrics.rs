// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Metrics instrumentation for searchd-query.
//!
//! Uses the `metrics` crate for backend-agnostic metrics collection.
//! The embedding application is responsible for choosing the exporter
//! (Prometheus, OTEL, etc.)
//!
//! # Metric Naming Convention
//! - `searchd_query_` prefix for all metrics
//! - `_total` suffix for counters
//! - `_seconds` suffix for duration histograms
//!
//! # Labels
//! - `status`: success, run_failed, connect_error, backend_error

use metrics::{counter, histogram};
use std::time::Duration;

/// Record one execution attempt and how it ended
pub fn record_execution(status: &str) {
    counter!(
        "searchd_query_executions_total",
        "status" => status.to_string()
    )
    .increment(1);
}

/// Record the duration of the backend round trip
pub fn record_round_trip(duration: Duration) {
    histogram!("searchd_query_round_trip_seconds").record(duration.as_secs_f64());
}
