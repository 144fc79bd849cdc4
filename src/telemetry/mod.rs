//! Usage telemetry: raw trace records and their per-route aggregation
//!
//! A [`UsageGateway`] fetches raw [`TraceRecord`]s for a service over a
//! look-back window; [`aggregate_usage`] folds them into one
//! [`TelemetryUsage`] per normalized (method, route) pair. The Datadog
//! transport lives in [`datadog`]; anything else that can produce trace
//! records can implement the trait.

mod datadog;
mod time_range;

pub use datadog::{parse_trace_response, DatadogClient};
pub use time_range::{InvalidTimeRange, TimeRange, TimeUnit};

use crate::analysis::routes::normalize_resource;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::debug;

/// Method recorded for traces that carry no `http.method` tag
pub const UNKNOWN_METHOD: &str = "UNKNOWN";

/// Errors raised while obtaining usage telemetry
#[derive(Error, Debug)]
pub enum TelemetryError {
    #[error(transparent)]
    InvalidTimeRange(#[from] InvalidTimeRange),

    #[error("Telemetry request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Telemetry API returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Failed to decode telemetry response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Telemetry credentials are missing: {0}")]
    MissingCredentials(&'static str),
}

/// One raw trace as returned by a telemetry backend
#[derive(Debug, Clone, PartialEq)]
pub struct TraceRecord {
    /// Requested path, e.g. `/users/123`
    pub resource: String,
    /// Value of the `http.method` tag, if any
    pub method: Option<String>,
    /// Start time in epoch seconds
    pub start_time: f64,
    /// Duration as reported by the backend
    pub duration: f64,
}

/// Usage statistics for one normalized (method, route) pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TelemetryUsage {
    pub endpoint: String,
    pub method: String,
    pub hit_count: u64,
    /// RFC 3339 timestamp of the latest trace
    pub last_accessed: String,
    pub avg_response_time: f64,
}

/// Source of usage telemetry for a service
pub trait UsageGateway {
    /// Fetch every trace for `service` within the last `window`
    fn fetch_traces(&self, service: &str, window: TimeRange)
        -> Result<Vec<TraceRecord>, TelemetryError>;

    /// Parse `time_range`, fetch traces and aggregate them per route
    ///
    /// A malformed range fails before anything is fetched.
    fn endpoint_usage(
        &self,
        service: &str,
        time_range: &str,
    ) -> Result<Vec<TelemetryUsage>, TelemetryError> {
        let window: TimeRange = time_range.parse()?;
        let traces = self.fetch_traces(service, window)?;
        debug!("Fetched {} traces for {} over {}", traces.len(), service, window);
        Ok(aggregate_usage(&traces))
    }
}

#[derive(Default)]
struct UsageAccumulator {
    hits: u64,
    latest_start: f64,
    total_duration: f64,
}

/// Group traces by normalized resource and upper-cased method
///
/// Records with an empty resource are ignored. Output is ordered by
/// (endpoint, method).
pub fn aggregate_usage(traces: &[TraceRecord]) -> Vec<TelemetryUsage> {
    let mut groups: BTreeMap<(String, String), UsageAccumulator> = BTreeMap::new();

    for trace in traces.iter().filter(|t| !t.resource.is_empty()) {
        let method = trace
            .method
            .as_deref()
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .map(str::to_uppercase)
            .unwrap_or_else(|| UNKNOWN_METHOD.to_string());

        let entry = groups
            .entry((normalize_resource(&trace.resource), method))
            .or_default();

        if entry.hits == 0 || trace.start_time > entry.latest_start {
            entry.latest_start = trace.start_time;
        }
        entry.hits += 1;
        entry.total_duration += trace.duration;
    }

    groups
        .into_iter()
        .map(|((endpoint, method), acc)| TelemetryUsage {
            endpoint,
            method,
            hit_count: acc.hits,
            last_accessed: format_timestamp(acc.latest_start),
            avg_response_time: acc.total_duration / acc.hits as f64,
        })
        .collect()
}

/// Epoch seconds to an RFC 3339 UTC string with millisecond precision
pub fn format_timestamp(epoch_seconds: f64) -> String {
    let millis = (epoch_seconds * 1000.0).round() as i64;
    DateTime::<Utc>::from_timestamp_millis(millis)
        .unwrap_or_default()
        .to_rfc3339_opts(SecondsFormat::Millis, true)
}
