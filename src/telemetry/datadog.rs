use super::{TelemetryError, TimeRange, TraceRecord, UsageGateway};
use crate::config::TelemetryConfig;
use reqwest::blocking::Client;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, info};

const TRACE_SEARCH_PATH: &str = "/api/v1/traces/search";
const TRACE_LIMIT: u32 = 1000;
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Datadog APM trace-search client
#[derive(Debug, Clone)]
pub struct DatadogClient {
    http_client: Client,
    base_url: String,
    api_key: String,
    app_key: String,
}

impl DatadogClient {
    /// Client for `https://api.<site>`
    pub fn new(api_key: &str, app_key: &str, site: &str) -> Result<Self, TelemetryError> {
        let http_client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;

        Ok(Self {
            http_client,
            base_url: format!("https://api.{}", site),
            api_key: api_key.to_string(),
            app_key: app_key.to_string(),
        })
    }

    pub fn from_config(config: &TelemetryConfig) -> Result<Self, TelemetryError> {
        let api_key = config
            .api_key
            .as_deref()
            .ok_or(TelemetryError::MissingCredentials("api key"))?;
        let app_key = config
            .app_key
            .as_deref()
            .ok_or(TelemetryError::MissingCredentials("application key"))?;

        Self::new(api_key, app_key, &config.site)
    }

    /// Point the client at another host, e.g. a local stand-in
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl UsageGateway for DatadogClient {
    fn fetch_traces(
        &self,
        service: &str,
        window: TimeRange,
    ) -> Result<Vec<TraceRecord>, TelemetryError> {
        let end = chrono::Utc::now().timestamp();
        let start = end.saturating_sub(i64::try_from(window.as_seconds()).unwrap_or(i64::MAX));
        let url = format!("{}{}", self.base_url, TRACE_SEARCH_PATH);

        info!("Querying Datadog traces for service '{}' over {}", service, window);

        let response = self
            .http_client
            .get(&url)
            .header("DD-API-KEY", &self.api_key)
            .header("DD-APPLICATION-KEY", &self.app_key)
            .query(&[
                ("service", service.to_string()),
                ("start", start.to_string()),
                ("end", end.to_string()),
                ("limit", TRACE_LIMIT.to_string()),
            ])
            .send()?;

        let status = response.status();
        let body = response.text()?;
        if !status.is_success() {
            return Err(TelemetryError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let traces = parse_trace_response(&body)?;
        debug!("Datadog returned {} usable traces", traces.len());
        Ok(traces)
    }
}

#[derive(Deserialize)]
struct TraceSearchResponse {
    #[serde(default)]
    traces: Option<Vec<ApmTrace>>,
}

#[derive(Deserialize)]
struct ApmTrace {
    #[serde(default)]
    resource: Option<String>,
    #[serde(default)]
    start_time: f64,
    #[serde(default)]
    duration: f64,
    #[serde(default)]
    tags: Option<HashMap<String, serde_json::Value>>,
}

/// Decode a trace-search response body
///
/// Traces without a resource or without tags are dropped; a missing or null
/// `traces` array is an empty result. Only a string `http.method` tag is read.
pub fn parse_trace_response(body: &str) -> Result<Vec<TraceRecord>, serde_json::Error> {
    let response: TraceSearchResponse = serde_json::from_str(body)?;

    Ok(response
        .traces
        .unwrap_or_default()
        .into_iter()
        .filter_map(|trace| {
            let resource = trace.resource.filter(|r| !r.is_empty())?;
            let tags = trace.tags?;
            let method = tags
                .get("http.method")
                .and_then(|v| v.as_str())
                .map(str::to_string);
            Some(TraceRecord {
                resource,
                method,
                start_time: trace.start_time,
                duration: trace.duration,
            })
        })
        .collect())
}
