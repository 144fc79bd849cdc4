//! End-to-end reconciliation tests
//!
//! Drive the detector in both modes against the sample service, with an
//! in-memory gateway standing in for the telemetry backend.

use orphanscan::analysis::{OrphanReason, StaticStrategy, Strategy, TelemetryStrategy};
use orphanscan::config::{AnalysisMode, Config};
use orphanscan::parser::{CodeItem, Extractor};
use orphanscan::telemetry::{TelemetryError, TelemetryUsage, TimeRange, TraceRecord, UsageGateway};
use orphanscan::{Language, OrphanDetector, OrphanError, RunMode};
use std::cell::Cell;
use std::path::{Path, PathBuf};

fn fixture_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/sample_service")
}

fn detector(threshold: f64) -> OrphanDetector {
    OrphanDetector::new(Config {
        exclude: vec!["node_modules".to_string()],
        confidence_threshold: threshold,
        ..Config::default()
    })
}

/// Gateway that replays canned traces and counts fetches
struct ReplayGateway {
    traces: Vec<TraceRecord>,
    fetches: Cell<usize>,
}

impl ReplayGateway {
    fn new(traces: Vec<TraceRecord>) -> Self {
        Self {
            traces,
            fetches: Cell::new(0),
        }
    }
}

impl UsageGateway for ReplayGateway {
    fn fetch_traces(
        &self,
        _service: &str,
        _window: TimeRange,
    ) -> Result<Vec<TraceRecord>, TelemetryError> {
        self.fetches.set(self.fetches.get() + 1);
        Ok(self.traces.clone())
    }
}

struct FailingGateway;

impl UsageGateway for FailingGateway {
    fn fetch_traces(
        &self,
        _service: &str,
        _window: TimeRange,
    ) -> Result<Vec<TraceRecord>, TelemetryError> {
        Err(TelemetryError::Status {
            status: 403,
            body: "Forbidden".to_string(),
        })
    }
}

fn trace(method: &str, resource: &str) -> TraceRecord {
    TraceRecord {
        resource: resource.to_string(),
        method: Some(method.to_string()),
        start_time: 1_709_294_400.0,
        duration: 20.0,
    }
}

fn full<'a>(gateway: &'a dyn UsageGateway, time_range: &'a str) -> RunMode<'a> {
    RunMode::Full {
        gateway,
        service_name: "users-api",
        time_range,
    }
}

// ============================================================================
// Static mode
// ============================================================================

#[test]
fn test_static_mode_on_sample_service() {
    let result = detector(0.8).analyze(&fixture_path(), RunMode::Pr).unwrap();

    assert_eq!(result.summary.total_endpoints, 7);
    assert_eq!(result.summary.total_functions, 6);
    assert_eq!(result.summary.analysis_mode, AnalysisMode::Pr);
    assert_eq!(result.summary.orphaned_count, 1);

    let finding = &result.orphaned_endpoints[0];
    assert_eq!(finding.reason, OrphanReason::HandlerNotFound);
    assert_eq!(finding.item.label(), "DELETE /users/:id");
    assert!(result.orphaned_functions.is_empty());
    assert!(result.active_endpoints.is_empty());
}

#[test]
fn test_static_mode_lower_threshold_reveals_helpers() {
    let result = detector(0.5).analyze(&fixture_path(), RunMode::Pr).unwrap();

    let names: Vec<_> = result.orphaned_functions.iter().map(|f| f.item.label()).collect();
    assert_eq!(names, vec!["padLeft", "unusedHelper"]);
    assert!(result
        .orphaned_functions
        .iter()
        .all(|f| f.reason == OrphanReason::MinimalReferences && f.confidence == 0.6));
}

#[test]
fn test_static_mode_is_idempotent() {
    let first = detector(0.0).analyze(&fixture_path(), RunMode::Pr).unwrap();
    let second = detector(0.0).analyze(&fixture_path(), RunMode::Pr).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_threshold_monotonicity_end_to_end() {
    let mut previous: Option<Vec<_>> = None;
    for threshold in [0.0, 0.6, 0.7, 0.8, 0.9, 1.0] {
        let result = detector(threshold).analyze(&fixture_path(), RunMode::Pr).unwrap();
        let current: Vec<_> = result.findings().cloned().collect();
        assert!(current.iter().all(|f| f.confidence >= threshold));
        if let Some(previous) = &previous {
            assert!(current.iter().all(|f| previous.contains(f)));
        }
        previous = Some(current);
    }
}

#[test]
fn test_handler_not_found_from_single_line() {
    let extraction = Extractor::new().extract_file(
        Path::new("server.js"),
        Language::JavaScript,
        "app.get('/users/:id', getUser);\n",
    );
    let findings = StaticStrategy::new()
        .orphaned_endpoints(&extraction.endpoints, &extraction.functions);

    assert_eq!(findings.len(), 1);
    assert_eq!(findings[0].reason, OrphanReason::HandlerNotFound);
    assert_eq!(findings[0].confidence, 0.9);
}

#[test]
fn test_exported_helper_is_never_flagged() {
    let content = "export function helper() {}\nfunction privateHelper() {}\n";
    let extraction =
        Extractor::new().extract_file(Path::new("util.js"), Language::JavaScript, content);
    let findings = StaticStrategy::new().orphaned_functions(&extraction.functions, &[]);

    assert_eq!(findings.len(), 1);
    match &findings[0].item {
        CodeItem::Function(f) => assert_eq!(f.function_name, "privateHelper"),
        other => panic!("unexpected item {other:?}"),
    }
}

// ============================================================================
// Telemetry mode
// ============================================================================

#[test]
fn test_full_mode_joins_traces() {
    let gateway = ReplayGateway::new(vec![
        trace("GET", "/users"),
        trace("GET", "/users"),
        trace("get", "/users/42?expand=roles"),
        trace("POST", "/orders"),
        trace("GET", "/health"),
    ]);

    let result = detector(0.8).analyze(&fixture_path(), full(&gateway, "7d")).unwrap();

    assert_eq!(gateway.fetches.get(), 1);
    assert_eq!(result.summary.analysis_mode, AnalysisMode::Full);
    assert_eq!(result.active_endpoints.len(), 4);

    let labels: Vec<_> = result.orphaned_endpoints.iter().map(|f| f.item.label()).collect();
    assert_eq!(
        labels,
        vec!["GET /orders/{id}", "DELETE /users/:id", "POST /users"]
    );
    assert!(result
        .orphaned_endpoints
        .iter()
        .all(|f| f.reason == OrphanReason::NoTraces && f.confidence == 0.9));
    assert!(result.orphaned_functions.is_empty());
    assert_eq!(result.summary.orphaned_count, 3);
}

#[test]
fn test_zero_hit_usage_is_reported_with_statistics() {
    let extraction = Extractor::new().extract_file(
        Path::new("server.js"),
        Language::JavaScript,
        "app.get('/users/:id', getUser);\n",
    );
    let usage = vec![TelemetryUsage {
        endpoint: "/users/123".to_string(),
        method: "GET".to_string(),
        hit_count: 0,
        last_accessed: "2024-02-29T08:00:00.000Z".to_string(),
        avg_response_time: 0.0,
    }];

    let findings =
        TelemetryStrategy::new(usage).orphaned_endpoints(&extraction.endpoints, &[]);

    assert_eq!(findings.len(), 1);
    assert_eq!(findings[0].reason, OrphanReason::ZeroHits);
    assert_eq!(findings[0].confidence, 0.8);
    assert_eq!(findings[0].usage_count, Some(0));
    assert_eq!(
        findings[0].last_accessed.as_deref(),
        Some("2024-02-29T08:00:00.000Z")
    );
}

#[test]
fn test_bad_time_range_fails_before_fetching() {
    let gateway = ReplayGateway::new(Vec::new());

    let err = detector(0.8)
        .analyze(&fixture_path(), full(&gateway, "7x"))
        .unwrap_err();

    assert!(matches!(
        err,
        OrphanError::Telemetry(TelemetryError::InvalidTimeRange(_))
    ));
    assert_eq!(gateway.fetches.get(), 0);
}

#[test]
fn test_gateway_failure_aborts_run() {
    let err = detector(0.8)
        .analyze(&fixture_path(), full(&FailingGateway, "1d"))
        .unwrap_err();

    match err {
        OrphanError::Telemetry(TelemetryError::Status { status, .. }) => assert_eq!(status, 403),
        other => panic!("unexpected error {other:?}"),
    }
}

#[test]
fn test_result_serializes_with_expected_shape() {
    let gateway = ReplayGateway::new(vec![trace("GET", "/users/7")]);
    let result = detector(0.8).analyze(&fixture_path(), full(&gateway, "24h")).unwrap();

    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(json["summary"]["analysis_mode"], "full");
    assert_eq!(json["summary"]["confidence_threshold"], 0.8);
    assert_eq!(json["active_endpoints"][0]["endpoint"], "/users/:id");
    assert_eq!(json["active_endpoints"][0]["hitCount"], 1);

    let first = &json["orphaned_endpoints"][0];
    assert_eq!(first["reason"], "no_traces");
    assert_eq!(first["item"]["type"], "endpoint");
    assert!(first.get("usage_count").is_none());
}
