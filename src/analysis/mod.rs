//! Reconciliation of extracted code against usage evidence
//!
//! A [`Strategy`] turns the scanned endpoints and functions into candidate
//! [`OrphanFinding`]s; the [`Classifier`] then drops anything below the run's
//! confidence threshold.

mod classifier;
pub mod routes;
mod static_strategy;
mod telemetry_strategy;

pub use classifier::Classifier;
pub use static_strategy::StaticStrategy;
pub use telemetry_strategy::TelemetryStrategy;

use crate::config::AnalysisMode;
use crate::parser::{CodeEndpoint, CodeFunction, CodeItem};
use crate::telemetry::TelemetryUsage;
use serde::{Deserialize, Serialize};

/// A way of deciding which endpoints and functions look orphaned
pub trait Strategy {
    fn name(&self) -> &'static str;

    fn orphaned_endpoints(
        &self,
        endpoints: &[CodeEndpoint],
        functions: &[CodeFunction],
    ) -> Vec<OrphanFinding>;

    fn orphaned_functions(
        &self,
        functions: &[CodeFunction],
        endpoints: &[CodeEndpoint],
    ) -> Vec<OrphanFinding>;
}

/// Classification rule that produced a finding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrphanReason {
    /// Endpoint names a handler that is declared nowhere
    HandlerNotFound,

    /// Endpoint handler is declared but never referenced
    HandlerUnreferenced,

    /// Private function that is barely referenced and serves no endpoint
    MinimalReferences,

    /// No trace matched the endpoint in the queried window
    NoTraces,

    /// A trace group matched but recorded no hits
    ZeroHits,
}

impl OrphanReason {
    pub const ALL: [OrphanReason; 5] = [
        OrphanReason::HandlerNotFound,
        OrphanReason::HandlerUnreferenced,
        OrphanReason::MinimalReferences,
        OrphanReason::NoTraces,
        OrphanReason::ZeroHits,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            OrphanReason::HandlerNotFound => "OC001",
            OrphanReason::HandlerUnreferenced => "OC002",
            OrphanReason::MinimalReferences => "OC003",
            OrphanReason::NoTraces => "OC004",
            OrphanReason::ZeroHits => "OC005",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OrphanReason::HandlerNotFound => "handler_not_found",
            OrphanReason::HandlerUnreferenced => "handler_unreferenced",
            OrphanReason::MinimalReferences => "minimal_references",
            OrphanReason::NoTraces => "no_traces",
            OrphanReason::ZeroHits => "zero_hits",
        }
    }

    /// Fixed confidence of the rule
    pub fn confidence(&self) -> f64 {
        match self {
            OrphanReason::HandlerNotFound => 0.9,
            OrphanReason::HandlerUnreferenced => 0.7,
            OrphanReason::MinimalReferences => 0.6,
            OrphanReason::NoTraces => 0.9,
            OrphanReason::ZeroHits => 0.8,
        }
    }

    pub fn default_message(&self) -> &'static str {
        match self {
            OrphanReason::HandlerNotFound => "Handler function not found in codebase",
            OrphanReason::HandlerUnreferenced => "Handler function has no references",
            OrphanReason::MinimalReferences => {
                "Function is not exported and has minimal references"
            }
            OrphanReason::NoTraces => "No APM traces found for this endpoint",
            OrphanReason::ZeroHits => "Endpoint exists in APM but has zero hits",
        }
    }

    pub fn default_severity(&self) -> Severity {
        match self {
            OrphanReason::HandlerNotFound => Severity::Warning,
            OrphanReason::HandlerUnreferenced => Severity::Info,
            OrphanReason::MinimalReferences => Severity::Info,
            OrphanReason::NoTraces => Severity::Warning,
            OrphanReason::ZeroHits => Severity::Warning,
        }
    }
}

impl std::fmt::Display for OrphanReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Severity levels for orphan findings
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Warning => "warning",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A code item that looks unused, and why
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrphanFinding {
    pub item: CodeItem,
    pub reason: OrphanReason,
    pub message: String,
    pub confidence: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_accessed: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage_count: Option<u64>,
}

impl OrphanFinding {
    pub fn new(item: CodeItem, reason: OrphanReason) -> Self {
        Self {
            item,
            reason,
            message: reason.default_message().to_string(),
            confidence: reason.confidence(),
            last_accessed: None,
            usage_count: None,
        }
    }

    /// Attach the matching telemetry group's statistics
    pub fn with_usage(mut self, usage: &TelemetryUsage) -> Self {
        self.last_accessed = Some(usage.last_accessed.clone());
        self.usage_count = Some(usage.hit_count);
        self
    }

    pub fn severity(&self) -> Severity {
        self.reason.default_severity()
    }
}

/// Totals for one run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisSummary {
    pub total_endpoints: usize,
    pub total_functions: usize,
    pub orphaned_count: usize,
    pub confidence_threshold: f64,
    pub analysis_mode: AnalysisMode,
}

/// Final output of a detection run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub orphaned_endpoints: Vec<OrphanFinding>,
    pub orphaned_functions: Vec<OrphanFinding>,
    /// Aggregated telemetry; empty in static mode
    pub active_endpoints: Vec<TelemetryUsage>,
    pub summary: AnalysisSummary,
}

impl AnalysisResult {
    /// All findings, endpoints first
    pub fn findings(&self) -> impl Iterator<Item = &OrphanFinding> {
        self.orphaned_endpoints
            .iter()
            .chain(self.orphaned_functions.iter())
    }

    pub fn is_clean(&self) -> bool {
        self.summary.orphaned_count == 0
    }
}
