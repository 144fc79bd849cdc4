//! orphanscan - Find orphaned HTTP endpoints and unused functions
//!
//! Scans a multi-language repository for route declarations (Express, Flask,
//! Spring) and JavaScript/TypeScript functions, then decides which of them
//! look unused, either by cross-referencing the code against itself or by
//! joining endpoints against production trace telemetry.
//!
//! # Architecture
//!
//! The pipeline consists of:
//! 1. **File Discovery** - Walk the repository, skipping hidden and excluded directories
//! 2. **Extraction** - Match each line against framework idioms
//! 3. **Reconciliation** - Static cross-reference (`pr` mode) or telemetry join (`full` mode)
//! 4. **Classification** - Drop findings below the confidence threshold
//! 5. **Reporting** - Output results in various formats

pub mod analysis;
pub mod config;
pub mod detector;
pub mod discovery;
pub mod error;
pub mod parser;
pub mod report;
pub mod scan;
pub mod telemetry;

pub use analysis::{AnalysisResult, AnalysisSummary, Classifier, OrphanFinding, OrphanReason, Strategy};
pub use config::{AnalysisMode, Config, ConfigError};
pub use detector::{OrphanDetector, RunMode};
pub use discovery::{FileFinder, Language};
pub use error::OrphanError;
pub use parser::{CodeEndpoint, CodeFunction, CodeItem, Extractor};
pub use report::{ReportFormat, Reporter};
pub use scan::{RepositoryScanner, ScanResult};
pub use telemetry::{DatadogClient, TelemetryError, TelemetryUsage, TraceRecord, UsageGateway};
