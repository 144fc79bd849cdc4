use crate::analysis::{
    AnalysisResult, AnalysisSummary, Classifier, OrphanFinding, StaticStrategy, Strategy,
    TelemetryStrategy,
};
use crate::config::{AnalysisMode, Config};
use crate::error::OrphanError;
use crate::scan::{RepositoryScanner, ScanResult};
use crate::telemetry::{DatadogClient, TelemetryError, TimeRange, UsageGateway};
use indicatif::ProgressBar;
use std::path::Path;
use tracing::info;

/// How usage evidence is obtained for one run
#[derive(Clone, Copy)]
pub enum RunMode<'a> {
    /// Cross-reference the scanned code against itself
    Pr,
    /// Join endpoints against telemetry from `gateway`
    Full {
        gateway: &'a dyn UsageGateway,
        service_name: &'a str,
        time_range: &'a str,
    },
}

impl RunMode<'_> {
    pub fn analysis_mode(&self) -> AnalysisMode {
        match self {
            RunMode::Pr => AnalysisMode::Pr,
            RunMode::Full { .. } => AnalysisMode::Full,
        }
    }
}

/// Scan, reconcile and classify a repository
pub struct OrphanDetector {
    config: Config,
    progress: Option<ProgressBar>,
}

impl OrphanDetector {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            progress: None,
        }
    }

    pub fn with_progress(mut self, progress: ProgressBar) -> Self {
        self.progress = Some(progress);
        self
    }

    /// Validate the configuration and run in the mode it selects
    ///
    /// Full mode talks to Datadog using the configured credentials.
    pub fn run(&self, root: &Path) -> Result<AnalysisResult, OrphanError> {
        self.config.validate()?;

        match self.config.mode {
            AnalysisMode::Pr => self.analyze(root, RunMode::Pr),
            AnalysisMode::Full => {
                let telemetry = &self.config.telemetry;
                let client = DatadogClient::from_config(telemetry)?;
                let service_name = telemetry
                    .service_name
                    .as_deref()
                    .ok_or(TelemetryError::MissingCredentials("service name"))?;

                self.analyze(
                    root,
                    RunMode::Full {
                        gateway: &client,
                        service_name,
                        time_range: &telemetry.time_range,
                    },
                )
            }
        }
    }

    /// Run the pipeline against `root` with an explicit mode
    ///
    /// Any error aborts the run; no partial result is returned.
    pub fn analyze(&self, root: &Path, mode: RunMode<'_>) -> Result<AnalysisResult, OrphanError> {
        self.config.validate_threshold()?;

        if !root.is_dir() {
            return Err(OrphanError::MissingRoot(root.to_path_buf()));
        }

        if let RunMode::Full { time_range, .. } = mode {
            time_range
                .parse::<TimeRange>()
                .map_err(TelemetryError::from)?;
        }

        info!("Scanning {} ({} mode)...", root.display(), mode.analysis_mode());
        let mut scanner = RepositoryScanner::new(&self.config);
        if let Some(pb) = &self.progress {
            scanner = scanner.with_progress(pb.clone());
        }
        let scan = scanner.scan(root);

        let (endpoint_candidates, function_candidates, active_endpoints) = match mode {
            RunMode::Pr => {
                let (endpoints, functions) = reconcile(&StaticStrategy::new(), &scan);
                (endpoints, functions, Vec::new())
            }
            RunMode::Full {
                gateway,
                service_name,
                time_range,
            } => {
                info!("Fetching usage telemetry for '{}' over {}...", service_name, time_range);
                let usage = gateway.endpoint_usage(service_name, time_range)?;
                info!("Telemetry reports {} active routes", usage.len());
                let strategy = TelemetryStrategy::new(usage);
                let (endpoints, functions) = reconcile(&strategy, &scan);
                (endpoints, functions, strategy.into_usage())
            }
        };

        let classifier = Classifier::new(self.config.confidence_threshold);
        let orphaned_endpoints = classifier.classify(endpoint_candidates);
        let orphaned_functions = classifier.classify(function_candidates);

        let summary = AnalysisSummary {
            total_endpoints: scan.endpoints.len(),
            total_functions: scan.functions.len(),
            orphaned_count: orphaned_endpoints.len() + orphaned_functions.len(),
            confidence_threshold: self.config.confidence_threshold,
            analysis_mode: mode.analysis_mode(),
        };

        info!(
            "Found {} orphaned endpoints and {} orphaned functions",
            orphaned_endpoints.len(),
            orphaned_functions.len()
        );

        Ok(AnalysisResult {
            orphaned_endpoints,
            orphaned_functions,
            active_endpoints,
            summary,
        })
    }
}

fn reconcile(
    strategy: &dyn Strategy,
    scan: &ScanResult,
) -> (Vec<OrphanFinding>, Vec<OrphanFinding>) {
    info!("Reconciling with {} strategy...", strategy.name());
    (
        strategy.orphaned_endpoints(&scan.endpoints, &scan.functions),
        strategy.orphaned_functions(&scan.functions, &scan.endpoints),
    )
}
