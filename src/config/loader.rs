use crate::telemetry::{InvalidTimeRange, TimeRange};
use miette::{IntoDiagnostic, Result, WrapErr};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default Datadog site
pub const DEFAULT_SITE: &str = "datadoghq.com";

/// Default telemetry window
pub const DEFAULT_TIME_RANGE: &str = "7d";

/// Default confidence threshold
pub const DEFAULT_CONFIDENCE_THRESHOLD: f64 = 0.8;

/// Configuration problems that abort a run before scanning
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Confidence threshold must be between 0 and 1, got {0}")]
    ThresholdOutOfRange(f64),
    #[error("Full mode requires telemetry settings that are missing: {}", .0.join(", "))]
    MissingTelemetry(Vec<&'static str>),
    #[error(transparent)]
    InvalidTimeRange(#[from] InvalidTimeRange),
}

/// How a run decides what is orphaned
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisMode {
    /// Reconcile endpoints against production usage telemetry
    Full,
    /// Static cross-reference only
    #[default]
    Pr,
}

impl AnalysisMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnalysisMode::Full => "full",
            AnalysisMode::Pr => "pr",
        }
    }
}

impl std::fmt::Display for AnalysisMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Configuration for an orphan detection run
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Analysis mode
    pub mode: AnalysisMode,

    /// Directory names never descended into
    pub exclude: Vec<String>,

    /// Findings below this confidence are dropped
    pub confidence_threshold: f64,

    /// Where to write the full JSON result
    pub output: Option<PathBuf>,

    /// Honour .gitignore files while walking
    pub respect_gitignore: bool,

    /// Usage telemetry settings (full mode)
    pub telemetry: TelemetryConfig,

    /// Report rendering limits
    pub report: ReportConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TelemetryConfig {
    /// Datadog API key
    pub api_key: Option<String>,

    /// Datadog application key
    pub app_key: Option<String>,

    /// Datadog site, e.g. `datadoghq.eu`
    pub site: String,

    /// Service whose traces are queried
    pub service_name: Option<String>,

    /// Window expression such as `7d` or `12h`
    pub time_range: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Rows per table in the markdown summary
    pub max_table_rows: usize,

    /// Source annotations emitted at most
    pub max_annotations: usize,

    /// Minimum confidence for a finding to be annotated
    pub annotation_confidence: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            mode: AnalysisMode::default(),
            exclude: vec![],
            confidence_threshold: DEFAULT_CONFIDENCE_THRESHOLD,
            output: None,
            respect_gitignore: false,
            telemetry: TelemetryConfig::default(),
            report: ReportConfig::default(),
        }
    }
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            app_key: None,
            site: DEFAULT_SITE.to_string(),
            service_name: None,
            time_range: DEFAULT_TIME_RANGE.to_string(),
        }
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            max_table_rows: 10,
            max_annotations: 10,
            annotation_confidence: 0.9,
        }
    }
}

impl Config {
    /// Load configuration from a file (YAML or TOML)
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .into_diagnostic()
            .wrap_err_with(|| format!("Failed to read config file: {}", path.display()))?;

        let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("");

        match extension {
            "yml" | "yaml" => serde_yaml::from_str(&contents)
                .into_diagnostic()
                .wrap_err("Failed to parse YAML config"),
            "toml" => toml::from_str(&contents)
                .into_diagnostic()
                .wrap_err("Failed to parse TOML config"),
            _ => {
                // Try YAML first, then TOML
                if let Ok(config) = serde_yaml::from_str(&contents) {
                    Ok(config)
                } else {
                    toml::from_str(&contents)
                        .into_diagnostic()
                        .wrap_err("Failed to parse config file")
                }
            }
        }
    }

    /// Try to load configuration from default locations
    pub fn from_default_locations(project_root: &Path) -> Result<Self> {
        let default_names = [".orphanscan.yml", ".orphanscan.yaml", ".orphanscan.toml"];

        for name in &default_names {
            let path = project_root.join(name);
            if path.exists() {
                return Self::from_file(&path);
            }
        }

        Ok(Self::default())
    }

    /// Split a comma-separated exclusion list, dropping blanks
    pub fn parse_exclude_list(list: &str) -> Vec<String> {
        list.split(',')
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(str::to_string)
            .collect()
    }

    pub fn validate_threshold(&self) -> std::result::Result<(), ConfigError> {
        if (0.0..=1.0).contains(&self.confidence_threshold) {
            Ok(())
        } else {
            Err(ConfigError::ThresholdOutOfRange(self.confidence_threshold))
        }
    }

    /// Check everything that must hold before scanning starts
    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        self.validate_threshold()?;

        if self.mode == AnalysisMode::Full {
            let telemetry = &self.telemetry;
            let mut missing = Vec::new();
            if is_blank(&telemetry.api_key) {
                missing.push("api key");
            }
            if is_blank(&telemetry.app_key) {
                missing.push("application key");
            }
            if is_blank(&telemetry.service_name) {
                missing.push("service name");
            }
            if !missing.is_empty() {
                return Err(ConfigError::MissingTelemetry(missing));
            }

            telemetry.time_range.parse::<TimeRange>()?;
        }

        Ok(())
    }
}

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().map(str::trim).unwrap_or("").is_empty()
}
