mod github;
mod json;
mod markdown;
mod sarif;
mod terminal;

pub use github::{GithubReporter, StepOutputs};
pub use json::JsonReporter;
pub use markdown::MarkdownReporter;
pub use sarif::SarifReporter;
pub use terminal::TerminalReporter;

use crate::analysis::AnalysisResult;
use crate::config::ReportConfig;
use miette::{IntoDiagnostic, Result, WrapErr};
use std::path::{Path, PathBuf};

/// Output format for reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportFormat {
    #[default]
    Terminal,
    Json,
    Markdown,
    Github,
    Sarif,
}

/// Renders an analysis result to stdout in the chosen format
pub struct Reporter {
    format: ReportFormat,
    workspace_root: PathBuf,
    limits: ReportConfig,
    step_output: Option<PathBuf>,
    step_summary: Option<PathBuf>,
}

impl Reporter {
    pub fn new(format: ReportFormat, workspace_root: PathBuf, limits: ReportConfig) -> Self {
        Self {
            format,
            workspace_root,
            limits,
            step_output: None,
            step_summary: None,
        }
    }

    /// Step-output and step-summary files for the `github` format
    pub fn with_step_files(mut self, output: Option<PathBuf>, summary: Option<PathBuf>) -> Self {
        self.step_output = output;
        self.step_summary = summary;
        self
    }

    pub fn report(&self, result: &AnalysisResult) -> Result<()> {
        match self.format {
            ReportFormat::Terminal => {
                TerminalReporter::new(self.workspace_root.clone()).report(result);
                Ok(())
            }
            ReportFormat::Json => JsonReporter::new().report(result),
            ReportFormat::Markdown => {
                MarkdownReporter::new(self.limits.clone()).report(result);
                Ok(())
            }
            ReportFormat::Github => GithubReporter::new(self.workspace_root.clone(), self.limits.clone())
                .with_step_files(self.step_output.clone(), self.step_summary.clone())
                .report(result),
            ReportFormat::Sarif => SarifReporter::new(self.workspace_root.clone()).report(result),
        }
    }
}

/// Write the full result as pretty JSON to `path`
pub fn write_result_file(path: &Path, result: &AnalysisResult) -> Result<()> {
    let json = JsonReporter::new().render(result)?;
    std::fs::write(path, json)
        .into_diagnostic()
        .wrap_err_with(|| format!("Failed to write results to {}", path.display()))
}

/// `path` relative to `root`, or unchanged when it lies elsewhere
pub(crate) fn relative_path(path: &Path, root: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .to_string_lossy()
        .replace('\\', "/")
}

pub(crate) fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.to_string_lossy().to_string())
}

pub(crate) fn percent(confidence: f64) -> String {
    format!("{:.0}%", confidence * 100.0)
}
