use super::{relative_path, MarkdownReporter};
use crate::analysis::{AnalysisResult, OrphanFinding};
use crate::config::ReportConfig;
use miette::{IntoDiagnostic, Result, WrapErr};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

/// GitHub Actions workflow-command output
///
/// High-confidence findings become `::warning` annotations on their source
/// lines. When step-output or step-summary files are configured, the result
/// is also appended there.
pub struct GithubReporter {
    workspace_root: PathBuf,
    limits: ReportConfig,
    step_output: Option<PathBuf>,
    step_summary: Option<PathBuf>,
}

impl GithubReporter {
    pub fn new(workspace_root: PathBuf, limits: ReportConfig) -> Self {
        Self {
            workspace_root,
            limits,
            step_output: None,
            step_summary: None,
        }
    }

    /// Files named by `GITHUB_OUTPUT` and `GITHUB_STEP_SUMMARY`
    pub fn with_step_files(mut self, output: Option<PathBuf>, summary: Option<PathBuf>) -> Self {
        self.step_output = output;
        self.step_summary = summary;
        self
    }

    pub fn report(&self, result: &AnalysisResult) -> Result<()> {
        for line in self.annotations(result) {
            println!("{}", line);
        }

        if let Some(path) = &self.step_output {
            let outputs = StepOutputs::from_result(result)?;
            append(path, &outputs.render())?;
        }
        if let Some(path) = &self.step_summary {
            let markdown = MarkdownReporter::new(self.limits.clone()).render(result);
            append(path, &markdown)?;
        }

        Ok(())
    }

    /// Workflow commands for the run, in emission order
    pub fn annotations(&self, result: &AnalysisResult) -> Vec<String> {
        let high: Vec<&OrphanFinding> = result
            .findings()
            .filter(|f| f.confidence >= self.limits.annotation_confidence)
            .collect();

        if high.is_empty() {
            return Vec::new();
        }

        let mut lines = vec![format!(
            "::warning::Found {} high-confidence orphaned code items",
            high.len()
        )];
        lines.extend(
            high.iter()
                .take(self.limits.max_annotations)
                .map(|finding| self.annotation(finding)),
        );
        lines
    }

    fn annotation(&self, finding: &OrphanFinding) -> String {
        let file = relative_path(finding.item.file(), &self.workspace_root);
        format!(
            "::warning file={},line={},endLine={},title={}::{}",
            escape_property(&file),
            finding.item.start_line(),
            finding.item.end_line(),
            escape_property(&format!("Potentially orphaned {}", finding.item.kind_name())),
            escape_data(&finding.message)
        )
    }
}

/// Step outputs mirroring the result, one `key=value` per line
pub struct StepOutputs {
    entries: Vec<(&'static str, String)>,
}

impl StepOutputs {
    pub fn from_result(result: &AnalysisResult) -> Result<Self> {
        let entries = vec![
            (
                "orphaned-endpoints",
                serde_json::to_string(&result.orphaned_endpoints).into_diagnostic()?,
            ),
            (
                "orphaned-functions",
                serde_json::to_string(&result.orphaned_functions).into_diagnostic()?,
            ),
            ("orphaned-count", result.summary.orphaned_count.to_string()),
            ("active-endpoints", result.active_endpoints.len().to_string()),
            (
                "analysis-summary",
                serde_json::to_string(&result.summary).into_diagnostic()?,
            ),
        ];
        Ok(Self { entries })
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn render(&self) -> String {
        self.entries
            .iter()
            .map(|(key, value)| format!("{}={}\n", key, value))
            .collect()
    }
}

fn append(path: &Path, text: &str) -> Result<()> {
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .into_diagnostic()
        .wrap_err_with(|| format!("Failed to open {}", path.display()))?;
    file.write_all(text.as_bytes()).into_diagnostic()
}

fn escape_data(value: &str) -> String {
    value
        .replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

fn escape_property(value: &str) -> String {
    escape_data(value).replace(':', "%3A").replace(',', "%2C")
}
