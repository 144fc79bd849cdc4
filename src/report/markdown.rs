use super::{file_name, percent};
use crate::analysis::{AnalysisResult, OrphanFinding};
use crate::config::{AnalysisMode, ReportConfig};
use crate::parser::CodeItem;

const RECOMMENDATIONS: [&str; 4] = [
    "Review high-confidence orphaned items for potential removal",
    "Consider adding tests or documentation for low-usage endpoints",
    "Use Datadog integration (full mode) for production accuracy",
    "Set up regular orphaned code detection in CI/CD pipeline",
];

/// Markdown run summary, suitable for a CI job summary page
pub struct MarkdownReporter {
    limits: ReportConfig,
}

impl MarkdownReporter {
    pub fn new(limits: ReportConfig) -> Self {
        Self { limits }
    }

    pub fn report(&self, result: &AnalysisResult) {
        print!("{}", self.render(result));
    }

    pub fn render(&self, result: &AnalysisResult) -> String {
        let mut out = String::new();
        let summary = &result.summary;
        let full = summary.analysis_mode == AnalysisMode::Full;

        out.push_str("## 🔍 Orphaned Code Detection Results\n\n");
        out.push_str("| Metric | Count |\n| --- | --- |\n");
        out.push_str(&format!("| Total Endpoints | {} |\n", summary.total_endpoints));
        out.push_str(&format!("| Total Functions | {} |\n", summary.total_functions));
        out.push_str(&format!(
            "| Orphaned Endpoints | {} |\n",
            result.orphaned_endpoints.len()
        ));
        out.push_str(&format!(
            "| Orphaned Functions | {} |\n",
            result.orphaned_functions.len()
        ));
        out.push_str(&format!("| **Total Orphaned** | **{}** |\n", summary.orphaned_count));
        if full {
            out.push_str(&format!(
                "| Active Endpoints (Datadog) | {} |\n",
                result.active_endpoints.len()
            ));
        }

        let mode = if full { "Full (with Datadog)" } else { "PR Changes Only" };
        out.push_str(&format!("\n**Analysis Mode:** {}  \n", mode));
        out.push_str(&format!(
            "**Confidence Threshold:** {}\n",
            summary.confidence_threshold
        ));

        if !result.orphaned_endpoints.is_empty() {
            out.push_str("\n### 🚫 Orphaned Endpoints\n\n");
            out.push_str("| File | Endpoint | Reason | Confidence | Usage |\n");
            out.push_str("| --- | --- | --- | --- | --- |\n");
            for finding in result.orphaned_endpoints.iter().take(self.limits.max_table_rows) {
                let usage = finding
                    .usage_count
                    .map(|c| c.to_string())
                    .unwrap_or_else(|| "N/A".to_string());
                out.push_str(&format!(
                    "| {} | {} | {} | {} | {} |\n",
                    cell(&file_name(finding.item.file())),
                    cell(&endpoint_label(finding)),
                    cell(&finding.message),
                    percent(finding.confidence),
                    usage
                ));
            }
            self.overflow_note(&mut out, result.orphaned_endpoints.len(), "endpoints");
        }

        if !result.orphaned_functions.is_empty() {
            out.push_str("\n### 🗑️ Orphaned Functions\n\n");
            out.push_str("| File | Function | Reason | Confidence |\n");
            out.push_str("| --- | --- | --- | --- |\n");
            for finding in result.orphaned_functions.iter().take(self.limits.max_table_rows) {
                out.push_str(&format!(
                    "| {} | {} | {} | {} |\n",
                    cell(&file_name(finding.item.file())),
                    cell(&finding.item.label()),
                    cell(&finding.message),
                    percent(finding.confidence)
                ));
            }
            self.overflow_note(&mut out, result.orphaned_functions.len(), "functions");
        }

        if result.is_clean() {
            out.push_str("\n✅ **No orphaned code detected!** Your codebase looks clean.\n");
        } else {
            out.push_str("\n### 💡 Recommendations\n\n");
            for recommendation in RECOMMENDATIONS {
                out.push_str(&format!("- {}\n", recommendation));
            }
        }

        out
    }

    fn overflow_note(&self, out: &mut String, total: usize, kind: &str) {
        if total > self.limits.max_table_rows {
            out.push_str(&format!(
                "\n*Showing first {} of {} orphaned {}*\n",
                self.limits.max_table_rows, total, kind
            ));
        }
    }
}

fn endpoint_label(finding: &OrphanFinding) -> String {
    match &finding.item {
        CodeItem::Endpoint(_) => finding.item.label(),
        CodeItem::Function(_) => String::new(),
    }
}

/// Escape a value for use inside a table cell
fn cell(text: &str) -> String {
    text.replace('|', "\\|").replace('\n', " ")
}
