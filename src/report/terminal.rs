use super::{percent, relative_path};
use crate::analysis::{AnalysisResult, OrphanFinding, Severity};
use crate::config::AnalysisMode;
use colored::Colorize;
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Terminal reporter with colored output
pub struct TerminalReporter {
    workspace_root: PathBuf,
}

impl TerminalReporter {
    pub fn new(workspace_root: PathBuf) -> Self {
        Self { workspace_root }
    }

    pub fn report(&self, result: &AnalysisResult) {
        if result.is_clean() {
            println!("{}", "No orphaned code found!".green().bold());
            self.print_summary(result);
            return;
        }

        // Group by file
        let mut by_file: BTreeMap<String, Vec<&OrphanFinding>> = BTreeMap::new();
        for finding in result.findings() {
            by_file
                .entry(relative_path(finding.item.file(), &self.workspace_root))
                .or_default()
                .push(finding);
        }

        println!();
        println!(
            "{}",
            format!("Found {} potentially orphaned items:", result.summary.orphaned_count)
                .yellow()
                .bold()
        );
        println!();

        for (file, findings) in &by_file {
            println!("{}", file.cyan().bold());
            for finding in findings {
                self.print_finding(finding);
            }
            println!();
        }

        self.print_summary(result);
    }

    fn confidence_indicator(&self, finding: &OrphanFinding) -> colored::ColoredString {
        if finding.confidence >= 0.9 {
            "●".red().bold()
        } else if finding.confidence >= 0.8 {
            "◉".yellow()
        } else if finding.confidence >= 0.7 {
            "○".yellow()
        } else {
            "◌".dimmed()
        }
    }

    fn print_finding(&self, finding: &OrphanFinding) {
        let severity_str = match finding.severity() {
            Severity::Warning => "warning".yellow().bold(),
            Severity::Info => "info".blue().bold(),
        };

        println!(
            "  {} {} {} [{}] {} ({})",
            self.confidence_indicator(finding),
            finding.item.start_line().to_string().dimmed(),
            severity_str,
            finding.reason.code().dimmed(),
            finding.message,
            percent(finding.confidence)
        );

        let mut detail = format!(
            "    {} {} '{}'",
            "→".dimmed(),
            finding.item.kind_name().dimmed(),
            finding.item.label().white()
        );
        if let Some(count) = finding.usage_count {
            detail.push_str(&format!(" {}", format!("{} hits", count).dimmed()));
        }
        if let Some(last) = &finding.last_accessed {
            detail.push_str(&format!(" {}", format!("last seen {}", last).dimmed()));
        }
        println!("{}", detail);
    }

    fn print_summary(&self, result: &AnalysisResult) {
        let summary = &result.summary;

        println!("{}", "─".repeat(60).dimmed());
        println!(
            "Scanned {} endpoints and {} functions ({} mode, threshold {})",
            summary.total_endpoints,
            summary.total_functions,
            summary.analysis_mode,
            summary.confidence_threshold
        );
        println!(
            "Orphaned: {} endpoints, {} functions",
            result.orphaned_endpoints.len().to_string().yellow(),
            result.orphaned_functions.len().to_string().yellow()
        );
        if summary.analysis_mode == AnalysisMode::Full {
            println!(
                "Active endpoints in telemetry: {}",
                result.active_endpoints.len().to_string().green()
            );
        } else if !result.is_clean() {
            println!(
                "{}",
                "Tip: Run with --mode full and Datadog credentials for production accuracy"
                    .dimmed()
            );
        }
    }
}
