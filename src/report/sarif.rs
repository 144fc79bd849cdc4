use super::relative_path;
use crate::analysis::{AnalysisResult, OrphanReason, Severity};
use miette::{IntoDiagnostic, Result};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// SARIF reporter for code-scanning dashboards
pub struct SarifReporter {
    workspace_root: PathBuf,
}

impl SarifReporter {
    pub fn new(workspace_root: PathBuf) -> Self {
        Self { workspace_root }
    }

    pub fn render(&self, result: &AnalysisResult) -> Result<String> {
        let sarif = SarifReport::from_result(result, &self.workspace_root);
        serde_json::to_string_pretty(&sarif).into_diagnostic()
    }

    pub fn report(&self, result: &AnalysisResult) -> Result<()> {
        println!("{}", self.render(result)?);
        Ok(())
    }
}

/// SARIF 2.1.0 format
#[derive(Serialize)]
struct SarifReport {
    #[serde(rename = "$schema")]
    schema: &'static str,
    version: &'static str,
    runs: Vec<SarifRun>,
}

#[derive(Serialize)]
struct SarifRun {
    tool: SarifTool,
    results: Vec<SarifResult>,
}

#[derive(Serialize)]
struct SarifTool {
    driver: SarifDriver,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SarifDriver {
    name: &'static str,
    version: &'static str,
    rules: Vec<SarifRule>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SarifRule {
    id: &'static str,
    name: &'static str,
    short_description: SarifMessage,
    default_configuration: SarifConfiguration,
}

#[derive(Serialize)]
struct SarifConfiguration {
    level: &'static str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SarifResult {
    rule_id: &'static str,
    level: &'static str,
    message: SarifMessage,
    locations: Vec<SarifLocation>,
    properties: SarifProperties,
}

#[derive(Serialize)]
struct SarifProperties {
    confidence: f64,
}

#[derive(Serialize)]
struct SarifMessage {
    text: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SarifLocation {
    physical_location: SarifPhysicalLocation,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SarifPhysicalLocation {
    artifact_location: SarifArtifactLocation,
    region: SarifRegion,
}

#[derive(Serialize)]
struct SarifArtifactLocation {
    uri: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SarifRegion {
    start_line: usize,
    end_line: usize,
}

fn level(severity: Severity) -> &'static str {
    match severity {
        Severity::Warning => "warning",
        Severity::Info => "note",
    }
}

impl SarifReport {
    fn from_result(result: &AnalysisResult, root: &Path) -> Self {
        let rules = OrphanReason::ALL
            .iter()
            .map(|reason| SarifRule {
                id: reason.code(),
                name: reason.as_str(),
                short_description: SarifMessage {
                    text: reason.default_message().to_string(),
                },
                default_configuration: SarifConfiguration {
                    level: level(reason.default_severity()),
                },
            })
            .collect();

        let results = result
            .findings()
            .map(|finding| SarifResult {
                rule_id: finding.reason.code(),
                level: level(finding.severity()),
                message: SarifMessage {
                    text: format!("{}: {}", finding.item.label(), finding.message),
                },
                locations: vec![SarifLocation {
                    physical_location: SarifPhysicalLocation {
                        artifact_location: SarifArtifactLocation {
                            uri: relative_path(finding.item.file(), root),
                        },
                        region: SarifRegion {
                            start_line: finding.item.start_line(),
                            end_line: finding.item.end_line(),
                        },
                    },
                }],
                properties: SarifProperties {
                    confidence: finding.confidence,
                },
            })
            .collect();

        SarifReport {
            schema: "https://raw.githubusercontent.com/oasis-tcs/sarif-spec/master/Schemata/sarif-schema-2.1.0.json",
            version: "2.1.0",
            runs: vec![SarifRun {
                tool: SarifTool {
                    driver: SarifDriver {
                        name: "orphanscan",
                        version: env!("CARGO_PKG_VERSION"),
                        rules,
                    },
                },
                results,
            }],
        }
    }
}
