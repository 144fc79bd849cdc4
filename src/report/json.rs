use crate::analysis::AnalysisResult;
use miette::{IntoDiagnostic, Result};

/// Pretty-printed `AnalysisResult` for programmatic consumers
#[derive(Debug, Default)]
pub struct JsonReporter;

impl JsonReporter {
    pub fn new() -> Self {
        Self
    }

    pub fn render(&self, result: &AnalysisResult) -> Result<String> {
        serde_json::to_string_pretty(result).into_diagnostic()
    }

    pub fn report(&self, result: &AnalysisResult) -> Result<()> {
        println!("{}", self.render(result)?);
        Ok(())
    }
}
