use super::OrphanFinding;
use tracing::debug;

/// Confidence-threshold filter applied after a strategy runs
#[derive(Debug, Clone, Copy)]
pub struct Classifier {
    threshold: f64,
}

impl Classifier {
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }

    /// Keep findings whose confidence is at least the threshold
    pub fn classify(&self, findings: Vec<OrphanFinding>) -> Vec<OrphanFinding> {
        let before = findings.len();
        let kept: Vec<_> = findings
            .into_iter()
            .filter(|f| f.confidence >= self.threshold)
            .collect();
        debug!(
            "Classifier kept {} of {} findings at threshold {}",
            kept.len(),
            before,
            self.threshold
        );
        kept
    }
}
