use super::routes::canonical_route;
use super::{OrphanFinding, OrphanReason, Strategy};
use crate::parser::{CodeEndpoint, CodeFunction, CodeItem};
use crate::telemetry::TelemetryUsage;
use std::collections::HashMap;

/// Joins endpoints against aggregated production usage
///
/// An endpoint matches a usage group when the verbs are identical and both
/// routes canonicalize to the same path. Functions are never classified.
#[derive(Debug, Clone)]
pub struct TelemetryStrategy {
    usage: Vec<TelemetryUsage>,
}

impl TelemetryStrategy {
    pub fn new(usage: Vec<TelemetryUsage>) -> Self {
        Self { usage }
    }

    pub fn into_usage(self) -> Vec<TelemetryUsage> {
        self.usage
    }

    fn index(&self) -> HashMap<(&str, String), &TelemetryUsage> {
        let mut index = HashMap::new();
        for usage in &self.usage {
            // First group wins when two collapse onto the same canonical route
            index
                .entry((usage.method.as_str(), canonical_route(&usage.endpoint)))
                .or_insert(usage);
        }
        index
    }
}

impl Strategy for TelemetryStrategy {
    fn name(&self) -> &'static str {
        "telemetry"
    }

    fn orphaned_endpoints(
        &self,
        endpoints: &[CodeEndpoint],
        _functions: &[CodeFunction],
    ) -> Vec<OrphanFinding> {
        let index = self.index();

        endpoints
            .iter()
            .filter_map(|endpoint| {
                let key: (&str, String) =
                    (endpoint.method.as_str(), canonical_route(&endpoint.route));
                let item = CodeItem::Endpoint(endpoint.clone());
                match index.get(&key) {
                    None => Some(OrphanFinding::new(item, OrphanReason::NoTraces)),
                    Some(usage) if usage.hit_count == 0 => {
                        Some(OrphanFinding::new(item, OrphanReason::ZeroHits).with_usage(usage))
                    }
                    Some(_) => None,
                }
            })
            .collect()
    }

    fn orphaned_functions(
        &self,
        _functions: &[CodeFunction],
        _endpoints: &[CodeEndpoint],
    ) -> Vec<OrphanFinding> {
        Vec::new()
    }
}
