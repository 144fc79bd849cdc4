use super::{OrphanFinding, OrphanReason, Strategy};
use crate::parser::{CodeEndpoint, CodeFunction, CodeItem};
use std::collections::{HashMap, HashSet};

/// Cross-references endpoints and functions found in the same scan
///
/// Needs no external data. An endpoint whose handler is declared nowhere, or
/// whose every same-named declaration is unreferenced, is flagged; so is a
/// private function that serves no endpoint and is referenced at most once.
#[derive(Debug, Default, Clone, Copy)]
pub struct StaticStrategy;

impl StaticStrategy {
    pub fn new() -> Self {
        Self
    }
}

impl Strategy for StaticStrategy {
    fn name(&self) -> &'static str {
        "static"
    }

    fn orphaned_endpoints(
        &self,
        endpoints: &[CodeEndpoint],
        functions: &[CodeFunction],
    ) -> Vec<OrphanFinding> {
        // name -> whether any declaration with that name is referenced
        let mut referenced: HashMap<&str, bool> = HashMap::new();
        for function in functions {
            let entry = referenced.entry(function.function_name.as_str()).or_insert(false);
            *entry |= !function.references.is_empty();
        }

        endpoints
            .iter()
            .filter_map(|endpoint| {
                let handler = endpoint.handler_name.as_deref()?;
                let reason = match referenced.get(handler) {
                    None => OrphanReason::HandlerNotFound,
                    Some(false) => OrphanReason::HandlerUnreferenced,
                    Some(true) => return None,
                };
                Some(OrphanFinding::new(CodeItem::Endpoint(endpoint.clone()), reason))
            })
            .collect()
    }

    fn orphaned_functions(
        &self,
        functions: &[CodeFunction],
        endpoints: &[CodeEndpoint],
    ) -> Vec<OrphanFinding> {
        let handlers: HashSet<&str> = endpoints
            .iter()
            .filter_map(|e| e.handler_name.as_deref())
            .collect();

        functions
            .iter()
            .filter(|f| {
                !f.is_exported
                    && !handlers.contains(f.function_name.as_str())
                    && f.references.len() <= 1
            })
            .map(|f| OrphanFinding::new(CodeItem::Function(f.clone()), OrphanReason::MinimalReferences))
            .collect()
    }
}
