pub mod definitions;
pub mod handlers;
pub mod schema;
pub mod validate;

pub use definitions::ToolKind;
pub use schema::{ParamSpec, ParamType, ToolDefinition, ToolDescriptor};

use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::cyrest::CytoscapeApi;
use crate::error::{ToolError, ToolOutcome};
use crate::types::ToolCallResult;

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

/// The fixed set of tools, indexed by name. Built once, never modified.
#[derive(Debug, Clone)]
pub struct ToolRegistry {
    descriptors: Vec<ToolDescriptor>,
    index: HashMap<&'static str, (ToolKind, usize)>,
}

impl ToolRegistry {
    pub fn new(ndex_url: &str) -> Self {
        let descriptors: Vec<ToolDescriptor> = ToolKind::ALL
            .iter()
            .map(|kind| kind.descriptor(ndex_url))
            .collect();
        let index = ToolKind::ALL
            .iter()
            .enumerate()
            .map(|(i, kind)| (kind.name(), (*kind, i)))
            .collect();
        Self { descriptors, index }
    }

    /// Descriptors in listing order.
    pub fn descriptors(&self) -> &[ToolDescriptor] {
        &self.descriptors
    }

    pub fn lookup(&self, name: &str) -> ToolOutcome<(ToolKind, &ToolDescriptor)> {
        self.index
            .get(name)
            .map(|(kind, i)| (*kind, &self.descriptors[*i]))
            .ok_or_else(|| ToolError::NotFound(format!("Unknown tool: {}", name)))
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Dispatcher
// ---------------------------------------------------------------------------

/// Validates tool calls and forwards them to Cytoscape. Holds no per-call state.
pub struct Dispatcher {
    registry: ToolRegistry,
    api: Arc<dyn CytoscapeApi>,
}

impl Dispatcher {
    pub fn new(api: Arc<dyn CytoscapeApi>, ndex_url: &str) -> Self {
        Self {
            registry: ToolRegistry::new(ndex_url),
            api,
        }
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    /// Tool definitions exposed to the client.
    pub fn tool_definitions(&self) -> Vec<ToolDefinition> {
        self.registry
            .descriptors()
            .iter()
            .map(ToolDescriptor::definition)
            .collect()
    }

    /// Execute a tool call by name. Never fails: errors become `Error:` results.
    pub async fn call(&self, name: &str, args: &Value) -> ToolCallResult {
        debug!("Tool call: {} {}", name, args);
        match self.try_call(name, args).await {
            Ok(output) => {
                info!("Tool {} succeeded", name);
                ToolCallResult::text(output)
            }
            Err(e) => {
                warn!("Tool {} failed ({}): {}", name, e.kind(), e);
                ToolCallResult::from(e)
            }
        }
    }

    async fn try_call(&self, name: &str, args: &Value) -> ToolOutcome<String> {
        let (kind, descriptor) = self.registry.lookup(name)?;
        let validated = validate::validate(descriptor, args)?;
        handlers::run(kind, self.api.as_ref(), validated).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_lists_every_tool_in_order() {
        let registry = ToolRegistry::new("http://ndexbio.org");
        assert_eq!(registry.len(), ToolKind::ALL.len());
        assert_eq!(registry.descriptors()[0].name, "ping");
        let (kind, descriptor) = registry.lookup("export_image").unwrap();
        assert_eq!(kind, ToolKind::ExportImage);
        assert_eq!(descriptor.name, "export_image");
    }

    #[test]
    fn unknown_tool_is_not_found() {
        let registry = ToolRegistry::new("http://ndexbio.org");
        let err = registry.lookup("string_protein_query").unwrap_err();
        assert_eq!(err, ToolError::NotFound("Unknown tool: string_protein_query".into()));
    }
}
