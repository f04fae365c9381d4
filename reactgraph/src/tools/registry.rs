use std::collections::BTreeMap;
use std::sync::Arc;

use crate::tools::r#trait::Tool;
use crate::tools::ToolSpec;

/// Collection of tools keyed by name.
///
/// Names are unique: registering a tool under a name already present replaces the
/// earlier tool. Listing is ordered by name so the model sees a stable tool set.
///
/// # Examples
///
/// ```
/// use reactgraph::tools::{FnTool, ToolRegistry, ToolSpec};
/// use serde_json::json;
///
/// let mut registry = ToolRegistry::new();
/// registry.register(FnTool::new(
///     ToolSpec::new("get_time", "Current time", json!({"type": "object"})),
///     |_| async { Ok("12:00".to_string()) },
/// ));
/// assert_eq!(registry.list().len(), 1);
/// ```
///
/// # Interaction
///
/// - **ToolExecutor**: looks calls up with `get`
/// - **AgentNode**: sends `list()` to the model as the available tools
#[derive(Default, Clone)]
pub struct ToolRegistry {
    tools: BTreeMap<String, Arc<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a tool, replacing any tool with the same name.
    pub fn register(&mut self, tool: impl Tool + 'static) -> &mut Self {
        self.register_arc(Arc::new(tool))
    }

    /// Registers an already shared tool.
    pub fn register_arc(&mut self, tool: Arc<dyn Tool>) -> &mut Self {
        let name = tool.name().to_string();
        if self.tools.insert(name.clone(), tool).is_some() {
            tracing::debug!(tool = %name, "replaced registered tool");
        }
        self
    }

    /// Builder form of [`register`](Self::register).
    pub fn with_tool(mut self, tool: impl Tool + 'static) -> Self {
        self.register(tool);
        self
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    /// Specs of all registered tools, ordered by name.
    pub fn list(&self) -> Vec<ToolSpec> {
        self.tools.values().map(|tool| tool.spec()).collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}
