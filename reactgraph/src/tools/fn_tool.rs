//! Closure-backed tool, for tools that need no state of their own.

use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use futures::future::BoxFuture;

use crate::message::ToolArguments;
use crate::tools::{Tool, ToolError, ToolSpec};

type ToolFn = Arc<dyn Fn(ToolArguments) -> BoxFuture<'static, Result<String, ToolError>> + Send + Sync>;

/// Tool whose behavior is an async closure.
///
/// ```
/// use reactgraph::tools::{FnTool, ToolSpec};
/// use serde_json::json;
///
/// let search = FnTool::new(
///     ToolSpec::new(
///         "search",
///         "Search the web.",
///         json!({"type": "object", "properties": {"query": {"type": "string"}}, "required": ["query"]}),
///     ),
///     |_args| async { Ok("It's currently sunny and 75°F.".to_string()) },
/// );
/// ```
#[derive(Clone)]
pub struct FnTool {
    spec: ToolSpec,
    f: ToolFn,
}

impl FnTool {
    pub fn new<F, Fut>(spec: ToolSpec, f: F) -> Self
    where
        F: Fn(ToolArguments) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<String, ToolError>> + Send + 'static,
    {
        Self {
            spec,
            f: Arc::new(move |args| Box::pin(f(args))),
        }
    }
}

impl std::fmt::Debug for FnTool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnTool").field("spec", &self.spec).finish()
    }
}

#[async_trait]
impl Tool for FnTool {
    fn name(&self) -> &str {
        &self.spec.name
    }

    fn spec(&self) -> ToolSpec {
        self.spec.clone()
    }

    async fn call(&self, args: ToolArguments) -> Result<String, ToolError> {
        (self.f)(args).await
    }
}
