use std::sync::Arc;
use std::time::Instant;

use indexmap::IndexMap;

use crate::{Tool, ToolArguments, ToolError, ToolResult, ToolSchema};

/// Named set of tools available to one agent
///
/// Iteration follows registration order so the tool list sent to the model
/// is stable between turns.
#[derive(Clone, Default)]
pub struct ToolRegistry {
    tools: IndexMap<String, Arc<dyn Tool>>,
}

impl ToolRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a tool under its schema name
    pub fn register(&mut self, tool: Arc<dyn Tool>) -> Result<(), ToolError> {
        let name = tool.schema().name.clone();
        if self.tools.contains_key(&name) {
            return Err(ToolError::Duplicate { name });
        }
        self.tools.insert(name, tool);
        Ok(())
    }

    /// Builder form of [`Self::register`]
    pub fn with_tool(mut self, tool: Arc<dyn Tool>) -> Result<Self, ToolError> {
        self.register(tool)?;
        Ok(self)
    }

    /// Look up a tool by name
    pub fn get(&self, name: &str) -> Option<&Arc<dyn Tool>> {
        self.tools.get(name)
    }

    /// Schemas of every registered tool, in registration order
    pub fn schemas(&self) -> Vec<ToolSchema> {
        self.tools.values().map(|t| t.schema().clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Resolve `name` and run it
    ///
    /// An unknown name is the only error; execution failures come back as a
    /// failed [`ToolResult`]. The measured wall-clock time overrides whatever
    /// duration the tool reported.
    pub async fn execute(&self, name: &str, arguments: &ToolArguments) -> Result<ToolResult, ToolError> {
        let tool = self.get(name).ok_or_else(|| ToolError::NotFound { name: name.to_owned() })?;

        let started = Instant::now();
        let result = tool.execute(arguments).await;
        let elapsed = started.elapsed();

        if result.is_error() {
            tracing::warn!(
                tool = name,
                elapsed_ms = elapsed.as_millis(),
                error = result.error.as_deref().unwrap_or_default(),
                "tool reported failure"
            );
        } else {
            tracing::debug!(tool = name, elapsed_ms = elapsed.as_millis(), "tool completed");
        }

        Ok(result.with_duration(elapsed))
    }
}

impl std::fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolRegistry")
            .field("tools", &self.tools.keys().collect::<Vec<_>>())
            .finish()
    }
}
