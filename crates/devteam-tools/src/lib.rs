//! Tool contract shared by the agent loop and the provider adapters
//!
//! A tool is described by a [`ToolSchema`] that adapters translate into each
//! vendor's function-declaration format, and executed through [`Tool::execute`],
//! which always reports failure in-band via [`ToolResult`].

#![allow(clippy::must_use_candidate, clippy::missing_errors_doc)]

pub mod error;
pub mod registry;
pub mod result;
pub mod schema;

use async_trait::async_trait;
use serde_json::{Map, Value};

pub use error::ToolError;
pub use registry::ToolRegistry;
pub use result::ToolResult;
pub use schema::{ToolParameter, ToolParameterType, ToolSchema};

/// Arguments supplied by the model for a single tool call
pub type ToolArguments = Map<String, Value>;

/// A capability the model can invoke
#[async_trait]
pub trait Tool: Send + Sync {
    /// Declared name, description and parameters
    fn schema(&self) -> &ToolSchema;

    /// Run the tool
    ///
    /// Implementations report failures through [`ToolResult::failure`] instead
    /// of panicking, so the caller can always hand a result back to the model.
    async fn execute(&self, arguments: &ToolArguments) -> ToolResult;
}
