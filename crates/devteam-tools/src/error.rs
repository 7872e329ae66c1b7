use thiserror::Error;

/// Errors raised by tool lookup
///
/// Execution failures never surface here; they are carried by
/// [`crate::ToolResult`] so the model can see them.
#[derive(Debug, Error)]
pub enum ToolError {
    /// No tool is registered under the requested name
    #[error("tool {name} not found")]
    NotFound { name: String },

    /// A tool with the same name was registered twice
    #[error("tool {name} is already registered")]
    Duplicate { name: String },
}
