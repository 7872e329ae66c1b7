use devteam_llm::LlmError;
use devteam_tools::ToolError;
use thiserror::Error;

/// Errors that end an agent invocation
#[derive(Debug, Error)]
pub enum AgentError {
    /// The model asked for a tool this agent does not have
    #[error("tool not found: {name}")]
    ToolNotFound { name: String },

    /// Primary and fallback clients both failed
    #[error(transparent)]
    Llm(#[from] LlmError),

    #[error(transparent)]
    Tool(ToolError),
}

impl From<ToolError> for AgentError {
    fn from(err: ToolError) -> Self {
        match err {
            ToolError::NotFound { name } => Self::ToolNotFound { name },
            other => Self::Tool(other),
        }
    }
}
