use devteam_config::ProviderKind;
use thiserror::Error;

/// Errors that can occur during LLM operations
#[derive(Debug, Error)]
pub enum LlmError {
    /// Model is unknown or belongs to another provider
    #[error("invalid {provider} model {model}")]
    InvalidModel { provider: ProviderKind, model: String },

    /// Reasoning was requested for a model without a reasoning channel
    #[error("model {model} does not support reasoning")]
    ReasoningUnsupported { model: String },

    /// Transport failure, rate limit or server-side error
    #[error("upstream error: {0}")]
    Upstream(String),

    /// Vendor refused the request as malformed or unauthorized
    #[error("request rejected with status {status}: {body}")]
    Rejected { status: u16, body: String },

    /// Vendor body could not be parsed
    #[error("failed to decode response: {0}")]
    Decode(String),

    /// Unexpected internal error
    #[error("internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl LlmError {
    /// Whether repeating the same request may succeed
    ///
    /// Configuration errors and rejected requests fail the same way every
    /// time; transport errors and truncated bodies usually do not.
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Upstream(_) | Self::Decode(_))
    }
}
