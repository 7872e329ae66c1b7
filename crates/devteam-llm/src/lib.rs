//! Vendor-neutral LLM client for the devteam agents
//!
//! Canonical messages are translated to and from the Anthropic Messages,
//! `OpenAI` Responses and Gemini `generateContent` wire formats. Only the
//! canonical vocabulary in [`types`] crosses the [`LlmClient`] boundary.

#![allow(clippy::must_use_candidate, clippy::missing_errors_doc)]

pub mod client;
pub mod convert;
pub mod error;
pub mod protocol;
pub mod provider;
pub mod registry;
pub mod retry;
pub mod types;

pub use client::{ClientConfig, CompletionClient, LlmClient};
pub use devteam_config::{AgentKind, ProviderKind};
pub use error::LlmError;
pub use retry::RetryPolicy;
pub use types::{
    CompletionRequest, Message, MessageContent, Response, Role, StopReason, ThinkingBlock, ToolCall, ToolCallResult,
    Usage,
};
