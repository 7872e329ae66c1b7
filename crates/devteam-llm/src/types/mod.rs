//! Canonical conversation vocabulary
//!
//! Every adapter builds its output from these types and the agent loop drives
//! a conversation using nothing else.

pub mod message;
pub mod request;
pub mod response;

pub use message::{LOCAL_ID_PREFIX, Message, MessageContent, Role, ThinkingBlock, ToolCall, ToolCallResult};
pub use request::{CompletionRequest, ReasoningBudget};
pub use response::{Response, StopReason, Usage};
