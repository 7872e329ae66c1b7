use devteam_config::{AgentKind, ProviderKind};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use strum::Display;

/// Prefix of tool-use ids generated locally when a vendor omits one
pub const LOCAL_ID_PREFIX: &str = "local_";

/// Conversation role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// Opaque reasoning trace attached to the content block it preceded
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThinkingBlock {
    /// Vendor that produced the trace; only that vendor can resume it
    pub provider: ProviderKind,
    /// Readable summary of the reasoning
    #[serde(default)]
    pub thinking: String,
    /// Continuation token: Anthropic signature or `OpenAI` reasoning item id
    #[serde(default)]
    pub metadata: String,
    /// Encrypted reasoning state, when the vendor returns one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encrypted_content: Option<String>,
}

impl ThinkingBlock {
    pub fn new(provider: ProviderKind, thinking: impl Into<String>, metadata: impl Into<String>) -> Self {
        Self {
            provider,
            thinking: thinking.into(),
            metadata: metadata.into(),
            encrypted_content: None,
        }
    }

    /// Reasoning the vendor withheld, carried only as an encrypted blob
    pub fn redacted(provider: ProviderKind, data: impl Into<String>) -> Self {
        Self {
            provider,
            thinking: String::new(),
            metadata: String::new(),
            encrypted_content: Some(data.into()),
        }
    }

    #[must_use]
    pub fn with_encrypted_content(mut self, encrypted: Option<String>) -> Self {
        self.encrypted_content = encrypted;
        self
    }

    pub fn is_redacted(&self) -> bool {
        self.thinking.is_empty() && self.metadata.is_empty() && self.encrypted_content.is_some()
    }
}

/// A tool invocation requested by the model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    pub tool_name: String,
    /// Correlation id echoed by the matching [`ToolCallResult`]
    pub tool_use_id: String,
    #[serde(default)]
    pub arguments: Map<String, Value>,
}

impl ToolCall {
    pub fn new(tool_name: impl Into<String>, tool_use_id: impl Into<String>, arguments: Map<String, Value>) -> Self {
        Self {
            tool_name: tool_name.into(),
            tool_use_id: tool_use_id.into(),
            arguments,
        }
    }

    /// Whether the id was generated locally instead of issued by the vendor
    pub fn has_local_id(&self) -> bool {
        self.tool_use_id.starts_with(LOCAL_ID_PREFIX)
    }
}

/// Result of executing a [`ToolCall`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolCallResult {
    pub tool_name: String,
    pub tool_use_id: String,
    /// Tool output, or the error text when `error` is set
    pub result: String,
    #[serde(default)]
    pub error: bool,
}

impl ToolCallResult {
    pub fn has_local_id(&self) -> bool {
        self.tool_use_id.starts_with(LOCAL_ID_PREFIX)
    }
}

/// Payload of a [`Message`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MessageContent {
    Text {
        text: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        thinking: Option<ThinkingBlock>,
    },
    ToolUse {
        call: ToolCall,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        thinking: Option<ThinkingBlock>,
    },
    ToolUseResult {
        call_result: ToolCallResult,
    },
}

/// One unit of conversation content
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    /// Agent that produced or received the message
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent: Option<AgentKind>,
    #[serde(flatten)]
    pub content: MessageContent,
}

impl Message {
    pub fn user_text(text: impl Into<String>) -> Self {
        Self::text(Role::User, text)
    }

    pub fn assistant_text(text: impl Into<String>) -> Self {
        Self::text(Role::Assistant, text)
    }

    pub fn text(role: Role, text: impl Into<String>) -> Self {
        Self {
            role,
            agent: None,
            content: MessageContent::Text {
                text: text.into(),
                thinking: None,
            },
        }
    }

    pub fn tool_use(call: ToolCall) -> Self {
        Self {
            role: Role::Assistant,
            agent: None,
            content: MessageContent::ToolUse { call, thinking: None },
        }
    }

    pub fn tool_result(call_result: ToolCallResult) -> Self {
        Self {
            role: Role::User,
            agent: None,
            content: MessageContent::ToolUseResult { call_result },
        }
    }

    #[must_use]
    pub const fn with_agent(mut self, agent: AgentKind) -> Self {
        self.agent = Some(agent);
        self
    }

    /// Attach a reasoning trace; ignored for tool results
    #[must_use]
    pub fn with_thinking(mut self, block: Option<ThinkingBlock>) -> Self {
        match &mut self.content {
            MessageContent::Text { thinking, .. } | MessageContent::ToolUse { thinking, .. } => *thinking = block,
            MessageContent::ToolUseResult { .. } => {}
        }
        self
    }

    pub const fn thinking(&self) -> Option<&ThinkingBlock> {
        match &self.content {
            MessageContent::Text { thinking, .. } | MessageContent::ToolUse { thinking, .. } => thinking.as_ref(),
            MessageContent::ToolUseResult { .. } => None,
        }
    }

    pub const fn as_tool_use(&self) -> Option<&ToolCall> {
        match &self.content {
            MessageContent::ToolUse { call, .. } => Some(call),
            _ => None,
        }
    }

    pub const fn as_tool_result(&self) -> Option<&ToolCallResult> {
        match &self.content {
            MessageContent::ToolUseResult { call_result } => Some(call_result),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match &self.content {
            MessageContent::Text { text, .. } => Some(text),
            _ => None,
        }
    }
}
