//! `OpenAI` Responses API wire format types

use serde::{Deserialize, Serialize};
use serde_json::Value;

// -- Request types --

/// `OpenAI` `/responses` request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAiRequest {
    /// Model identifier
    pub model: String,
    /// Ordered conversation items
    pub input: Vec<OpenAiInputItem>,
    /// System prompt
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,
    /// Maximum output tokens, reasoning included
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_output_tokens: Option<u32>,
    /// Sampling temperature; reasoning models reject it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    /// Function tools
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tools: Option<Vec<OpenAiTool>>,
    /// Whether the model may emit several calls per turn
    pub parallel_tool_calls: bool,
    /// Server-side conversation storage
    pub store: bool,
    /// Reasoning configuration
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reasoning: Option<OpenAiReasoning>,
    /// Extra output fields to return
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include: Option<Vec<String>>,
}

/// Item of the `input` list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OpenAiInputItem {
    /// Plain message
    Message { role: String, content: String },
    /// Reasoning item returned by a previous turn
    Reasoning {
        id: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        encrypted_content: Option<String>,
        #[serde(default)]
        summary: Vec<OpenAiSummary>,
    },
    /// Function call made by the model
    FunctionCall {
        call_id: String,
        name: String,
        /// JSON-encoded argument object
        arguments: String,
    },
    /// Output of a function call
    FunctionCallOutput { call_id: String, output: String },
}

/// Reasoning summary entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OpenAiSummary {
    SummaryText { text: String },
}

/// Function tool definition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAiTool {
    /// Always "function"
    #[serde(rename = "type")]
    pub tool_type: String,
    /// Function name
    pub name: String,
    /// Human-readable description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// JSON Schema for the parameters
    pub parameters: Value,
    /// Enforce the schema exactly; requires every property to be required
    pub strict: bool,
}

/// Reasoning configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAiReasoning {
    /// "low", "medium" or "high"
    pub effort: String,
    /// Summary verbosity
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
}

// -- Response types --

/// `OpenAI` `/responses` response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAiResponse {
    /// Response identifier
    pub id: String,
    /// "completed", "incomplete", "failed", ...
    #[serde(default)]
    pub status: Option<String>,
    /// Output items in emission order
    #[serde(default)]
    pub output: Vec<OpenAiOutputItem>,
    /// Why the response is incomplete
    #[serde(default)]
    pub incomplete_details: Option<OpenAiIncompleteDetails>,
    /// Token usage
    #[serde(default)]
    pub usage: Option<OpenAiUsage>,
}

/// Output item
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OpenAiOutputItem {
    /// Reasoning trace
    Reasoning {
        id: String,
        #[serde(default)]
        summary: Vec<OpenAiSummary>,
        #[serde(default)]
        encrypted_content: Option<String>,
    },
    /// Assistant message
    Message {
        #[serde(default)]
        content: Vec<OpenAiOutputContent>,
    },
    /// Function call
    FunctionCall {
        #[serde(default)]
        id: Option<String>,
        #[serde(default)]
        call_id: Option<String>,
        name: String,
        #[serde(default)]
        arguments: String,
    },
    /// Built-in tool calls and other item types
    #[serde(other)]
    Unsupported,
}

/// Content of an output message
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OpenAiOutputContent {
    OutputText {
        text: String,
    },
    Refusal {
        refusal: String,
    },
    #[serde(other)]
    Unsupported,
}

/// Reason attached to an incomplete response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAiIncompleteDetails {
    /// "max_output_tokens" or "content_filter"
    #[serde(default)]
    pub reason: Option<String>,
}

/// Token usage
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAiUsage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}
