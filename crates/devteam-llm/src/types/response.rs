use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use super::Message;

/// Why a model call ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum StopReason {
    /// Model finished its turn
    EndTurn,
    /// Output budget exhausted
    MaxTokens,
    /// A stop sequence matched
    StopSequence,
    /// Model asked for a tool
    ToolUse,
    /// Output was blocked or refused
    ContentFilter,
    /// Output was blocked for reproducing source material
    Recitation,
    /// Vendor reported a failed generation
    Error,
    /// Vendor returned no usable completion
    NoCandidates,
    /// Status was absent or not recognised
    #[default]
    Unknown,
}

/// Token counts and the cost they incurred
///
/// Cost is computed when the response arrives so later price changes do not
/// rewrite history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Usage {
    pub model: String,
    pub input_tokens: u32,
    pub output_tokens: u32,
    /// USD, `None` when the model has no pricing entry
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost: Option<f64>,
}

impl Usage {
    pub fn new(model: &str, input_tokens: u32, output_tokens: u32) -> Self {
        Self {
            model: model.to_owned(),
            input_tokens,
            output_tokens,
            cost: crate::registry::calculate_usage_cost(model, input_tokens, output_tokens),
        }
    }
}

/// Canonical result of one model call
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Response {
    /// Messages in the order the vendor emitted them
    pub content: Vec<Message>,
    pub stop_reason: StopReason,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<Usage>,
}

impl Response {
    /// Empty response for a call that produced nothing usable
    pub fn no_candidates(usage: Option<Usage>) -> Self {
        Self {
            content: Vec::new(),
            stop_reason: StopReason::NoCandidates,
            usage,
        }
    }

    pub fn has_tool_use(&self) -> bool {
        self.content.iter().any(|m| m.as_tool_use().is_some())
    }
}
