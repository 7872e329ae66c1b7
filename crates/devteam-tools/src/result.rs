use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Outcome of a single tool execution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolResult {
    /// Whether the tool did what was asked
    pub success: bool,
    /// Payload produced by the tool
    #[serde(default)]
    pub data: Value,
    /// Failure description, set when `success` is false
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Wall-clock execution time
    #[serde(default)]
    pub duration: Duration,
}

impl ToolResult {
    /// Successful result carrying `data`
    pub fn success(data: impl Into<Value>) -> Self {
        Self {
            success: true,
            data: data.into(),
            error: None,
            duration: Duration::ZERO,
        }
    }

    /// Failed result carrying an error message
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: Value::Null,
            error: Some(error.into()),
            duration: Duration::ZERO,
        }
    }

    /// Record how long the execution took
    #[must_use]
    pub const fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// Whether the model should treat this result as an error
    pub const fn is_error(&self) -> bool {
        !self.success || self.error.is_some()
    }

    /// Text handed back to the model
    ///
    /// The error message when the tool failed, otherwise the data: strings
    /// verbatim, anything else as compact JSON.
    pub fn output_text(&self) -> String {
        if let Some(error) = &self.error {
            return error.clone();
        }
        match &self.data {
            Value::String(s) => s.clone(),
            Value::Null if !self.success => "tool failed without an error message".to_owned(),
            other => other.to_string(),
        }
    }
}
