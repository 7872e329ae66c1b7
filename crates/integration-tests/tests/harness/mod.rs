#![allow(dead_code)]

pub mod mock_vendor;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use devteam_config::ProviderKind;
use devteam_llm::{ClientConfig, LlmClient, RetryPolicy};
use devteam_tools::{Tool, ToolArguments, ToolParameter, ToolParameterType, ToolRegistry, ToolResult, ToolSchema};
use secrecy::SecretString;
use url::Url;

/// Client pointed at a mock, retrying quickly
pub fn client(provider: ProviderKind, model: &str, base_url: Url, max_attempts: u32) -> LlmClient {
    let config = ClientConfig::new(provider, model, SecretString::from(format!("{provider}-test-key")))
        .with_base_url(Some(base_url))
        .with_retry(RetryPolicy::new(max_attempts, Duration::from_millis(10)));
    LlmClient::new(config).unwrap()
}

/// Echoes its `text` argument back
pub struct EchoTool {
    schema: ToolSchema,
}

impl EchoTool {
    pub fn new() -> Self {
        Self {
            schema: ToolSchema::new("echo", "Echo the given text").with_parameter(ToolParameter::new(
                "text",
                "Text to echo",
                ToolParameterType::String,
            )),
        }
    }

    pub fn registry() -> ToolRegistry {
        ToolRegistry::new().with_tool(Arc::new(Self::new())).unwrap()
    }
}

#[async_trait]
impl Tool for EchoTool {
    fn schema(&self) -> &ToolSchema {
        &self.schema
    }

    async fn execute(&self, arguments: &ToolArguments) -> ToolResult {
        match arguments.get("text").and_then(|v| v.as_str()) {
            Some(text) => ToolResult::success(format!("echo: {text}")),
            None => ToolResult::failure("missing text"),
        }
    }
}
