//! Anthropic Messages API provider

use devteam_config::ProviderKind;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use url::Url;

use crate::convert::anthropic::build_request;
use crate::error::LlmError;
use crate::protocol::anthropic::{AnthropicRequest, AnthropicResponse};
use crate::types::{CompletionRequest, ReasoningBudget};

/// Default Anthropic API base URL
const DEFAULT_BASE_URL: &str = "https://api.anthropic.com/v1";

/// Anthropic API version header value
const ANTHROPIC_VERSION: &str = "2023-06-01";

#[derive(Debug)]
pub struct AnthropicProvider {
    client: Client,
    base_url: Url,
    api_key: SecretString,
    reasoning: Option<ReasoningBudget>,
}

impl AnthropicProvider {
    /// # Panics
    ///
    /// Panics if the hardcoded default base URL is invalid (should never happen).
    pub fn new(api_key: SecretString, base_url: Option<Url>, reasoning: Option<ReasoningBudget>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.unwrap_or_else(|| Url::parse(DEFAULT_BASE_URL).expect("valid default URL")),
            api_key,
            reasoning,
        }
    }

    pub fn build_request(&self, model: &str, request: &CompletionRequest<'_>) -> AnthropicRequest {
        build_request(model, request, self.reasoning)
    }

    pub async fn invoke(&self, request: &AnthropicRequest) -> Result<AnthropicResponse, LlmError> {
        let builder = self
            .client
            .post(super::endpoint(&self.base_url, "messages"))
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("x-api-key", self.api_key.expose_secret())
            .json(request);

        super::send_json(ProviderKind::Anthropic, builder).await
    }
}
