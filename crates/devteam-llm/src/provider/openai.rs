//! `OpenAI` Responses API provider

use devteam_config::ProviderKind;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use url::Url;

use crate::convert::openai::build_request;
use crate::error::LlmError;
use crate::protocol::openai::{OpenAiRequest, OpenAiResponse};
use crate::types::CompletionRequest;

/// Default `OpenAI` API base URL
const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

#[derive(Debug)]
pub struct OpenAiProvider {
    client: Client,
    base_url: Url,
    api_key: SecretString,
    reasoning: bool,
}

impl OpenAiProvider {
    /// # Panics
    ///
    /// Panics if the hardcoded default base URL is invalid (should never happen).
    pub fn new(api_key: SecretString, base_url: Option<Url>, reasoning: bool) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.unwrap_or_else(|| Url::parse(DEFAULT_BASE_URL).expect("valid default URL")),
            api_key,
            reasoning,
        }
    }

    pub fn build_request(&self, model: &str, request: &CompletionRequest<'_>) -> OpenAiRequest {
        build_request(model, request, self.reasoning)
    }

    pub async fn invoke(&self, request: &OpenAiRequest) -> Result<OpenAiResponse, LlmError> {
        let builder = self
            .client
            .post(super::endpoint(&self.base_url, "responses"))
            .bearer_auth(self.api_key.expose_secret())
            .json(request);

        super::send_json(ProviderKind::Openai, builder).await
    }
}
