//! Unified client over the provider adapters

use async_trait::async_trait;
use devteam_config::ProviderKind;
use secrecy::SecretString;
use url::Url;

use crate::error::LlmError;
use crate::provider::Adapter;
use crate::registry;
use crate::retry::RetryPolicy;
use crate::types::{CompletionRequest, ReasoningBudget, Response};

/// Makes one model call over a transcript
///
/// The agent loop only depends on this trait, so tests can script
/// responses without a network.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn complete(&self, request: CompletionRequest<'_>) -> Result<Response, LlmError>;
}

/// Settings for one [`LlmClient`]
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub provider: ProviderKind,
    /// Model name or dated snapshot id
    pub model: String,
    pub api_key: SecretString,
    /// Enable the reasoning channel
    pub reasoning: bool,
    /// Override of the vendor endpoint
    pub base_url: Option<Url>,
    pub retry: RetryPolicy,
    /// Share of `max_tokens` reserved for reasoning
    pub budget_ratio: f64,
}

impl ClientConfig {
    pub fn new(provider: ProviderKind, model: impl Into<String>, api_key: SecretString) -> Self {
        Self {
            provider,
            model: model.into(),
            api_key,
            reasoning: false,
            base_url: None,
            retry: RetryPolicy::default(),
            budget_ratio: ReasoningBudget::default().ratio(),
        }
    }

    #[must_use]
    pub const fn with_reasoning(mut self, reasoning: bool) -> Self {
        self.reasoning = reasoning;
        self
    }

    #[must_use]
    pub fn with_base_url(mut self, base_url: Option<Url>) -> Self {
        self.base_url = base_url;
        self
    }

    #[must_use]
    pub const fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    #[must_use]
    pub const fn with_budget_ratio(mut self, budget_ratio: f64) -> Self {
        self.budget_ratio = budget_ratio;
        self
    }
}

/// Client bound to one provider and model
#[derive(Debug)]
pub struct LlmClient {
    adapter: Adapter,
    model: String,
    retry: RetryPolicy,
}

impl LlmClient {
    /// Validate the model against the registry and select the adapter
    ///
    /// Fails when the model is unknown, belongs to another provider, or
    /// reasoning is requested for a model that has no reasoning channel.
    pub fn new(config: ClientConfig) -> Result<Self, LlmError> {
        if !registry::validate(config.provider, &config.model) {
            return Err(LlmError::InvalidModel {
                provider: config.provider,
                model: config.model,
            });
        }

        if config.reasoning && !registry::is_reasoning(&config.model) {
            return Err(LlmError::ReasoningUnsupported { model: config.model });
        }

        let reasoning = config.reasoning.then(|| ReasoningBudget::new(config.budget_ratio));

        tracing::debug!(
            provider = %config.provider,
            model = %config.model,
            reasoning = config.reasoning,
            "llm client ready"
        );

        Ok(Self {
            adapter: Adapter::new(config.provider, config.api_key, config.base_url, reasoning),
            model: config.model,
            retry: config.retry,
        })
    }

    pub const fn provider(&self) -> ProviderKind {
        self.adapter.provider()
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl CompletionClient for LlmClient {
    /// Only the network call is retried; the request is built once and the
    /// response converted once.
    async fn complete(&self, request: CompletionRequest<'_>) -> Result<Response, LlmError> {
        let provider = self.provider();
        let wire = self.adapter.build_request(&self.model, &request);

        let adapter = &self.adapter;
        let wire = &wire;
        let raw = self
            .retry
            .run(provider, &self.model, move |attempt| {
                tracing::debug!(%provider, attempt, "sending model request");
                adapter.invoke(wire)
            })
            .await?;

        let response = Adapter::convert_response(raw, &self.model);

        if let Some(usage) = &response.usage {
            tracing::debug!(
                %provider,
                model = %self.model,
                input_tokens = usage.input_tokens,
                output_tokens = usage.output_tokens,
                cost = usage.cost,
                stop_reason = %response.stop_reason,
                "model call completed"
            );
        }

        Ok(response)
    }
}
