//! Provider adapters for the supported LLM vendors
//!
//! The vendor set is closed, so adapters are variants of [`Adapter`] chosen
//! once from the [`ProviderKind`] when a client is built. Each call goes
//! through three steps: build the wire request, [`Adapter::invoke`] it (the
//! only step touching the network), then convert the raw response.

pub mod anthropic;
pub mod google;
pub mod openai;

use devteam_config::ProviderKind;
use reqwest::{RequestBuilder, StatusCode};
use secrecy::SecretString;
use serde::de::DeserializeOwned;
use url::Url;

use self::anthropic::AnthropicProvider;
use self::google::GoogleProvider;
use self::openai::OpenAiProvider;
use crate::error::LlmError;
use crate::protocol::anthropic::{AnthropicRequest, AnthropicResponse};
use crate::protocol::google::{GoogleRequest, GoogleResponse};
use crate::protocol::openai::{OpenAiRequest, OpenAiResponse};
use crate::types::{CompletionRequest, ReasoningBudget, Response};

/// Adapter for one vendor
#[derive(Debug)]
pub enum Adapter {
    Anthropic(AnthropicProvider),
    Openai(OpenAiProvider),
    Gemini(GoogleProvider),
}

/// Vendor request body ready to send
#[derive(Debug, Clone)]
pub enum WireRequest {
    Anthropic(AnthropicRequest),
    Openai(OpenAiRequest),
    /// Gemini names the model in the URL rather than the body
    Gemini { model: String, body: GoogleRequest },
}

/// Decoded vendor response body
#[derive(Debug, Clone)]
pub enum RawResponse {
    Anthropic(AnthropicResponse),
    Openai(OpenAiResponse),
    Gemini(GoogleResponse),
}

impl Adapter {
    /// Select the adapter for `provider`
    ///
    /// `reasoning` is the share of the output budget reserved for thinking,
    /// `None` when reasoning is off.
    pub fn new(
        provider: ProviderKind,
        api_key: SecretString,
        base_url: Option<Url>,
        reasoning: Option<ReasoningBudget>,
    ) -> Self {
        match provider {
            ProviderKind::Anthropic => Self::Anthropic(AnthropicProvider::new(api_key, base_url, reasoning)),
            ProviderKind::Openai => Self::Openai(OpenAiProvider::new(api_key, base_url, reasoning.is_some())),
            ProviderKind::Gemini => Self::Gemini(GoogleProvider::new(api_key, base_url)),
        }
    }

    pub const fn provider(&self) -> ProviderKind {
        match self {
            Self::Anthropic(_) => ProviderKind::Anthropic,
            Self::Openai(_) => ProviderKind::Openai,
            Self::Gemini(_) => ProviderKind::Gemini,
        }
    }

    /// Translate a canonical request into the vendor body
    pub fn build_request(&self, model: &str, request: &CompletionRequest<'_>) -> WireRequest {
        match self {
            Self::Anthropic(p) => WireRequest::Anthropic(p.build_request(model, request)),
            Self::Openai(p) => WireRequest::Openai(p.build_request(model, request)),
            Self::Gemini(_) => WireRequest::Gemini {
                model: model.to_owned(),
                body: crate::convert::google::build_request(request),
            },
        }
    }

    /// Send a request built by [`Self::build_request`]
    pub async fn invoke(&self, request: &WireRequest) -> Result<RawResponse, LlmError> {
        match (self, request) {
            (Self::Anthropic(p), WireRequest::Anthropic(body)) => p.invoke(body).await.map(RawResponse::Anthropic),
            (Self::Openai(p), WireRequest::Openai(body)) => p.invoke(body).await.map(RawResponse::Openai),
            (Self::Gemini(p), WireRequest::Gemini { model, body }) => {
                p.invoke(model, body).await.map(RawResponse::Gemini)
            }
            _ => Err(LlmError::Internal(anyhow::anyhow!(
                "request was built for another provider than {}",
                self.provider()
            ))),
        }
    }

    /// Translate a raw vendor response into the canonical response
    pub fn convert_response(response: RawResponse, model: &str) -> Response {
        match response {
            RawResponse::Anthropic(r) => crate::convert::anthropic::convert_response(r, model),
            RawResponse::Openai(r) => crate::convert::openai::convert_response(r, model),
            RawResponse::Gemini(r) => crate::convert::google::convert_response(r, model),
        }
    }
}

/// Endpoint URL below a base that may or may not end in a slash
pub(crate) fn endpoint(base_url: &Url, path: &str) -> String {
    let base = base_url.as_str().trim_end_matches('/');
    format!("{base}/{path}")
}

/// Send a JSON request and decode the JSON response
///
/// Transport failures, timeouts, rate limits and server errors are reported
/// as [`LlmError::Upstream`]; every other non-success status is
/// [`LlmError::Rejected`].
pub(crate) async fn send_json<T: DeserializeOwned>(
    provider: ProviderKind,
    builder: RequestBuilder,
) -> Result<T, LlmError> {
    let response = builder.send().await.map_err(|e| {
        tracing::error!(%provider, error = %e, "upstream request failed");
        LlmError::Upstream(e.to_string())
    })?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        tracing::warn!(%provider, status = %status, "upstream returned error");

        if is_transient(status) {
            return Err(LlmError::Upstream(format!("provider returned {status}: {body}")));
        }
        return Err(LlmError::Rejected {
            status: status.as_u16(),
            body,
        });
    }

    let body = response.text().await.map_err(|e| {
        tracing::error!(%provider, error = %e, "failed to read upstream body");
        LlmError::Upstream(e.to_string())
    })?;

    serde_json::from_str(&body).map_err(|e| {
        tracing::warn!(%provider, error = %e, "failed to parse upstream body");
        LlmError::Decode(e.to_string())
    })
}

fn is_transient(status: StatusCode) -> bool {
    status == StatusCode::REQUEST_TIMEOUT || status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
}
