//! Google Gemini `generateContent` provider

use devteam_config::ProviderKind;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use url::Url;

use crate::error::LlmError;
use crate::protocol::google::{GoogleRequest, GoogleResponse};

/// Default Google Generative Language API base URL
const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

#[derive(Debug)]
pub struct GoogleProvider {
    client: Client,
    base_url: Url,
    api_key: SecretString,
}

impl GoogleProvider {
    /// # Panics
    ///
    /// Panics if the hardcoded default base URL is invalid (should never happen).
    pub fn new(api_key: SecretString, base_url: Option<Url>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.unwrap_or_else(|| Url::parse(DEFAULT_BASE_URL).expect("valid default URL")),
            api_key,
        }
    }

    /// The key goes in the query string rather than a header
    pub async fn invoke(&self, model: &str, request: &GoogleRequest) -> Result<GoogleResponse, LlmError> {
        let url = super::endpoint(&self.base_url, &format!("models/{model}:generateContent"));
        let builder = self
            .client
            .post(url)
            .query(&[("key", self.api_key.expose_secret())])
            .json(request);

        super::send_json(ProviderKind::Gemini, builder).await
    }
}
