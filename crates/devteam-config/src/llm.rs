use std::time::Duration;

use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use url::Url;

/// Supported LLM vendors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ProviderKind {
    /// Anthropic Messages API
    #[default]
    Anthropic,
    /// `OpenAI` Responses API
    Openai,
    /// Google Gemini `generateContent` API
    Gemini,
}

/// Top-level LLM configuration
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LlmConfig {
    /// Per-vendor credentials
    #[serde(default)]
    pub providers: ProvidersConfig,
    /// Backoff applied around each network call
    #[serde(default)]
    pub retry: RetryConfig,
    /// Reasoning budget settings
    #[serde(default)]
    pub reasoning: ReasoningConfig,
}

/// Credentials for each vendor, all optional
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProvidersConfig {
    #[serde(default)]
    pub anthropic: Option<LlmProviderConfig>,
    #[serde(default)]
    pub openai: Option<LlmProviderConfig>,
    #[serde(default)]
    pub gemini: Option<LlmProviderConfig>,
}

impl ProvidersConfig {
    /// Settings for one vendor, if configured
    pub const fn get(&self, kind: ProviderKind) -> Option<&LlmProviderConfig> {
        match kind {
            ProviderKind::Anthropic => self.anthropic.as_ref(),
            ProviderKind::Openai => self.openai.as_ref(),
            ProviderKind::Gemini => self.gemini.as_ref(),
        }
    }
}

/// Configuration for a single LLM vendor
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LlmProviderConfig {
    /// API key for authentication
    #[serde(default)]
    pub api_key: Option<SecretString>,
    /// Base URL override
    #[serde(default)]
    pub base_url: Option<Url>,
}

/// Bounded exponential backoff settings
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RetryConfig {
    /// Total attempts including the first one
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    /// Delay before the second attempt (e.g. "500ms", "1s"); doubles after each retry
    #[serde(default = "default_initial_delay")]
    pub initial_delay: String,
}

impl RetryConfig {
    /// Parsed initial delay
    pub fn initial_delay(&self) -> anyhow::Result<Duration> {
        duration_str::parse(&self.initial_delay)
            .map_err(|e| anyhow::anyhow!("invalid llm.retry.initial_delay '{}': {e}", self.initial_delay))
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            initial_delay: default_initial_delay(),
        }
    }
}

const fn default_max_attempts() -> u32 {
    5
}

fn default_initial_delay() -> String {
    "1s".to_string()
}

/// Share of the output budget reserved for reasoning
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReasoningConfig {
    /// Fraction of `max_tokens` handed to the reasoning channel, in (0, 1)
    #[serde(default = "default_budget_ratio")]
    pub budget_ratio: f64,
}

impl Default for ReasoningConfig {
    fn default() -> Self {
        Self {
            budget_ratio: default_budget_ratio(),
        }
    }
}

const fn default_budget_ratio() -> f64 {
    0.5
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retry_defaults() {
        let retry = RetryConfig::default();
        assert_eq!(retry.max_attempts, 5);
        assert_eq!(retry.initial_delay().unwrap(), Duration::from_secs(1));
    }

    #[test]
    fn retry_delay_units() {
        let retry: RetryConfig = toml::from_str("initial_delay = \"250ms\"").unwrap();
        assert_eq!(retry.initial_delay().unwrap(), Duration::from_millis(250));
    }

    #[test]
    fn retry_delay_garbage() {
        let retry: RetryConfig = toml::from_str("initial_delay = \"soon\"").unwrap();
        assert!(retry.initial_delay().is_err());
    }

    #[test]
    fn provider_kind_names() {
        assert_eq!(ProviderKind::Openai.to_string(), "openai");
        assert_eq!("gemini".parse::<ProviderKind>().unwrap(), ProviderKind::Gemini);
    }
}
