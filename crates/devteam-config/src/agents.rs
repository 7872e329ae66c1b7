use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use crate::ProviderKind;

/// Persona an agent plays inside the team
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum AgentKind {
    Manager,
    Architect,
    Developer,
    Qa,
}

/// Agent loop settings shared by every agent kind
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AgentsConfig {
    /// Vendor used by the primary client
    #[serde(default)]
    pub provider: ProviderKind,
    /// Request reasoning from the model
    #[serde(default)]
    pub reasoning: bool,
    /// Upper bound on model calls per invocation
    #[serde(default = "default_max_turns")]
    pub max_turns: u32,
    /// Output token budget per call
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    /// Sampling temperature, in [0, 2]
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    /// Secondary client used once the primary gives up
    #[serde(default)]
    pub fallback: Option<FallbackConfig>,
    #[serde(default)]
    pub manager: AgentOverride,
    #[serde(default)]
    pub architect: AgentOverride,
    #[serde(default)]
    pub developer: AgentOverride,
    #[serde(default)]
    pub qa: AgentOverride,
}

impl AgentsConfig {
    /// Per-kind overrides
    pub const fn kind(&self, kind: AgentKind) -> &AgentOverride {
        match kind {
            AgentKind::Manager => &self.manager,
            AgentKind::Architect => &self.architect,
            AgentKind::Developer => &self.developer,
            AgentKind::Qa => &self.qa,
        }
    }
}

impl Default for AgentsConfig {
    fn default() -> Self {
        Self {
            provider: ProviderKind::default(),
            reasoning: false,
            max_turns: default_max_turns(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
            fallback: None,
            manager: AgentOverride::default(),
            architect: AgentOverride::default(),
            developer: AgentOverride::default(),
            qa: AgentOverride::default(),
        }
    }
}

/// Fallback client settings
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FallbackConfig {
    pub provider: ProviderKind,
    /// Model id; the provider's default for the agent kind when absent
    #[serde(default)]
    pub model: Option<String>,
}

/// Settings for one agent kind
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AgentOverride {
    /// Model id; the provider's default for the agent kind when absent
    #[serde(default)]
    pub model: Option<String>,
}

const fn default_max_turns() -> u32 {
    10
}

const fn default_max_tokens() -> u32 {
    32_768
}

const fn default_temperature() -> f32 {
    0.7
}
