//! Configuration for the devteam agent
//!
//! Loaded from a TOML file whose raw text may reference environment
//! variables with `{{ env.VAR }}` placeholders.

#![allow(clippy::must_use_candidate)]

pub mod agents;
mod env;
pub mod llm;
mod loader;
pub mod telemetry;

use serde::Deserialize;

pub use agents::*;
pub use llm::*;
pub use telemetry::{LogFormat, TelemetryConfig};

/// Top-level devteam configuration
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Provider credentials, retry and reasoning settings
    #[serde(default)]
    pub llm: LlmConfig,
    /// Agent loop settings
    #[serde(default)]
    pub agents: AgentsConfig,
    /// Logging configuration
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}
