//! Build agents and their clients from configuration

use std::sync::Arc;

use anyhow::Context as _;
use devteam_config::{AgentKind, Config, ProviderKind};
use devteam_llm::registry;
use devteam_llm::{ClientConfig, LlmClient, RetryPolicy};
use devteam_tools::ToolRegistry;

use crate::agent::Agent;

/// Agent of `kind` wired with the configured primary and fallback clients
pub fn build_agent(config: &Config, kind: AgentKind, tools: ToolRegistry) -> anyhow::Result<Agent> {
    let primary = primary_client(config, kind)?;
    let mut agent = Agent::new(kind, Arc::new(primary))
        .with_tools(tools)
        .with_settings(&config.agents);

    if let Some(fallback) = fallback_client(config, kind)? {
        agent = agent.with_fallback(Arc::new(fallback));
    }

    Ok(agent)
}

/// Client for the configured provider and the model chosen for `kind`
pub fn primary_client(config: &Config, kind: AgentKind) -> anyhow::Result<LlmClient> {
    let model = config.agents.kind(kind).model.as_deref();
    build_client(config, config.agents.provider, model, kind)
        .with_context(|| format!("failed to build {kind} client"))
}

/// Client from `[agents.fallback]`, if configured
pub fn fallback_client(config: &Config, kind: AgentKind) -> anyhow::Result<Option<LlmClient>> {
    let Some(fallback) = &config.agents.fallback else {
        return Ok(None);
    };

    build_client(config, fallback.provider, fallback.model.as_deref(), kind)
        .map(Some)
        .with_context(|| format!("failed to build {kind} fallback client"))
}

/// A model named in the configuration must support reasoning when it is
/// requested. A registry default only gets reasoning when it has it.
fn build_client(
    config: &Config,
    provider: ProviderKind,
    model: Option<&str>,
    kind: AgentKind,
) -> anyhow::Result<LlmClient> {
    let provider_config = config
        .llm
        .providers
        .get(provider)
        .with_context(|| format!("llm.providers.{provider} is not configured"))?;
    let api_key = provider_config
        .api_key
        .clone()
        .with_context(|| format!("llm.providers.{provider}.api_key is not set"))?;

    let (model, reasoning) = match model {
        Some(model) => (model.to_owned(), config.agents.reasoning),
        None => {
            let info = registry::default_model(provider, kind);
            (info.default_model_id().to_owned(), config.agents.reasoning && info.reasoning)
        }
    };

    let client_config = ClientConfig::new(provider, model, api_key)
        .with_reasoning(reasoning)
        .with_base_url(provider_config.base_url.clone())
        .with_retry(RetryPolicy::from_config(&config.llm.retry)?)
        .with_budget_ratio(config.llm.reasoning.budget_ratio);

    Ok(LlmClient::new(client_config)?)
}
