//! Static model capability registry
//!
//! Maps model names and their release snapshots to provider, pricing,
//! context window and reasoning support. The table is fixed at compile time
//! and never mutated.

use devteam_config::{AgentKind, ProviderKind};

/// Price per million tokens (USD)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModelPricing {
    pub input_per_mtok: f64,
    pub output_per_mtok: f64,
}

/// Capability profile of a model
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModelInfo {
    /// Alias that tracks the latest snapshot
    pub name: &'static str,
    pub provider: ProviderKind,
    /// Dated release identifiers, newest first
    pub snapshots: &'static [&'static str],
    pub pricing: ModelPricing,
    /// Context window in tokens
    pub context_window: u32,
    /// Whether the model exposes a reasoning channel
    pub reasoning: bool,
}

impl ModelInfo {
    /// Identifier to send when the caller did not pin one
    pub fn default_model_id(&self) -> &'static str {
        self.snapshots.first().copied().unwrap_or(self.name)
    }

    /// Whether `id` names this model or one of its snapshots
    pub fn matches(&self, id: &str) -> bool {
        self.name == id || self.snapshots.contains(&id)
    }

    /// Cost in USD of a call with the given token counts
    pub fn estimate_cost(&self, input_tokens: u32, output_tokens: u32) -> f64 {
        let input_cost = f64::from(input_tokens) / 1_000_000.0 * self.pricing.input_per_mtok;
        let output_cost = f64::from(output_tokens) / 1_000_000.0 * self.pricing.output_per_mtok;
        input_cost + output_cost
    }
}

const fn pricing(input_per_mtok: f64, output_per_mtok: f64) -> ModelPricing {
    ModelPricing {
        input_per_mtok,
        output_per_mtok,
    }
}

static MODELS: &[ModelInfo] = &[
    ModelInfo {
        name: "claude-haiku-4-5",
        provider: ProviderKind::Anthropic,
        snapshots: &["claude-haiku-4-5-20251001"],
        pricing: pricing(1.00, 5.00),
        context_window: 200_000,
        reasoning: false,
    },
    ModelInfo {
        name: "claude-sonnet-4-5",
        provider: ProviderKind::Anthropic,
        snapshots: &["claude-sonnet-4-5-20250929"],
        pricing: pricing(3.00, 15.00),
        context_window: 200_000,
        reasoning: true,
    },
    ModelInfo {
        name: "claude-opus-4-5",
        provider: ProviderKind::Anthropic,
        snapshots: &["claude-opus-4-5-20251101"],
        pricing: pricing(5.00, 25.00),
        context_window: 200_000,
        reasoning: true,
    },
    ModelInfo {
        name: "gpt-5-mini",
        provider: ProviderKind::Openai,
        snapshots: &["gpt-5-mini-2025-08-07"],
        pricing: pricing(0.25, 2.00),
        context_window: 400_000,
        reasoning: true,
    },
    ModelInfo {
        name: "gpt-5",
        provider: ProviderKind::Openai,
        snapshots: &["gpt-5-2025-08-07"],
        pricing: pricing(1.25, 10.00),
        context_window: 400_000,
        reasoning: true,
    },
    ModelInfo {
        name: "gpt-5.1",
        provider: ProviderKind::Openai,
        snapshots: &["gpt-5.1-2025-11-13"],
        pricing: pricing(1.25, 10.00),
        context_window: 400_000,
        reasoning: true,
    },
    ModelInfo {
        name: "gpt-5-pro",
        provider: ProviderKind::Openai,
        snapshots: &["gpt-5-pro-2025-10-06"],
        pricing: pricing(15.00, 120.00),
        context_window: 400_000,
        reasoning: true,
    },
    // Gemini thinking is not wired up yet
    ModelInfo {
        name: "gemini-2.5-flash-lite",
        provider: ProviderKind::Gemini,
        snapshots: &[],
        pricing: pricing(0.10, 0.40),
        context_window: 1_048_576,
        reasoning: false,
    },
    ModelInfo {
        name: "gemini-2.5-flash",
        provider: ProviderKind::Gemini,
        snapshots: &[],
        pricing: pricing(0.30, 2.50),
        context_window: 1_048_576,
        reasoning: false,
    },
    ModelInfo {
        name: "gemini-2.5-pro",
        provider: ProviderKind::Gemini,
        snapshots: &[],
        pricing: pricing(1.25, 10.00),
        context_window: 1_048_576,
        reasoning: false,
    },
];

/// Every known model
pub fn models() -> &'static [ModelInfo] {
    MODELS
}

/// Models served by one provider
pub fn models_for(provider: ProviderKind) -> impl Iterator<Item = &'static ModelInfo> {
    MODELS.iter().filter(move |m| m.provider == provider)
}

/// Look up a model by name or snapshot id
pub fn resolve(id: &str) -> Option<&'static ModelInfo> {
    MODELS.iter().find(|m| m.matches(id))
}

/// Whether `id` is a known model of `provider`
pub fn validate(provider: ProviderKind, id: &str) -> bool {
    resolve(id).is_some_and(|m| m.provider == provider)
}

pub fn is_reasoning(id: &str) -> bool {
    resolve(id).is_some_and(|m| m.reasoning)
}

/// Cost in USD, `None` for models without a pricing entry
pub fn calculate_usage_cost(id: &str, input_tokens: u32, output_tokens: u32) -> Option<f64> {
    resolve(id).map(|m| m.estimate_cost(input_tokens, output_tokens))
}

/// Model an agent kind uses when the configuration does not name one
///
/// The manager mostly routes work, so it gets the cheapest tier.
pub fn default_model(provider: ProviderKind, kind: AgentKind) -> &'static ModelInfo {
    let name = match (provider, kind) {
        (ProviderKind::Anthropic, AgentKind::Manager) => "claude-haiku-4-5",
        (ProviderKind::Anthropic, _) => "claude-sonnet-4-5",
        (ProviderKind::Openai, AgentKind::Manager) => "gpt-5-mini",
        (ProviderKind::Openai, _) => "gpt-5.1",
        (ProviderKind::Gemini, AgentKind::Manager) => "gemini-2.5-flash-lite",
        (ProviderKind::Gemini, _) => "gemini-2.5-flash",
    };

    // The table above only names models present in MODELS
    resolve(name).unwrap_or(&MODELS[0])
}
