use devteam_tools::ToolSchema;

use super::Message;

/// Inputs of a single model call
///
/// Borrows the transcript so the agent loop keeps sole ownership of it.
#[derive(Debug, Clone, Copy)]
pub struct CompletionRequest<'a> {
    pub messages: &'a [Message],
    pub system: Option<&'a str>,
    pub tools: &'a [ToolSchema],
    pub max_tokens: u32,
    pub temperature: f32,
}

impl<'a> CompletionRequest<'a> {
    pub const fn new(messages: &'a [Message]) -> Self {
        Self {
            messages,
            system: None,
            tools: &[],
            max_tokens: 32_768,
            temperature: 0.7,
        }
    }

    #[must_use]
    pub const fn with_system(mut self, system: Option<&'a str>) -> Self {
        self.system = system;
        self
    }

    #[must_use]
    pub const fn with_tools(mut self, tools: &'a [ToolSchema]) -> Self {
        self.tools = tools;
        self
    }

    #[must_use]
    pub const fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    #[must_use]
    pub const fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }
}

/// Share of the output budget handed to the reasoning channel
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReasoningBudget {
    ratio: f64,
}

impl ReasoningBudget {
    /// `ratio` outside (0, 1) falls back to one half
    pub fn new(ratio: f64) -> Self {
        let ratio = if ratio > 0.0 && ratio < 1.0 { ratio } else { 0.5 };
        Self { ratio }
    }

    pub const fn ratio(&self) -> f64 {
        self.ratio
    }

    /// Reasoning tokens reserved out of `max_tokens`, always below it
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn tokens(&self, max_tokens: u32) -> u32 {
        let budget = (f64::from(max_tokens) * self.ratio).floor() as u32;
        budget.min(max_tokens.saturating_sub(1))
    }
}

impl Default for ReasoningBudget {
    fn default() -> Self {
        Self::new(0.5)
    }
}
