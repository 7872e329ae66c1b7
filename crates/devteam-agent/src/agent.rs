use std::borrow::Cow;
use std::collections::HashSet;
use std::sync::Arc;

use devteam_config::{AgentKind, AgentsConfig};
use devteam_llm::{CompletionClient, CompletionRequest, LlmError, Message, Response, ToolCall, ToolCallResult};
use devteam_tools::{ToolRegistry, ToolSchema};
use futures_util::stream::BoxStream;

use crate::context::Context;
use crate::error::AgentError;
use crate::persona;

/// One member of the team: a system message, a model client and a tool set
///
/// The agent owns its transcript. Each [`Agent::invoke`] continues it.
pub struct Agent {
    kind: AgentKind,
    system_message: String,
    client: Arc<dyn CompletionClient>,
    fallback: Option<Arc<dyn CompletionClient>>,
    tools: ToolRegistry,
    max_turns: u32,
    max_tokens: u32,
    temperature: f32,
    transcript: Vec<Message>,
}

impl Agent {
    /// Agent with the built-in persona for `kind` and no tools
    pub fn new(kind: AgentKind, client: Arc<dyn CompletionClient>) -> Self {
        Self {
            kind,
            system_message: persona::system_message(kind).to_owned(),
            client,
            fallback: None,
            tools: ToolRegistry::new(),
            max_turns: 10,
            max_tokens: 32_768,
            temperature: 0.7,
            transcript: Vec::new(),
        }
    }

    /// Client tried once when the primary gives up
    #[must_use]
    pub fn with_fallback(mut self, fallback: Arc<dyn CompletionClient>) -> Self {
        self.fallback = Some(fallback);
        self
    }

    #[must_use]
    pub fn with_tools(mut self, tools: ToolRegistry) -> Self {
        self.tools = tools;
        self
    }

    #[must_use]
    pub fn with_system_message(mut self, system_message: impl Into<String>) -> Self {
        self.system_message = system_message.into();
        self
    }

    #[must_use]
    pub fn with_max_turns(mut self, max_turns: u32) -> Self {
        self.max_turns = max_turns;
        self
    }

    #[must_use]
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    #[must_use]
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Apply the loop limits from `[agents]`
    #[must_use]
    pub fn with_settings(self, settings: &AgentsConfig) -> Self {
        self.with_max_turns(settings.max_turns)
            .with_max_tokens(settings.max_tokens)
            .with_temperature(settings.temperature)
    }

    /// Resume from a previously persisted transcript
    #[must_use]
    pub fn with_transcript(mut self, transcript: Vec<Message>) -> Self {
        self.transcript = transcript;
        self
    }

    pub const fn kind(&self) -> AgentKind {
        self.kind
    }

    pub fn transcript(&self) -> &[Message] {
        &self.transcript
    }

    pub fn into_transcript(self) -> Vec<Message> {
        self.transcript
    }

    /// Run the turn loop, emitting every message the model and tools produce
    ///
    /// The stream is lazy: nothing happens until it is polled, and dropping
    /// it stops the loop before the next model call or tool execution. The
    /// prompt, when given, is added to the transcript but not emitted.
    ///
    /// Each turn makes one model call. A failed call is retried once on the
    /// fallback client if there is one. Tool uses are executed in order and
    /// answered with a result carrying the same id. The loop ends after a
    /// turn without tool use, after `max_turns` turns, or on the first error,
    /// which is the last item of the stream.
    ///
    /// An error or a dropped stream can leave a tool use in the transcript
    /// without its result. Such calls stay in the transcript but are left
    /// out of later requests, since vendors reject a call with no answer.
    pub fn invoke<'a>(
        &'a mut self,
        context: &Context,
        prompt: Option<String>,
    ) -> BoxStream<'a, Result<Message, AgentError>> {
        let system = format!("{}\n\n{}", self.system_message, context.render());

        Box::pin(async_stream::try_stream! {
            if let Some(prompt) = prompt {
                self.transcript.push(Message::user_text(prompt).with_agent(self.kind));
            }

            let schemas = self.tools.schemas();

            for turn in 1..=self.max_turns {
                tracing::debug!(agent = %self.kind, turn, max_turns = self.max_turns, "starting turn");

                let response = self.complete(&system, &schemas).await?;
                let mut has_tool_use = false;

                for message in response.content {
                    let message = message.with_agent(self.kind);
                    let call = message.as_tool_use().cloned();

                    self.transcript.push(message.clone());
                    yield message;

                    if let Some(call) = call {
                        has_tool_use = true;
                        let result = self.run_tool(&call).await?;
                        self.transcript.push(result.clone());
                        yield result;
                    }
                }

                if !has_tool_use {
                    break;
                }

                if turn == self.max_turns {
                    tracing::warn!(agent = %self.kind, max_turns = self.max_turns, "turn limit reached");
                }
            }
        })
    }

    async fn complete(&self, system: &str, schemas: &[ToolSchema]) -> Result<Response, LlmError> {
        let history = answered_history(&self.transcript);
        if let Cow::Owned(kept) = &history {
            tracing::warn!(
                agent = %self.kind,
                skipped = self.transcript.len() - kept.len(),
                "leaving unanswered tool uses out of the request"
            );
        }

        let request = CompletionRequest::new(&history)
            .with_system(Some(system))
            .with_tools(schemas)
            .with_max_tokens(self.max_tokens)
            .with_temperature(self.temperature);

        match self.client.complete(request).await {
            Ok(response) => Ok(response),
            Err(e) => match &self.fallback {
                Some(fallback) => {
                    tracing::warn!(agent = %self.kind, error = %e, "primary client failed, trying fallback");
                    fallback.complete(request).await
                }
                None => Err(e),
            },
        }
    }

    async fn run_tool(&self, call: &ToolCall) -> Result<Message, AgentError> {
        tracing::info!(
            agent = %self.kind,
            tool = call.tool_name.as_str(),
            tool_use_id = call.tool_use_id.as_str(),
            "dispatching tool"
        );

        let result = self.tools.execute(&call.tool_name, &call.arguments).await?;

        Ok(Message::tool_result(ToolCallResult {
            tool_name: call.tool_name.clone(),
            tool_use_id: call.tool_use_id.clone(),
            result: result.output_text(),
            error: result.is_error(),
        })
        .with_agent(self.kind))
    }
}

impl std::fmt::Debug for Agent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Agent")
            .field("kind", &self.kind)
            .field("tools", &self.tools)
            .field("has_fallback", &self.fallback.is_some())
            .field("max_turns", &self.max_turns)
            .field("transcript_len", &self.transcript.len())
            .finish_non_exhaustive()
    }
}

/// Transcript without the tool uses that never got a result
fn answered_history(transcript: &[Message]) -> Cow<'_, [Message]> {
    let answered: HashSet<&str> = transcript
        .iter()
        .filter_map(Message::as_tool_result)
        .map(|r| r.tool_use_id.as_str())
        .collect();
    let unanswered = |m: &Message| m.as_tool_use().is_some_and(|c| !answered.contains(c.tool_use_id.as_str()));

    if !transcript.iter().any(unanswered) {
        return Cow::Borrowed(transcript);
    }

    Cow::Owned(transcript.iter().filter(|m| !unanswered(m)).cloned().collect())
}
