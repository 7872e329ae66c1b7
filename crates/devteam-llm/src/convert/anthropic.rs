//! Conversion between canonical types and Anthropic wire format

use std::collections::HashMap;

use devteam_config::ProviderKind;
use devteam_tools::ToolSchema;

use super::local_tool_use_id;
use crate::protocol::anthropic::{
    AnthropicContent, AnthropicContentBlock, AnthropicMessage, AnthropicRequest, AnthropicResponse,
    AnthropicResponseBlock, AnthropicThinking, AnthropicTool, AnthropicToolChoice,
};
use crate::types::{
    CompletionRequest, Message, MessageContent, ReasoningBudget, Response, Role, StopReason, ThinkingBlock, ToolCall,
    ToolCallResult, Usage,
};

// -- Outbound: canonical types -> Anthropic wire format --

/// Build a messages request from the transcript
///
/// Consecutive messages with the same role are merged so a thinking block
/// stays in the same assistant turn as the tool use it precedes. Anthropic
/// rejects `temperature` alongside extended thinking, so it is dropped when
/// a reasoning budget is given.
pub fn build_request(model: &str, request: &CompletionRequest<'_>, reasoning: Option<ReasoningBudget>) -> AnthropicRequest {
    let mut messages: Vec<AnthropicMessage> = Vec::with_capacity(request.messages.len());
    for message in request.messages {
        push_coalesced(&mut messages, convert_message(message));
    }

    let tools: Option<Vec<AnthropicTool>> =
        (!request.tools.is_empty()).then(|| request.tools.iter().map(convert_tool).collect());

    let tool_choice = tools.as_ref().map(|_| AnthropicToolChoice {
        choice_type: "auto".to_owned(),
        disable_parallel_tool_use: Some(true),
    });

    let thinking = reasoning.map(|budget| AnthropicThinking {
        thinking_type: "enabled".to_owned(),
        budget_tokens: budget.tokens(request.max_tokens),
    });

    AnthropicRequest {
        model: model.to_owned(),
        max_tokens: request.max_tokens,
        system: request.system.map(str::to_owned),
        messages,
        temperature: thinking.is_none().then_some(f64::from(request.temperature)),
        tools,
        tool_choice,
        thinking,
    }
}

/// Convert a tool schema to an Anthropic tool definition
pub fn convert_tool(schema: &ToolSchema) -> AnthropicTool {
    AnthropicTool {
        name: schema.name.clone(),
        description: Some(schema.description.clone()),
        input_schema: schema.json_schema(),
    }
}

/// Convert one canonical message
pub fn convert_message(message: &Message) -> AnthropicMessage {
    let role = role_name(message.role).to_owned();

    let content = match &message.content {
        MessageContent::Text { text, thinking: None } => AnthropicContent::Text(text.clone()),
        MessageContent::Text {
            text,
            thinking: Some(thinking),
        } => {
            let mut blocks: Vec<AnthropicContentBlock> = thinking_block(thinking).into_iter().collect();
            blocks.push(AnthropicContentBlock::Text { text: text.clone() });
            AnthropicContent::Blocks(blocks)
        }
        MessageContent::ToolUse { call, thinking } => {
            let mut blocks: Vec<AnthropicContentBlock> = thinking.as_ref().and_then(thinking_block).into_iter().collect();
            blocks.push(AnthropicContentBlock::ToolUse {
                id: call.tool_use_id.clone(),
                name: call.tool_name.clone(),
                input: call.arguments.clone(),
            });
            AnthropicContent::Blocks(blocks)
        }
        MessageContent::ToolUseResult { call_result } => AnthropicContent::Blocks(vec![AnthropicContentBlock::ToolResult {
            tool_use_id: call_result.tool_use_id.clone(),
            content: Some(call_result.result.clone()),
            is_error: Some(call_result.error),
        }]),
    };

    AnthropicMessage { role, content }
}

/// Thinking block to resubmit, if the trace can be resumed by Anthropic
fn thinking_block(thinking: &ThinkingBlock) -> Option<AnthropicContentBlock> {
    if thinking.provider != ProviderKind::Anthropic {
        tracing::debug!(origin = %thinking.provider, "not resubmitting thinking from another provider");
        return None;
    }

    if thinking.is_redacted() {
        return thinking
            .encrypted_content
            .clone()
            .map(|data| AnthropicContentBlock::RedactedThinking { data });
    }

    if thinking.metadata.is_empty() {
        tracing::debug!("dropping thinking block without signature");
        return None;
    }

    Some(AnthropicContentBlock::Thinking {
        thinking: thinking.thinking.clone(),
        signature: thinking.metadata.clone(),
    })
}

fn push_coalesced(messages: &mut Vec<AnthropicMessage>, next: AnthropicMessage) {
    match messages.last_mut() {
        Some(last) if last.role == next.role => {
            let mut merged = into_blocks(std::mem::replace(&mut last.content, AnthropicContent::Blocks(Vec::new())));
            merged.extend(into_blocks(next.content));
            last.content = AnthropicContent::Blocks(merged);
        }
        _ => messages.push(next),
    }
}

fn into_blocks(content: AnthropicContent) -> Vec<AnthropicContentBlock> {
    match content {
        AnthropicContent::Text(text) => vec![AnthropicContentBlock::Text { text }],
        AnthropicContent::Blocks(blocks) => blocks,
    }
}

const fn role_name(role: Role) -> &'static str {
    match role {
        Role::User => "user",
        Role::Assistant => "assistant",
    }
}

// -- Inbound: Anthropic wire format -> canonical types --

/// Rebuild a canonical transcript from Anthropic messages
///
/// Tool results carry no tool name on the wire; it is recovered from the
/// tool use with the same id earlier in the list.
pub fn messages_from_wire(messages: Vec<AnthropicMessage>) -> Vec<Message> {
    let mut out = Vec::new();
    let mut tool_names: HashMap<String, String> = HashMap::new();

    for message in messages {
        let role = if message.role == "assistant" { Role::Assistant } else { Role::User };
        let mut pending: Option<ThinkingBlock> = None;

        for block in into_blocks(message.content) {
            match block {
                AnthropicContentBlock::Thinking { thinking, signature } => {
                    pending = Some(ThinkingBlock::new(ProviderKind::Anthropic, thinking, signature));
                }
                AnthropicContentBlock::RedactedThinking { data } => {
                    pending = Some(ThinkingBlock::redacted(ProviderKind::Anthropic, data));
                }
                AnthropicContentBlock::Text { text } => {
                    out.push(Message::text(role, text).with_thinking(pending.take()));
                }
                AnthropicContentBlock::ToolUse { id, name, input } => {
                    tool_names.insert(id.clone(), name.clone());
                    out.push(Message::tool_use(ToolCall::new(name, id, input)).with_thinking(pending.take()));
                }
                AnthropicContentBlock::ToolResult {
                    tool_use_id,
                    content,
                    is_error,
                } => {
                    let tool_name = tool_names.get(&tool_use_id).cloned().unwrap_or_default();
                    out.push(Message::tool_result(ToolCallResult {
                        tool_name,
                        tool_use_id,
                        result: content.unwrap_or_default(),
                        error: is_error.unwrap_or(false),
                    }));
                }
            }
        }
    }

    out
}

/// Convert an Anthropic response to a canonical response
///
/// A thinking block is held until the next text or tool-use block and
/// attached to it.
pub fn convert_response(response: AnthropicResponse, model: &str) -> Response {
    let mut content = Vec::with_capacity(response.content.len());
    let mut pending: Option<ThinkingBlock> = None;

    for block in response.content {
        match block {
            AnthropicResponseBlock::Thinking { thinking, signature } => {
                if pending.is_some() {
                    tracing::debug!(model, "replacing unattached thinking block");
                }
                pending = Some(ThinkingBlock::new(ProviderKind::Anthropic, thinking, signature));
            }
            AnthropicResponseBlock::RedactedThinking { data } => {
                pending = Some(ThinkingBlock::redacted(ProviderKind::Anthropic, data));
            }
            AnthropicResponseBlock::Text { text } => {
                content.push(Message::assistant_text(text).with_thinking(pending.take()));
            }
            AnthropicResponseBlock::ToolUse { id, name, input } => {
                let id = if id.is_empty() { local_tool_use_id() } else { id };
                content.push(Message::tool_use(ToolCall::new(name, id, input)).with_thinking(pending.take()));
            }
            AnthropicResponseBlock::Unsupported => {
                tracing::debug!(model, "skipping unsupported content block");
            }
        }
    }

    let stop_reason = match response.stop_reason.as_deref() {
        Some("end_turn") => StopReason::EndTurn,
        Some("max_tokens") => StopReason::MaxTokens,
        Some("stop_sequence") => StopReason::StopSequence,
        Some("tool_use") => StopReason::ToolUse,
        Some("refusal") => StopReason::ContentFilter,
        _ => StopReason::Unknown,
    };

    Response {
        content,
        stop_reason,
        usage: response
            .usage
            .map(|u| Usage::new(model, u.input_tokens, u.output_tokens)),
    }
}

#[cfg(test)]
mod tests {
    use devteam_tools::{ToolParameter, ToolParameterType};
    use serde_json::{Map, Value, json};

    use super::*;

    fn args(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    fn parse_response(value: Value) -> AnthropicResponse {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn tool_schema_keeps_required_enum_and_default() {
        let schema = ToolSchema::new("search", "Search the codebase")
            .with_parameter(ToolParameter::new("query", "Pattern", ToolParameterType::String))
            .with_parameter(
                ToolParameter::new("scope", "Where to look", ToolParameterType::String)
                    .with_enum(["src", "tests"])
                    .with_default("src"),
            );

        let tool = convert_tool(&schema);

        assert_eq!(tool.name, "search");
        assert_eq!(tool.input_schema["required"], json!(["query"]));
        assert_eq!(tool.input_schema["properties"]["scope"]["enum"], json!(["src", "tests"]));
        assert_eq!(tool.input_schema["properties"]["scope"]["default"], "src");
    }

    #[test]
    fn text_round_trip_preserves_role_and_text() {
        for message in [Message::user_text("fix the bug"), Message::assistant_text("done")] {
            let back = messages_from_wire(vec![convert_message(&message)]);
            assert_eq!(back, vec![message]);
        }
    }

    #[test]
    fn thinking_precedes_text() {
        let message = Message::assistant_text("answer").with_thinking(Some(ThinkingBlock::new(
            ProviderKind::Anthropic,
            "reasoning",
            "sig-1",
        )));

        let wire = serde_json::to_value(convert_message(&message)).unwrap();

        assert_eq!(
            wire,
            json!({
                "role": "assistant",
                "content": [
                    {"type": "thinking", "thinking": "reasoning", "signature": "sig-1"},
                    {"type": "text", "text": "answer"}
                ]
            })
        );
    }

    #[test]
    fn redacted_thinking_resubmitted() {
        let message = Message::tool_use(ToolCall::new("ls", "toolu_9", Map::new()))
            .with_thinking(Some(ThinkingBlock::redacted(ProviderKind::Anthropic, "opaque")));

        let AnthropicContent::Blocks(blocks) = convert_message(&message).content else {
            panic!("expected blocks");
        };

        assert_eq!(blocks[0], AnthropicContentBlock::RedactedThinking { data: "opaque".to_owned() });
    }

    #[test]
    fn foreign_or_unsigned_thinking_is_dropped() {
        for thinking in [
            ThinkingBlock::new(ProviderKind::Openai, "x", "rs_1"),
            ThinkingBlock::new(ProviderKind::Anthropic, "x", ""),
        ] {
            let message = Message::assistant_text("hi").with_thinking(Some(thinking));
            let AnthropicContent::Blocks(blocks) = convert_message(&message).content else {
                panic!("expected blocks");
            };
            assert_eq!(blocks, vec![AnthropicContentBlock::Text { text: "hi".to_owned() }]);
        }
    }

    #[test]
    fn tool_result_carries_id_and_error() {
        let message = Message::tool_result(ToolCallResult {
            tool_name: "run".to_owned(),
            tool_use_id: "toolu_1".to_owned(),
            result: "exit 1".to_owned(),
            error: true,
        });

        let wire = serde_json::to_value(convert_message(&message)).unwrap();

        assert_eq!(
            wire,
            json!({
                "role": "user",
                "content": [{"type": "tool_result", "tool_use_id": "toolu_1", "content": "exit 1", "is_error": true}]
            })
        );
    }

    #[test]
    fn request_disables_parallel_tools_and_reserves_thinking() {
        let transcript = vec![
            Message::user_text("list files"),
            Message::assistant_text("sure"),
            Message::tool_use(ToolCall::new("ls", "toolu_1", args(json!({"path": "."})))),
        ];
        let tools = vec![ToolSchema::new("ls", "List a directory")];
        let request = CompletionRequest::new(&transcript)
            .with_system(Some("You are a developer"))
            .with_tools(&tools)
            .with_max_tokens(8_000);

        let wire = build_request("claude-sonnet-4-5", &request, Some(ReasoningBudget::default()));

        assert_eq!(wire.messages.len(), 2);
        let AnthropicContent::Blocks(blocks) = &wire.messages[1].content else {
            panic!("assistant turn should be merged into blocks");
        };
        assert_eq!(blocks.len(), 2);
        assert_eq!(wire.thinking.as_ref().unwrap().budget_tokens, 4_000);
        assert!(wire.temperature.is_none());
        assert_eq!(wire.tool_choice.as_ref().unwrap().disable_parallel_tool_use, Some(true));
        assert_eq!(wire.system.as_deref(), Some("You are a developer"));
    }

    #[test]
    fn request_without_reasoning_keeps_temperature() {
        let transcript = vec![Message::user_text("hi")];
        let request = CompletionRequest::new(&transcript).with_temperature(0.5);

        let wire = build_request("claude-haiku-4-5", &request, None);

        assert!(wire.thinking.is_none());
        assert!(wire.tools.is_none() && wire.tool_choice.is_none());
        assert_eq!(wire.temperature, Some(0.5));
    }

    #[test]
    fn response_attaches_thinking_to_next_block_once() {
        let response = parse_response(json!({
            "id": "msg_1",
            "model": "claude-sonnet-4-5",
            "content": [
                {"type": "thinking", "thinking": "plan", "signature": "sig"},
                {"type": "text", "text": "Let me look."},
                {"type": "tool_use", "id": "toolu_1", "name": "ls", "input": {"path": "src"}}
            ],
            "stop_reason": "tool_use",
            "usage": {"input_tokens": 1000, "output_tokens": 200}
        }));

        let converted = convert_response(response, "claude-sonnet-4-5");

        assert_eq!(converted.stop_reason, StopReason::ToolUse);
        assert_eq!(converted.content.len(), 2);
        assert_eq!(converted.content[0].thinking().unwrap().metadata, "sig");
        assert!(converted.content[1].thinking().is_none());
        let call = converted.content[1].as_tool_use().unwrap();
        assert_eq!(call.tool_use_id, "toolu_1");
        assert_eq!(call.arguments["path"], "src");
        let usage = converted.usage.unwrap();
        assert_eq!(usage.input_tokens, 1000);
        assert!(usage.cost.unwrap() > 0.0);
    }

    #[test]
    fn stop_reasons_map_to_closed_set() {
        for (wire, expected) in [
            (Some("end_turn"), StopReason::EndTurn),
            (Some("max_tokens"), StopReason::MaxTokens),
            (Some("stop_sequence"), StopReason::StopSequence),
            (Some("refusal"), StopReason::ContentFilter),
            (Some("pause_turn"), StopReason::Unknown),
            (None, StopReason::Unknown),
        ] {
            let response = parse_response(json!({"id": "m", "content": [], "stop_reason": wire}));
            assert_eq!(convert_response(response, "claude-haiku-4-5").stop_reason, expected);
        }
    }

    #[test]
    fn unknown_blocks_and_missing_ids_tolerated() {
        let response = parse_response(json!({
            "id": "m",
            "content": [
                {"type": "server_tool_use", "id": "srv", "name": "web_search", "input": {}},
                {"type": "tool_use", "id": "", "name": "ls", "input": {}}
            ]
        }));

        let converted = convert_response(response, "claude-haiku-4-5");

        assert_eq!(converted.content.len(), 1);
        assert!(converted.content[0].as_tool_use().unwrap().has_local_id());
        assert!(converted.usage.is_none());
    }

    #[test]
    fn inbound_recovers_tool_names() {
        let wire = vec![
            AnthropicMessage {
                role: "assistant".to_owned(),
                content: AnthropicContent::Blocks(vec![AnthropicContentBlock::ToolUse {
                    id: "toolu_7".to_owned(),
                    name: "read_file".to_owned(),
                    input: Map::new(),
                }]),
            },
            AnthropicMessage {
                role: "user".to_owned(),
                content: AnthropicContent::Blocks(vec![AnthropicContentBlock::ToolResult {
                    tool_use_id: "toolu_7".to_owned(),
                    content: Some("fn main() {}".to_owned()),
                    is_error: None,
                }]),
            },
        ];

        let messages = messages_from_wire(wire);

        let MessageContent::ToolUseResult { call_result } = &messages[1].content else {
            panic!("expected tool result");
        };
        assert_eq!(call_result.tool_name, "read_file");
        assert!(!call_result.error);
    }
}
