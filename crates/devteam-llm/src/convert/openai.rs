//! Conversion between canonical types and `OpenAI` Responses wire format

use std::collections::HashMap;

use devteam_config::ProviderKind;
use devteam_tools::{ToolParameter, ToolParameterType, ToolSchema};
use serde_json::{Map, Value};

use super::local_tool_use_id;
use crate::protocol::openai::{
    OpenAiInputItem, OpenAiOutputContent, OpenAiOutputItem, OpenAiReasoning, OpenAiRequest, OpenAiResponse,
    OpenAiSummary, OpenAiTool,
};
use crate::types::{
    CompletionRequest, Message, MessageContent, Response, Role, StopReason, ThinkingBlock, ToolCall, ToolCallResult,
    Usage,
};

/// Reasoning effort requested from reasoning models
const REASONING_EFFORT: &str = "medium";

/// Marks a failed tool result; `function_call_output` has no error flag
const TOOL_ERROR_PREFIX: &str = "[tool error] ";

// -- Outbound: canonical types -> OpenAI wire format --

/// Build a `/responses` request from the transcript
///
/// History is sent in full with `store` off, so reasoning is resumed from the
/// encrypted content returned by earlier turns.
pub fn build_request(model: &str, request: &CompletionRequest<'_>, reasoning: bool) -> OpenAiRequest {
    let input = request.messages.iter().flat_map(convert_message).collect();

    let tools = (!request.tools.is_empty()).then(|| request.tools.iter().map(convert_tool).collect());

    OpenAiRequest {
        model: model.to_owned(),
        input,
        instructions: request.system.map(str::to_owned),
        max_output_tokens: Some(request.max_tokens),
        temperature: (!reasoning).then_some(f64::from(request.temperature)),
        tools,
        parallel_tool_calls: false,
        store: false,
        reasoning: reasoning.then(|| OpenAiReasoning {
            effort: REASONING_EFFORT.to_owned(),
            summary: Some("auto".to_owned()),
        }),
        include: reasoning.then(|| vec!["reasoning.encrypted_content".to_owned()]),
    }
}

/// Convert a tool schema to a function tool
///
/// Strict mode requires every property to be listed as required and every
/// array or nested object to be fully described. The bare `array` and
/// `object` fragments produced for parameters do not qualify, so strict is
/// only enabled for tools whose parameters are all required scalars.
pub fn convert_tool(schema: &ToolSchema) -> OpenAiTool {
    let strict = schema.all_required() && schema.parameters.iter().all(is_strict_scalar);
    let mut parameters = schema.json_schema();
    if strict && let Value::Object(map) = &mut parameters {
        map.insert("additionalProperties".to_owned(), Value::Bool(false));
    }

    OpenAiTool {
        tool_type: "function".to_owned(),
        name: schema.name.clone(),
        description: Some(schema.description.clone()),
        parameters,
        strict,
    }
}

const fn is_strict_scalar(parameter: &ToolParameter) -> bool {
    !matches!(parameter.param_type, ToolParameterType::Array | ToolParameterType::Object)
}

/// Convert one canonical message to input items
///
/// A resumable reasoning trace becomes a `reasoning` item placed directly
/// before the content it annotated.
pub fn convert_message(message: &Message) -> Vec<OpenAiInputItem> {
    let mut items = Vec::with_capacity(2);

    if let Some(item) = message.thinking().and_then(reasoning_item) {
        items.push(item);
    }

    items.push(match &message.content {
        MessageContent::Text { text, .. } => OpenAiInputItem::Message {
            role: message.role.to_string(),
            content: text.clone(),
        },
        MessageContent::ToolUse { call, .. } => OpenAiInputItem::FunctionCall {
            call_id: call.tool_use_id.clone(),
            name: call.tool_name.clone(),
            arguments: Value::Object(call.arguments.clone()).to_string(),
        },
        MessageContent::ToolUseResult { call_result } => OpenAiInputItem::FunctionCallOutput {
            call_id: call_result.tool_use_id.clone(),
            output: if call_result.error {
                format!("{TOOL_ERROR_PREFIX}{}", call_result.result)
            } else {
                call_result.result.clone()
            },
        },
    });

    items
}

fn reasoning_item(thinking: &ThinkingBlock) -> Option<OpenAiInputItem> {
    if thinking.provider != ProviderKind::Openai || thinking.metadata.is_empty() {
        return None;
    }

    // Without storage the id alone cannot be resolved
    if thinking.encrypted_content.is_none() {
        tracing::debug!(id = %thinking.metadata, "dropping reasoning item without encrypted content");
        return None;
    }

    let summary = if thinking.thinking.is_empty() {
        Vec::new()
    } else {
        vec![OpenAiSummary::SummaryText {
            text: thinking.thinking.clone(),
        }]
    };

    Some(OpenAiInputItem::Reasoning {
        id: thinking.metadata.clone(),
        encrypted_content: thinking.encrypted_content.clone(),
        summary,
    })
}

// -- Inbound: OpenAI wire format -> canonical types --

/// Rebuild a canonical transcript from `input` items
///
/// A function output is flagged as an error only when it carries the marker
/// [`convert_message`] adds to failed results.
pub fn messages_from_wire(items: Vec<OpenAiInputItem>) -> Vec<Message> {
    let mut out = Vec::new();
    let mut pending: Option<ThinkingBlock> = None;
    let mut tool_names: HashMap<String, String> = HashMap::new();

    for item in items {
        match item {
            OpenAiInputItem::Reasoning {
                id,
                encrypted_content,
                summary,
            } => {
                pending = Some(
                    ThinkingBlock::new(ProviderKind::Openai, summary_text(summary), id)
                        .with_encrypted_content(encrypted_content),
                );
            }
            OpenAiInputItem::Message { role, content } => {
                let role = if role == "assistant" { Role::Assistant } else { Role::User };
                out.push(Message::text(role, content).with_thinking(pending.take()));
            }
            OpenAiInputItem::FunctionCall {
                call_id,
                name,
                arguments,
            } => {
                tool_names.insert(call_id.clone(), name.clone());
                let call = ToolCall::new(name, call_id, parse_arguments(&arguments));
                out.push(Message::tool_use(call).with_thinking(pending.take()));
            }
            OpenAiInputItem::FunctionCallOutput { call_id, output } => {
                let tool_name = tool_names.get(&call_id).cloned().unwrap_or_default();
                let (result, error) = match output.strip_prefix(TOOL_ERROR_PREFIX) {
                    Some(message) => (message.to_owned(), true),
                    None => (output, false),
                };
                out.push(Message::tool_result(ToolCallResult {
                    tool_name,
                    tool_use_id: call_id,
                    result,
                    error,
                }));
            }
        }
    }

    out
}

/// Convert a `/responses` response to a canonical response
pub fn convert_response(response: OpenAiResponse, model: &str) -> Response {
    let mut content = Vec::with_capacity(response.output.len());
    let mut pending: Option<ThinkingBlock> = None;
    let mut refused = false;

    for item in response.output {
        match item {
            OpenAiOutputItem::Reasoning {
                id,
                summary,
                encrypted_content,
            } => {
                pending = Some(
                    ThinkingBlock::new(ProviderKind::Openai, summary_text(summary), id)
                        .with_encrypted_content(encrypted_content),
                );
            }
            OpenAiOutputItem::Message { content: parts } => {
                for part in parts {
                    match part {
                        OpenAiOutputContent::OutputText { text } => {
                            content.push(Message::assistant_text(text).with_thinking(pending.take()));
                        }
                        OpenAiOutputContent::Refusal { refusal } => {
                            refused = true;
                            content.push(Message::assistant_text(refusal).with_thinking(pending.take()));
                        }
                        OpenAiOutputContent::Unsupported => {}
                    }
                }
            }
            OpenAiOutputItem::FunctionCall {
                id,
                call_id,
                name,
                arguments,
            } => {
                let tool_use_id = call_id
                    .filter(|id| !id.is_empty())
                    .or_else(|| id.filter(|id| !id.is_empty()))
                    .unwrap_or_else(local_tool_use_id);
                let call = ToolCall::new(name, tool_use_id, parse_arguments(&arguments));
                content.push(Message::tool_use(call).with_thinking(pending.take()));
            }
            OpenAiOutputItem::Unsupported => {
                tracing::debug!(model, "skipping unsupported output item");
            }
        }
    }

    let has_tool_use = content.iter().any(|m| m.as_tool_use().is_some());
    let incomplete_reason = response.incomplete_details.and_then(|d| d.reason);

    let stop_reason = match response.status.as_deref() {
        Some("completed") if refused => StopReason::ContentFilter,
        Some("completed") if has_tool_use => StopReason::ToolUse,
        Some("completed") => StopReason::EndTurn,
        Some("incomplete") if incomplete_reason.as_deref() == Some("content_filter") => StopReason::ContentFilter,
        Some("incomplete") => StopReason::MaxTokens,
        Some("failed") => StopReason::Error,
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

fn summary_text(summary: Vec<OpenAiSummary>) -> String {
    summary
        .into_iter()
        .map(|OpenAiSummary::SummaryText { text }| text)
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Decode the argument string of a function call
///
/// Malformed arguments become an empty mapping; the tool then reports the
/// missing parameters back to the model.
fn parse_arguments(arguments: &str) -> Map<String, Value> {
    if arguments.trim().is_empty() {
        return Map::new();
    }

    serde_json::from_str(arguments).unwrap_or_else(|e| {
        tracing::warn!(error = %e, "function call arguments are not a JSON object");
        Map::new()
    })
}
