//! Conversion between canonical types and Google Gemini wire format

use std::collections::HashMap;

use devteam_tools::{ToolParameter, ToolParameterType, ToolSchema};
use indexmap::IndexMap;
use serde_json::{Map, Value};

use super::local_tool_use_id;
use crate::protocol::google::{
    GoogleContent, GoogleFunctionCall, GoogleFunctionDeclaration, GoogleFunctionResponse, GoogleGenerationConfig,
    GooglePart, GoogleRequest, GoogleResponse, GoogleSchema, GoogleTool, GoogleType,
};
use crate::types::{CompletionRequest, Message, MessageContent, Response, Role, StopReason, ToolCall, ToolCallResult, Usage};

// -- Outbound: canonical types -> Google wire format --

/// Build a `generateContent` request from the transcript
///
/// Reasoning traces are not resubmitted; Gemini thought signatures are not
/// carried in the canonical model.
pub fn build_request(request: &CompletionRequest<'_>) -> GoogleRequest {
    let mut contents: Vec<GoogleContent> = Vec::with_capacity(request.messages.len());
    for message in request.messages {
        push_coalesced(&mut contents, convert_message(message));
    }

    let tools = (!request.tools.is_empty()).then(|| {
        vec![GoogleTool {
            function_declarations: request.tools.iter().map(convert_tool).collect(),
        }]
    });

    GoogleRequest {
        contents,
        system_instruction: request.system.map(|system| GoogleContent {
            role: None,
            parts: vec![GooglePart::text(system)],
        }),
        generation_config: Some(GoogleGenerationConfig {
            temperature: Some(f64::from(request.temperature)),
            max_output_tokens: Some(request.max_tokens),
        }),
        tools,
    }
}

/// Convert a tool schema to a function declaration
pub fn convert_tool(schema: &ToolSchema) -> GoogleFunctionDeclaration {
    let properties: IndexMap<String, GoogleSchema> = schema
        .parameters
        .iter()
        .map(|p| (p.name.clone(), convert_parameter(p)))
        .collect();

    let required = schema.required_names();

    GoogleFunctionDeclaration {
        name: schema.name.clone(),
        description: Some(schema.description.clone()),
        parameters: Some(GoogleSchema {
            schema_type: GoogleType::Object,
            description: None,
            properties: Some(properties),
            required: (!required.is_empty()).then_some(required),
            enum_values: None,
            default: None,
        }),
    }
}

fn convert_parameter(parameter: &ToolParameter) -> GoogleSchema {
    GoogleSchema {
        schema_type: convert_parameter_type(parameter.param_type),
        description: Some(parameter.description.clone()),
        properties: None,
        required: None,
        enum_values: parameter.enum_values.clone(),
        default: parameter.default.clone(),
    }
}

const fn convert_parameter_type(param_type: ToolParameterType) -> GoogleType {
    match param_type {
        ToolParameterType::String => GoogleType::String,
        ToolParameterType::Integer => GoogleType::Integer,
        ToolParameterType::Number => GoogleType::Number,
        ToolParameterType::Boolean => GoogleType::Boolean,
        ToolParameterType::Array => GoogleType::Array,
        ToolParameterType::Object => GoogleType::Object,
    }
}

/// Convert one canonical message
///
/// Locally generated ids are never sent since Gemini treats the id as
/// optional and would not recognise them.
pub fn convert_message(message: &Message) -> GoogleContent {
    let role = match message.role {
        Role::Assistant => "model",
        Role::User => "user",
    };

    let part = match &message.content {
        MessageContent::Text { text, .. } => GooglePart::text(text.clone()),
        MessageContent::ToolUse { call, .. } => GooglePart {
            function_call: Some(GoogleFunctionCall {
                id: (!call.has_local_id()).then(|| call.tool_use_id.clone()),
                name: call.tool_name.clone(),
                args: call.arguments.clone(),
            }),
            ..GooglePart::default()
        },
        MessageContent::ToolUseResult { call_result } => GooglePart {
            function_response: Some(GoogleFunctionResponse {
                id: (!call_result.has_local_id()).then(|| call_result.tool_use_id.clone()),
                name: call_result.tool_name.clone(),
                response: function_response(call_result),
            }),
            ..GooglePart::default()
        },
    };

    GoogleContent {
        role: Some(role.to_owned()),
        parts: vec![part],
    }
}

/// Gemini requires `response` to be a JSON object
fn function_response(result: &ToolCallResult) -> Value {
    let mut wrapped = Map::new();
    if result.error {
        wrapped.insert("error".to_owned(), Value::String(result.result.clone()));
        return Value::Object(wrapped);
    }

    let value = match serde_json::from_str::<Value>(&result.result) {
        Ok(Value::Object(object)) => return Value::Object(object),
        Ok(other) => other,
        Err(_) => Value::String(result.result.clone()),
    };
    wrapped.insert("result".to_owned(), value);
    Value::Object(wrapped)
}

fn push_coalesced(contents: &mut Vec<GoogleContent>, next: GoogleContent) {
    match contents.last_mut() {
        Some(last) if last.role == next.role => last.parts.extend(next.parts),
        _ => contents.push(next),
    }
}

// -- Inbound: Google wire format -> canonical types --

/// Rebuild a canonical transcript from Gemini contents
///
/// A response without an id is matched to the oldest unanswered call of the
/// same function.
pub fn messages_from_wire(contents: Vec<GoogleContent>) -> Vec<Message> {
    let mut out = Vec::new();
    let mut unanswered: Vec<(String, String)> = Vec::new();
    let mut names_by_id: HashMap<String, String> = HashMap::new();

    for content in contents {
        let role = if content.role.as_deref() == Some("model") {
            Role::Assistant
        } else {
            Role::User
        };

        for part in content.parts {
            if part.thought == Some(true) {
                continue;
            }

            if let Some(call) = part.function_call {
                let id = call.id.filter(|id| !id.is_empty()).unwrap_or_else(local_tool_use_id);
                names_by_id.insert(id.clone(), call.name.clone());
                unanswered.push((call.name.clone(), id.clone()));
                out.push(Message::tool_use(ToolCall::new(call.name, id, call.args)));
            } else if let Some(response) = part.function_response {
                let tool_use_id = match response.id.filter(|id| !id.is_empty()) {
                    Some(id) => {
                        unanswered.retain(|(_, pending)| *pending != id);
                        id
                    }
                    None => unanswered
                        .iter()
                        .position(|(name, _)| *name == response.name)
                        .map(|index| unanswered.remove(index).1)
                        .unwrap_or_else(local_tool_use_id),
                };
                let (result, error) = unwrap_function_response(response.response);
                out.push(Message::tool_result(ToolCallResult {
                    tool_name: names_by_id.get(&tool_use_id).cloned().unwrap_or(response.name),
                    tool_use_id,
                    result,
                    error,
                }));
            } else if let Some(text) = part.text {
                out.push(Message::text(role, text));
            }
        }
    }

    out
}

fn unwrap_function_response(response: Value) -> (String, bool) {
    match response {
        Value::Object(mut object) if object.len() == 1 => {
            if let Some(error) = object.remove("error") {
                return (value_text(error), true);
            }
            if let Some(result) = object.remove("result") {
                return (value_text(result), false);
            }
            (Value::Object(object).to_string(), false)
        }
        other => (value_text(other), false),
    }
}

fn value_text(value: Value) -> String {
    match value {
        Value::String(s) => s,
        other => other.to_string(),
    }
}

/// Convert a `generateContent` response to a canonical response
///
/// Only the first candidate is read, and only its first function call is
/// kept so a turn never carries more than one tool invocation.
pub fn convert_response(response: GoogleResponse, model: &str) -> Response {
    let usage = response
        .usage_metadata
        .map(|u| Usage::new(model, u.prompt_token_count, u.candidates_token_count));

    let Some(candidate) = response.candidates.into_iter().next() else {
        if let Some(reason) = response.prompt_feedback.and_then(|f| f.block_reason) {
            tracing::warn!(model, reason = reason.as_str(), "prompt blocked");
        }
        return Response::no_candidates(usage);
    };

    let parts = candidate.content.map(|c| c.parts).unwrap_or_default();
    if parts.is_empty() {
        tracing::warn!(model, finish_reason = ?candidate.finish_reason, "candidate has no parts");
        return Response::no_candidates(usage);
    }

    let mut content = Vec::with_capacity(parts.len());
    let mut has_tool_use = false;

    for part in parts {
        if part.thought == Some(true) {
            continue;
        }

        if let Some(call) = part.function_call {
            if has_tool_use {
                tracing::warn!(model, tool = call.name.as_str(), "dropping additional function call");
                continue;
            }
            has_tool_use = true;
            let id = call.id.filter(|id| !id.is_empty()).unwrap_or_else(local_tool_use_id);
            content.push(Message::tool_use(ToolCall::new(call.name, id, call.args)));
        } else if let Some(text) = part.text {
            content.push(Message::assistant_text(text));
        }
    }

    let stop_reason = match candidate.finish_reason.as_deref() {
        Some("STOP") if has_tool_use => StopReason::ToolUse,
        Some("STOP") => StopReason::EndTurn,
        Some("MAX_TOKENS") => StopReason::MaxTokens,
        Some("SAFETY" | "PROHIBITED_CONTENT" | "BLOCKLIST" | "SPII") => StopReason::ContentFilter,
        Some("RECITATION") => StopReason::Recitation,
        Some("MALFORMED_FUNCTION_CALL") => StopReason::Error,
        _ => StopReason::Unknown,
    };

    Response {
        content,
        stop_reason,
        usage,
    }
}
