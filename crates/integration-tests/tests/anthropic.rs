mod harness;

use std::sync::Arc;

use axum::http::StatusCode;
use devteam_agent::{Agent, Context};
use devteam_config::{AgentKind, ProviderKind};
use devteam_llm::{CompletionClient, CompletionRequest, LlmError, Message, StopReason};
use futures_util::TryStreamExt;
use harness::mock_vendor::MockVendor;
use harness::{EchoTool, client};
use serde_json::{Value, json};

const MODEL: &str = "claude-sonnet-4-5";

fn text_reply(text: &str) -> Value {
    json!({
        "id": "msg_text",
        "type": "message",
        "role": "assistant",
        "model": MODEL,
        "content": [{"type": "text", "text": text}],
        "stop_reason": "end_turn",
        "usage": {"input_tokens": 12, "output_tokens": 4}
    })
}

#[tokio::test]
async fn completion_returns_text_and_usage() {
    let mock = MockVendor::start([text_reply("Hello there")]).await.unwrap();
    let client = client(ProviderKind::Anthropic, MODEL, mock.v1_url(), 1);

    let messages = [Message::user_text("Hi")];
    let response = client.complete(CompletionRequest::new(&messages)).await.unwrap();

    assert_eq!(response.content, vec![Message::assistant_text("Hello there")]);
    assert_eq!(response.stop_reason, StopReason::EndTurn);
    let usage = response.usage.unwrap();
    assert_eq!((usage.input_tokens, usage.output_tokens), (12, 4));
    assert!(usage.cost.is_some());

    let request = &mock.requests()[0];
    assert_eq!(request.path, "/v1/messages");
    assert_eq!(request.credential.as_deref(), Some("anthropic-test-key"));
    assert_eq!(request.body["model"], MODEL);
    assert_eq!(request.body["max_tokens"], 32_768);
}

#[tokio::test]
async fn server_errors_are_retried() {
    let mock = MockVendor::start_failing(2, StatusCode::SERVICE_UNAVAILABLE, [text_reply("ok")])
        .await
        .unwrap();
    let client = client(ProviderKind::Anthropic, MODEL, mock.v1_url(), 3);

    let messages = [Message::user_text("Hi")];
    let response = client.complete(CompletionRequest::new(&messages)).await.unwrap();

    assert_eq!(response.content, vec![Message::assistant_text("ok")]);
    assert_eq!(mock.request_count(), 3);
}

#[tokio::test]
async fn gives_up_after_max_attempts() {
    let mock = MockVendor::start_failing(10, StatusCode::TOO_MANY_REQUESTS, [])
        .await
        .unwrap();
    let client = client(ProviderKind::Anthropic, MODEL, mock.v1_url(), 3);

    let messages = [Message::user_text("Hi")];
    let err = client.complete(CompletionRequest::new(&messages)).await.unwrap_err();

    assert!(matches!(err, LlmError::Upstream(_)), "{err}");
    assert_eq!(mock.request_count(), 3);
}

#[tokio::test]
async fn rejected_request_is_not_retried() {
    let mock = MockVendor::start_failing(1, StatusCode::UNAUTHORIZED, [text_reply("unreachable")])
        .await
        .unwrap();
    let client = client(ProviderKind::Anthropic, MODEL, mock.v1_url(), 5);

    let messages = [Message::user_text("Hi")];
    let err = client.complete(CompletionRequest::new(&messages)).await.unwrap_err();

    assert!(matches!(err, LlmError::Rejected { status: 401, .. }), "{err}");
    assert_eq!(mock.request_count(), 1);
}

#[tokio::test]
async fn malformed_body_is_retried() {
    let mock = MockVendor::start([json!({"unexpected": true}), text_reply("second try")])
        .await
        .unwrap();
    let client = client(ProviderKind::Anthropic, MODEL, mock.v1_url(), 2);

    let messages = [Message::user_text("Hi")];
    let response = client.complete(CompletionRequest::new(&messages)).await.unwrap();

    assert_eq!(response.content, vec![Message::assistant_text("second try")]);
    assert_eq!(mock.request_count(), 2);
}

#[tokio::test]
async fn agent_answers_tool_use_with_matching_id() {
    let mock = MockVendor::start([
        json!({
            "id": "msg_1",
            "type": "message",
            "role": "assistant",
            "model": MODEL,
            "content": [
                {"type": "text", "text": "Echoing."},
                {"type": "tool_use", "id": "toolu_1", "name": "echo", "input": {"text": "hi"}}
            ],
            "stop_reason": "tool_use",
            "usage": {"input_tokens": 20, "output_tokens": 10}
        }),
        text_reply("Done."),
    ])
    .await
    .unwrap();

    let client = client(ProviderKind::Anthropic, MODEL, mock.v1_url(), 1);
    let mut agent = Agent::new(AgentKind::Developer, Arc::new(client)).with_tools(EchoTool::registry());
    let context = Context::new("Echo hi", "/work/repo");

    let messages: Vec<Message> = agent
        .invoke(&context, Some("Please echo hi".to_owned()))
        .try_collect()
        .await
        .unwrap();

    assert_eq!(messages.len(), 4);
    let result = messages[2].as_tool_result().unwrap();
    assert_eq!(result.tool_use_id, "toolu_1");
    assert_eq!(result.result, "echo: hi");
    assert!(!result.error);
    assert_eq!(agent.transcript().len(), 5);

    let first = mock.body(0);
    assert!(first["system"].as_str().unwrap().contains("## Task\n\nEcho hi"));
    assert_eq!(first["tools"][0]["name"], "echo");
    assert_eq!(first["tool_choice"]["disable_parallel_tool_use"], true);

    let second = mock.body(1);
    let turns = second["messages"].as_array().unwrap();
    assert_eq!(turns.len(), 3);
    assert_eq!(turns[1]["role"], "assistant");
    assert_eq!(turns[1]["content"][1]["id"], "toolu_1");
    assert_eq!(
        turns[2]["content"][0],
        json!({"type": "tool_result", "tool_use_id": "toolu_1", "content": "echo: hi", "is_error": false})
    );
}
