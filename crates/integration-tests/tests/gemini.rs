mod harness;

use std::sync::Arc;

use devteam_agent::{Agent, Context};
use devteam_config::{AgentKind, ProviderKind};
use devteam_llm::{CompletionClient, CompletionRequest, Message, StopReason};
use futures_util::TryStreamExt;
use harness::mock_vendor::MockVendor;
use harness::{EchoTool, client};
use serde_json::{Value, json};

const MODEL: &str = "gemini-2.5-flash";

fn text_reply(text: &str) -> Value {
    json!({
        "candidates": [{
            "content": {"role": "model", "parts": [{"text": text}]},
            "finishReason": "STOP"
        }],
        "usageMetadata": {"promptTokenCount": 9, "candidatesTokenCount": 2}
    })
}

#[tokio::test]
async fn completion_targets_model_path_with_key() {
    let mock = MockVendor::start([text_reply("Hello")]).await.unwrap();
    let client = client(ProviderKind::Gemini, MODEL, mock.v1beta_url(), 1);

    let messages = [Message::user_text("Hi")];
    let request = CompletionRequest::new(&messages).with_system(Some("Be brief."));
    let response = client.complete(request).await.unwrap();

    assert_eq!(response.content, vec![Message::assistant_text("Hello")]);
    assert_eq!(response.stop_reason, StopReason::EndTurn);
    assert_eq!(response.usage.unwrap().input_tokens, 9);

    let recorded = &mock.requests()[0];
    assert_eq!(recorded.path, "/v1beta/models/gemini-2.5-flash:generateContent");
    assert_eq!(recorded.credential.as_deref(), Some("gemini-test-key"));
    assert_eq!(recorded.body["systemInstruction"]["parts"][0]["text"], "Be brief.");
    assert_eq!(recorded.body["contents"][0]["role"], "user");
}

#[tokio::test]
async fn blocked_prompt_yields_no_candidates() {
    let mock = MockVendor::start([json!({
        "candidates": [],
        "promptFeedback": {"blockReason": "SAFETY"},
        "usageMetadata": {"promptTokenCount": 9, "candidatesTokenCount": 0}
    })])
    .await
    .unwrap();
    let client = client(ProviderKind::Gemini, MODEL, mock.v1beta_url(), 3);

    let mut agent = Agent::new(AgentKind::Qa, Arc::new(client));
    let messages: Vec<Message> = agent
        .invoke(&Context::new("Review", "."), Some("Anything".to_owned()))
        .try_collect()
        .await
        .unwrap();

    assert!(messages.is_empty());
    assert_eq!(agent.transcript().len(), 1);
    assert_eq!(mock.request_count(), 1);
}

#[tokio::test]
async fn call_without_id_gets_local_id_that_is_not_sent() {
    let mock = MockVendor::start([
        json!({
            "candidates": [{
                "content": {
                    "role": "model",
                    "parts": [{"functionCall": {"name": "echo", "args": {"text": "hi"}}}]
                },
                "finishReason": "STOP"
            }]
        }),
        text_reply("Done."),
    ])
    .await
    .unwrap();
    let client = client(ProviderKind::Gemini, MODEL, mock.v1beta_url(), 1);

    let mut agent = Agent::new(AgentKind::Developer, Arc::new(client)).with_tools(EchoTool::registry());
    let messages: Vec<Message> = agent
        .invoke(&Context::new("Echo", "."), Some("Echo hi".to_owned()))
        .try_collect()
        .await
        .unwrap();

    assert_eq!(messages.len(), 3);
    let call = messages[0].as_tool_use().unwrap();
    assert!(call.has_local_id());
    assert_eq!(messages[1].as_tool_result().unwrap().tool_use_id, call.tool_use_id);

    let first = mock.body(0);
    assert_eq!(first["tools"][0]["functionDeclarations"][0]["name"], "echo");

    let contents = mock.body(1)["contents"].as_array().unwrap().clone();
    assert_eq!(contents.len(), 3);
    let function_call = &contents[1]["parts"][0]["functionCall"];
    assert_eq!(function_call["name"], "echo");
    assert!(function_call.get("id").is_none());
    assert_eq!(
        contents[2]["parts"][0]["functionResponse"],
        json!({"name": "echo", "response": {"result": "echo: hi"}})
    );
}
