#![allow(clippy::must_use_candidate, clippy::missing_errors_doc)]

mod args;

use args::Args;
use clap::Parser;
use devteam_agent::{Context, build_agent};
use devteam_config::Config;
use devteam_llm::{Message, MessageContent};
use devteam_tools::ToolRegistry;
use futures_util::StreamExt;
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let config = Config::load(&args.config)?;

    devteam_telemetry::init(&config.telemetry, "info")?;

    tracing::info!(
        config_path = %args.config.display(),
        agent = %args.agent,
        provider = %config.agents.provider,
        "starting devteam"
    );

    let mut agent = build_agent(&config, args.agent, ToolRegistry::new())?;

    let task = args.task.or_else(|| args.prompt.clone()).unwrap_or_default();
    let context = Context::new(task, args.workdir);

    let shutdown = CancellationToken::new();
    let shutdown_clone = shutdown.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            shutdown_clone.cancel();
        }
    });

    let mut stream = agent.invoke(&context, args.prompt);

    loop {
        let next = tokio::select! {
            () = shutdown.cancelled() => {
                tracing::info!("interrupted, stopping agent");
                break;
            }
            next = stream.next() => next,
        };

        let Some(message) = next else { break };
        print_message(&message?, args.json)?;
    }

    drop(stream);
    tracing::info!(messages = agent.transcript().len(), "devteam stopped");
    Ok(())
}

fn print_message(message: &Message, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string(message)?);
        return Ok(());
    }

    match &message.content {
        MessageContent::Text { text, thinking } => {
            if let Some(thinking) = thinking.as_ref().filter(|t| !t.thinking.is_empty()) {
                println!("[thinking] {}", thinking.thinking);
            }
            println!("{text}");
        }
        MessageContent::ToolUse { call, .. } => {
            let arguments = serde_json::Value::Object(call.arguments.clone());
            println!("-> {}({arguments}) [{}]", call.tool_name, call.tool_use_id);
        }
        MessageContent::ToolUseResult { call_result } => {
            let marker = if call_result.error { "error" } else { "ok" };
            println!("<- {} {marker}: {}", call_result.tool_name, call_result.result);
        }
    }

    Ok(())
}
