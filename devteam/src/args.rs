use std::path::PathBuf;

use clap::Parser;
use devteam_config::AgentKind;

/// devteam agent runner
#[derive(Debug, Parser)]
#[command(name = "devteam", about = "Run a devteam agent on a task and print what it does")]
pub struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "devteam.toml", env = "DEVTEAM_CONFIG")]
    pub config: PathBuf,

    /// Agent to run: manager, architect, developer or qa
    #[arg(short, long, default_value = "developer")]
    pub agent: AgentKind,

    /// Task description rendered into the system message; defaults to the prompt
    #[arg(long)]
    pub task: Option<String>,

    /// Directory the agent works in
    #[arg(short = 'C', long, default_value = ".")]
    pub workdir: PathBuf,

    /// Print each message as one JSON object per line
    #[arg(long)]
    pub json: bool,

    /// Prompt sent to the agent as the first user message
    pub prompt: Option<String>,
}
