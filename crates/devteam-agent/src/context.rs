use std::fmt::Write as _;
use std::path::{Path, PathBuf};

/// Read-only facts about the task an agent is invoked for
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Context {
    task: String,
    working_directory: PathBuf,
}

impl Context {
    pub fn new(task: impl Into<String>, working_directory: impl Into<PathBuf>) -> Self {
        Self {
            task: task.into(),
            working_directory: working_directory.into(),
        }
    }

    pub fn task(&self) -> &str {
        &self.task
    }

    pub fn working_directory(&self) -> &Path {
        &self.working_directory
    }

    /// Section appended to the agent's system message
    pub fn render(&self) -> String {
        let mut out = String::from("## Task\n\n");
        let task = self.task.trim();
        out.push_str(if task.is_empty() { "(no description)" } else { task });
        let _ = write!(out, "\n\n## Working directory\n\n{}", self.working_directory.display());
        out
    }
}
