//! README generation workflow: draft with the agent, then commit the result.

use serde_json::json;

use crate::agent::Agent;
use crate::error::AgentError;
use crate::llm::{ChatGenerator, ChatMessage};
use crate::tool::{ToolArguments, ToolProvider};

pub const GET_FILE_CONTENTS: &str = "get_file_contents";
pub const SEARCH_CODE: &str = "search_code";
pub const CREATE_OR_UPDATE_FILE: &str = "create_or_update_file";

pub const README_TOOLS: [&str; 3] = [GET_FILE_CONTENTS, SEARCH_CODE, CREATE_OR_UPDATE_FILE];

pub const README_PATH: &str = "README.md";
pub const COMMIT_MESSAGE: &str = "Add or update README.md via AI agent";

pub const README_SYSTEM_PROMPT: &str = "\
You are an AI assistant that generates a high-quality README.md for a given GitHub repository.
1. List all files in the repository.
2. Analyze all project configuration and build files (e.g., Makefile, Cargo.toml, requirements.txt, \
setup.py, package.json, pyproject.toml, Pipfile, environment.yml, etc.).
3. Generate a README.md in English with the following sections:
  - Project Description
  - Installation Instructions
  - Usage Instructions
Your output should be clear, concise, and beginner-friendly.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadmeTarget {
    pub owner: String,
    pub repo: String,
    pub branch: String,
}

impl ReadmeTarget {
    /// Defaults injected into the agent's tool calls.
    pub fn default_arguments(&self) -> ToolArguments {
        let mut args = ToolArguments::new();
        args.insert("owner".into(), json!(self.owner));
        args.insert("repo".into(), json!(self.repo));
        args.insert("branch".into(), json!(self.branch));
        args
    }

    pub fn instruction(&self) -> String {
        format!(
            "Generate a beginner-friendly README.md for the repository {}/{} on branch {}. \
             Analyze all project configuration and build files.",
            self.owner, self.repo, self.branch
        )
    }
}

/// Let the agent explore the repository and return the README text.
pub async fn generate_readme<G, T>(
    agent: &Agent<G, T>,
    target: &ReadmeTarget,
) -> Result<String, AgentError>
where
    G: ChatGenerator,
    T: ToolProvider,
{
    let run = agent
        .run(vec![ChatMessage::user(target.instruction())])
        .await?;
    tracing::info!(
        owner = %target.owner,
        repo = %target.repo,
        branch = %target.branch,
        tool_calls = run.tool_call_count(),
        "README generated"
    );
    Ok(run.final_text()?.to_string())
}

/// Commit `content` as README.md on the target branch.
pub async fn publish_readme<T: ToolProvider>(
    tools: &T,
    target: &ReadmeTarget,
    content: &str,
) -> Result<String, AgentError> {
    let mut args = ToolArguments::new();
    args.insert("owner".into(), json!(target.owner));
    args.insert("repo".into(), json!(target.repo));
    args.insert("branch".into(), json!(target.branch));
    args.insert("path".into(), json!(README_PATH));
    args.insert("content".into(), json!(content));
    args.insert("message".into(), json!(COMMIT_MESSAGE));

    let result = tools.invoke(CREATE_OR_UPDATE_FILE, args).await?;
    tracing::info!(branch = %target.branch, bytes = content.len(), "README.md pushed");
    Ok(result)
}
