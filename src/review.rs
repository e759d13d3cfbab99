//! Pull request review workflow.

use serde_json::json;

use crate::agent::Agent;
use crate::error::AgentError;
use crate::llm::{ChatGenerator, ChatMessage};
use crate::tool::{ToolArguments, ToolProvider};

pub const GET_PULL_REQUEST: &str = "get_pull_request";
pub const GET_PULL_REQUEST_FILES: &str = "get_pull_request_files";
pub const CREATE_PULL_REQUEST_REVIEW: &str = "create_pull_request_review";

pub const REVIEW_TOOLS: [&str; 3] = [
    GET_PULL_REQUEST,
    GET_PULL_REQUEST_FILES,
    CREATE_PULL_REQUEST_REVIEW,
];

pub const REVIEW_SYSTEM_PROMPT: &str = "\
You are a helpful AI assistant that reviews GitHub pull requests.
Your task is to:
1. Get the PR details using get_pull_request
2. Get the list of changed files using get_pull_request_files
3. Review the changes and create a review using create_pull_request_review with:
   - event: \"COMMENT\"
   - body: Your analysis of the changes
   - comments: Array of specific file comments, each with:
     * path: file path
     * body: comment text
     * line: line number
     * side: \"RIGHT\" for new version

Your comments should be:
- Clear and concise
- Focus on the purpose of the changes
- Highlight any potential improvements or concerns
- Be constructive and helpful";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequestTarget {
    pub owner: String,
    pub repo: String,
    pub pull_number: u64,
}

impl PullRequestTarget {
    /// Arguments shared by the pull request tools: owner, repo, pullNumber.
    pub fn tool_arguments(&self) -> ToolArguments {
        let mut args = ToolArguments::new();
        args.insert("owner".into(), json!(self.owner));
        args.insert("repo".into(), json!(self.repo));
        args.insert("pullNumber".into(), json!(self.pull_number));
        args
    }

    pub fn instruction(&self) -> String {
        format!(
            "Review the changes in PR #{} of {}/{} and create a review with comments.",
            self.pull_number, self.owner, self.repo
        )
    }
}

#[derive(Debug, Clone)]
pub struct ReviewReport {
    /// Raw `get_pull_request` result
    pub pull_request: String,
    /// Raw `get_pull_request_files` result
    pub changed_files: String,
    /// The agent's final answer
    pub response: String,
}

/// `get_pull_request` for the target.
pub async fn fetch_pull_request<T: ToolProvider>(
    tools: &T,
    target: &PullRequestTarget,
) -> Result<String, AgentError> {
    let details = tools
        .invoke(GET_PULL_REQUEST, target.tool_arguments())
        .await?;
    tracing::info!(owner = %target.owner, repo = %target.repo, pr = target.pull_number, "Fetched PR details");
    Ok(details)
}

/// `get_pull_request_files` for the target.
pub async fn fetch_changed_files<T: ToolProvider>(
    tools: &T,
    target: &PullRequestTarget,
) -> Result<String, AgentError> {
    let files = tools
        .invoke(GET_PULL_REQUEST_FILES, target.tool_arguments())
        .await?;
    tracing::info!(pr = target.pull_number, "Fetched changed files");
    Ok(files)
}

/// Ask the agent to review the pull request; returns its final answer.
pub async fn run_review<G, T>(
    agent: &Agent<G, T>,
    target: &PullRequestTarget,
) -> Result<String, AgentError>
where
    G: ChatGenerator,
    T: ToolProvider,
{
    let run = agent
        .run(vec![ChatMessage::user(target.instruction())])
        .await?;
    tracing::info!(tool_calls = run.tool_call_count(), "Review agent completed");
    Ok(run.final_text()?.to_string())
}

/// Fetch the pull request and its files, then let the agent post a review.
pub async fn review_pull_request<G, T>(
    agent: &Agent<G, T>,
    target: &PullRequestTarget,
) -> Result<ReviewReport, AgentError>
where
    G: ChatGenerator,
    T: ToolProvider,
{
    let pull_request = fetch_pull_request(agent.tools(), target).await?;
    let changed_files = fetch_changed_files(agent.tools(), target).await?;
    let response = run_review(agent, target).await?;

    Ok(ReviewReport {
        pull_request,
        changed_files,
        response,
    })
}
