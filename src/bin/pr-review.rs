use anyhow::Result;
use clap::Parser;
use mcp_github_agents::agent::Agent;
use mcp_github_agents::cli::{self, CommonArgs};
use mcp_github_agents::config::Config;
use mcp_github_agents::error::AgentError;
use mcp_github_agents::input::{parse_pull_number, validate_github_name, Prompter};
use mcp_github_agents::llm::ChatGenerator;
use mcp_github_agents::review::{
    fetch_changed_files, fetch_pull_request, run_review, PullRequestTarget,
    REVIEW_SYSTEM_PROMPT, REVIEW_TOOLS,
};
use mcp_github_agents::tool::ToolProvider;

/// Review a GitHub pull request with an LLM agent and post the review
#[derive(Parser)]
#[command(name = "pr-review", version, about)]
struct Cli {
    #[command(flatten)]
    common: CommonArgs,

    /// Pull request number; prompted for when omitted
    #[arg(long = "pr")]
    pull_number: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    cli::init_tracing();

    // Missing credentials abort here, before anything is spawned or fetched.
    let config = cli.common.config()?;

    let mut prompter = Prompter::new(std::io::stdin().lock(), std::io::stdout());
    let owner = prompter.value_or_ask(cli.common.owner, "Enter repository owner")?;
    let repo = prompter.value_or_ask(cli.common.repo, "Enter repository name")?;
    let pull_number = match cli.pull_number {
        Some(raw) => parse_pull_number(&raw)?,
        None => parse_pull_number(&prompter.ask("Enter PR number")?)?,
    };
    validate_github_name(&owner, "owner")?;
    validate_github_name(&repo, "repo")?;

    let target = PullRequestTarget {
        owner,
        repo,
        pull_number,
    };

    match run(&config, &target).await {
        Ok(()) => {}
        Err(e) if e.is_fatal() => return Err(e.into()),
        Err(e) => {
            tracing::error!(error = %e, "PR review failed");
            println!("\nError during PR review: {}", e);
        }
    }

    Ok(())
}

async fn run(config: &Config, target: &PullRequestTarget) -> Result<(), AgentError> {
    let agent = cli::connect_agent(config, &REVIEW_TOOLS, REVIEW_SYSTEM_PROMPT).await?;
    let outcome = review(&agent, target).await;
    agent.into_tools().shutdown().await;
    outcome
}

async fn review<G, T>(agent: &Agent<G, T>, target: &PullRequestTarget) -> Result<(), AgentError>
where
    G: ChatGenerator,
    T: ToolProvider,
{
    fetch_pull_request(agent.tools(), target).await?;
    println!("\nFetched PR details");

    fetch_changed_files(agent.tools(), target).await?;
    println!("\nFetched changed files");

    let response = run_review(agent, target).await?;
    println!("\nAgent's analysis completed");
    println!("\nFinal response:");
    println!("{}", response);
    Ok(())
}
