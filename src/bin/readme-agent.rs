use anyhow::Result;
use clap::Parser;
use mcp_github_agents::agent::Agent;
use mcp_github_agents::cli::{self, CommonArgs};
use mcp_github_agents::config::Config;
use mcp_github_agents::error::AgentError;
use mcp_github_agents::input::{validate_branch, validate_github_name, Prompter};
use mcp_github_agents::llm::ChatGenerator;
use mcp_github_agents::readme::{
    generate_readme, publish_readme, ReadmeTarget, README_SYSTEM_PROMPT, README_TOOLS,
};
use mcp_github_agents::tool::ToolProvider;

/// Generate a README.md for a GitHub repository with an LLM agent and push it
#[derive(Parser)]
#[command(name = "readme-agent", version, about)]
struct Cli {
    #[command(flatten)]
    common: CommonArgs,

    /// Branch to analyse and commit to; prompted for when omitted
    #[arg(long)]
    branch: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    cli::init_tracing();

    let config = cli.common.config()?;

    let mut prompter = Prompter::new(std::io::stdin().lock(), std::io::stdout());
    let owner = prompter.value_or_ask(cli.common.owner, "Enter repository owner")?;
    let repo = prompter.value_or_ask(cli.common.repo, "Enter repository name")?;
    let branch = prompter.value_or_ask(cli.branch, "Enter branch name")?;
    validate_github_name(&owner, "owner")?;
    validate_github_name(&repo, "repo")?;
    validate_branch(&branch)?;

    let target = ReadmeTarget {
        owner,
        repo,
        branch,
    };

    match run(&config, &target).await {
        Ok(()) => {}
        Err(e) if e.is_fatal() => return Err(e.into()),
        Err(e) => {
            tracing::error!(error = %e, "README generation failed");
            println!("\nError during README generation: {}", e);
        }
    }

    Ok(())
}

async fn run(config: &Config, target: &ReadmeTarget) -> Result<(), AgentError> {
    let agent = cli::connect_agent(config, &README_TOOLS, README_SYSTEM_PROMPT)
        .await?
        .with_default_arguments(target.default_arguments());

    let outcome = publish(&agent, target).await;
    agent.into_tools().shutdown().await;
    outcome
}

async fn publish<G, T>(
    agent: &Agent<G, T>,
    target: &ReadmeTarget,
) -> Result<(), AgentError>
where
    G: ChatGenerator,
    T: ToolProvider,
{
    let readme = generate_readme(agent, target).await?;
    println!("\nAgent's README generation completed");
    println!("\nGenerated README.md content:\n");
    println!("{}", readme);

    println!("\nPushing README.md to GitHub repository...");
    let result = publish_readme(agent.tools(), target, &readme).await?;
    println!("\nREADME.md pushed to GitHub!");
    println!("{}", result);
    Ok(())
}
