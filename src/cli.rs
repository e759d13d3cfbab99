//! Pieces shared by the `pr-review` and `readme-agent` binaries.

use std::path::PathBuf;

use clap::Args;
use tracing_subscriber::EnvFilter;

use crate::agent::Agent;
use crate::config::Config;
use crate::error::AgentError;
use crate::llm::OpenAiChatGenerator;
use crate::mcp::{McpServerSpec, McpToolset};

#[derive(Args, Debug, Clone)]
pub struct CommonArgs {
    /// Repository owner (user or org); prompted for when omitted
    #[arg(long)]
    pub owner: Option<String>,

    /// Repository name; prompted for when omitted
    #[arg(long)]
    pub repo: Option<String>,

    /// File holding GITHUB_PERSONAL_ACCESS_TOKEN and OPENAI_API_KEY
    #[arg(long = "env-file", default_value = ".env")]
    pub env_file: PathBuf,

    /// Chat model, overriding OPENAI_MODEL
    #[arg(long)]
    pub model: Option<String>,
}

impl CommonArgs {
    /// Read the configuration, applying command-line overrides.
    pub fn config(&self) -> Result<Config, AgentError> {
        let mut config = Config::load(&self.env_file)?;
        if let Some(ref model) = self.model {
            config.model = model.clone();
        }
        Ok(config)
    }
}

/// Logs go to stderr so stdout carries only program output.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();
}

/// Start the GitHub MCP server with `tools` and wrap it in an agent.
pub async fn connect_agent(
    config: &Config,
    tools: &[&str],
    system_prompt: &str,
) -> Result<Agent<OpenAiChatGenerator, McpToolset>, AgentError> {
    let generator =
        OpenAiChatGenerator::new(&config.openai_api_key, &config.openai_base_url, &config.model)?;
    let spec = McpServerSpec::github(&config.mcp_server_image, &config.github_token);
    let toolset = McpToolset::connect(&spec, tools).await?;

    tracing::info!(model = generator.model(), max_steps = config.max_agent_steps, "Agent created");
    Ok(Agent::new(generator, toolset, system_prompt).with_max_steps(config.max_agent_steps))
}
