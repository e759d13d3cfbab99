//! Client side of the GitHub MCP server.
//!
//! The server runs as a child process speaking MCP over stdio. Only the
//! tools a workflow asks for are exposed to the agent.

use std::collections::HashMap;

use rmcp::model::{CallToolResult, Tool};
use rmcp::service::RunningService;
use rmcp::transport::TokioChildProcess;
use rmcp::{RoleClient, ServiceExt};
use tokio::process::Command;

use crate::config::GITHUB_TOKEN_VAR;
use crate::error::AgentError;
use crate::tool::{ToolArguments, ToolDefinition, ToolProvider};

/// How to launch an MCP server over stdio.
#[derive(Clone)]
pub struct McpServerSpec {
    pub command: String,
    pub args: Vec<String>,
    /// Extra environment for the child; values are never logged
    pub env: HashMap<String, String>,
}

impl McpServerSpec {
    /// The GitHub MCP server in a throwaway container. The token reaches the
    /// container through the child's environment, not its command line.
    pub fn github(image: &str, token: &str) -> Self {
        Self {
            command: "docker".to_string(),
            args: vec![
                "run".to_string(),
                "-i".to_string(),
                "--rm".to_string(),
                "-e".to_string(),
                GITHUB_TOKEN_VAR.to_string(),
                image.to_string(),
            ],
            env: HashMap::from([(GITHUB_TOKEN_VAR.to_string(), token.to_string())]),
        }
    }

    fn to_command(&self) -> Command {
        let mut cmd = Command::new(&self.command);
        cmd.args(&self.args).envs(&self.env);
        cmd
    }
}

/// A running MCP session restricted to a fixed set of tools.
pub struct McpToolset {
    client: RunningService<RoleClient, ()>,
    definitions: Vec<ToolDefinition>,
}

impl McpToolset {
    /// Spawn the server and keep only `names`, in that order.
    pub async fn connect(spec: &McpServerSpec, names: &[&str]) -> Result<Self, AgentError> {
        tracing::info!(command = %spec.command, args = ?spec.args, "Starting MCP server");

        let transport =
            TokioChildProcess::new(spec.to_command()).map_err(|e| AgentError::McpStart(e.to_string()))?;
        let client = ()
            .serve(transport)
            .await
            .map_err(|e| AgentError::McpStart(e.to_string()))?;

        let offered = match client.list_all_tools().await {
            Ok(tools) => tools,
            Err(e) => {
                let _ = client.cancel().await;
                return Err(AgentError::Mcp(e.to_string()));
            }
        };
        tracing::debug!(count = offered.len(), "MCP server listed tools");

        let definitions = match select_tools(&offered, names) {
            Ok(defs) => defs,
            Err(e) => {
                let _ = client.cancel().await;
                return Err(e);
            }
        };

        tracing::info!(tools = ?names, "MCP tools ready");
        Ok(Self {
            client,
            definitions,
        })
    }

    /// Cancel the session and tear down the child process.
    pub async fn shutdown(self) {
        match self.client.cancel().await {
            Ok(reason) => tracing::debug!(?reason, "MCP session closed"),
            Err(e) => tracing::warn!(error = %e, "MCP session did not shut down cleanly"),
        }
    }
}

impl ToolProvider for McpToolset {
    fn definitions(&self) -> &[ToolDefinition] {
        &self.definitions
    }

    async fn invoke(&self, name: &str, arguments: ToolArguments) -> Result<String, AgentError> {
        if self.definition(name).is_none() {
            return Err(AgentError::ToolNotFound(name.to_string()));
        }

        tracing::debug!(tool = name, args = ?arguments.keys().collect::<Vec<_>>(), "Calling MCP tool");

        let params = serde_json::from_value(serde_json::json!({
            "name": name,
            "arguments": arguments,
        }))?;
        let result = self
            .client
            .call_tool(params)
            .await
            .map_err(|e| AgentError::Mcp(e.to_string()))?;

        let text = result_text(&result)?;
        if result.is_error.unwrap_or(false) {
            return Err(AgentError::ToolFailed {
                name: name.to_string(),
                message: text,
            });
        }
        Ok(text)
    }
}

/// Pick the requested tools out of what the server offers.
fn select_tools(offered: &[Tool], names: &[&str]) -> Result<Vec<ToolDefinition>, AgentError> {
    names
        .iter()
        .map(|name| {
            offered
                .iter()
                .find(|t| t.name == *name)
                .map(to_definition)
                .ok_or_else(|| AgentError::ToolNotFound(name.to_string()))
        })
        .collect()
}

fn to_definition(tool: &Tool) -> ToolDefinition {
    ToolDefinition {
        name: tool.name.to_string(),
        description: tool.description.as_deref().unwrap_or_default().to_string(),
        parameters: serde_json::Value::Object((*tool.input_schema).clone()),
    }
}

/// Text content joined by newlines; structured content when there is no text.
fn result_text(result: &CallToolResult) -> Result<String, AgentError> {
    let parts: Vec<&str> = result
        .content
        .iter()
        .filter_map(|c| c.as_text())
        .map(|t| t.text.as_str())
        .collect();

    if !parts.is_empty() {
        return Ok(parts.join("\n"));
    }
    match result.structured_content {
        Some(ref value) => Ok(serde_json::to_string(value)?),
        None => Ok(String::new()),
    }
}
