use crate::config::ConfigError;

#[derive(Debug, thiserror::Error)]
pub enum AgentError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Failed to start MCP server: {0}")]
    McpStart(String),

    #[error("MCP error: {0}")]
    Mcp(String),

    #[error("Tool not offered by the MCP server: {0}")]
    ToolNotFound(String),

    #[error("Tool {name} failed: {message}")]
    ToolFailed { name: String, message: String },

    #[error("LLM request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("LLM API returned {status}: {body}")]
    LlmApi { status: u16, body: String },

    #[error("LLM returned no choices")]
    EmptyCompletion,

    #[error("Agent gave no final answer within {0} steps")]
    StepLimit(usize),

    #[error("Agent produced no text response")]
    NoResponse,

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl AgentError {
    /// Whether the error should abort the process instead of being reported
    /// as a failed run.
    pub fn is_fatal(&self) -> bool {
        matches!(self, AgentError::Config(_) | AgentError::InvalidInput(_))
    }
}
