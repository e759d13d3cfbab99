use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::AgentError;

/// Keyword arguments for a tool call, in insertion order.
pub type ToolArguments = Map<String, Value>;

/// A tool as advertised to the LLM.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    /// JSON schema of the tool's arguments
    pub parameters: Value,
}

impl ToolDefinition {
    /// Whether the argument schema declares a property called `key`.
    pub fn accepts(&self, key: &str) -> bool {
        self.parameters
            .get("properties")
            .and_then(|p| p.as_object())
            .is_some_and(|props| props.contains_key(key))
    }
}

/// Something that can run named tools on behalf of an agent.
#[allow(async_fn_in_trait)]
pub trait ToolProvider {
    fn definitions(&self) -> &[ToolDefinition];

    fn definition(&self, name: &str) -> Option<&ToolDefinition> {
        self.definitions().iter().find(|d| d.name == name)
    }

    /// Run the tool and return its textual result.
    async fn invoke(&self, name: &str, arguments: ToolArguments) -> Result<String, AgentError>;
}
