//! Single-shot tool-calling agent.
//!
//! The model decides which tools to call; the agent only executes the calls
//! it asks for and hands the results back until the model answers in text.

use serde_json::Value;

use crate::error::AgentError;
use crate::llm::{ChatGenerator, ChatMessage, ToolCall};
use crate::tool::{ToolArguments, ToolProvider};

const DEFAULT_MAX_STEPS: usize = 20;

pub struct Agent<G, T> {
    generator: G,
    tools: T,
    system_prompt: String,
    max_steps: usize,
    default_arguments: ToolArguments,
}

/// Transcript of one agent run, system prompt included.
#[derive(Debug, Clone)]
pub struct AgentRun {
    pub messages: Vec<ChatMessage>,
}

impl AgentRun {
    /// Text of the last message in the conversation.
    pub fn final_text(&self) -> Result<&str, AgentError> {
        self.messages
            .last()
            .and_then(ChatMessage::text)
            .ok_or(AgentError::NoResponse)
    }

    /// Number of tool calls the model made during the run.
    pub fn tool_call_count(&self) -> usize {
        self.messages.iter().map(|m| m.tool_calls().len()).sum()
    }
}

impl<G: ChatGenerator, T: ToolProvider> Agent<G, T> {
    pub fn new(generator: G, tools: T, system_prompt: impl Into<String>) -> Self {
        Self {
            generator,
            tools,
            system_prompt: system_prompt.into(),
            max_steps: DEFAULT_MAX_STEPS,
            default_arguments: ToolArguments::new(),
        }
    }

    /// Cap on generator round trips per run. A run that reaches the cap
    /// without a text answer fails with `AgentError::StepLimit` and its
    /// transcript is discarded.
    pub fn with_max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = max_steps.max(1);
        self
    }

    /// Arguments added to every tool call that declares them but omits them.
    pub fn with_default_arguments(mut self, arguments: ToolArguments) -> Self {
        self.default_arguments = arguments;
        self
    }

    pub fn generator(&self) -> &G {
        &self.generator
    }

    pub fn tools(&self) -> &T {
        &self.tools
    }

    pub fn into_tools(self) -> T {
        self.tools
    }

    pub async fn run(&self, messages: Vec<ChatMessage>) -> Result<AgentRun, AgentError> {
        let mut conversation = Vec::with_capacity(messages.len() + 1);
        conversation.push(ChatMessage::system(self.system_prompt.clone()));
        conversation.extend(messages);

        for step in 1..=self.max_steps {
            let reply = self
                .generator
                .generate(&conversation, self.tools.definitions())
                .await?;
            let calls = reply.tool_calls().to_vec();
            conversation.push(reply);

            if calls.is_empty() {
                tracing::info!(step, "Agent finished");
                return Ok(AgentRun {
                    messages: conversation,
                });
            }

            tracing::info!(step, calls = calls.len(), "Agent requested tool calls");
            for call in &calls {
                let content = self.execute(call).await;
                conversation.push(ChatMessage::Tool {
                    tool_call_id: call.id.clone(),
                    content,
                });
            }
        }

        Err(AgentError::StepLimit(self.max_steps))
    }

    /// Run one tool call. Failures become the tool's reply so the model can
    /// react to them.
    async fn execute(&self, call: &ToolCall) -> String {
        let name = call.function.name.as_str();
        let result = match self.arguments_for(call) {
            Ok(arguments) => self.tools.invoke(name, arguments).await,
            Err(e) => Err(e),
        };
        match result {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!(tool = name, error = %e, "Tool call failed");
                format!("Error: {}", e)
            }
        }
    }

    fn arguments_for(&self, call: &ToolCall) -> Result<ToolArguments, AgentError> {
        let name = call.function.name.as_str();
        let definition = self
            .tools
            .definition(name)
            .ok_or_else(|| AgentError::ToolNotFound(name.to_string()))?;

        let raw = call.function.arguments.trim();
        let mut arguments = if raw.is_empty() {
            ToolArguments::new()
        } else {
            match serde_json::from_str::<Value>(raw)? {
                Value::Object(map) => map,
                other => {
                    return Err(AgentError::InvalidInput(format!(
                        "arguments for {} must be a JSON object, got {}",
                        name, other
                    )))
                }
            }
        };

        for (key, value) in &self.default_arguments {
            if !arguments.contains_key(key) && definition.accepts(key) {
                arguments.insert(key.clone(), value.clone());
            }
        }
        Ok(arguments)
    }
}
