//! Core agent loop implementation.

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;

use crate::config::Config;
use crate::llm::{ChatMessage, GeminiClient, LlmClient, LlmError, ToolCall};
use crate::tools::{ToolError, ToolRegistry};

use super::prompt::build_system_prompt;

#[derive(Debug, Error)]
pub enum AgentError {
    #[error(transparent)]
    Backend(#[from] LlmError),

    #[error("Model returned an empty response")]
    EmptyResponse,

    #[error("Model requested a tool that is not registered: {0}")]
    UnknownTool(String),

    #[error("Max iterations ({0}) reached without completion")]
    MaxIterations(usize),

    #[error("Request timed out after {0:?}")]
    Timeout(Duration),
}

/// The tool-calling chat agent. Holds no per-conversation state.
pub struct Agent {
    config: Config,
    llm: Arc<dyn LlmClient>,
    tools: ToolRegistry,
}

impl Agent {
    /// Create an agent backed by the Gemini API.
    pub fn new(config: Config) -> Result<Self, LlmError> {
        let llm = Arc::new(GeminiClient::new(
            config.api_key.clone(),
            config.gemini_base_url.clone(),
            config.llm_timeout,
        )?);
        Ok(Self::with_client(config, llm, ToolRegistry::new()))
    }

    /// Create an agent over any backend and tool set.
    pub fn with_client(config: Config, llm: Arc<dyn LlmClient>, tools: ToolRegistry) -> Self {
        Self { config, llm, tools }
    }

    /// Answer one user message. The whole exchange, including every model
    /// round, must finish within `config.request_timeout`.
    pub async fn run(&self, message: &str) -> Result<String, AgentError> {
        let budget = self.config.request_timeout;
        match tokio::time::timeout(budget, self.run_loop(message)).await {
            Ok(result) => result,
            Err(_) => {
                tracing::warn!(timeout_secs = budget.as_secs_f64(), "Agent run timed out");
                Err(AgentError::Timeout(budget))
            }
        }
    }

    async fn run_loop(&self, message: &str) -> Result<String, AgentError> {
        let model = self.config.default_model.as_str();
        let mut messages = Vec::with_capacity(2);
        if self.config.system_prompt {
            messages.push(ChatMessage::system(build_system_prompt(&self.tools)));
        }
        messages.push(ChatMessage::user(message));

        let tool_schemas = self.tools.get_tool_schemas();

        for iteration in 0..self.config.max_iterations {
            tracing::debug!("Agent iteration {}", iteration + 1);

            let response = self
                .llm
                .chat_completion(model, &messages, Some(tool_schemas.as_slice()))
                .await?;

            if let Some(tool_calls) = response.tool_calls.filter(|c| !c.is_empty()) {
                let results = self.execute_tool_calls(&tool_calls)?;

                messages.push(ChatMessage::assistant_tool_calls(response.content, tool_calls));
                messages.extend(results);
                continue;
            }

            // No tool calls - this is the final response
            return match response.content {
                Some(content) if !content.trim().is_empty() => {
                    tracing::debug!(
                        iterations = iteration + 1,
                        reply_len = content.len(),
                        "Agent produced final reply"
                    );
                    Ok(content)
                }
                _ => Err(AgentError::EmptyResponse),
            };
        }

        Err(AgentError::MaxIterations(self.config.max_iterations))
    }

    /// Run one batch of tool calls and return the result turns in call order.
    ///
    /// Every name is checked before any tool runs, so a batch containing an
    /// unknown tool has no partial effect on the conversation.
    fn execute_tool_calls(&self, calls: &[ToolCall]) -> Result<Vec<ChatMessage>, AgentError> {
        for call in calls {
            if let Err(ToolError::UnknownTool(name)) = self.tools.resolve(&call.function.name) {
                tracing::error!(tool = %name, "Model requested unregistered tool");
                return Err(AgentError::UnknownTool(name));
            }
        }

        calls
            .iter()
            .map(|call| {
                tracing::info!(
                    tool = %call.function.name,
                    args = %call.function.arguments,
                    "Calling tool"
                );
                (call, self.tools.execute(&call.function.name, &call.function.arguments))
            })
            .map(|(call, result)| match result {
                Ok(output) => Ok(ChatMessage::tool_result(call, output)),
                // Bad arguments go back to the model so it can correct itself.
                Err(ToolError::MissingArgument(param)) => {
                    tracing::warn!(tool = %call.function.name, param, "Tool call missing argument");
                    Ok(ChatMessage::tool_result(
                        call,
                        format!("Error: {}", ToolError::MissingArgument(param)),
                    ))
                }
                Err(ToolError::UnknownTool(name)) => Err(AgentError::UnknownTool(name)),
            })
            .collect()
    }
}
