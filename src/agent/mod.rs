//! Agent module - the tool-calling chat loop.
//!
//! The agent follows a "tools in a loop" pattern:
//! 1. Build context from the visitor's message (plus the system prompt when
//!    `SYSTEM_PROMPT` is enabled)
//! 2. Call the LLM with available tools
//! 3. If the LLM requests tool calls, run them in request order and feed
//!    results back
//! 4. Repeat until the LLM produces a final reply, the round limit is hit,
//!    or the request timeout expires

mod agent_loop;
mod prompt;

pub use agent_loop::{Agent, AgentError};
pub use prompt::build_system_prompt;
