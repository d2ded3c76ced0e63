//! # hive-agent
//!
//! Chat backend for a honey farm and its beekeeping academy.
//!
//! This library provides:
//! - An HTTP API (`POST /api/chat`) for the website's chat widget
//! - A tool-calling agent loop with stock and course-schedule lookups
//! - A Gemini client for LLM access
//!
//! ## Architecture
//!
//! Each chat request is independent:
//! 1. Receive a message via the API
//! 2. Build context with system prompt and available tools
//! 3. Call the LLM, run any tool calls it asks for, feed results back
//! 4. Repeat until the LLM answers, then return the reply
//!
//! ## Example
//!
//! ```rust,ignore
//! use hive_agent::{agent::Agent, config::Config};
//!
//! let config = Config::from_env()?;
//! let agent = Agent::new(config)?;
//! let reply = agent.run("Do you have comb honey?").await?;
//! ```

pub mod agent;
pub mod api;
pub mod config;
pub mod llm;
pub mod tools;

pub use config::Config;
