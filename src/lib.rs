//! LLM agents that work on GitHub through the GitHub MCP server.
//!
//! Two workflows are provided: reviewing a pull request and generating a
//! README for a repository branch. Each spawns the MCP server, exposes a
//! fixed set of its tools to a chat model and runs the agent once.

pub mod agent;
pub mod cli;
pub mod config;
pub mod error;
pub mod input;
pub mod llm;
pub mod mcp;
pub mod readme;
pub mod review;
pub mod tool;
