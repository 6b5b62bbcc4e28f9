//! Discord MCP Server
//!
//! Exposes Discord server administration and messaging to AI assistants via
//! Model Context Protocol. Implements MCP JSON-RPC protocol over stdio.

pub mod args;
pub mod catalog;
pub mod config;
pub mod discord;
pub mod dispatch;
pub mod error;
pub mod gate;
pub mod handlers;
pub mod platform;
pub mod protocol;
pub mod server;

pub use config::{Config, ConfigError};
pub use discord::DiscordHttp;
pub use dispatch::{Dispatcher, Tool};
pub use error::ToolError;
pub use gate::ReadinessGate;
pub use platform::{DiscordOperations, RemoteError};
pub use server::{McpError, McpServer};
