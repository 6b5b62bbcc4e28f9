//! Discord MCP Server - Entry Point
//!
//! Runs the MCP server over stdio for integration with Claude Desktop.
//! The Discord connection is made in the background; tool calls answer
//! "not ready" until it succeeds.

use std::sync::Arc;

use anyhow::{Context, Result};
use argh::FromArgs;
use discord_mcp_server::config::DEFAULT_TOKEN_ENV;
use discord_mcp_server::{Config, Dispatcher, DiscordHttp, McpServer, ReadinessGate};

/// Discord MCP Server - Expose a Discord bot to AI assistants
#[derive(FromArgs)]
struct Args {
    /// environment variable holding the bot token (default: DISCORD_TOKEN)
    #[argh(option, default = "String::from(DEFAULT_TOKEN_ENV)")]
    token_env: String,

    /// discord REST API base URL (default: https://discord.com/api/v10)
    #[argh(option)]
    api_base: Option<String>,

    /// log filter, overrides RUST_LOG (e.g. debug, discord_mcp_server=trace)
    #[argh(option)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let args: Args = argh::from_env();

    // Initialize logging to stderr (stdout is used for MCP protocol)
    let mut logger =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if let Some(level) = &args.log_level {
        logger.parse_filters(level);
    }
    logger.target(env_logger::Target::Stderr).init();

    let config = Config::from_env(&args.token_env, args.api_base)
        .context("Failed to load configuration")?;

    log::info!("Starting Discord MCP server");
    log::debug!("Configuration: {:?}", config);

    let gate: Arc<ReadinessGate<DiscordHttp>> = Arc::new(ReadinessGate::new());

    let connect_gate = Arc::clone(&gate);
    tokio::spawn(async move {
        match DiscordHttp::connect(&config).await {
            Ok(session) => {
                log::info!(
                    "Logged in as {} (ID: {})",
                    session.bot_user(),
                    session.bot_user().id
                );
                connect_gate.open(Arc::new(session));
            }
            Err(e) => log::error!("Failed to connect to Discord: {}", e),
        }
    });

    // Run over stdio
    let server = McpServer::new(Dispatcher::new(gate));
    server.run_stdio().await?;

    Ok(())
}
