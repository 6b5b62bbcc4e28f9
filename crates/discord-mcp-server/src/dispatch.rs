//! Routes a tool call to its handler behind the readiness gate.

use std::str::FromStr;
use std::sync::Arc;

use log::debug;
use serde_json::Value;

use crate::args::ToolArgs;
use crate::error::{normalize, ToolError};
use crate::gate::ReadinessGate;
use crate::handlers;
use crate::platform::DiscordOperations;
use crate::protocol::ToolResult;

/// Closed set of tools with a handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tool {
    GetServerInfo,
    ListMembers,
    ListAllChannels,
    GetChannelInfo,
    EditChannel,
    AddRole,
    RemoveRole,
    ListRoles,
    CreateRole,
    DeleteRole,
    EditRole,
    CreateTextChannel,
    DeleteChannel,
    CreateThread,
    DeleteThread,
    ArchiveThread,
    UnarchiveThread,
    AddReaction,
    AddMultipleReactions,
    RemoveReaction,
    SendMessage,
    ReadMessages,
    GetUserInfo,
    ModerateMessage,
    ListGlobalCommands,
    ListGuildCommands,
}

impl Tool {
    pub const ALL: [Tool; 26] = [
        Tool::GetServerInfo,
        Tool::ListMembers,
        Tool::ListAllChannels,
        Tool::GetChannelInfo,
        Tool::EditChannel,
        Tool::AddRole,
        Tool::RemoveRole,
        Tool::ListRoles,
        Tool::CreateRole,
        Tool::DeleteRole,
        Tool::EditRole,
        Tool::CreateTextChannel,
        Tool::DeleteChannel,
        Tool::CreateThread,
        Tool::DeleteThread,
        Tool::ArchiveThread,
        Tool::UnarchiveThread,
        Tool::AddReaction,
        Tool::AddMultipleReactions,
        Tool::RemoveReaction,
        Tool::SendMessage,
        Tool::ReadMessages,
        Tool::GetUserInfo,
        Tool::ModerateMessage,
        Tool::ListGlobalCommands,
        Tool::ListGuildCommands,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Tool::GetServerInfo => "get_server_info",
            Tool::ListMembers => "list_members",
            Tool::ListAllChannels => "list_all_channels",
            Tool::GetChannelInfo => "get_channel_info",
            Tool::EditChannel => "edit_channel",
            Tool::AddRole => "add_role",
            Tool::RemoveRole => "remove_role",
            Tool::ListRoles => "list_roles",
            Tool::CreateRole => "create_role",
            Tool::DeleteRole => "delete_role",
            Tool::EditRole => "edit_role",
            Tool::CreateTextChannel => "create_text_channel",
            Tool::DeleteChannel => "delete_channel",
            Tool::CreateThread => "create_thread",
            Tool::DeleteThread => "delete_thread",
            Tool::ArchiveThread => "archive_thread",
            Tool::UnarchiveThread => "unarchive_thread",
            Tool::AddReaction => "add_reaction",
            Tool::AddMultipleReactions => "add_multiple_reactions",
            Tool::RemoveReaction => "remove_reaction",
            Tool::SendMessage => "send_message",
            Tool::ReadMessages => "read_messages",
            Tool::GetUserInfo => "get_user_info",
            Tool::ModerateMessage => "moderate_message",
            Tool::ListGlobalCommands => "list_global_commands",
            Tool::ListGuildCommands => "list_guild_commands",
        }
    }
}

impl FromStr for Tool {
    type Err = ToolError;

    /// Exact, case-sensitive match.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Tool::ALL
            .iter()
            .copied()
            .find(|t| t.name() == s)
            .ok_or_else(|| ToolError::UnknownTool(s.to_string()))
    }
}

/// Single catching boundary between the transport and the handlers.
pub struct Dispatcher<P> {
    gate: Arc<ReadinessGate<P>>,
}

impl<P> Clone for Dispatcher<P> {
    fn clone(&self) -> Self {
        Self {
            gate: Arc::clone(&self.gate),
        }
    }
}

impl<P: DiscordOperations> Dispatcher<P> {
    pub fn new(gate: Arc<ReadinessGate<P>>) -> Self {
        Self { gate }
    }

    pub fn is_ready(&self) -> bool {
        self.gate.is_ready()
    }

    /// Run one tool call. Never fails: faults come back as error results.
    pub async fn dispatch(&self, name: &str, arguments: Value) -> ToolResult {
        match self.try_dispatch(name, arguments).await {
            Ok(text) => ToolResult::success(text),
            Err(err) => normalize(name, &err),
        }
    }

    async fn try_dispatch(&self, name: &str, arguments: Value) -> Result<String, ToolError> {
        let session = self.gate.session()?;
        let tool: Tool = name.parse()?;
        let args = ToolArgs::from_value(arguments)?;
        debug!("Calling tool: {}", name);

        let p = session.as_ref();
        match tool {
            Tool::GetServerInfo => handlers::get_server_info(p, &args).await,
            Tool::ListMembers => handlers::list_members(p, &args).await,
            Tool::ListAllChannels => handlers::list_all_channels(p, &args).await,
            Tool::GetChannelInfo => handlers::get_channel_info(p, &args).await,
            Tool::EditChannel => handlers::edit_channel(p, &args).await,
            Tool::AddRole => handlers::add_role(p, &args).await,
            Tool::RemoveRole => handlers::remove_role(p, &args).await,
            Tool::ListRoles => handlers::list_roles(p, &args).await,
            Tool::CreateRole => handlers::create_role(p, &args).await,
            Tool::DeleteRole => handlers::delete_role(p, &args).await,
            Tool::EditRole => handlers::edit_role(p, &args).await,
            Tool::CreateTextChannel => handlers::create_text_channel(p, &args).await,
            Tool::DeleteChannel => handlers::delete_channel(p, &args).await,
            Tool::CreateThread => handlers::create_thread(p, &args).await,
            Tool::DeleteThread => handlers::delete_thread(p, &args).await,
            Tool::ArchiveThread => handlers::archive_thread(p, &args).await,
            Tool::UnarchiveThread => handlers::unarchive_thread(p, &args).await,
            Tool::AddReaction => handlers::add_reaction(p, &args).await,
            Tool::AddMultipleReactions => handlers::add_multiple_reactions(p, &args).await,
            Tool::RemoveReaction => handlers::remove_reaction(p, &args).await,
            Tool::SendMessage => handlers::send_message(p, &args).await,
            Tool::ReadMessages => handlers::read_messages(p, &args).await,
            Tool::GetUserInfo => handlers::get_user_info(p, &args).await,
            Tool::ModerateMessage => handlers::moderate_message(p, &args).await,
            Tool::ListGlobalCommands => handlers::list_global_commands(p, &args).await,
            Tool::ListGuildCommands => handlers::list_guild_commands(p, &args).await,
        }
    }
}

// ── Tests ────────────────────────────────────────────────────────────────
