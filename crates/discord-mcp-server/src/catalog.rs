//! Static tool catalog advertised through `tools/list`.
//!
//! Schemas describe arguments for callers only; handlers validate their own
//! input.

use serde_json::{json, Value};

use crate::protocol::ToolDescriptor;

fn tool(name: &'static str, description: &'static str, input_schema: Value) -> ToolDescriptor {
    ToolDescriptor {
        name,
        description,
        input_schema,
    }
}

/// All tools, grouped by area.
pub fn tools() -> Vec<ToolDescriptor> {
    vec![
        // Server information
        tool(
            "get_server_info",
            "Get information about a Discord server",
            json!({
                "type": "object",
                "properties": {
                    "server_id": { "type": "string", "description": "Discord server (guild) ID" }
                },
                "required": ["server_id"]
            }),
        ),
        tool(
            "list_members",
            "Get a list of members in a server",
            json!({
                "type": "object",
                "properties": {
                    "server_id": { "type": "string", "description": "Discord server (guild) ID" },
                    "limit": {
                        "type": "number",
                        "description": "Maximum number of members to fetch",
                        "minimum": 1,
                        "maximum": 1000
                    }
                },
                "required": ["server_id"]
            }),
        ),
        // Channel management
        tool(
            "list_all_channels",
            "List all channels (text, voice, category, etc.) in a server",
            json!({
                "type": "object",
                "properties": {
                    "server_id": { "type": "string", "description": "Discord server (guild) ID" }
                },
                "required": ["server_id"]
            }),
        ),
        tool(
            "get_channel_info",
            "Get detailed information about a specific channel",
            json!({
                "type": "object",
                "properties": {
                    "channel_id": { "type": "string", "description": "The ID of the channel" }
                },
                "required": ["channel_id"]
            }),
        ),
        tool(
            "edit_channel",
            "Edit properties of a channel (name, topic, position, category)",
            json!({
                "type": "object",
                "properties": {
                    "channel_id": { "type": "string", "description": "ID of the channel to edit" },
                    "name": { "type": "string", "description": "New channel name" },
                    "topic": { "type": "string", "description": "New channel topic (text channels only)" },
                    "position": { "type": "integer", "description": "New channel position" },
                    "category_id": { "type": "string", "description": "ID of the category to move the channel under" },
                    "reason": { "type": "string", "description": "Reason for editing (audit log)" }
                },
                "required": ["channel_id"]
            }),
        ),
        tool(
            "create_text_channel",
            "Create a new text channel",
            json!({
                "type": "object",
                "properties": {
                    "server_id": { "type": "string", "description": "Discord server ID" },
                    "name": { "type": "string", "description": "Channel name" },
                    "category_id": { "type": "string", "description": "Optional category ID to place channel in" },
                    "topic": { "type": "string", "description": "Optional channel topic" }
                },
                "required": ["server_id", "name"]
            }),
        ),
        tool(
            "delete_channel",
            "Delete a channel",
            json!({
                "type": "object",
                "properties": {
                    "channel_id": { "type": "string", "description": "ID of channel to delete" },
                    "reason": { "type": "string", "description": "Reason for deletion" }
                },
                "required": ["channel_id"]
            }),
        ),
        // Role management
        tool(
            "add_role",
            "Add a role to a user",
            json!({
                "type": "object",
                "properties": {
                    "server_id": { "type": "string", "description": "Discord server ID" },
                    "user_id": { "type": "string", "description": "User to add role to" },
                    "role_id": { "type": "string", "description": "Role ID to add" }
                },
                "required": ["server_id", "user_id", "role_id"]
            }),
        ),
        tool(
            "remove_role",
            "Remove a role from a user",
            json!({
                "type": "object",
                "properties": {
                    "server_id": { "type": "string", "description": "Discord server ID" },
                    "user_id": { "type": "string", "description": "User to remove role from" },
                    "role_id": { "type": "string", "description": "Role ID to remove" }
                },
                "required": ["server_id", "user_id", "role_id"]
            }),
        ),
        tool(
            "list_roles",
            "List all roles in a server",
            json!({
                "type": "object",
                "properties": {
                    "server_id": { "type": "string", "description": "Discord server (guild) ID" }
                },
                "required": ["server_id"]
            }),
        ),
        tool(
            "create_role",
            "Create a new role in a server",
            json!({
                "type": "object",
                "properties": {
                    "server_id": { "type": "string", "description": "Discord server (guild) ID" },
                    "name": { "type": "string", "description": "Name for the new role" },
                    "color": { "type": "string", "description": "Hex color code (e.g., #FF0000)" },
                    "reason": { "type": "string", "description": "Reason for creating the role (audit log)" }
                },
                "required": ["server_id", "name"]
            }),
        ),
        tool(
            "delete_role",
            "Delete a role from a server",
            json!({
                "type": "object",
                "properties": {
                    "server_id": { "type": "string", "description": "Discord server (guild) ID" },
                    "role_id": { "type": "string", "description": "ID of the role to delete" },
                    "reason": { "type": "string", "description": "Reason for deleting the role (audit log)" }
                },
                "required": ["server_id", "role_id"]
            }),
        ),
        tool(
            "edit_role",
            "Edit an existing role's name or color",
            json!({
                "type": "object",
                "properties": {
                    "server_id": { "type": "string", "description": "Discord server (guild) ID" },
                    "role_id": { "type": "string", "description": "ID of the role to edit" },
                    "name": { "type": "string", "description": "New name for the role" },
                    "color": { "type": "string", "description": "New hex color code (e.g., #00FF00)" },
                    "reason": { "type": "string", "description": "Reason for editing the role (audit log)" }
                },
                "required": ["server_id", "role_id"]
            }),
        ),
        // Threads
        tool(
            "create_thread",
            "Create a new thread in a channel, optionally from an existing message",
            json!({
                "type": "object",
                "properties": {
                    "channel_id": { "type": "string", "description": "ID of the text or forum channel to create the thread in" },
                    "name": { "type": "string", "description": "Name of the thread" },
                    "message_id": { "type": "string", "description": "Optional ID of a message to start the thread from" },
                    "content": { "type": "string", "description": "Initial message content (required for forum channels)" },
                    "auto_archive_duration": {
                        "type": "integer",
                        "description": "Minutes of inactivity before the thread is archived",
                        "enum": [60, 1440, 4320, 10080]
                    },
                    "reason": { "type": "string", "description": "Reason for creating the thread (audit log)" }
                },
                "required": ["name"]
            }),
        ),
        tool(
            "delete_thread",
            "Delete a thread",
            json!({
                "type": "object",
                "properties": {
                    "thread_id": { "type": "string", "description": "ID of the thread to delete" },
                    "reason": { "type": "string", "description": "Reason for deleting the thread (audit log)" }
                },
                "required": ["thread_id"]
            }),
        ),
        tool(
            "archive_thread",
            "Archive a thread",
            json!({
                "type": "object",
                "properties": {
                    "thread_id": { "type": "string", "description": "ID of the thread to archive" },
                    "reason": { "type": "string", "description": "Reason for archiving (audit log)" }
                },
                "required": ["thread_id"]
            }),
        ),
        tool(
            "unarchive_thread",
            "Unarchive a thread",
            json!({
                "type": "object",
                "properties": {
                    "thread_id": { "type": "string", "description": "ID of the thread to unarchive" },
                    "reason": { "type": "string", "description": "Reason for unarchiving (audit log)" }
                },
                "required": ["thread_id"]
            }),
        ),
        // Reactions
        tool(
            "add_reaction",
            "Add a reaction to a message",
            json!({
                "type": "object",
                "properties": {
                    "channel_id": { "type": "string", "description": "Channel containing the message" },
                    "message_id": { "type": "string", "description": "Message to react to" },
                    "emoji": { "type": "string", "description": "Emoji to react with (Unicode or custom emoji ID)" }
                },
                "required": ["channel_id", "message_id", "emoji"]
            }),
        ),
        tool(
            "add_multiple_reactions",
            "Add multiple reactions to a message",
            json!({
                "type": "object",
                "properties": {
                    "channel_id": { "type": "string", "description": "Channel containing the message" },
                    "message_id": { "type": "string", "description": "Message to react to" },
                    "emojis": {
                        "type": "array",
                        "items": { "type": "string", "description": "Emoji to react with (Unicode or custom emoji ID)" },
                        "description": "List of emojis to add as reactions"
                    }
                },
                "required": ["channel_id", "message_id", "emojis"]
            }),
        ),
        tool(
            "remove_reaction",
            "Remove the bot's reaction from a message",
            json!({
                "type": "object",
                "properties": {
                    "channel_id": { "type": "string", "description": "Channel containing the message" },
                    "message_id": { "type": "string", "description": "Message to remove reaction from" },
                    "emoji": { "type": "string", "description": "Emoji to remove (Unicode or custom emoji ID)" }
                },
                "required": ["channel_id", "message_id", "emoji"]
            }),
        ),
        // Messages
        tool(
            "send_message",
            "Send a message to a specific channel",
            json!({
                "type": "object",
                "properties": {
                    "channel_id": { "type": "string", "description": "Discord channel ID" },
                    "content": { "type": "string", "description": "Message content" }
                },
                "required": ["channel_id", "content"]
            }),
        ),
        tool(
            "read_messages",
            "Read recent messages from a channel",
            json!({
                "type": "object",
                "properties": {
                    "channel_id": { "type": "string", "description": "Discord channel ID" },
                    "limit": {
                        "type": "number",
                        "description": "Number of messages to fetch (max 100)",
                        "minimum": 1,
                        "maximum": 100
                    }
                },
                "required": ["channel_id"]
            }),
        ),
        tool(
            "get_user_info",
            "Get information about a Discord user",
            json!({
                "type": "object",
                "properties": {
                    "user_id": { "type": "string", "description": "Discord user ID" }
                },
                "required": ["user_id"]
            }),
        ),
        tool(
            "moderate_message",
            "Delete a message and optionally timeout the user",
            json!({
                "type": "object",
                "properties": {
                    "channel_id": { "type": "string", "description": "Channel ID containing the message" },
                    "message_id": { "type": "string", "description": "ID of message to moderate" },
                    "reason": { "type": "string", "description": "Reason for moderation (audit log)" },
                    "timeout_minutes": {
                        "type": "number",
                        "description": "Optional timeout duration in minutes",
                        "minimum": 0,
                        "maximum": 40320
                    }
                },
                "required": ["channel_id", "message_id"]
            }),
        ),
        // Application commands
        tool(
            "list_global_commands",
            "List all global application commands registered for the bot.",
            json!({ "type": "object", "properties": {} }),
        ),
        tool(
            "list_guild_commands",
            "List all application commands registered for the bot in a specific guild.",
            json!({
                "type": "object",
                "properties": {
                    "server_id": { "type": "string", "description": "Discord server (guild) ID to list commands for." }
                },
                "required": ["server_id"]
            }),
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_tool_names_unique() {
        let tools = tools();
        let names: HashSet<_> = tools.iter().map(|t| t.name).collect();
        assert_eq!(names.len(), tools.len());
        assert_eq!(tools.len(), 26);
    }

    #[test]
    fn test_required_fields_are_declared_properties() {
        for t in tools() {
            let props = t.input_schema["properties"].as_object().unwrap();
            if let Some(required) = t.input_schema["required"].as_array() {
                for field in required {
                    let field = field.as_str().unwrap();
                    assert!(props.contains_key(field), "{}: {} not declared", t.name, field);
                }
            }
        }
    }

    #[test]
    fn test_audit_reasons_are_optional() {
        for t in tools() {
            if let Some(required) = t.input_schema["required"].as_array() {
                assert!(
                    !required.iter().any(|f| f == "reason"),
                    "{} requires a reason but falls back to a default",
                    t.name
                );
            }
        }
    }

    #[test]
    fn test_descriptor_serializes_input_schema_key() {
        let value = serde_json::to_value(&tools()[0]).unwrap();
        assert_eq!(value["name"], "get_server_info");
        assert_eq!(value["inputSchema"]["type"], "object");
    }
}
