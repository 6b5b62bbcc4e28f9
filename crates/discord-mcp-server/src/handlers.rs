//! One handler per tool.
//!
//! Each handler coerces its arguments, issues its remote calls in a fixed
//! order and formats a text summary. Remote faults propagate to the
//! dispatcher untouched.

use log::debug;

use crate::args::{self, ToolArgs};
use crate::error::ToolError;
use crate::platform::{
    created_at_string, ChannelEdit, DiscordOperations, NewTextChannel, NewThread, Role, RoleEdit,
    Snowflake, ThreadStart,
};

type HandlerResult = Result<String, ToolError>;

fn or_none<T: std::fmt::Display>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_else(|| "None".to_string())
}

fn key_values(title: &str, pairs: &[(&str, String)]) -> String {
    let lines: Vec<String> = pairs.iter().map(|(k, v)| format!("{}: {}", k, v)).collect();
    format!("{}:\n{}", title, lines.join("\n"))
}

fn find_role(roles: Vec<Role>, role_id: Snowflake) -> Option<Role> {
    roles.into_iter().find(|r| r.id == role_id)
}

fn role_not_found(role_id: Snowflake) -> String {
    format!("Role with ID {} not found.", role_id)
}

fn not_a_thread(thread_id: Snowflake) -> String {
    format!("Channel ID {} is not a thread.", thread_id)
}

// ── Server information ───────────────────────────────────────────────────

pub async fn get_server_info<P: DiscordOperations>(p: &P, args: &ToolArgs) -> HandlerResult {
    let guild = p.fetch_guild(args.id("server_id")?).await?;
    Ok(key_values(
        "Server Information",
        &[
            ("name", guild.name.clone()),
            ("id", guild.id.to_string()),
            ("owner_id", guild.owner_id.to_string()),
            ("member_count", or_none(guild.member_count)),
            ("created_at", created_at_string(guild.id)),
            ("description", or_none(guild.description.as_deref())),
            ("premium_tier", guild.premium_tier.to_string()),
            ("explicit_content_filter", guild.explicit_content_filter.to_string()),
        ],
    ))
}

pub async fn list_members<P: DiscordOperations>(p: &P, args: &ToolArgs) -> HandlerResult {
    let guild_id = args.id("server_id")?;
    let limit = args.limit(args::DEFAULT_MEMBER_FETCH, args::MAX_MEMBER_FETCH)?;
    let guild = p.fetch_guild(guild_id).await?;
    let members = p.fetch_members(guild.id, limit).await?;

    let lines: Vec<String> = members
        .iter()
        .map(|m| {
            let roles: Vec<String> = m
                .roles
                .iter()
                .filter(|r| !guild.is_default_role(**r))
                .map(|r| r.to_string())
                .collect();
            format!("{} (ID: {}, Roles: {})", m.user.username, m.user.id, roles.join(", "))
        })
        .collect();
    Ok(format!("Server Members ({}):\n{}", members.len(), lines.join("\n")))
}

pub async fn get_user_info<P: DiscordOperations>(p: &P, args: &ToolArgs) -> HandlerResult {
    let user = p.fetch_user(args.id("user_id")?).await?;
    Ok(key_values(
        "User information",
        &[
            ("id", user.id.to_string()),
            ("name", user.username.clone()),
            ("discriminator", user.discriminator.clone()),
            ("bot", user.bot.to_string()),
            ("created_at", created_at_string(user.id)),
        ],
    ))
}

// ── Channels ─────────────────────────────────────────────────────────────

pub async fn list_all_channels<P: DiscordOperations>(p: &P, args: &ToolArgs) -> HandlerResult {
    let guild = p.fetch_guild(args.id("server_id")?).await?;
    let channels = p.fetch_guild_channels(guild.id).await?;
    debug!("Fetched {} channels for server {}", channels.len(), guild.id);

    let lines: Vec<String> = channels
        .iter()
        .map(|c| format!("- {} (ID: {}, Type: {})", c.name, c.id, c.kind))
        .collect();
    Ok(format!("All Channels ({}):\n{}", channels.len(), lines.join("\n")))
}

pub async fn get_channel_info<P: DiscordOperations>(p: &P, args: &ToolArgs) -> HandlerResult {
    let channel = p.fetch_channel(args.id("channel_id")?).await?;
    let mut info = vec![
        ("id", channel.id.to_string()),
        ("name", channel.name.clone()),
        ("type", channel.kind.to_string()),
        ("position", or_none(channel.position)),
        ("category_id", or_none(channel.parent_id)),
        ("created_at", created_at_string(channel.id)),
    ];
    if channel.kind.supports_topic() {
        info.push(("topic", or_none(channel.topic.as_deref())));
    }
    Ok(key_values("Channel Information", &info))
}

pub async fn edit_channel<P: DiscordOperations>(p: &P, args: &ToolArgs) -> HandlerResult {
    let channel_id = args.id("channel_id")?;
    let name = args.opt_str("name")?;
    let topic = args.opt_str("topic")?;
    let position = args.opt_integer("position")?;
    let category_id = args.opt_id("category_id")?;
    let reason = args.reason("Channel edited via MCP")?;

    let channel = p.fetch_channel(channel_id).await?;
    let mut edit = ChannelEdit {
        name: name.map(str::to_string),
        position,
        ..ChannelEdit::default()
    };
    if channel.kind.supports_topic() {
        edit.topic = topic.map(str::to_string);
    }
    // Only a category of the same server can become the parent.
    if let (Some(category_id), Some(guild_id)) = (category_id, channel.guild_id) {
        let siblings = p.fetch_guild_channels(guild_id).await?;
        if siblings
            .iter()
            .any(|c| c.id == category_id && c.kind.is_category())
        {
            edit.parent_id = Some(category_id);
        }
    }

    let edited = p.edit_channel(channel.id, &edit, reason).await?;
    Ok(format!(
        "Channel #{} (ID: {}) edited successfully.",
        edited.name, edited.id
    ))
}

pub async fn create_text_channel<P: DiscordOperations>(p: &P, args: &ToolArgs) -> HandlerResult {
    let guild_id = args.id("server_id")?;
    let name = args.str("name")?;
    let topic = args.opt_str("topic")?;
    let category_id = args.opt_id("category_id")?;

    let guild = p.fetch_guild(guild_id).await?;
    if let Some(category_id) = category_id {
        let channels = p.fetch_guild_channels(guild.id).await?;
        if !channels
            .iter()
            .any(|c| c.id == category_id && c.kind.is_category())
        {
            return Err(ToolError::invalid(format!(
                "Category with ID {} not found in server {}",
                category_id, guild.id
            )));
        }
    }

    let spec = NewTextChannel {
        name: name.to_string(),
        parent_id: category_id,
        topic: topic.map(str::to_string),
    };
    let channel = p
        .create_text_channel(guild.id, &spec, "Channel created via MCP")
        .await?;
    Ok(format!("Created text channel #{} (ID: {})", channel.name, channel.id))
}

pub async fn delete_channel<P: DiscordOperations>(p: &P, args: &ToolArgs) -> HandlerResult {
    let channel_id = args.id("channel_id")?;
    let reason = args.reason("Channel deleted via MCP")?;
    let channel = p.fetch_channel(channel_id).await?;
    p.delete_channel(channel.id, reason).await?;
    Ok("Deleted channel successfully".to_string())
}

// ── Roles ────────────────────────────────────────────────────────────────

pub async fn add_role<P: DiscordOperations>(p: &P, args: &ToolArgs) -> HandlerResult {
    let guild_id = args.id("server_id")?;
    let user_id = args.id("user_id")?;
    let role_id = args.id("role_id")?;

    let guild = p.fetch_guild(guild_id).await?;
    let member = p.fetch_member(guild.id, user_id).await?;
    let Some(role) = find_role(p.fetch_roles(guild.id).await?, role_id) else {
        return Ok(role_not_found(role_id));
    };
    p.add_member_role(guild.id, member.user.id, role.id, "Role added via MCP")
        .await?;
    Ok(format!("Added role {} to user {}", role.name, member.user.username))
}

pub async fn remove_role<P: DiscordOperations>(p: &P, args: &ToolArgs) -> HandlerResult {
    let guild_id = args.id("server_id")?;
    let user_id = args.id("user_id")?;
    let role_id = args.id("role_id")?;

    let guild = p.fetch_guild(guild_id).await?;
    let member = p.fetch_member(guild.id, user_id).await?;
    let Some(role) = find_role(p.fetch_roles(guild.id).await?, role_id) else {
        return Ok(role_not_found(role_id));
    };
    p.remove_member_role(guild.id, member.user.id, role.id, "Role removed via MCP")
        .await?;
    Ok(format!("Removed role {} from user {}", role.name, member.user.username))
}

pub async fn list_roles<P: DiscordOperations>(p: &P, args: &ToolArgs) -> HandlerResult {
    let guild = p.fetch_guild(args.id("server_id")?).await?;
    let roles: Vec<Role> = p
        .fetch_roles(guild.id)
        .await?
        .into_iter()
        .filter(|r| !guild.is_default_role(r.id))
        .collect();

    let lines: Vec<String> = roles
        .iter()
        .map(|r| format!("- {} (ID: {}, Color: {})", r.name, r.id, r.color_hex()))
        .collect();
    Ok(format!("Roles ({}):\n{}", roles.len(), lines.join("\n")))
}

pub async fn create_role<P: DiscordOperations>(p: &P, args: &ToolArgs) -> HandlerResult {
    let guild_id = args.id("server_id")?;
    let name = args.str("name")?;
    let color = args.color("color")?;
    let reason = args.reason("Role created via MCP")?;

    let guild = p.fetch_guild(guild_id).await?;
    let spec = RoleEdit {
        name: Some(name.to_string()),
        color,
    };
    let role = p.create_role(guild.id, &spec, reason).await?;
    Ok(format!("Created role '{}' (ID: {})", role.name, role.id))
}

pub async fn delete_role<P: DiscordOperations>(p: &P, args: &ToolArgs) -> HandlerResult {
    let guild_id = args.id("server_id")?;
    let role_id = args.id("role_id")?;
    let reason = args.reason("Role deleted via MCP")?;

    let guild = p.fetch_guild(guild_id).await?;
    let Some(role) = find_role(p.fetch_roles(guild.id).await?, role_id) else {
        return Ok(role_not_found(role_id));
    };
    p.delete_role(guild.id, role.id, reason).await?;
    Ok(format!(
        "Deleted role '{}' (ID: {}) successfully.",
        role.name, role_id
    ))
}

pub async fn edit_role<P: DiscordOperations>(p: &P, args: &ToolArgs) -> HandlerResult {
    let guild_id = args.id("server_id")?;
    let role_id = args.id("role_id")?;
    let name = args.opt_str("name")?;
    let color = args.color("color")?;
    let reason = args.reason("Role edited via MCP")?;

    let guild = p.fetch_guild(guild_id).await?;
    let Some(role) = find_role(p.fetch_roles(guild.id).await?, role_id) else {
        return Ok(role_not_found(role_id));
    };
    let edit = RoleEdit {
        name: name.map(str::to_string),
        color,
    };
    let edited = p.edit_role(guild.id, role.id, &edit, reason).await?;
    Ok(format!("Role '{}' (ID: {}) edited successfully.", edited.name, edited.id))
}

// ── Threads ──────────────────────────────────────────────────────────────

pub async fn create_thread<P: DiscordOperations>(p: &P, args: &ToolArgs) -> HandlerResult {
    let channel_id = args.id("channel_id")?;
    let thread = NewThread {
        name: args.str("name")?.to_string(),
        auto_archive_duration: args.archive_duration()?,
    };
    let message_id = args.opt_id("message_id")?;
    let content = args.opt_str("content")?.unwrap_or("");
    let reason = args.reason("Thread created via MCP")?;

    let channel = p.fetch_channel(channel_id).await?;
    let created = if let Some(message_id) = message_id {
        let message = p.fetch_message(channel.id, message_id).await?;
        p.start_thread_from_message(channel.id, message.id, &thread, reason)
            .await?
    } else {
        match channel.kind.thread_start() {
            ThreadStart::ForumPost => {
                if content.is_empty() {
                    return Err(ToolError::invalid(
                        "Content is required when creating a thread in a forum channel.",
                    ));
                }
                p.start_forum_post(channel.id, &thread, content, reason).await?
            }
            ThreadStart::Plain => {
                p.start_thread(channel.id, channel.kind.bare_thread_kind(), &thread, reason)
                    .await?
            }
            ThreadStart::Unsupported => {
                return Err(ToolError::invalid(format!(
                    "Invalid channel type for creating a thread: {}",
                    channel.kind
                )))
            }
        }
    };
    Ok(format!("Created thread '{}' (ID: {})", created.name, created.id))
}

pub async fn delete_thread<P: DiscordOperations>(p: &P, args: &ToolArgs) -> HandlerResult {
    let thread_id = args.id("thread_id")?;
    let reason = args.reason("Thread deleted via MCP")?;
    let thread = p.fetch_channel(thread_id).await?;
    if !thread.kind.is_thread() {
        return Ok(not_a_thread(thread_id));
    }
    p.delete_channel(thread.id, reason).await?;
    Ok(format!("Deleted thread '{}' (ID: {}).", thread.name, thread_id))
}

async fn set_archived<P: DiscordOperations>(
    p: &P,
    args: &ToolArgs,
    archived: bool,
    default_reason: &str,
) -> HandlerResult {
    let thread_id = args.id("thread_id")?;
    let reason = args.reason(default_reason)?;
    let thread = p.fetch_channel(thread_id).await?;
    if !thread.kind.is_thread() {
        return Ok(not_a_thread(thread_id));
    }
    let edit = ChannelEdit {
        archived: Some(archived),
        ..ChannelEdit::default()
    };
    p.edit_channel(thread.id, &edit, reason).await?;
    let verb = if archived { "Archived" } else { "Unarchived" };
    Ok(format!("{} thread '{}' (ID: {}).", verb, thread.name, thread.id))
}

pub async fn archive_thread<P: DiscordOperations>(p: &P, args: &ToolArgs) -> HandlerResult {
    set_archived(p, args, true, "Thread archived via MCP").await
}

pub async fn unarchive_thread<P: DiscordOperations>(p: &P, args: &ToolArgs) -> HandlerResult {
    set_archived(p, args, false, "Thread unarchived via MCP").await
}

// ── Reactions ────────────────────────────────────────────────────────────

pub async fn add_reaction<P: DiscordOperations>(p: &P, args: &ToolArgs) -> HandlerResult {
    let channel_id = args.id("channel_id")?;
    let message_id = args.id("message_id")?;
    let emoji = args.str("emoji")?;

    let channel = p.fetch_channel(channel_id).await?;
    let message = p.fetch_message(channel.id, message_id).await?;
    p.add_reaction(channel.id, message.id, emoji).await?;
    Ok(format!("Added reaction {} to message", emoji))
}

pub async fn add_multiple_reactions<P: DiscordOperations>(p: &P, args: &ToolArgs) -> HandlerResult {
    let channel_id = args.id("channel_id")?;
    let message_id = args.id("message_id")?;
    let emojis = args.str_list("emojis")?;
    if emojis.is_empty() {
        return Err(ToolError::invalid("emojis must contain at least one emoji"));
    }

    let channel = p.fetch_channel(channel_id).await?;
    let message = p.fetch_message(channel.id, message_id).await?;
    for emoji in &emojis {
        p.add_reaction(channel.id, message.id, emoji).await?;
    }
    Ok(format!("Added reactions: {} to message", emojis.join(", ")))
}

pub async fn remove_reaction<P: DiscordOperations>(p: &P, args: &ToolArgs) -> HandlerResult {
    let channel_id = args.id("channel_id")?;
    let message_id = args.id("message_id")?;
    let emoji = args.str("emoji")?;

    let channel = p.fetch_channel(channel_id).await?;
    let message = p.fetch_message(channel.id, message_id).await?;
    p.remove_own_reaction(channel.id, message.id, emoji).await?;
    Ok(format!("Removed reaction {} from message", emoji))
}

// ── Messages ─────────────────────────────────────────────────────────────

pub async fn send_message<P: DiscordOperations>(p: &P, args: &ToolArgs) -> HandlerResult {
    let channel_id = args.id("channel_id")?;
    let content = args.str("content")?;
    let channel = p.fetch_channel(channel_id).await?;
    let message = p.send_message(channel.id, content).await?;
    Ok(format!("Message sent successfully. Message ID: {}", message.id))
}

pub async fn read_messages<P: DiscordOperations>(p: &P, args: &ToolArgs) -> HandlerResult {
    let channel_id = args.id("channel_id")?;
    let limit = args.limit(
        u16::from(args::DEFAULT_MESSAGE_FETCH),
        u16::from(args::MAX_MESSAGE_FETCH),
    )?;
    let limit = u8::try_from(limit).unwrap_or(args::MAX_MESSAGE_FETCH);

    let channel = p.fetch_channel(channel_id).await?;
    let messages = p.fetch_messages(channel.id, limit).await?;

    let formatted: Vec<String> = messages
        .iter()
        .map(|m| {
            let reactions: Vec<String> = m
                .reactions
                .iter()
                .map(|r| format!("{}({})", r.emoji, r.count))
                .collect();
            let reactions = if reactions.is_empty() {
                "No reactions".to_string()
            } else {
                reactions.join(", ")
            };
            format!(
                "{} ({}): {}\nReactions: {}",
                m.author, m.timestamp, m.content, reactions
            )
        })
        .collect();
    Ok(format!(
        "Retrieved {} messages:\n\n{}",
        messages.len(),
        formatted.join("\n")
    ))
}

pub async fn moderate_message<P: DiscordOperations>(p: &P, args: &ToolArgs) -> HandlerResult {
    let channel_id = args.id("channel_id")?;
    let message_id = args.id("message_id")?;
    let reason = args.reason("Message deleted via MCP")?;
    let timeout = args.timeout_minutes()?;

    let channel = p.fetch_channel(channel_id).await?;
    let message = p.fetch_message(channel.id, message_id).await?;
    p.delete_message(channel.id, message.id, reason).await?;

    if let (Some(minutes), Some(guild_id)) = (timeout, channel.guild_id) {
        // Authors who left the server (or never joined) are skipped.
        if let Some(member) = p.find_member(guild_id, message.author.id).await? {
            p.timeout_member(guild_id, member.user.id, args::minutes_to_duration(minutes), reason)
                .await?;
            return Ok(format!(
                "Message deleted and user timed out for {} minutes.",
                minutes
            ));
        }
    }
    Ok("Message deleted successfully.".to_string())
}

// ── Application commands ─────────────────────────────────────────────────

pub async fn list_global_commands<P: DiscordOperations>(p: &P, _args: &ToolArgs) -> HandlerResult {
    let commands = p.list_global_commands().await?;
    let lines: Vec<String> = commands
        .iter()
        .map(|c| format!("- {} (ID: {}, Type: {})", c.name, c.id, c.kind))
        .collect();
    Ok(format!(
        "Global Application Commands ({}):\n{}",
        lines.len(),
        lines.join("\n")
    ))
}

pub async fn list_guild_commands<P: DiscordOperations>(p: &P, args: &ToolArgs) -> HandlerResult {
    let guild_id = args.id("server_id")?;
    let commands = p.list_guild_commands(guild_id).await?;
    let lines: Vec<String> = commands
        .iter()
        .map(|c| format!("- {} (ID: {}, Type: {})", c.name, c.id, c.kind))
        .collect();
    Ok(format!(
        "Guild Application Commands for {} ({}):\n{}",
        guild_id,
        lines.len(),
        lines.join("\n")
    ))
}
