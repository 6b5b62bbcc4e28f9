//! Discord session over the REST API using a bot token.

use std::time::Duration;

use log::{debug, info};
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::{json, Map, Value};

use crate::config::Config;
use crate::platform::{
    AppCommand, Channel, ChannelEdit, ChannelKind, ContentFilter, DiscordOperations, Guild,
    Member, Message, NewTextChannel, NewThread, Reaction, RemoteError, RemoteResult, Role,
    RoleEdit, Snowflake, User,
};

/// Discord API base URL
pub const DISCORD_API_BASE: &str = "https://discord.com/api/v10";

const AUDIT_LOG_REASON: &str = "X-Audit-Log-Reason";

// ── Wire types ───────────────────────────────────────────────────────────

fn snowflake<'de, D: Deserializer<'de>>(d: D) -> Result<Snowflake, D::Error> {
    let raw = String::deserialize(d)?;
    raw.parse().map_err(serde::de::Error::custom)
}

fn opt_snowflake<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Snowflake>, D::Error> {
    Option::<String>::deserialize(d)?
        .map(|raw| raw.parse().map_err(serde::de::Error::custom))
        .transpose()
}

fn snowflake_list<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<Snowflake>, D::Error> {
    Vec::<String>::deserialize(d)?
        .iter()
        .map(|raw| raw.parse().map_err(serde::de::Error::custom))
        .collect()
}

#[derive(Debug, Deserialize)]
struct ApiGuild {
    #[serde(deserialize_with = "snowflake")]
    id: Snowflake,
    name: String,
    #[serde(deserialize_with = "snowflake")]
    owner_id: Snowflake,
    #[serde(default)]
    approximate_member_count: Option<u64>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    premium_tier: u8,
    #[serde(default)]
    explicit_content_filter: u8,
}

impl From<ApiGuild> for Guild {
    fn from(g: ApiGuild) -> Self {
        Guild {
            id: g.id,
            name: g.name,
            owner_id: g.owner_id,
            member_count: g.approximate_member_count,
            description: g.description,
            premium_tier: g.premium_tier,
            explicit_content_filter: ContentFilter::from_code(g.explicit_content_filter),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct ThreadMetadata {
    #[serde(default)]
    archived: bool,
}

#[derive(Debug, Deserialize)]
struct ApiChannel {
    #[serde(deserialize_with = "snowflake")]
    id: Snowflake,
    #[serde(rename = "type")]
    kind: u8,
    #[serde(default, deserialize_with = "opt_snowflake")]
    guild_id: Option<Snowflake>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    position: Option<i64>,
    #[serde(default, deserialize_with = "opt_snowflake")]
    parent_id: Option<Snowflake>,
    #[serde(default)]
    topic: Option<String>,
    #[serde(default)]
    thread_metadata: Option<ThreadMetadata>,
}

impl From<ApiChannel> for Channel {
    fn from(c: ApiChannel) -> Self {
        Channel {
            id: c.id,
            guild_id: c.guild_id,
            name: c.name.unwrap_or_default(),
            kind: ChannelKind::from_code(c.kind),
            position: c.position,
            parent_id: c.parent_id,
            topic: c.topic,
            archived: c.thread_metadata.map(|m| m.archived),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ApiRole {
    #[serde(deserialize_with = "snowflake")]
    id: Snowflake,
    name: String,
    #[serde(default)]
    color: u32,
}

impl From<ApiRole> for Role {
    fn from(r: ApiRole) -> Self {
        Role {
            id: r.id,
            name: r.name,
            color: r.color,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ApiUser {
    #[serde(deserialize_with = "snowflake")]
    id: Snowflake,
    username: String,
    #[serde(default)]
    discriminator: String,
    #[serde(default)]
    bot: bool,
}

impl From<ApiUser> for User {
    fn from(u: ApiUser) -> Self {
        User {
            id: u.id,
            username: u.username,
            discriminator: u.discriminator,
            bot: u.bot,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ApiMember {
    user: ApiUser,
    #[serde(default, deserialize_with = "snowflake_list")]
    roles: Vec<Snowflake>,
}

impl From<ApiMember> for Member {
    fn from(m: ApiMember) -> Self {
        Member {
            user: m.user.into(),
            roles: m.roles,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ApiEmoji {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    animated: bool,
}

impl ApiEmoji {
    /// Unicode emoji as-is, custom emoji in `<:name:id>` form.
    fn display(&self) -> String {
        let name = self.name.clone().unwrap_or_default();
        match &self.id {
            Some(id) if self.animated => format!("<a:{}:{}>", name, id),
            Some(id) => format!("<:{}:{}>", name, id),
            None => name,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ApiReaction {
    count: u32,
    emoji: ApiEmoji,
}

#[derive(Debug, Deserialize)]
struct ApiMessage {
    #[serde(deserialize_with = "snowflake")]
    id: Snowflake,
    #[serde(deserialize_with = "snowflake")]
    channel_id: Snowflake,
    author: ApiUser,
    #[serde(default)]
    content: String,
    timestamp: String,
    #[serde(default)]
    reactions: Vec<ApiReaction>,
}

impl From<ApiMessage> for Message {
    fn from(m: ApiMessage) -> Self {
        Message {
            id: m.id,
            channel_id: m.channel_id,
            author: m.author.into(),
            content: m.content,
            timestamp: m.timestamp,
            reactions: m
                .reactions
                .into_iter()
                .map(|r| Reaction {
                    emoji: r.emoji.display(),
                    count: r.count,
                })
                .collect(),
        }
    }
}

fn default_command_kind() -> u8 {
    1
}

#[derive(Debug, Deserialize)]
struct ApiCommand {
    #[serde(deserialize_with = "snowflake")]
    id: Snowflake,
    name: String,
    #[serde(rename = "type", default = "default_command_kind")]
    kind: u8,
}

impl From<ApiCommand> for AppCommand {
    fn from(c: ApiCommand) -> Self {
        AppCommand {
            id: c.id,
            name: c.name,
            kind: c.kind,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ApiApplication {
    #[serde(deserialize_with = "snowflake")]
    id: Snowflake,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    message: String,
    #[serde(default)]
    code: u64,
}

// ── Payload builders ─────────────────────────────────────────────────────

fn channel_edit_body(edit: &ChannelEdit) -> Value {
    let mut body = Map::new();
    if let Some(name) = &edit.name {
        body.insert("name".into(), json!(name));
    }
    if let Some(topic) = &edit.topic {
        body.insert("topic".into(), json!(topic));
    }
    if let Some(position) = edit.position {
        body.insert("position".into(), json!(position));
    }
    if let Some(parent) = edit.parent_id {
        body.insert("parent_id".into(), json!(parent.to_string()));
    }
    if let Some(archived) = edit.archived {
        body.insert("archived".into(), json!(archived));
    }
    Value::Object(body)
}

fn role_body(role: &RoleEdit) -> Value {
    let mut body = Map::new();
    if let Some(name) = &role.name {
        body.insert("name".into(), json!(name));
    }
    if let Some(color) = role.color {
        body.insert("color".into(), json!(color));
    }
    Value::Object(body)
}

fn thread_body(thread: &NewThread) -> Map<String, Value> {
    let mut body = Map::new();
    body.insert("name".into(), json!(thread.name));
    if let Some(minutes) = thread.auto_archive_duration {
        body.insert("auto_archive_duration".into(), json!(minutes));
    }
    body
}

/// Path segment for a reaction emoji: Unicode as-is, `<:name:id>` as `name:id`.
fn reaction_segment(emoji: &str) -> String {
    let trimmed = emoji
        .strip_prefix('<')
        .and_then(|e| e.strip_suffix('>'))
        .map(|e| e.strip_prefix("a:").or_else(|| e.strip_prefix(':')).unwrap_or(e))
        .unwrap_or(emoji);
    urlencoding::encode(trimmed).into_owned()
}

// ── Client ───────────────────────────────────────────────────────────────

/// Connected Discord session.
pub struct DiscordHttp {
    http: reqwest::Client,
    api_base: String,
    bot_token: String,
    bot_user: User,
    application_id: Snowflake,
}

impl DiscordHttp {
    /// Authenticate and identify the bot. The session is usable once this
    /// returns.
    pub async fn connect(config: &Config) -> RemoteResult<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!(
                "DiscordBot (",
                env!("CARGO_PKG_NAME"),
                ", ",
                env!("CARGO_PKG_VERSION"),
                ")"
            ))
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| RemoteError::Other(format!("Failed to build HTTP client: {}", e)))?;

        let mut session = Self {
            http,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            bot_token: config.token.clone(),
            bot_user: User {
                id: 0,
                username: String::new(),
                discriminator: String::new(),
                bot: true,
            },
            application_id: 0,
        };

        info!("Authenticating with Discord at {}", session.api_base);
        let me: ApiUser = session.get_json("/users/@me").await?;
        session.bot_user = me.into();
        let app: ApiApplication = session.get_json("/oauth2/applications/@me").await?;
        session.application_id = app.id;
        Ok(session)
    }

    pub fn bot_user(&self) -> &User {
        &self.bot_user
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.http
            .request(method, format!("{}{}", self.api_base, path))
            .header("Authorization", format!("Bot {}", self.bot_token))
    }

    fn audited(&self, method: Method, path: &str, reason: &str) -> RequestBuilder {
        self.request(method, path)
            .header(AUDIT_LOG_REASON, urlencoding::encode(reason).into_owned())
    }

    async fn send(&self, builder: RequestBuilder) -> RemoteResult<Response> {
        let resp = builder
            .send()
            .await
            .map_err(|e| RemoteError::Other(format!("Discord request failed: {}", e)))?;
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }

        let text = resp.text().await.unwrap_or_default();
        let detail = match serde_json::from_str::<ApiErrorBody>(&text) {
            Ok(body) if !body.message.is_empty() => format!("{} (code {})", body.message, body.code),
            _ => text,
        };
        debug!("Discord API returned {}: {}", status, detail);
        Err(match status {
            StatusCode::FORBIDDEN => RemoteError::Forbidden(detail),
            StatusCode::NOT_FOUND => RemoteError::NotFound(detail),
            _ => RemoteError::Other(format!("Discord API error {}: {}", status, detail)),
        })
    }

    async fn json<T: DeserializeOwned>(&self, builder: RequestBuilder) -> RemoteResult<T> {
        self.send(builder)
            .await?
            .json::<T>()
            .await
            .map_err(|e| RemoteError::Other(format!("Failed to decode Discord response: {}", e)))
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> RemoteResult<T> {
        self.json(self.request(Method::GET, path)).await
    }

    async fn empty(&self, builder: RequestBuilder) -> RemoteResult<()> {
        self.send(builder).await.map(|_| ())
    }
}

impl DiscordOperations for DiscordHttp {
    async fn fetch_guild(&self, guild_id: Snowflake) -> RemoteResult<Guild> {
        let guild: ApiGuild = self
            .get_json(&format!("/guilds/{}?with_counts=true", guild_id))
            .await?;
        Ok(guild.into())
    }

    async fn fetch_guild_channels(&self, guild_id: Snowflake) -> RemoteResult<Vec<Channel>> {
        let channels: Vec<ApiChannel> =
            self.get_json(&format!("/guilds/{}/channels", guild_id)).await?;
        Ok(channels.into_iter().map(Channel::from).collect())
    }

    async fn fetch_roles(&self, guild_id: Snowflake) -> RemoteResult<Vec<Role>> {
        let roles: Vec<ApiRole> = self.get_json(&format!("/guilds/{}/roles", guild_id)).await?;
        Ok(roles.into_iter().map(Role::from).collect())
    }

    async fn fetch_members(&self, guild_id: Snowflake, limit: u16) -> RemoteResult<Vec<Member>> {
        let members: Vec<ApiMember> = self
            .get_json(&format!("/guilds/{}/members?limit={}", guild_id, limit))
            .await?;
        Ok(members.into_iter().map(Member::from).collect())
    }

    async fn fetch_member(&self, guild_id: Snowflake, user_id: Snowflake) -> RemoteResult<Member> {
        let member: ApiMember = self
            .get_json(&format!("/guilds/{}/members/{}", guild_id, user_id))
            .await?;
        Ok(member.into())
    }

    async fn find_member(
        &self,
        guild_id: Snowflake,
        user_id: Snowflake,
    ) -> RemoteResult<Option<Member>> {
        match self.fetch_member(guild_id, user_id).await {
            Ok(member) => Ok(Some(member)),
            Err(RemoteError::NotFound(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }

    async fn fetch_channel(&self, channel_id: Snowflake) -> RemoteResult<Channel> {
        let channel: ApiChannel = self.get_json(&format!("/channels/{}", channel_id)).await?;
        Ok(channel.into())
    }

    async fn fetch_user(&self, user_id: Snowflake) -> RemoteResult<User> {
        let user: ApiUser = self.get_json(&format!("/users/{}", user_id)).await?;
        Ok(user.into())
    }

    async fn fetch_message(
        &self,
        channel_id: Snowflake,
        message_id: Snowflake,
    ) -> RemoteResult<Message> {
        let message: ApiMessage = self
            .get_json(&format!("/channels/{}/messages/{}", channel_id, message_id))
            .await?;
        Ok(message.into())
    }

    async fn fetch_messages(&self, channel_id: Snowflake, limit: u8) -> RemoteResult<Vec<Message>> {
        let messages: Vec<ApiMessage> = self
            .get_json(&format!("/channels/{}/messages?limit={}", channel_id, limit))
            .await?;
        Ok(messages.into_iter().map(Message::from).collect())
    }

    async fn send_message(&self, channel_id: Snowflake, content: &str) -> RemoteResult<Message> {
        let builder = self
            .request(Method::POST, &format!("/channels/{}/messages", channel_id))
            .json(&json!({ "content": content }));
        let message: ApiMessage = self.json(builder).await?;
        Ok(message.into())
    }

    async fn delete_message(
        &self,
        channel_id: Snowflake,
        message_id: Snowflake,
        reason: &str,
    ) -> RemoteResult<()> {
        let path = format!("/channels/{}/messages/{}", channel_id, message_id);
        self.empty(self.audited(Method::DELETE, &path, reason)).await
    }

    async fn add_reaction(
        &self,
        channel_id: Snowflake,
        message_id: Snowflake,
        emoji: &str,
    ) -> RemoteResult<()> {
        let path = format!(
            "/channels/{}/messages/{}/reactions/{}/@me",
            channel_id,
            message_id,
            reaction_segment(emoji)
        );
        self.empty(self.request(Method::PUT, &path)).await
    }

    async fn remove_own_reaction(
        &self,
        channel_id: Snowflake,
        message_id: Snowflake,
        emoji: &str,
    ) -> RemoteResult<()> {
        let path = format!(
            "/channels/{}/messages/{}/reactions/{}/@me",
            channel_id,
            message_id,
            reaction_segment(emoji)
        );
        self.empty(self.request(Method::DELETE, &path)).await
    }

    async fn edit_channel(
        &self,
        channel_id: Snowflake,
        edit: &ChannelEdit,
        reason: &str,
    ) -> RemoteResult<Channel> {
        let builder = self
            .audited(Method::PATCH, &format!("/channels/{}", channel_id), reason)
            .json(&channel_edit_body(edit));
        let channel: ApiChannel = self.json(builder).await?;
        Ok(channel.into())
    }

    async fn delete_channel(&self, channel_id: Snowflake, reason: &str) -> RemoteResult<()> {
        let path = format!("/channels/{}", channel_id);
        self.empty(self.audited(Method::DELETE, &path, reason)).await
    }

    async fn create_text_channel(
        &self,
        guild_id: Snowflake,
        channel: &NewTextChannel,
        reason: &str,
    ) -> RemoteResult<Channel> {
        let mut body = json!({
            "name": channel.name,
            "type": ChannelKind::Text.code(),
        });
        if let Some(parent) = channel.parent_id {
            body["parent_id"] = json!(parent.to_string());
        }
        if let Some(topic) = &channel.topic {
            body["topic"] = json!(topic);
        }
        let builder = self
            .audited(Method::POST, &format!("/guilds/{}/channels", guild_id), reason)
            .json(&body);
        let created: ApiChannel = self.json(builder).await?;
        Ok(created.into())
    }

    async fn start_thread_from_message(
        &self,
        channel_id: Snowflake,
        message_id: Snowflake,
        thread: &NewThread,
        reason: &str,
    ) -> RemoteResult<Channel> {
        let path = format!("/channels/{}/messages/{}/threads", channel_id, message_id);
        let builder = self
            .audited(Method::POST, &path, reason)
            .json(&Value::Object(thread_body(thread)));
        let created: ApiChannel = self.json(builder).await?;
        Ok(created.into())
    }

    async fn start_thread(
        &self,
        channel_id: Snowflake,
        kind: ChannelKind,
        thread: &NewThread,
        reason: &str,
    ) -> RemoteResult<Channel> {
        let mut body = thread_body(thread);
        body.insert("type".into(), json!(kind.code()));
        let builder = self
            .audited(Method::POST, &format!("/channels/{}/threads", channel_id), reason)
            .json(&Value::Object(body));
        let created: ApiChannel = self.json(builder).await?;
        Ok(created.into())
    }

    async fn start_forum_post(
        &self,
        channel_id: Snowflake,
        thread: &NewThread,
        content: &str,
        reason: &str,
    ) -> RemoteResult<Channel> {
        let mut body = thread_body(thread);
        body.insert("message".into(), json!({ "content": content }));
        let builder = self
            .audited(Method::POST, &format!("/channels/{}/threads", channel_id), reason)
            .json(&Value::Object(body));
        let created: ApiChannel = self.json(builder).await?;
        Ok(created.into())
    }

    async fn add_member_role(
        &self,
        guild_id: Snowflake,
        user_id: Snowflake,
        role_id: Snowflake,
        reason: &str,
    ) -> RemoteResult<()> {
        let path = format!("/guilds/{}/members/{}/roles/{}", guild_id, user_id, role_id);
        self.empty(self.audited(Method::PUT, &path, reason)).await
    }

    async fn remove_member_role(
        &self,
        guild_id: Snowflake,
        user_id: Snowflake,
        role_id: Snowflake,
        reason: &str,
    ) -> RemoteResult<()> {
        let path = format!("/guilds/{}/members/{}/roles/{}", guild_id, user_id, role_id);
        self.empty(self.audited(Method::DELETE, &path, reason)).await
    }

    async fn create_role(
        &self,
        guild_id: Snowflake,
        role: &RoleEdit,
        reason: &str,
    ) -> RemoteResult<Role> {
        let builder = self
            .audited(Method::POST, &format!("/guilds/{}/roles", guild_id), reason)
            .json(&role_body(role));
        let created: ApiRole = self.json(builder).await?;
        Ok(created.into())
    }

    async fn edit_role(
        &self,
        guild_id: Snowflake,
        role_id: Snowflake,
        edit: &RoleEdit,
        reason: &str,
    ) -> RemoteResult<Role> {
        let path = format!("/guilds/{}/roles/{}", guild_id, role_id);
        let builder = self.audited(Method::PATCH, &path, reason).json(&role_body(edit));
        let edited: ApiRole = self.json(builder).await?;
        Ok(edited.into())
    }

    async fn delete_role(
        &self,
        guild_id: Snowflake,
        role_id: Snowflake,
        reason: &str,
    ) -> RemoteResult<()> {
        let path = format!("/guilds/{}/roles/{}", guild_id, role_id);
        self.empty(self.audited(Method::DELETE, &path, reason)).await
    }

    async fn timeout_member(
        &self,
        guild_id: Snowflake,
        user_id: Snowflake,
        duration: Duration,
        reason: &str,
    ) -> RemoteResult<()> {
        let delta = chrono::Duration::from_std(duration)
            .map_err(|e| RemoteError::Other(format!("Invalid timeout duration: {}", e)))?;
        let until = chrono::Utc::now() + delta;
        let builder = self
            .audited(
                Method::PATCH,
                &format!("/guilds/{}/members/{}", guild_id, user_id),
                reason,
            )
            .json(&json!({ "communication_disabled_until": until.to_rfc3339() }));
        self.empty(builder).await
    }

    async fn list_global_commands(&self) -> RemoteResult<Vec<AppCommand>> {
        let commands: Vec<ApiCommand> = self
            .get_json(&format!("/applications/{}/commands", self.application_id))
            .await?;
        Ok(commands.into_iter().map(AppCommand::from).collect())
    }

    async fn list_guild_commands(&self, guild_id: Snowflake) -> RemoteResult<Vec<AppCommand>> {
        let commands: Vec<ApiCommand> = self
            .get_json(&format!(
                "/applications/{}/guilds/{}/commands",
                self.application_id, guild_id
            ))
            .await?;
        Ok(commands.into_iter().map(AppCommand::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reaction_segment() {
        assert_eq!(reaction_segment("👍"), "%F0%9F%91%8D");
        assert_eq!(reaction_segment("<:party:123>"), "party%3A123");
        assert_eq!(reaction_segment("<a:dance:456>"), "dance%3A456");
        assert_eq!(reaction_segment("party:123"), "party%3A123");
    }

    #[test]
    fn test_channel_from_wire() {
        let raw = r#"{
            "id": "41771983423143937",
            "type": 11,
            "guild_id": "41771983423143936",
            "name": "help-thread",
            "parent_id": "41771983423143938",
            "thread_metadata": {"archived": true, "auto_archive_duration": 60}
        }"#;
        let channel: Channel = serde_json::from_str::<ApiChannel>(raw).unwrap().into();
        assert_eq!(channel.kind, ChannelKind::PublicThread);
        assert_eq!(channel.archived, Some(true));
        assert_eq!(channel.parent_id, Some(41_771_983_423_143_938));
        assert_eq!(channel.topic, None);
    }

    #[test]
    fn test_category_channel_without_parent() {
        let raw = r#"{"id": "1", "type": 4, "name": "Info", "parent_id": null, "position": 2}"#;
        let channel: Channel = serde_json::from_str::<ApiChannel>(raw).unwrap().into();
        assert!(channel.kind.is_category());
        assert_eq!(channel.parent_id, None);
        assert_eq!(channel.position, Some(2));
    }

    #[test]
    fn test_message_from_wire() {
        let raw = r#"{
            "id": "10", "channel_id": "20", "content": "hi",
            "timestamp": "2024-01-01T00:00:00.000000+00:00",
            "author": {"id": "30", "username": "alice", "discriminator": "0"},
            "reactions": [
                {"count": 3, "emoji": {"id": null, "name": "🔥"}},
                {"count": 1, "emoji": {"id": "99", "name": "blob", "animated": true}}
            ]
        }"#;
        let message: Message = serde_json::from_str::<ApiMessage>(raw).unwrap().into();
        assert_eq!(message.author.id, 30);
        assert!(!message.author.bot);
        assert_eq!(message.reactions[0].emoji, "🔥");
        assert_eq!(message.reactions[1].emoji, "<a:blob:99>");
    }

    #[test]
    fn test_member_roles_parse() {
        let raw = r#"{"user": {"id": "5", "username": "bob"}, "roles": ["7", "8"], "nick": null}"#;
        let member: Member = serde_json::from_str::<ApiMember>(raw).unwrap().into();
        assert_eq!(member.roles, vec![7, 8]);
        assert_eq!(member.user.username, "bob");
    }

    #[test]
    fn test_bad_snowflake_is_rejected() {
        let raw = r#"{"id": "abc", "name": "x"}"#;
        assert!(serde_json::from_str::<ApiRole>(raw).is_err());
    }

    #[test]
    fn test_command_type_defaults_to_chat_input() {
        let cmd: AppCommand = serde_json::from_str::<ApiCommand>(r#"{"id": "1", "name": "ping"}"#)
            .unwrap()
            .into();
        assert_eq!(cmd.kind, 1);
    }

    #[test]
    fn test_edit_bodies_only_carry_set_fields() {
        let body = channel_edit_body(&ChannelEdit {
            archived: Some(true),
            ..ChannelEdit::default()
        });
        assert_eq!(body, json!({"archived": true}));

        let body = role_body(&RoleEdit {
            name: None,
            color: Some(0xff0000),
        });
        assert_eq!(body, json!({"color": 16711680}));
    }
}
