//! Clean layer boundary between the tool handlers and the Discord session.
//!
//! Handlers call `DiscordOperations` instead of an HTTP client directly,
//! making the whole handler set testable with the recording mock below.

use std::fmt;
use std::future::Future;
use std::time::Duration;

use chrono::{DateTime, Utc};

/// Discord snowflake identifier.
pub type Snowflake = u64;

/// Milliseconds between the Unix epoch and the Discord epoch (2015-01-01).
const DISCORD_EPOCH_MS: u64 = 1_420_070_400_000;

/// Result type for remote operations.
pub type RemoteResult<T> = Result<T, RemoteError>;

/// Errors from remote operations.
#[derive(Debug, thiserror::Error)]
pub enum RemoteError {
    #[error("Forbidden: {0}")]
    Forbidden(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("{0}")]
    Other(String),
}

/// Creation time encoded in a snowflake.
pub fn snowflake_created_at(id: Snowflake) -> Option<DateTime<Utc>> {
    let millis = (id >> 22).checked_add(DISCORD_EPOCH_MS)?;
    DateTime::from_timestamp_millis(i64::try_from(millis).ok()?)
}

/// RFC 3339 creation time of a snowflake, or `unknown`.
pub fn created_at_string(id: Snowflake) -> String {
    snowflake_created_at(id)
        .map(|t| t.to_rfc3339())
        .unwrap_or_else(|| "unknown".to_string())
}

// ── Channel kinds ────────────────────────────────────────────────────────

/// Closed set of channel types. Capabilities live here, not in handlers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelKind {
    Text,
    Dm,
    Voice,
    GroupDm,
    Category,
    Announcement,
    AnnouncementThread,
    PublicThread,
    PrivateThread,
    Stage,
    Directory,
    Forum,
    Media,
    Unknown(u8),
}

/// How a thread can be started in a channel without a parent message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThreadStart {
    /// Bare thread in a message channel.
    Plain,
    /// Forum post; needs initial message content.
    ForumPost,
    Unsupported,
}

impl ChannelKind {
    pub fn from_code(code: u8) -> Self {
        match code {
            0 => ChannelKind::Text,
            1 => ChannelKind::Dm,
            2 => ChannelKind::Voice,
            3 => ChannelKind::GroupDm,
            4 => ChannelKind::Category,
            5 => ChannelKind::Announcement,
            10 => ChannelKind::AnnouncementThread,
            11 => ChannelKind::PublicThread,
            12 => ChannelKind::PrivateThread,
            13 => ChannelKind::Stage,
            14 => ChannelKind::Directory,
            15 => ChannelKind::Forum,
            16 => ChannelKind::Media,
            other => ChannelKind::Unknown(other),
        }
    }

    pub fn code(self) -> u8 {
        match self {
            ChannelKind::Text => 0,
            ChannelKind::Dm => 1,
            ChannelKind::Voice => 2,
            ChannelKind::GroupDm => 3,
            ChannelKind::Category => 4,
            ChannelKind::Announcement => 5,
            ChannelKind::AnnouncementThread => 10,
            ChannelKind::PublicThread => 11,
            ChannelKind::PrivateThread => 12,
            ChannelKind::Stage => 13,
            ChannelKind::Directory => 14,
            ChannelKind::Forum => 15,
            ChannelKind::Media => 16,
            ChannelKind::Unknown(code) => code,
        }
    }

    pub fn supports_topic(self) -> bool {
        matches!(self, ChannelKind::Text | ChannelKind::Announcement)
    }

    pub fn thread_start(self) -> ThreadStart {
        match self {
            ChannelKind::Text | ChannelKind::Announcement => ThreadStart::Plain,
            ChannelKind::Forum | ChannelKind::Media => ThreadStart::ForumPost,
            _ => ThreadStart::Unsupported,
        }
    }

    pub fn is_thread(self) -> bool {
        matches!(
            self,
            ChannelKind::AnnouncementThread | ChannelKind::PublicThread | ChannelKind::PrivateThread
        )
    }

    pub fn is_category(self) -> bool {
        self == ChannelKind::Category
    }

    /// Thread type to request when starting a bare thread in this channel.
    pub fn bare_thread_kind(self) -> ChannelKind {
        match self {
            ChannelKind::Announcement => ChannelKind::AnnouncementThread,
            _ => ChannelKind::PublicThread,
        }
    }
}

impl fmt::Display for ChannelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChannelKind::Text => write!(f, "text"),
            ChannelKind::Dm => write!(f, "private"),
            ChannelKind::Voice => write!(f, "voice"),
            ChannelKind::GroupDm => write!(f, "group"),
            ChannelKind::Category => write!(f, "category"),
            ChannelKind::Announcement => write!(f, "news"),
            ChannelKind::AnnouncementThread => write!(f, "news_thread"),
            ChannelKind::PublicThread => write!(f, "public_thread"),
            ChannelKind::PrivateThread => write!(f, "private_thread"),
            ChannelKind::Stage => write!(f, "stage_voice"),
            ChannelKind::Directory => write!(f, "directory"),
            ChannelKind::Forum => write!(f, "forum"),
            ChannelKind::Media => write!(f, "media"),
            ChannelKind::Unknown(code) => write!(f, "unknown({})", code),
        }
    }
}

// ── Remote entities ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentFilter {
    Disabled,
    NoRole,
    AllMembers,
    Unknown(u8),
}

impl ContentFilter {
    pub fn from_code(code: u8) -> Self {
        match code {
            0 => ContentFilter::Disabled,
            1 => ContentFilter::NoRole,
            2 => ContentFilter::AllMembers,
            other => ContentFilter::Unknown(other),
        }
    }
}

impl fmt::Display for ContentFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContentFilter::Disabled => write!(f, "disabled"),
            ContentFilter::NoRole => write!(f, "no_role"),
            ContentFilter::AllMembers => write!(f, "all_members"),
            ContentFilter::Unknown(code) => write!(f, "unknown({})", code),
        }
    }
}

/// A server (guild).
#[derive(Debug, Clone)]
pub struct Guild {
    pub id: Snowflake,
    pub name: String,
    pub owner_id: Snowflake,
    pub member_count: Option<u64>,
    pub description: Option<String>,
    pub premium_tier: u8,
    pub explicit_content_filter: ContentFilter,
}

impl Guild {
    /// The implicit `@everyone` role shares the server's id.
    pub fn is_default_role(&self, role_id: Snowflake) -> bool {
        role_id == self.id
    }
}

#[derive(Debug, Clone)]
pub struct Channel {
    pub id: Snowflake,
    pub guild_id: Option<Snowflake>,
    pub name: String,
    pub kind: ChannelKind,
    pub position: Option<i64>,
    pub parent_id: Option<Snowflake>,
    pub topic: Option<String>,
    pub archived: Option<bool>,
}

#[derive(Debug, Clone)]
pub struct Role {
    pub id: Snowflake,
    pub name: String,
    pub color: u32,
}

impl Role {
    pub fn color_hex(&self) -> String {
        format!("#{:06x}", self.color)
    }
}

#[derive(Debug, Clone)]
pub struct User {
    pub id: Snowflake,
    pub username: String,
    pub discriminator: String,
    pub bot: bool,
}

impl fmt::Display for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Migrated accounts carry discriminator "0".
        if self.discriminator.is_empty() || self.discriminator == "0" {
            write!(f, "{}", self.username)
        } else {
            write!(f, "{}#{}", self.username, self.discriminator)
        }
    }
}

#[derive(Debug, Clone)]
pub struct Member {
    pub user: User,
    pub roles: Vec<Snowflake>,
}

#[derive(Debug, Clone)]
pub struct Reaction {
    pub emoji: String,
    pub count: u32,
}

#[derive(Debug, Clone)]
pub struct Message {
    pub id: Snowflake,
    pub channel_id: Snowflake,
    pub author: User,
    pub content: String,
    pub timestamp: String,
    pub reactions: Vec<Reaction>,
}

/// Registered application (slash) command.
#[derive(Debug, Clone)]
pub struct AppCommand {
    pub id: Snowflake,
    pub name: String,
    pub kind: u8,
}

// ── Mutation payloads ────────────────────────────────────────────────────

/// Channel fields to change. `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChannelEdit {
    pub name: Option<String>,
    pub topic: Option<String>,
    pub position: Option<i64>,
    pub parent_id: Option<Snowflake>,
    pub archived: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RoleEdit {
    pub name: Option<String>,
    pub color: Option<u32>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewTextChannel {
    pub name: String,
    pub parent_id: Option<Snowflake>,
    pub topic: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewThread {
    pub name: String,
    /// Minutes of inactivity before the thread auto-archives.
    pub auto_archive_duration: Option<u32>,
}

// ── Operations ───────────────────────────────────────────────────────────

/// Abstraction over the connected Discord session.
///
/// Every fetch may fail with `NotFound`; every mutation may additionally
/// fail with `Forbidden`.
pub trait DiscordOperations: Send + Sync + 'static {
    fn fetch_guild(&self, guild_id: Snowflake) -> impl Future<Output = RemoteResult<Guild>> + Send;
    fn fetch_guild_channels(
        &self,
        guild_id: Snowflake,
    ) -> impl Future<Output = RemoteResult<Vec<Channel>>> + Send;
    fn fetch_roles(&self, guild_id: Snowflake) -> impl Future<Output = RemoteResult<Vec<Role>>> + Send;
    fn fetch_members(
        &self,
        guild_id: Snowflake,
        limit: u16,
    ) -> impl Future<Output = RemoteResult<Vec<Member>>> + Send;
    fn fetch_member(
        &self,
        guild_id: Snowflake,
        user_id: Snowflake,
    ) -> impl Future<Output = RemoteResult<Member>> + Send;
    /// Like `fetch_member`, but a user outside the server is `Ok(None)`.
    fn find_member(
        &self,
        guild_id: Snowflake,
        user_id: Snowflake,
    ) -> impl Future<Output = RemoteResult<Option<Member>>> + Send;
    fn fetch_channel(&self, channel_id: Snowflake) -> impl Future<Output = RemoteResult<Channel>> + Send;
    fn fetch_user(&self, user_id: Snowflake) -> impl Future<Output = RemoteResult<User>> + Send;
    fn fetch_message(
        &self,
        channel_id: Snowflake,
        message_id: Snowflake,
    ) -> impl Future<Output = RemoteResult<Message>> + Send;
    /// Most recent messages first.
    fn fetch_messages(
        &self,
        channel_id: Snowflake,
        limit: u8,
    ) -> impl Future<Output = RemoteResult<Vec<Message>>> + Send;

    fn send_message(
        &self,
        channel_id: Snowflake,
        content: &str,
    ) -> impl Future<Output = RemoteResult<Message>> + Send;
    fn delete_message(
        &self,
        channel_id: Snowflake,
        message_id: Snowflake,
        reason: &str,
    ) -> impl Future<Output = RemoteResult<()>> + Send;
    fn add_reaction(
        &self,
        channel_id: Snowflake,
        message_id: Snowflake,
        emoji: &str,
    ) -> impl Future<Output = RemoteResult<()>> + Send;
    /// Removes the bot's own reaction only.
    fn remove_own_reaction(
        &self,
        channel_id: Snowflake,
        message_id: Snowflake,
        emoji: &str,
    ) -> impl Future<Output = RemoteResult<()>> + Send;

    fn edit_channel(
        &self,
        channel_id: Snowflake,
        edit: &ChannelEdit,
        reason: &str,
    ) -> impl Future<Output = RemoteResult<Channel>> + Send;
    fn delete_channel(
        &self,
        channel_id: Snowflake,
        reason: &str,
    ) -> impl Future<Output = RemoteResult<()>> + Send;
    fn create_text_channel(
        &self,
        guild_id: Snowflake,
        channel: &NewTextChannel,
        reason: &str,
    ) -> impl Future<Output = RemoteResult<Channel>> + Send;

    fn start_thread_from_message(
        &self,
        channel_id: Snowflake,
        message_id: Snowflake,
        thread: &NewThread,
        reason: &str,
    ) -> impl Future<Output = RemoteResult<Channel>> + Send;
    fn start_thread(
        &self,
        channel_id: Snowflake,
        kind: ChannelKind,
        thread: &NewThread,
        reason: &str,
    ) -> impl Future<Output = RemoteResult<Channel>> + Send;
    fn start_forum_post(
        &self,
        channel_id: Snowflake,
        thread: &NewThread,
        content: &str,
        reason: &str,
    ) -> impl Future<Output = RemoteResult<Channel>> + Send;

    fn add_member_role(
        &self,
        guild_id: Snowflake,
        user_id: Snowflake,
        role_id: Snowflake,
        reason: &str,
    ) -> impl Future<Output = RemoteResult<()>> + Send;
    fn remove_member_role(
        &self,
        guild_id: Snowflake,
        user_id: Snowflake,
        role_id: Snowflake,
        reason: &str,
    ) -> impl Future<Output = RemoteResult<()>> + Send;
    fn create_role(
        &self,
        guild_id: Snowflake,
        role: &RoleEdit,
        reason: &str,
    ) -> impl Future<Output = RemoteResult<Role>> + Send;
    fn edit_role(
        &self,
        guild_id: Snowflake,
        role_id: Snowflake,
        edit: &RoleEdit,
        reason: &str,
    ) -> impl Future<Output = RemoteResult<Role>> + Send;
    fn delete_role(
        &self,
        guild_id: Snowflake,
        role_id: Snowflake,
        reason: &str,
    ) -> impl Future<Output = RemoteResult<()>> + Send;
    fn timeout_member(
        &self,
        guild_id: Snowflake,
        user_id: Snowflake,
        duration: Duration,
        reason: &str,
    ) -> impl Future<Output = RemoteResult<()>> + Send;

    fn list_global_commands(&self) -> impl Future<Output = RemoteResult<Vec<AppCommand>>> + Send;
    fn list_guild_commands(
        &self,
        guild_id: Snowflake,
    ) -> impl Future<Output = RemoteResult<Vec<AppCommand>>> + Send;
}

// ── MockPlatform for testing ─────────────────────────────────────────────

#[cfg(any(test, feature = "test-harness"))]
pub mod mock {
    //! In-memory Discord with a call log.

    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    pub const GUILD_ID: Snowflake = 100;
    pub const TEXT_CHANNEL_ID: Snowflake = 200;
    pub const FORUM_CHANNEL_ID: Snowflake = 201;
    pub const VOICE_CHANNEL_ID: Snowflake = 202;
    pub const CATEGORY_ID: Snowflake = 203;
    pub const THREAD_ID: Snowflake = 204;
    pub const DM_CHANNEL_ID: Snowflake = 205;
    pub const MODERATOR_ROLE_ID: Snowflake = 300;
    pub const MEMBER_USER_ID: Snowflake = 400;
    pub const OUTSIDER_USER_ID: Snowflake = 401;
    pub const BOT_USER_ID: Snowflake = 499;
    pub const MEMBER_MESSAGE_ID: Snowflake = 500;
    pub const OUTSIDER_MESSAGE_ID: Snowflake = 501;
    pub const DM_MESSAGE_ID: Snowflake = 502;

    /// One recorded remote call.
    #[derive(Debug, Clone, PartialEq)]
    pub enum Call {
        FetchGuild(Snowflake),
        FetchGuildChannels(Snowflake),
        FetchRoles(Snowflake),
        FetchMembers { guild_id: Snowflake, limit: u16 },
        FetchMember(Snowflake, Snowflake),
        FindMember(Snowflake, Snowflake),
        FetchChannel(Snowflake),
        FetchUser(Snowflake),
        FetchMessage(Snowflake, Snowflake),
        FetchMessages { channel_id: Snowflake, limit: u8 },
        SendMessage(Snowflake, String),
        DeleteMessage { message_id: Snowflake, reason: String },
        AddReaction(Snowflake, String),
        RemoveOwnReaction(Snowflake, String),
        EditChannel { channel_id: Snowflake, edit: ChannelEdit, reason: String },
        DeleteChannel { channel_id: Snowflake, reason: String },
        CreateTextChannel(Snowflake, NewTextChannel),
        StartThreadFromMessage(Snowflake, Snowflake, NewThread),
        StartThread(Snowflake, NewThread),
        StartForumPost(Snowflake, NewThread, String),
        AddMemberRole(Snowflake, Snowflake),
        RemoveMemberRole(Snowflake, Snowflake),
        CreateRole(RoleEdit, String),
        EditRole(Snowflake, RoleEdit),
        DeleteRole(Snowflake, String),
        TimeoutMember { user_id: Snowflake, duration: Duration, reason: String },
        ListGlobalCommands,
        ListGuildCommands(Snowflake),
    }

    impl Call {
        pub fn is_mutation(&self) -> bool {
            !matches!(
                self,
                Call::FetchGuild(_)
                    | Call::FetchGuildChannels(_)
                    | Call::FetchRoles(_)
                    | Call::FetchMembers { .. }
                    | Call::FetchMember(..)
                    | Call::FindMember(..)
                    | Call::FetchChannel(_)
                    | Call::FetchUser(_)
                    | Call::FetchMessage(..)
                    | Call::FetchMessages { .. }
                    | Call::ListGlobalCommands
                    | Call::ListGuildCommands(_)
            )
        }
    }

    struct State {
        guild: Guild,
        channels: HashMap<Snowflake, Channel>,
        roles: Vec<Role>,
        members: HashMap<Snowflake, Member>,
        users: HashMap<Snowflake, User>,
        messages: HashMap<Snowflake, Message>,
        next_id: Snowflake,
    }

    pub struct MockPlatform {
        state: Mutex<State>,
        calls: Mutex<Vec<Call>>,
        /// Mutations fail with `Forbidden` when set.
        pub deny_mutations: Mutex<bool>,
        /// Every call fails with `Other` when set.
        pub fail_with: Mutex<Option<String>>,
    }

    impl Default for MockPlatform {
        fn default() -> Self {
            Self::new()
        }
    }

    fn user(id: Snowflake, name: &str, bot: bool) -> User {
        User {
            id,
            username: name.to_string(),
            discriminator: "0".to_string(),
            bot,
        }
    }

    fn channel(id: Snowflake, name: &str, kind: ChannelKind, parent: Option<Snowflake>) -> Channel {
        Channel {
            id,
            guild_id: if kind == ChannelKind::Dm { None } else { Some(GUILD_ID) },
            name: name.to_string(),
            kind,
            position: Some(0),
            parent_id: parent,
            topic: kind.supports_topic().then(|| "general chatter".to_string()),
            archived: kind.is_thread().then_some(false),
        }
    }

    fn message(id: Snowflake, channel_id: Snowflake, author: &User, content: &str) -> Message {
        Message {
            id,
            channel_id,
            author: author.clone(),
            content: content.to_string(),
            timestamp: "2024-01-01T00:00:00+00:00".to_string(),
            reactions: Vec::new(),
        }
    }

    impl MockPlatform {
        /// One server with a text, forum, voice, category, thread and DM channel,
        /// a member, a non-member author, and a `Moderators` role.
        pub fn new() -> Self {
            let alice = user(MEMBER_USER_ID, "alice", false);
            let ghost = user(OUTSIDER_USER_ID, "ghost", false);
            let bot = user(BOT_USER_ID, "mcp-bot", true);

            let channels = [
                channel(TEXT_CHANNEL_ID, "general", ChannelKind::Text, Some(CATEGORY_ID)),
                channel(FORUM_CHANNEL_ID, "help-forum", ChannelKind::Forum, None),
                channel(VOICE_CHANNEL_ID, "lounge", ChannelKind::Voice, None),
                channel(CATEGORY_ID, "Community", ChannelKind::Category, None),
                channel(THREAD_ID, "release-notes", ChannelKind::PublicThread, Some(TEXT_CHANNEL_ID)),
                channel(DM_CHANNEL_ID, "", ChannelKind::Dm, None),
            ]
            .into_iter()
            .map(|c| (c.id, c))
            .collect();

            let mut first = message(MEMBER_MESSAGE_ID, TEXT_CHANNEL_ID, &alice, "hello world");
            first.reactions.push(Reaction {
                emoji: "👍".to_string(),
                count: 2,
            });
            let messages = [
                first,
                message(OUTSIDER_MESSAGE_ID, TEXT_CHANNEL_ID, &ghost, "drive-by spam"),
                message(DM_MESSAGE_ID, DM_CHANNEL_ID, &alice, "psst"),
            ]
            .into_iter()
            .map(|m| (m.id, m))
            .collect();

            let members = [(
                MEMBER_USER_ID,
                Member {
                    user: alice.clone(),
                    // Includes the implicit @everyone role.
                    roles: vec![GUILD_ID, MODERATOR_ROLE_ID],
                },
            )]
            .into_iter()
            .collect();

            let users = [alice, ghost, bot].into_iter().map(|u| (u.id, u)).collect();

            let state = State {
                guild: Guild {
                    id: GUILD_ID,
                    name: "Test Server".to_string(),
                    owner_id: MEMBER_USER_ID,
                    member_count: Some(1),
                    description: None,
                    premium_tier: 0,
                    explicit_content_filter: ContentFilter::AllMembers,
                },
                channels,
                roles: vec![
                    Role {
                        id: GUILD_ID,
                        name: "@everyone".to_string(),
                        color: 0,
                    },
                    Role {
                        id: MODERATOR_ROLE_ID,
                        name: "Moderators".to_string(),
                        color: 0x3498db,
                    },
                ],
                members,
                users,
                messages,
                next_id: 1_000,
            };

            Self {
                state: Mutex::new(state),
                calls: Mutex::new(Vec::new()),
                deny_mutations: Mutex::new(false),
                fail_with: Mutex::new(None),
            }
        }

        /// Snapshot of the call log.
        pub fn calls(&self) -> Vec<Call> {
            self.calls.lock().unwrap().clone()
        }

        pub fn mutations(&self) -> Vec<Call> {
            self.calls().into_iter().filter(Call::is_mutation).collect()
        }

        pub fn channel(&self, id: Snowflake) -> Option<Channel> {
            self.state.lock().unwrap().channels.get(&id).cloned()
        }

        pub fn role(&self, id: Snowflake) -> Option<Role> {
            self.state.lock().unwrap().roles.iter().find(|r| r.id == id).cloned()
        }

        pub fn member_roles(&self, user_id: Snowflake) -> Vec<Snowflake> {
            self.state
                .lock()
                .unwrap()
                .members
                .get(&user_id)
                .map(|m| m.roles.clone())
                .unwrap_or_default()
        }

        pub fn has_message(&self, id: Snowflake) -> bool {
            self.state.lock().unwrap().messages.contains_key(&id)
        }

        fn record(&self, call: Call) -> RemoteResult<()> {
            let mutation = call.is_mutation();
            self.calls.lock().unwrap().push(call);
            if let Some(msg) = self.fail_with.lock().unwrap().clone() {
                return Err(RemoteError::Other(msg));
            }
            if mutation && *self.deny_mutations.lock().unwrap() {
                return Err(RemoteError::Forbidden("Missing Permissions".to_string()));
            }
            Ok(())
        }

        fn next_id(&self) -> Snowflake {
            let mut state = self.state.lock().unwrap();
            state.next_id += 1;
            state.next_id
        }

        fn lookup_channel(&self, id: Snowflake) -> RemoteResult<Channel> {
            self.channel(id)
                .ok_or_else(|| RemoteError::NotFound("Unknown Channel".to_string()))
        }

        fn check_guild(&self, guild_id: Snowflake) -> RemoteResult<()> {
            if guild_id == GUILD_ID {
                Ok(())
            } else {
                Err(RemoteError::NotFound("Unknown Guild".to_string()))
            }
        }

        fn lookup_message(&self, channel_id: Snowflake, message_id: Snowflake) -> RemoteResult<Message> {
            self.state
                .lock()
                .unwrap()
                .messages
                .get(&message_id)
                .filter(|m| m.channel_id == channel_id)
                .cloned()
                .ok_or_else(|| RemoteError::NotFound("Unknown Message".to_string()))
        }

        fn insert_thread(&self, parent: Snowflake, thread: &NewThread) -> Channel {
            let id = self.next_id();
            let created = Channel {
                id,
                guild_id: Some(GUILD_ID),
                name: thread.name.clone(),
                kind: ChannelKind::PublicThread,
                position: None,
                parent_id: Some(parent),
                topic: None,
                archived: Some(false),
            };
            self.state.lock().unwrap().channels.insert(id, created.clone());
            created
        }
    }

    impl DiscordOperations for MockPlatform {
        async fn fetch_guild(&self, guild_id: Snowflake) -> RemoteResult<Guild> {
            self.record(Call::FetchGuild(guild_id))?;
            self.check_guild(guild_id)?;
            Ok(self.state.lock().unwrap().guild.clone())
        }

        async fn fetch_guild_channels(&self, guild_id: Snowflake) -> RemoteResult<Vec<Channel>> {
            self.record(Call::FetchGuildChannels(guild_id))?;
            self.check_guild(guild_id)?;
            let mut channels: Vec<Channel> = self
                .state
                .lock()
                .unwrap()
                .channels
                .values()
                .filter(|c| c.guild_id == Some(guild_id) && !c.kind.is_thread())
                .cloned()
                .collect();
            channels.sort_by_key(|c| c.id);
            Ok(channels)
        }

        async fn fetch_roles(&self, guild_id: Snowflake) -> RemoteResult<Vec<Role>> {
            self.record(Call::FetchRoles(guild_id))?;
            self.check_guild(guild_id)?;
            Ok(self.state.lock().unwrap().roles.clone())
        }

        async fn fetch_members(&self, guild_id: Snowflake, limit: u16) -> RemoteResult<Vec<Member>> {
            self.record(Call::FetchMembers { guild_id, limit })?;
            self.check_guild(guild_id)?;
            let mut members: Vec<Member> =
                self.state.lock().unwrap().members.values().cloned().collect();
            members.sort_by_key(|m| m.user.id);
            members.truncate(usize::from(limit));
            Ok(members)
        }

        async fn fetch_member(&self, guild_id: Snowflake, user_id: Snowflake) -> RemoteResult<Member> {
            self.record(Call::FetchMember(guild_id, user_id))?;
            self.check_guild(guild_id)?;
            self.state
                .lock()
                .unwrap()
                .members
                .get(&user_id)
                .cloned()
                .ok_or_else(|| RemoteError::NotFound("Unknown Member".to_string()))
        }

        async fn find_member(
            &self,
            guild_id: Snowflake,
            user_id: Snowflake,
        ) -> RemoteResult<Option<Member>> {
            self.record(Call::FindMember(guild_id, user_id))?;
            self.check_guild(guild_id)?;
            Ok(self.state.lock().unwrap().members.get(&user_id).cloned())
        }

        async fn fetch_channel(&self, channel_id: Snowflake) -> RemoteResult<Channel> {
            self.record(Call::FetchChannel(channel_id))?;
            self.lookup_channel(channel_id)
        }

        async fn fetch_user(&self, user_id: Snowflake) -> RemoteResult<User> {
            self.record(Call::FetchUser(user_id))?;
            self.state
                .lock()
                .unwrap()
                .users
                .get(&user_id)
                .cloned()
                .ok_or_else(|| RemoteError::NotFound("Unknown User".to_string()))
        }

        async fn fetch_message(
            &self,
            channel_id: Snowflake,
            message_id: Snowflake,
        ) -> RemoteResult<Message> {
            self.record(Call::FetchMessage(channel_id, message_id))?;
            self.lookup_message(channel_id, message_id)
        }

        async fn fetch_messages(&self, channel_id: Snowflake, limit: u8) -> RemoteResult<Vec<Message>> {
            self.record(Call::FetchMessages { channel_id, limit })?;
            self.lookup_channel(channel_id)?;
            let mut messages: Vec<Message> = self
                .state
                .lock()
                .unwrap()
                .messages
                .values()
                .filter(|m| m.channel_id == channel_id)
                .cloned()
                .collect();
            messages.sort_by_key(|m| std::cmp::Reverse(m.id));
            messages.truncate(usize::from(limit));
            Ok(messages)
        }

        async fn send_message(&self, channel_id: Snowflake, content: &str) -> RemoteResult<Message> {
            self.record(Call::SendMessage(channel_id, content.to_string()))?;
            self.lookup_channel(channel_id)?;
            let bot = user(BOT_USER_ID, "mcp-bot", true);
            let sent = message(self.next_id(), channel_id, &bot, content);
            self.state.lock().unwrap().messages.insert(sent.id, sent.clone());
            Ok(sent)
        }

        async fn delete_message(
            &self,
            channel_id: Snowflake,
            message_id: Snowflake,
            reason: &str,
        ) -> RemoteResult<()> {
            self.record(Call::DeleteMessage {
                message_id,
                reason: reason.to_string(),
            })?;
            self.lookup_message(channel_id, message_id)?;
            self.state.lock().unwrap().messages.remove(&message_id);
            Ok(())
        }

        async fn add_reaction(
            &self,
            channel_id: Snowflake,
            message_id: Snowflake,
            emoji: &str,
        ) -> RemoteResult<()> {
            self.record(Call::AddReaction(message_id, emoji.to_string()))?;
            self.lookup_message(channel_id, message_id).map(|_| ())
        }

        async fn remove_own_reaction(
            &self,
            channel_id: Snowflake,
            message_id: Snowflake,
            emoji: &str,
        ) -> RemoteResult<()> {
            self.record(Call::RemoveOwnReaction(message_id, emoji.to_string()))?;
            self.lookup_message(channel_id, message_id).map(|_| ())
        }

        async fn edit_channel(
            &self,
            channel_id: Snowflake,
            edit: &ChannelEdit,
            reason: &str,
        ) -> RemoteResult<Channel> {
            self.record(Call::EditChannel {
                channel_id,
                edit: edit.clone(),
                reason: reason.to_string(),
            })?;
            let mut state = self.state.lock().unwrap();
            let channel = state
                .channels
                .get_mut(&channel_id)
                .ok_or_else(|| RemoteError::NotFound("Unknown Channel".to_string()))?;
            if let Some(name) = &edit.name {
                channel.name = name.clone();
            }
            if let Some(topic) = &edit.topic {
                channel.topic = Some(topic.clone());
            }
            if let Some(position) = edit.position {
                channel.position = Some(position);
            }
            if let Some(parent) = edit.parent_id {
                channel.parent_id = Some(parent);
            }
            if let Some(archived) = edit.archived {
                channel.archived = Some(archived);
            }
            Ok(channel.clone())
        }

        async fn delete_channel(&self, channel_id: Snowflake, reason: &str) -> RemoteResult<()> {
            self.record(Call::DeleteChannel {
                channel_id,
                reason: reason.to_string(),
            })?;
            self.state
                .lock()
                .unwrap()
                .channels
                .remove(&channel_id)
                .map(|_| ())
                .ok_or_else(|| RemoteError::NotFound("Unknown Channel".to_string()))
        }

        async fn create_text_channel(
            &self,
            guild_id: Snowflake,
            channel: &NewTextChannel,
            _reason: &str,
        ) -> RemoteResult<Channel> {
            self.record(Call::CreateTextChannel(guild_id, channel.clone()))?;
            self.check_guild(guild_id)?;
            let created = Channel {
                id: self.next_id(),
                guild_id: Some(guild_id),
                name: channel.name.clone(),
                kind: ChannelKind::Text,
                position: Some(0),
                parent_id: channel.parent_id,
                topic: channel.topic.clone(),
                archived: None,
            };
            self.state.lock().unwrap().channels.insert(created.id, created.clone());
            Ok(created)
        }

        async fn start_thread_from_message(
            &self,
            channel_id: Snowflake,
            message_id: Snowflake,
            thread: &NewThread,
            _reason: &str,
        ) -> RemoteResult<Channel> {
            self.record(Call::StartThreadFromMessage(channel_id, message_id, thread.clone()))?;
            self.lookup_message(channel_id, message_id)?;
            Ok(self.insert_thread(channel_id, thread))
        }

        async fn start_thread(
            &self,
            channel_id: Snowflake,
            _kind: ChannelKind,
            thread: &NewThread,
            _reason: &str,
        ) -> RemoteResult<Channel> {
            self.record(Call::StartThread(channel_id, thread.clone()))?;
            self.lookup_channel(channel_id)?;
            Ok(self.insert_thread(channel_id, thread))
        }

        async fn start_forum_post(
            &self,
            channel_id: Snowflake,
            thread: &NewThread,
            content: &str,
            _reason: &str,
        ) -> RemoteResult<Channel> {
            self.record(Call::StartForumPost(channel_id, thread.clone(), content.to_string()))?;
            self.lookup_channel(channel_id)?;
            Ok(self.insert_thread(channel_id, thread))
        }

        async fn add_member_role(
            &self,
            guild_id: Snowflake,
            user_id: Snowflake,
            role_id: Snowflake,
            _reason: &str,
        ) -> RemoteResult<()> {
            self.record(Call::AddMemberRole(user_id, role_id))?;
            self.check_guild(guild_id)?;
            let mut state = self.state.lock().unwrap();
            let member = state
                .members
                .get_mut(&user_id)
                .ok_or_else(|| RemoteError::NotFound("Unknown Member".to_string()))?;
            if !member.roles.contains(&role_id) {
                member.roles.push(role_id);
            }
            Ok(())
        }

        async fn remove_member_role(
            &self,
            guild_id: Snowflake,
            user_id: Snowflake,
            role_id: Snowflake,
            _reason: &str,
        ) -> RemoteResult<()> {
            self.record(Call::RemoveMemberRole(user_id, role_id))?;
            self.check_guild(guild_id)?;
            let mut state = self.state.lock().unwrap();
            let member = state
                .members
                .get_mut(&user_id)
                .ok_or_else(|| RemoteError::NotFound("Unknown Member".to_string()))?;
            member.roles.retain(|r| *r != role_id);
            Ok(())
        }

        async fn create_role(
            &self,
            guild_id: Snowflake,
            role: &RoleEdit,
            reason: &str,
        ) -> RemoteResult<Role> {
            self.record(Call::CreateRole(role.clone(), reason.to_string()))?;
            self.check_guild(guild_id)?;
            let created = Role {
                id: self.next_id(),
                name: role.name.clone().unwrap_or_else(|| "new role".to_string()),
                color: role.color.unwrap_or(0),
            };
            self.state.lock().unwrap().roles.push(created.clone());
            Ok(created)
        }

        async fn edit_role(
            &self,
            guild_id: Snowflake,
            role_id: Snowflake,
            edit: &RoleEdit,
            _reason: &str,
        ) -> RemoteResult<Role> {
            self.record(Call::EditRole(role_id, edit.clone()))?;
            self.check_guild(guild_id)?;
            let mut state = self.state.lock().unwrap();
            let role = state
                .roles
                .iter_mut()
                .find(|r| r.id == role_id)
                .ok_or_else(|| RemoteError::NotFound("Unknown Role".to_string()))?;
            if let Some(name) = &edit.name {
                role.name = name.clone();
            }
            if let Some(color) = edit.color {
                role.color = color;
            }
            Ok(role.clone())
        }

        async fn delete_role(
            &self,
            guild_id: Snowflake,
            role_id: Snowflake,
            reason: &str,
        ) -> RemoteResult<()> {
            self.record(Call::DeleteRole(role_id, reason.to_string()))?;
            self.check_guild(guild_id)?;
            self.state.lock().unwrap().roles.retain(|r| r.id != role_id);
            Ok(())
        }

        async fn timeout_member(
            &self,
            guild_id: Snowflake,
            user_id: Snowflake,
            duration: Duration,
            reason: &str,
        ) -> RemoteResult<()> {
            self.record(Call::TimeoutMember {
                user_id,
                duration,
                reason: reason.to_string(),
            })?;
            self.check_guild(guild_id)
        }

        async fn list_global_commands(&self) -> RemoteResult<Vec<AppCommand>> {
            self.record(Call::ListGlobalCommands)?;
            Ok(vec![AppCommand {
                id: 900,
                name: "ping".to_string(),
                kind: 1,
            }])
        }

        async fn list_guild_commands(&self, guild_id: Snowflake) -> RemoteResult<Vec<AppCommand>> {
            self.record(Call::ListGuildCommands(guild_id))?;
            self.check_guild(guild_id)?;
            Ok(vec![
                AppCommand {
                    id: 901,
                    name: "warn".to_string(),
                    kind: 1,
                },
                AppCommand {
                    id: 902,
                    name: "Report Message".to_string(),
                    kind: 3,
                },
            ])
        }
    }
}

// ── Tests ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_kind_codes_round_trip() {
        for code in [0u8, 1, 2, 3, 4, 5, 10, 11, 12, 13, 14, 15, 16, 99] {
            assert_eq!(ChannelKind::from_code(code).code(), code);
        }
    }

    #[test]
    fn test_capability_table() {
        assert!(ChannelKind::Text.supports_topic());
        assert!(ChannelKind::Announcement.supports_topic());
        assert!(!ChannelKind::Voice.supports_topic());
        assert!(!ChannelKind::Forum.supports_topic());

        assert_eq!(ChannelKind::Text.thread_start(), ThreadStart::Plain);
        assert_eq!(ChannelKind::Forum.thread_start(), ThreadStart::ForumPost);
        assert_eq!(ChannelKind::Media.thread_start(), ThreadStart::ForumPost);
        assert_eq!(ChannelKind::Voice.thread_start(), ThreadStart::Unsupported);
        assert_eq!(ChannelKind::Category.thread_start(), ThreadStart::Unsupported);
        assert_eq!(ChannelKind::PublicThread.thread_start(), ThreadStart::Unsupported);

        assert!(ChannelKind::PrivateThread.is_thread());
        assert!(!ChannelKind::Text.is_thread());
        assert_eq!(
            ChannelKind::Announcement.bare_thread_kind(),
            ChannelKind::AnnouncementThread
        );
    }

    #[test]
    fn test_channel_kind_display() {
        assert_eq!(ChannelKind::Text.to_string(), "text");
        assert_eq!(ChannelKind::PublicThread.to_string(), "public_thread");
        assert_eq!(ChannelKind::Unknown(42).to_string(), "unknown(42)");
    }

    #[test]
    fn test_snowflake_created_at() {
        // Example snowflake from the Discord API reference.
        let created = snowflake_created_at(175_928_847_299_117_063).unwrap();
        assert_eq!(created.timestamp_millis(), 1_462_015_105_796);
    }

    #[test]
    fn test_user_display_skips_legacy_discriminator() {
        let mut user = User {
            id: 1,
            username: "alice".to_string(),
            discriminator: "0".to_string(),
            bot: false,
        };
        assert_eq!(user.to_string(), "alice");
        user.discriminator = "1234".to_string();
        assert_eq!(user.to_string(), "alice#1234");
    }

    #[test]
    fn test_role_color_hex() {
        let role = Role {
            id: 1,
            name: "red".to_string(),
            color: 0xff0000,
        };
        assert_eq!(role.color_hex(), "#ff0000");
    }

    #[test]
    fn test_remote_error_display() {
        let err = RemoteError::NotFound("Unknown Channel".to_string());
        assert_eq!(err.to_string(), "Not found: Unknown Channel");
    }
}
