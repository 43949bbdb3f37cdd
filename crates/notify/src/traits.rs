//! Chat client trait definition and shared error types.

/// Errors that can occur talking to the chat platform.
#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("chat API returned {status}: {body}")]
    Api { status: u16, body: String },

    #[error("not found: {0}")]
    NotFound(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Rate limited: retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },
}

/// A member of the host role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member {
    /// Platform identity used for mentions.
    pub id: String,
    /// Name as shown in the server (nickname, else global name, else username).
    pub display_name: String,
}

impl Member {
    pub fn new(id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
        }
    }
}

/// What a channel id points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelKind {
    /// Accepts plain text messages.
    Text,
    Voice,
    Category,
    Other,
}

impl ChannelKind {
    pub fn accepts_text(self) -> bool {
        matches!(self, ChannelKind::Text)
    }
}

/// Operations the reminder bot needs from the chat platform.
#[async_trait::async_trait]
pub trait ChatClient: Send + Sync {
    /// Resolve a channel id. [`NotifyError::NotFound`] when it doesn't exist.
    async fn channel_kind(&self, channel_id: &str) -> Result<ChannelKind, NotifyError>;

    /// Whether the role exists in the configured server.
    async fn role_exists(&self, role_id: &str) -> Result<bool, NotifyError>;

    /// Members holding the role, in the order the platform returns them.
    async fn role_members(&self, role_id: &str) -> Result<Vec<Member>, NotifyError>;

    /// Post a plain text message.
    async fn send_text(&self, channel_id: &str, text: &str) -> Result<(), NotifyError>;

    /// Mention token for a member.
    fn mention(&self, member: &Member) -> String {
        format!("<@{}>", member.id)
    }

    /// Human-readable name for this platform (e.g., "discord").
    fn platform_name(&self) -> &str;
}
