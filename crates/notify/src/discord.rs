//! Discord REST API client.
//!
//! Talks to the v10 HTTP API with a bot token. Only the handful of endpoints
//! the reminder bot needs are covered: channel lookup, guild roles, guild
//! member listing and message creation.

use serde::Deserialize;

use reviewbot_core::config::DiscordConfig;

use crate::traits::{ChannelKind, ChatClient, Member, NotifyError};

/// Discord rejects message content longer than this.
pub const MAX_MESSAGE_LEN: usize = 2000;

/// Page size for the guild member listing (API maximum).
const MEMBER_PAGE_LIMIT: usize = 1000;

#[derive(Debug, Deserialize)]
struct ChannelPayload {
    #[serde(rename = "type")]
    kind: u8,
}

#[derive(Debug, Deserialize)]
struct RolePayload {
    id: String,
}

#[derive(Debug, Deserialize)]
struct UserPayload {
    id: String,
    username: String,
    #[serde(default)]
    global_name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct MemberPayload {
    user: UserPayload,
    #[serde(default)]
    nick: Option<String>,
    #[serde(default)]
    roles: Vec<String>,
}

impl MemberPayload {
    fn display_name(&self) -> &str {
        self.nick
            .as_deref()
            .or(self.user.global_name.as_deref())
            .unwrap_or(&self.user.username)
    }
}

fn channel_kind(code: u8) -> ChannelKind {
    match code {
        // GUILD_TEXT, GUILD_ANNOUNCEMENT
        0 | 5 => ChannelKind::Text,
        // GUILD_VOICE, GUILD_STAGE_VOICE
        2 | 13 => ChannelKind::Voice,
        4 => ChannelKind::Category,
        _ => ChannelKind::Other,
    }
}

/// Split on line boundaries so every chunk fits in one message.
///
/// A single line longer than `max` is hard-split on char boundaries.
pub fn split_message(text: &str, max: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();

    for line in text.lines() {
        let needed = if current.is_empty() { line.len() } else { current.len() + 1 + line.len() };
        if needed > max && !current.is_empty() {
            chunks.push(std::mem::take(&mut current));
        }
        if line.len() > max {
            let mut rest = line;
            while rest.len() > max {
                let mut cut = max;
                while !rest.is_char_boundary(cut) {
                    cut -= 1;
                }
                chunks.push(rest[..cut].to_string());
                rest = &rest[cut..];
            }
            current.push_str(rest);
            continue;
        }
        if !current.is_empty() {
            current.push('\n');
        }
        current.push_str(line);
    }

    if !current.is_empty() {
        chunks.push(current);
    }
    chunks
}

/// Bot-token client scoped to one guild.
#[derive(Debug)]
pub struct DiscordClient {
    api_base: String,
    token: String,
    guild_id: String,
    client: reqwest::Client,
}

impl DiscordClient {
    pub fn new(api_base: String, token: String, guild_id: String) -> Result<Self, NotifyError> {
        if token.is_empty() {
            return Err(NotifyError::Config(
                "Discord bot token must not be empty".to_string(),
            ));
        }
        Ok(Self {
            api_base: api_base.trim_end_matches('/').to_string(),
            token,
            guild_id,
            client: reqwest::Client::new(),
        })
    }

    pub fn from_config(config: &DiscordConfig) -> Result<Self, NotifyError> {
        let token = config
            .token
            .clone()
            .ok_or_else(|| NotifyError::Config("DISCORD_TOKEN is not set".to_string()))?;
        let guild_id = config
            .guild_id
            .clone()
            .ok_or_else(|| NotifyError::Config("DISCORD_GUILD_ID is not set".to_string()))?;
        Self::new(config.api_base.clone(), token, guild_id)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.api_base, path)
    }

    async fn get<T: serde::de::DeserializeOwned>(&self, path: &str) -> Result<T, NotifyError> {
        let response = self
            .client
            .get(self.url(path))
            .header(reqwest::header::AUTHORIZATION, format!("Bot {}", self.token))
            .send()
            .await?;
        let response = check_status(response, path).await?;
        Ok(response.json().await?)
    }
}

/// Map non-2xx responses to errors, keeping the body for diagnostics.
async fn check_status(
    response: reqwest::Response,
    path: &str,
) -> Result<reqwest::Response, NotifyError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "<unreadable body>".to_string());

    if status == reqwest::StatusCode::NOT_FOUND {
        return Err(NotifyError::NotFound(path.to_string()));
    }
    if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
        let retry_after = serde_json::from_str::<serde_json::Value>(&body)
            .ok()
            .and_then(|v| v.get("retry_after").and_then(|r| r.as_f64()))
            .map(|secs| secs.ceil() as u64)
            .unwrap_or(5);
        return Err(NotifyError::RateLimited {
            retry_after_secs: retry_after,
        });
    }

    tracing::warn!(path, %status, body = %body, "discord API returned non-2xx status");
    Err(NotifyError::Api {
        status: status.as_u16(),
        body,
    })
}

#[async_trait::async_trait]
impl ChatClient for DiscordClient {
    async fn channel_kind(&self, channel_id: &str) -> Result<ChannelKind, NotifyError> {
        let channel: ChannelPayload = self.get(&format!("/channels/{channel_id}")).await?;
        Ok(channel_kind(channel.kind))
    }

    async fn role_exists(&self, role_id: &str) -> Result<bool, NotifyError> {
        let roles: Vec<RolePayload> = self.get(&format!("/guilds/{}/roles", self.guild_id)).await?;
        Ok(roles.iter().any(|r| r.id == role_id))
    }

    async fn role_members(&self, role_id: &str) -> Result<Vec<Member>, NotifyError> {
        let mut members = Vec::new();
        let mut after = String::from("0");

        loop {
            let page: Vec<MemberPayload> = self
                .get(&format!(
                    "/guilds/{}/members?limit={MEMBER_PAGE_LIMIT}&after={after}",
                    self.guild_id
                ))
                .await?;
            let page_len = page.len();

            for member in &page {
                if member.roles.iter().any(|r| r == role_id) {
                    members.push(Member::new(member.user.id.clone(), member.display_name()));
                }
            }

            match page.last() {
                Some(last) if page_len == MEMBER_PAGE_LIMIT => after = last.user.id.clone(),
                _ => break,
            }
        }

        tracing::debug!(role_id, members = members.len(), "fetched role roster");
        Ok(members)
    }

    async fn send_text(&self, channel_id: &str, text: &str) -> Result<(), NotifyError> {
        let path = format!("/channels/{channel_id}/messages");
        for chunk in split_message(text, MAX_MESSAGE_LEN) {
            let body = serde_json::json!({
                "content": chunk,
                "allowed_mentions": { "parse": ["users"] },
            });
            let response = self
                .client
                .post(self.url(&path))
                .header(reqwest::header::AUTHORIZATION, format!("Bot {}", self.token))
                .json(&body)
                .send()
                .await?;
            check_status(response, &path).await?;
        }
        tracing::info!(channel_id, "discord message sent");
        Ok(())
    }

    fn platform_name(&self) -> &str {
        "discord"
    }
}
