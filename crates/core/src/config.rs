use std::env;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Load .env file (silently ignores if missing).
pub fn load_dotenv() {
    dotenvy::dotenv().ok();
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_opt(key: &str) -> Option<String> {
    env::var(key).ok().filter(|s| !s.is_empty())
}

/// Read a profiled env var: tries {PROFILE}_{KEY} first, falls back to {KEY}.
fn profiled_env_opt(profile: &str, key: &str) -> Option<String> {
    if !profile.is_empty() {
        let prefixed = format!("{}_{}", profile, key);
        if let Some(v) = env_opt(&prefixed) {
            return Some(v);
        }
    }
    env_opt(key)
}

fn profiled_env_or(profile: &str, key: &str, default: &str) -> String {
    profiled_env_opt(profile, key).unwrap_or_else(|| default.to_string())
}

fn profiled_env_u64(profile: &str, key: &str, default: u64) -> u64 {
    profiled_env_opt(profile, key)
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn require(field: &Option<String>, key: &str, missing: &mut Vec<String>) {
    if field.is_none() {
        missing.push(key.to_string());
    }
}

// ── Top-level config ──────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Active profile name (empty = default).
    pub profile: String,
    pub discord: DiscordConfig,
    pub sheet: SheetConfig,
}

impl Config {
    /// Build config from environment variables (call `load_dotenv()` first).
    /// Profile is read from `REVIEWBOT_PROFILE`. When set (e.g. `PROD`),
    /// every key is first looked up as `{PROFILE}_{KEY}`, falling back to `{KEY}`.
    pub fn from_env() -> Self {
        let profile = env_or("REVIEWBOT_PROFILE", "").to_uppercase();
        Self::for_profile(&profile)
    }

    /// Build config for a specific named profile (empty string = default).
    pub fn for_profile(profile: &str) -> Self {
        let p = profile.to_uppercase();
        let p = p.as_str();
        Self {
            profile: p.to_string(),
            discord: DiscordConfig::from_env_profiled(p),
            sheet: SheetConfig::from_env_profiled(p),
        }
    }

    pub fn profile_label(&self) -> &str {
        if self.profile.is_empty() { "default" } else { &self.profile }
    }

    /// Check that every setting the bot cannot run without is present.
    ///
    /// All missing keys are reported together.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut missing = Vec::new();
        require(&self.discord.token, "DISCORD_TOKEN", &mut missing);
        require(&self.discord.guild_id, "DISCORD_GUILD_ID", &mut missing);
        require(&self.discord.reminder_channel_id, "REMINDER_CHANNEL_ID", &mut missing);
        require(&self.discord.host_role_id, "HOST_ROLE_ID", &mut missing);
        require(&self.sheet.api_key, "GOOGLE_API_KEY", &mut missing);
        require(&self.sheet.sheet_id, "SHEET_ID", &mut missing);

        if missing.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Missing(missing.join(", ")))
        }
    }

    /// Print a redacted summary for startup logs.
    pub fn log_summary(&self) {
        tracing::info!("Config loaded (profile: {}):", self.profile_label());
        tracing::info!(
            "  discord:  guild={}, reminders={}, errors={}, role={}, token={}",
            self.discord.guild_id.as_deref().unwrap_or("(none)"),
            self.discord.reminder_channel_id.as_deref().unwrap_or("(none)"),
            self.discord.error_channel_id.as_deref().unwrap_or("(none)"),
            self.discord.host_role_id.as_deref().unwrap_or("(none)"),
            if self.discord.token.is_some() { "set" } else { "missing" },
        );
        tracing::info!(
            "  sheet:    id={}, range={}, refresh={}s",
            self.sheet.sheet_id.as_deref().unwrap_or("(none)"),
            self.sheet.range,
            self.sheet.refresh_secs,
        );
    }
}

// ── Discord ───────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscordConfig {
    pub token: Option<String>,
    pub guild_id: Option<String>,
    /// Channel that receives the daily reminder.
    pub reminder_channel_id: Option<String>,
    /// Operational error channel. Errors are only logged when unset.
    pub error_channel_id: Option<String>,
    /// Role whose members are pinged as hosts.
    pub host_role_id: Option<String>,
    pub api_base: String,
}

impl DiscordConfig {
    fn from_env_profiled(p: &str) -> Self {
        Self {
            token: profiled_env_opt(p, "DISCORD_TOKEN"),
            guild_id: profiled_env_opt(p, "DISCORD_GUILD_ID"),
            reminder_channel_id: profiled_env_opt(p, "REMINDER_CHANNEL_ID"),
            error_channel_id: profiled_env_opt(p, "ERROR_CHANNEL_ID"),
            host_role_id: profiled_env_opt(p, "HOST_ROLE_ID"),
            api_base: profiled_env_or(p, "DISCORD_API_BASE", "https://discord.com/api/v10"),
        }
    }
}

// ── Google Sheets ─────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SheetConfig {
    pub api_key: Option<String>,
    pub sheet_id: Option<String>,
    /// A1 range covering the 13 schedule columns.
    pub range: String,
    /// Minimum age of a cached snapshot before the sheet is fetched again.
    pub refresh_secs: u64,
    pub api_base: String,
}

impl SheetConfig {
    fn from_env_profiled(p: &str) -> Self {
        Self {
            api_key: profiled_env_opt(p, "GOOGLE_API_KEY"),
            sheet_id: profiled_env_opt(p, "SHEET_ID"),
            range: profiled_env_or(p, "SHEET_RANGE", "Sheet1!A:M"),
            refresh_secs: profiled_env_u64(p, "SHEET_REFRESH_SECS", 300),
            api_base: profiled_env_or(p, "SHEETS_API_BASE", "https://sheets.googleapis.com/v4"),
        }
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Env vars are process-global; each test uses its own profile prefix.

    #[test]
    fn profile_prefixed_key_wins() {
        env::set_var("RBTESTA_SHEET_RANGE", "Schedule!A:M");
        env::set_var("SHEET_REFRESH_SECS", "60");
        let config = Config::for_profile("rbtesta");
        assert_eq!(config.profile, "RBTESTA");
        assert_eq!(config.sheet.range, "Schedule!A:M");
        env::remove_var("RBTESTA_SHEET_RANGE");
        env::remove_var("SHEET_REFRESH_SECS");
    }

    #[test]
    fn validate_lists_every_missing_key() {
        let config = Config {
            profile: String::new(),
            discord: DiscordConfig {
                token: Some("t".to_string()),
                guild_id: None,
                reminder_channel_id: Some("1".to_string()),
                error_channel_id: None,
                host_role_id: None,
                api_base: "http://localhost".to_string(),
            },
            sheet: SheetConfig {
                api_key: Some("k".to_string()),
                sheet_id: None,
                range: "Sheet1!A:M".to_string(),
                refresh_secs: 300,
                api_base: "http://localhost".to_string(),
            },
        };
        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("DISCORD_GUILD_ID"));
        assert!(err.contains("HOST_ROLE_ID"));
        assert!(err.contains("SHEET_ID"));
        assert!(!err.contains("DISCORD_TOKEN"));
    }

    #[test]
    fn profile_label_defaults() {
        let config = Config::for_profile("");
        assert_eq!(config.profile_label(), "default");
        assert_eq!(config.sheet.refresh_interval(), Duration::from_secs(config.sheet.refresh_secs));
    }
}
