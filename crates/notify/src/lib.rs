//! Chat-side collaborators of the reminder bot.
//!
//! This crate provides:
//! - `ChatClient` trait for the channel/role/message operations the bot needs
//! - Discord REST implementation
//! - `PingBuilder` resolving free-text host names to member mentions
//! - `ErrorSink` implementations for operational error reports

pub mod discord;
pub mod ping;
pub mod sink;
pub mod traits;

pub use discord::DiscordClient;
pub use ping::{PingBuilder, Roster};
pub use sink::{ChannelSink, ErrorReport, ErrorSink, TracingSink};
pub use traits::{ChannelKind, ChatClient, Member, NotifyError};
