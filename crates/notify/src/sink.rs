//! Operational error reporting.
//!
//! Failures the bot can't surface to a caller (scheduler cycles, startup
//! checks) end up here. Reporting never fails from the caller's point of
//! view: a sink that can't deliver falls back to logging.

use std::sync::Arc;

use crate::traits::ChatClient;

/// A structured error report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorReport {
    /// Where the failure happened (e.g. "daily reminder").
    pub context: String,
    /// Rendered error chain.
    pub message: String,
}

impl ErrorReport {
    pub fn new(context: impl Into<String>, error: &dyn std::fmt::Display) -> Self {
        Self {
            context: context.into(),
            message: error.to_string(),
        }
    }

    /// Short text form for chat channels.
    pub fn render(&self) -> String {
        format!("**Error in {}**\n```\n{}\n```", self.context, self.message)
    }
}

/// Receives operational error reports.
#[async_trait::async_trait]
pub trait ErrorSink: Send + Sync {
    async fn report(&self, report: &ErrorReport);
}

/// Logs reports and nothing else.
#[derive(Debug, Default)]
pub struct TracingSink;

#[async_trait::async_trait]
impl ErrorSink for TracingSink {
    async fn report(&self, report: &ErrorReport) {
        tracing::error!(context = %report.context, error = %report.message, "operational error");
    }
}

/// Posts reports to an operational chat channel.
pub struct ChannelSink {
    client: Arc<dyn ChatClient>,
    channel_id: String,
}

impl ChannelSink {
    pub fn new(client: Arc<dyn ChatClient>, channel_id: String) -> Self {
        Self { client, channel_id }
    }
}

#[async_trait::async_trait]
impl ErrorSink for ChannelSink {
    async fn report(&self, report: &ErrorReport) {
        tracing::error!(context = %report.context, error = %report.message, "operational error");
        if let Err(e) = self.client.send_text(&self.channel_id, &report.render()).await {
            tracing::warn!(
                channel_id = %self.channel_id,
                error = %e,
                "failed to post error report"
            );
        }
    }
}
