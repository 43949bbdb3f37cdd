//! reviewbot: daily review-session reminders for a Discord channel.
//!
//! Reads the schedule sheet, decides which reminders are due and posts them
//! to the reminder channel every night at local midnight.

use std::sync::Arc;

use anyhow::Context;
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use tracing::{info, warn};

use reviewbot_core::config::{load_dotenv, Config};
use reviewbot_notify::{ChannelSink, ChatClient, DiscordClient, ErrorSink, TracingSink};
use reviewbot_reminders::{DailyScheduler, ReminderTarget};
use reviewbot_sheet::{GoogleSheetsSource, SheetCache, SnapshotSource};

// ── CLI ─────────────────────────────────────────────────────────────

/// Review-session reminder bot.
#[derive(Parser, Debug)]
#[command(name = "reviewbot", version, about)]
struct Cli {
    /// Config profile (prefix for every env key, e.g. PROD).
    #[arg(long, env = "REVIEWBOT_PROFILE", default_value = "")]
    profile: String,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Verify the target and run the daily scheduler (default).
    Run,
    /// Print the reminder the bot would send, without sending it.
    Preview {
        /// Day to preview (YYYY-MM-DD). Defaults to today.
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Run one reminder cycle right now.
    SendNow,
    /// List the records parsed from the schedule sheet.
    Events,
}

// ── wiring ──────────────────────────────────────────────────────────

struct App {
    snapshots: Arc<dyn SnapshotSource>,
    scheduler: Arc<DailyScheduler>,
}

fn build(config: &Config) -> anyhow::Result<App> {
    config.validate().context("incomplete configuration")?;

    let sheet = GoogleSheetsSource::from_config(&config.sheet)?;
    let snapshots: Arc<dyn SnapshotSource> =
        Arc::new(SheetCache::new(sheet, config.sheet.refresh_interval()));

    let chat: Arc<dyn ChatClient> = Arc::new(DiscordClient::from_config(&config.discord)?);

    let errors: Arc<dyn ErrorSink> = match &config.discord.error_channel_id {
        Some(channel_id) => Arc::new(ChannelSink::new(chat.clone(), channel_id.clone())),
        None => Arc::new(TracingSink),
    };

    // validate() guarantees both ids are present.
    let target = ReminderTarget {
        channel_id: config.discord.reminder_channel_id.clone().unwrap_or_default(),
        role_id: config.discord.host_role_id.clone().unwrap_or_default(),
    };

    let scheduler = DailyScheduler::new(snapshots.clone(), chat, errors, target)?;
    Ok(App {
        snapshots,
        scheduler: Arc::new(scheduler),
    })
}

async fn run(app: App) -> anyhow::Result<()> {
    if let Err(e) = app.scheduler.initialize().await {
        warn!(error = %e, "reminder initialization failed, no reminders scheduled");
        return Err(e.into());
    }

    let handle = app.scheduler.clone().start();
    if let Some(next) = handle.state().next_fire() {
        info!(next_fire = %next, "reviewbot running");
    }

    shutdown_signal().await;
    info!("shutdown signal received");
    handle.stop().await;
    Ok(())
}

async fn events(app: App) -> anyhow::Result<()> {
    let today = Local::now().date_naive();
    let snapshot = app.snapshots.snapshot(today).await?;
    for event in snapshot.values() {
        let date = event
            .event_date
            .map(|d| d.to_string())
            .unwrap_or_else(|| "(no date)".to_string());
        println!(
            "{:<30} {:<12} {:<20} lead: {}",
            event.name,
            date,
            event.location,
            event.lead_hosts.join(", ")
        );
    }
    println!("{} record(s)", snapshot.len());
    Ok(())
}

/// Wait for SIGINT or SIGTERM (Unix) or Ctrl+C (cross-platform fallback).
async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        match (signal(SignalKind::interrupt()), signal(SignalKind::terminate())) {
            (Ok(mut sigint), Ok(mut sigterm)) => {
                tokio::select! {
                    _ = sigint.recv() => {}
                    _ = sigterm.recv() => {}
                }
                return;
            }
            _ => warn!("failed to register signal handlers, falling back to ctrl_c"),
        }
    }

    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for ctrl_c");
        std::future::pending::<()>().await;
    }
}

// ── main ────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    load_dotenv();
    let cli = Cli::parse();

    let config = Config::for_profile(&cli.profile);
    config.log_summary();
    let app = build(&config)?;

    match cli.command.unwrap_or(Command::Run) {
        Command::Run => run(app).await,
        Command::Preview { date } => {
            let day = date.unwrap_or_else(|| Local::now().date_naive());
            match app.scheduler.compose(day).await? {
                Some(message) => println!("{message}"),
                None => println!("No reminders due on {day}."),
            }
            Ok(())
        }
        Command::SendNow => {
            match app.scheduler.fire_once().await? {
                Some(_) => info!("reminder sent"),
                None => info!("nothing to send"),
            }
            Ok(())
        }
        Command::Events => events(app).await,
    }
}
